//! Keystone v3 client: token issue, refresh and catalog lookup.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::models::{
    AuthRequest, CatalogEntry, Credentials, EndpointOpts, TokenProject, TokenResponse,
};
use crate::error::{OpenStackError, Result};

/// Header carrying the issued token on `POST /v3/auth/tokens`.
const SUBJECT_TOKEN_HEADER: &str = "X-Subject-Token";

/// Tokens expiring sooner than this are refreshed before use.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// An issued Keystone token with its catalog.
#[derive(Debug, Clone)]
pub struct Token {
    /// Token value sent as `X-Auth-Token`.
    pub id: String,
    /// Expiry reported by Keystone.
    pub expires_at: DateTime<Utc>,
    /// Project the token is scoped to.
    pub project: Option<TokenProject>,
    /// Service catalog.
    pub catalog: Vec<CatalogEntry>,
}

impl Token {
    /// Whether the token expires within the refresh margin of `now`.
    #[must_use]
    pub fn expires_soon(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - now < chrono::Duration::seconds(TOKEN_REFRESH_MARGIN_SECS)
    }
}

/// Authenticated OpenStack session shared by service clients.
pub struct ProviderClient {
    /// HTTP client (also used by service clients).
    http: Client,
    /// `.../auth/tokens` URL.
    tokens_url: String,
    /// Credentials used for (re)authentication.
    credentials: Credentials,
    /// Current token.
    token: RwLock<Token>,
}

// Credentials and token stay out of logs.
impl std::fmt::Debug for ProviderClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClient")
            .field("tokens_url", &self.tokens_url)
            .finish_non_exhaustive()
    }
}

impl ProviderClient {
    /// Authenticate against Keystone and return a ready session.
    ///
    /// # Errors
    /// Returns error if the auth URL is invalid or Keystone rejects the
    /// credentials.
    pub async fn authenticate(
        http: Client,
        auth_url: &str,
        credentials: Credentials,
    ) -> Result<Self> {
        let tokens_url = tokens_url(auth_url)?;
        let token = issue_token(&http, &tokens_url, &credentials).await?;

        info!(
            auth_url = %auth_url,
            project = ?token.project.as_ref().map(|p| &p.name),
            expires_at = %token.expires_at,
            "Authenticated with Keystone"
        );

        Ok(Self {
            http,
            tokens_url,
            credentials,
            token: RwLock::new(token),
        })
    }

    /// HTTP client shared with service clients.
    #[must_use]
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Current token value, refreshed first when close to expiry.
    ///
    /// # Errors
    /// Returns error if a needed refresh fails.
    pub async fn token(&self) -> Result<String> {
        {
            let token = self.token.read().await;
            if !token.expires_soon(Utc::now()) {
                return Ok(token.id.clone());
            }
        }

        // Concurrent callers queue here; only the first one refreshes.
        let mut token = self.token.write().await;
        if token.expires_soon(Utc::now()) {
            debug!("Token close to expiry, re-authenticating");
            *token = issue_token(&self.http, &self.tokens_url, &self.credentials).await?;
            info!(expires_at = %token.expires_at, "Re-authenticated with Keystone");
        }
        Ok(token.id.clone())
    }

    /// Issue a fresh token regardless of the current one's expiry.
    ///
    /// # Errors
    /// Returns error if Keystone rejects the credentials.
    pub async fn reauthenticate(&self) -> Result<()> {
        let fresh = issue_token(&self.http, &self.tokens_url, &self.credentials).await?;
        info!(expires_at = %fresh.expires_at, "Re-authenticated with Keystone");
        *self.token.write().await = fresh;
        Ok(())
    }

    /// Project the current token is scoped to.
    pub async fn project(&self) -> Option<TokenProject> {
        self.token.read().await.project.clone()
    }

    /// Resolve a service endpoint URL from the catalog.
    ///
    /// # Errors
    /// Returns error if no endpoint, or more than one distinct endpoint,
    /// matches.
    pub async fn endpoint_for(&self, service_type: &str, opts: &EndpointOpts) -> Result<String> {
        let token = self.token.read().await;
        find_endpoint(&token.catalog, service_type, opts)
    }
}

/// Build the token URL from an auth URL with or without the `/v3` suffix.
fn tokens_url(auth_url: &str) -> Result<String> {
    let parsed = url::Url::parse(auth_url)
        .map_err(|e| OpenStackError::Config(format!("invalid auth_url {auth_url}: {e}")))?;

    let base = parsed.as_str().trim_end_matches('/');
    if base.ends_with("/v3") {
        Ok(format!("{base}/auth/tokens"))
    } else {
        Ok(format!("{base}/v3/auth/tokens"))
    }
}

/// Issue a token with the given credentials.
async fn issue_token(http: &Client, tokens_url: &str, credentials: &Credentials) -> Result<Token> {
    debug!(url = %tokens_url, "POST request (issue token)");

    let response = http
        .post(tokens_url)
        .timeout(Duration::from_secs(30))
        .json(&AuthRequest::from(credentials))
        .send()
        .await?;

    let status = response.status();
    let subject_token = response
        .headers()
        .get(SUBJECT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let text = response.text().await?;

    if !status.is_success() {
        return Err(match status.as_u16() {
            400 | 401 | 403 | 404 => OpenStackError::Auth(format!("{status}: {text}")),
            _ => OpenStackError::from_status(status, text),
        });
    }

    let id = subject_token.ok_or_else(|| {
        OpenStackError::Auth(format!("response is missing {SUBJECT_TOKEN_HEADER} header"))
    })?;
    let body: TokenResponse = serde_json::from_str(&text)?;

    Ok(Token {
        id,
        expires_at: body.token.expires_at,
        project: body.token.project,
        catalog: body.token.catalog,
    })
}

/// Pick the single endpoint URL matching `service_type` and `opts`.
pub(crate) fn find_endpoint(
    catalog: &[CatalogEntry],
    service_type: &str,
    opts: &EndpointOpts,
) -> Result<String> {
    let mut urls: Vec<&str> = catalog
        .iter()
        .filter(|entry| entry.service_type == service_type)
        .flat_map(|entry| entry.endpoints.iter())
        .filter(|endpoint| endpoint.matches(opts))
        .map(|endpoint| endpoint.url.trim_end_matches('/'))
        .collect();
    urls.sort_unstable();
    urls.dedup();

    match urls.as_slice() {
        [url] => Ok((*url).to_string()),
        [] => Err(OpenStackError::Catalog(format!(
            "no {} endpoint for {service_type} in region {}",
            opts.interface,
            opts.region.as_deref().unwrap_or("<any>")
        ))),
        many => Err(OpenStackError::Catalog(format!(
            "{} {} endpoints for {service_type} in region {}; set region_name",
            many.len(),
            opts.interface,
            opts.region.as_deref().unwrap_or("<any>")
        ))),
    }
}
