//! Nova API client implementation.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, info, warn};

use super::models::{
    AttachedInterface, AvailabilityZone, AvailabilityZoneListResponse, CreateServerOpts,
    FlavorListResponse, InterfaceListResponse, ListServersOpts, Page, ServerExt,
    ServerListResponse, ServerResponse,
};
use super::traits::ComputeClient;
use crate::error::{OpenStackError, Result};
use crate::identity::{EndpointOpts, ProviderClient};
use crate::metrics::MetricContext;

/// Minimum Nova microversion this client speaks.
///
/// Server tags were added in 2.52; 2.53 corresponds to OpenStack Pike.
pub const NOVA_MINIMUM_MICROVERSION: &str = "2.53";

/// Catalog service type for Nova.
const SERVICE_TYPE: &str = "compute";

const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";
const NOVA_MICROVERSION_HEADER: &str = "X-OpenStack-Nova-API-Version";
const API_VERSION_HEADER: &str = "OpenStack-API-Version";

/// Build a compute client for the region and interface in `opts`.
///
/// # Errors
/// Returns error if the catalog has no unique compute endpoint.
pub async fn new_compute_client(
    provider: Arc<ProviderClient>,
    opts: &EndpointOpts,
) -> Result<NovaClient> {
    let endpoint = provider
        .endpoint_for(SERVICE_TYPE, opts)
        .await
        .map_err(|e| {
            OpenStackError::Config(format!("failed to create compute service client: {e}"))
        })?;

    info!(endpoint = %endpoint, microversion = NOVA_MINIMUM_MICROVERSION, "Compute client ready");
    Ok(NovaClient::new(provider, endpoint))
}

/// Reject IDs that would change the request path.
///
/// Dot segments are normalized away by the URL parser, so `..` would
/// address the parent resource.
fn path_segment<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if matches!(value, "" | "." | "..") || value.contains(['/', '\\', '?', '#', '%']) {
        return Err(OpenStackError::InvalidRequest(format!(
            "invalid {what}: {value:?}"
        )));
    }
    Ok(value)
}

/// Nova compute client.
#[derive(Debug, Clone)]
pub struct NovaClient {
    /// Authenticated session.
    provider: Arc<ProviderClient>,
    /// Compute endpoint without trailing slash.
    endpoint: String,
}

impl NovaClient {
    /// Create a client for a known compute endpoint.
    #[must_use]
    pub fn new(provider: Arc<ProviderClient>, endpoint: impl Into<String>) -> Self {
        Self {
            provider,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    /// Compute endpoint in use.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// Send an authenticated request, re-authenticating once on 401.
    async fn execute<F>(&self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder + Send + Sync,
    {
        let mut reauthenticated = false;
        loop {
            let token = self.provider.token().await?;
            let response = build(self.provider.http())
                .header(AUTH_TOKEN_HEADER, token)
                .header(NOVA_MICROVERSION_HEADER, NOVA_MINIMUM_MICROVERSION)
                .header(
                    API_VERSION_HEADER,
                    format!("compute {NOVA_MINIMUM_MICROVERSION}"),
                )
                .send()
                .await?;

            if response.status() == StatusCode::UNAUTHORIZED && !reauthenticated {
                warn!("Token rejected by compute API, re-authenticating");
                self.provider.reauthenticate().await?;
                reauthenticated = true;
                continue;
            }

            return Ok(response);
        }
    }

    /// Make an authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url = %url, "GET request");
        let response = self.execute(|http| http.get(url)).await?;
        Self::handle_response(response).await
    }

    /// Make an authenticated POST request.
    async fn post<T, B>(&self, url: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + Sync,
    {
        debug!(url = %url, "POST request");
        let response = self.execute(|http| http.post(url).json(body)).await?;
        Self::handle_response(response).await
    }

    /// Make an authenticated DELETE request.
    async fn delete(&self, url: &str) -> Result<()> {
        debug!(url = %url, "DELETE request");
        let response = self.execute(|http| http.delete(url)).await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(OpenStackError::from_status(status, text))
        }
    }

    /// GET every page of a list, following `next` links.
    async fn get_all_pages<P, Q>(&self, url: String, query: &Q) -> Result<Vec<P::Item>>
    where
        P: Page,
        Q: serde::Serialize + Sync + ?Sized,
    {
        let mut items = Vec::new();
        let mut next = Some(url);
        let mut first = true;

        while let Some(url) = next.take() {
            debug!(url = %url, "GET request (page)");
            let response = self
                .execute(|http| {
                    let request = http.get(&url);
                    // Next links already carry the filters and marker.
                    if first {
                        request.query(query)
                    } else {
                        request
                    }
                })
                .await?;
            let page: P = Self::handle_response(response).await?;
            first = false;

            let (page_items, next_link) = page.into_parts();
            if page_items.is_empty() {
                break;
            }
            items.extend(page_items);
            next = next_link.filter(|n| *n != url);
        }

        Ok(items)
    }

    /// Handle API response, parsing JSON or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                OpenStackError::Serialization(e)
            })
        } else {
            Err(OpenStackError::from_status(status, text))
        }
    }
}

#[async_trait]
impl ComputeClient for NovaClient {
    async fn list_availability_zones(&self) -> Result<Vec<AvailabilityZone>> {
        let mc = MetricContext::new("availability_zone", "list");
        let result = self
            .get::<AvailabilityZoneListResponse>(&self.url("/os-availability-zone"))
            .await
            .map(|r| r.availability_zone_info);
        mc.observe(result)
    }

    async fn get_flavor_id_from_name(&self, flavor: &str) -> Result<String> {
        let mc = MetricContext::new("flavor", "get");
        let result = async {
            let no_filters: &[(&str, &str)] = &[];
            let flavors = self
                .get_all_pages::<FlavorListResponse, _>(self.url("/flavors/detail"), no_filters)
                .await?;

            let mut matches = flavors.into_iter().filter(|f| f.name == flavor);
            match (matches.next(), matches.count()) {
                (Some(found), 0) => Ok(found.id),
                (Some(_), rest) => Err(OpenStackError::MultipleResults {
                    resource: "flavor",
                    name: flavor.to_string(),
                    count: rest + 1,
                }),
                (None, _) => Err(OpenStackError::NotFound(format!(
                    "Unable to find flavor with name {flavor}"
                ))),
            }
        }
        .await;
        mc.observe(result)
    }

    async fn create_server(&self, opts: CreateServerOpts) -> Result<ServerExt> {
        let body = opts.to_request()?;
        info!(
            name = %opts.name,
            flavor = %opts.flavor_ref,
            availability_zone = ?opts.availability_zone,
            "Creating server"
        );

        let mc = MetricContext::new("server", "create");
        let result = self
            .post::<ServerResponse, _>(&self.url("/servers"), &body)
            .await
            .map(|r| r.server);
        let server = mc.observe(result)?;

        info!(server_id = %server.server.id, name = %opts.name, "Server creation accepted");
        Ok(server)
    }

    async fn delete_server(&self, server_id: &str) -> Result<()> {
        let id = path_segment(server_id, "server ID")?;
        info!(server_id = %id, "Deleting server");

        let mc = MetricContext::new("server", "delete");
        mc.observe_ignore_not_found(self.delete(&self.url(&format!("/servers/{id}"))).await)
    }

    async fn get_server(&self, server_id: &str) -> Result<ServerExt> {
        let id = path_segment(server_id, "server ID")?;

        let mc = MetricContext::new("server", "get");
        let result = self
            .get::<ServerResponse>(&self.url(&format!("/servers/{id}")))
            .await
            .map(|r| r.server);
        mc.observe_ignore_not_found(result)
    }

    async fn list_servers(&self, opts: &ListServersOpts) -> Result<Vec<ServerExt>> {
        let mc = MetricContext::new("server", "list");
        let result = self
            .get_all_pages::<ServerListResponse, _>(self.url("/servers/detail"), opts)
            .await;
        mc.observe(result)
    }

    async fn list_attached_interfaces(&self, server_id: &str) -> Result<Vec<AttachedInterface>> {
        let id = path_segment(server_id, "server ID")?;

        let mc = MetricContext::new("server_os_interface", "list");
        let result = self
            .get::<InterfaceListResponse>(&self.url(&format!("/servers/{id}/os-interface")))
            .await
            .map(|r| r.interface_attachments);
        mc.observe(result)
    }

    async fn delete_attached_interface(&self, server_id: &str, port_id: &str) -> Result<()> {
        let id = path_segment(server_id, "server ID")?;
        let port = path_segment(port_id, "port ID")?;
        info!(server_id = %id, port_id = %port, "Detaching interface");

        let mc = MetricContext::new("server_os_interface", "delete");
        let result = self
            .delete(&self.url(&format!("/servers/{id}/os-interface/{port}")))
            .await;
        mc.observe_ignore_not_found_or_conflict(result)
    }
}
