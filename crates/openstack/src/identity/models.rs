//! Keystone v3 request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Credentials
// ============================================================================

/// A domain referenced by name or ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainRef {
    /// Domain ID.
    Id(String),
    /// Domain name.
    Name(String),
}

/// How to authenticate against Keystone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// User password, scoped to a project.
    Password {
        /// User name (requires `user_domain`) or user ID.
        user: UserRef,
        /// User password.
        password: String,
        /// Project to scope the token to.
        project: Option<ProjectRef>,
    },
    /// Application credential. Scope is fixed by the credential itself.
    ApplicationCredential {
        /// Credential ID, or credential name plus its owning user.
        credential: ApplicationCredentialRef,
        /// Credential secret.
        secret: String,
    },
}

/// A user referenced by ID, or by name within a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    /// User ID.
    Id(String),
    /// User name and its domain.
    Name { name: String, domain: DomainRef },
}

/// A project referenced by ID, or by name within a domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    /// Project ID.
    Id(String),
    /// Project name and its domain.
    Name { name: String, domain: DomainRef },
}

/// An application credential referenced by ID, or by name and owning user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplicationCredentialRef {
    /// Credential ID.
    Id(String),
    /// Credential name and owning user.
    Name { name: String, user: UserRef },
}

// ============================================================================
// Token request body
// ============================================================================

/// `POST /v3/auth/tokens` body.
#[derive(Debug, Serialize)]
pub struct AuthRequest {
    pub auth: AuthBody,
}

#[derive(Debug, Serialize)]
pub struct AuthBody {
    pub identity: IdentityBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<ScopeBody>,
}

#[derive(Debug, Serialize)]
pub struct IdentityBody {
    pub methods: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_credential: Option<ApplicationCredentialBody>,
}

#[derive(Debug, Serialize)]
pub struct PasswordBody {
    pub user: UserBody,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationCredentialBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserBody>,
    pub secret: String,
}

#[derive(Debug, Serialize)]
pub struct ScopeBody {
    pub project: ProjectBody,
}

#[derive(Debug, Serialize)]
pub struct ProjectBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<DomainRef>,
}

impl UserBody {
    fn from_ref(user: &UserRef, password: Option<String>) -> Self {
        match user {
            UserRef::Id(id) => Self {
                id: Some(id.clone()),
                name: None,
                domain: None,
                password,
            },
            UserRef::Name { name, domain } => Self {
                id: None,
                name: Some(name.clone()),
                domain: Some(domain.clone()),
                password,
            },
        }
    }
}

impl From<&Credentials> for AuthRequest {
    fn from(credentials: &Credentials) -> Self {
        let (identity, scope) = match credentials {
            Credentials::Password {
                user,
                password,
                project,
            } => {
                let identity = IdentityBody {
                    methods: vec!["password"],
                    password: Some(PasswordBody {
                        user: UserBody::from_ref(user, Some(password.clone())),
                    }),
                    application_credential: None,
                };
                let scope = project.as_ref().map(|project| ScopeBody {
                    project: match project {
                        ProjectRef::Id(id) => ProjectBody {
                            id: Some(id.clone()),
                            name: None,
                            domain: None,
                        },
                        ProjectRef::Name { name, domain } => ProjectBody {
                            id: None,
                            name: Some(name.clone()),
                            domain: Some(domain.clone()),
                        },
                    },
                });
                (identity, scope)
            }
            Credentials::ApplicationCredential { credential, secret } => {
                let body = match credential {
                    ApplicationCredentialRef::Id(id) => ApplicationCredentialBody {
                        id: Some(id.clone()),
                        name: None,
                        user: None,
                        secret: secret.clone(),
                    },
                    ApplicationCredentialRef::Name { name, user } => ApplicationCredentialBody {
                        id: None,
                        name: Some(name.clone()),
                        user: Some(UserBody::from_ref(user, None)),
                        secret: secret.clone(),
                    },
                };
                let identity = IdentityBody {
                    methods: vec!["application_credential"],
                    password: None,
                    application_credential: Some(body),
                };
                (identity, None)
            }
        };

        Self {
            auth: AuthBody { identity, scope },
        }
    }
}

// ============================================================================
// Token response
// ============================================================================

/// `POST /v3/auth/tokens` response body.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: TokenBody,
}

/// Token details.
#[derive(Debug, Deserialize)]
pub struct TokenBody {
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// Project the token is scoped to.
    pub project: Option<TokenProject>,
    /// Service catalog (absent for unscoped tokens).
    #[serde(default)]
    pub catalog: Vec<CatalogEntry>,
}

/// Project a token is scoped to.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenProject {
    pub id: String,
    pub name: String,
}

/// A service in the catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    /// Service type (e.g. "compute", "network").
    #[serde(rename = "type")]
    pub service_type: String,
    /// Service name (e.g. "nova").
    #[serde(default)]
    pub name: String,
    /// Endpoints for the service.
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
}

/// A single service endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Endpoint {
    /// Interface: public, internal or admin.
    pub interface: String,
    /// Region ID.
    pub region_id: Option<String>,
    /// Region name (deprecated alias of `region_id`).
    pub region: Option<String>,
    /// Endpoint URL.
    pub url: String,
}

/// Endpoint interface to use from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interface {
    #[default]
    Public,
    Internal,
    Admin,
}

impl Interface {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Interface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for Interface {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim_end_matches("URL").to_ascii_lowercase().as_str() {
            "public" => Ok(Self::Public),
            "internal" => Ok(Self::Internal),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown endpoint interface: {other}")),
        }
    }
}

/// Selects an endpoint from the service catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointOpts {
    /// Region to match; any region when unset.
    pub region: Option<String>,
    /// Interface to match.
    pub interface: Interface,
}

impl Endpoint {
    fn in_region(&self, region: &str) -> bool {
        self.region_id.as_deref() == Some(region) || self.region.as_deref() == Some(region)
    }

    /// Whether this endpoint satisfies the selection options.
    #[must_use]
    pub fn matches(&self, opts: &EndpointOpts) -> bool {
        self.interface == opts.interface.as_str()
            && opts.region.as_deref().is_none_or(|r| self.in_region(r))
    }
}
