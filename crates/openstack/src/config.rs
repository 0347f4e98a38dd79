//! clouds.yaml configuration.
//!
//! Reads the standard OpenStack client configuration file and turns a named
//! cloud into credentials, endpoint selection and an HTTP client.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Certificate, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{OpenStackError, Result};
use crate::identity::{
    ApplicationCredentialRef, Credentials, DomainRef, EndpointOpts, Interface, ProjectRef, UserRef,
};

/// Environment variable naming an explicit clouds.yaml path.
pub const CLIENT_CONFIG_FILE_ENV: &str = "OS_CLIENT_CONFIG_FILE";

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Contents of a clouds.yaml file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CloudsConfig {
    /// Clouds by name.
    #[serde(default)]
    pub clouds: BTreeMap<String, CloudConfig>,
}

/// A single named cloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudConfig {
    /// Authentication parameters.
    #[serde(default)]
    pub auth: AuthConfig,
    /// `password` or `v3applicationcredential`; inferred when unset.
    pub auth_type: Option<String>,
    /// Region to select endpoints from.
    pub region_name: Option<String>,
    /// Endpoint interface (public, internal, admin).
    pub interface: Option<String>,
    /// Verify TLS certificates.
    #[serde(default = "default_verify")]
    pub verify: bool,
    /// PEM bundle of extra trusted CAs.
    pub cacert: Option<PathBuf>,
    /// Identity API version; only 3 is supported.
    pub identity_api_version: Option<serde_yaml::Value>,
}

fn default_verify() -> bool {
    true
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            auth: AuthConfig::default(),
            auth_type: None,
            region_name: None,
            interface: None,
            verify: default_verify(),
            cacert: None,
            identity_api_version: None,
        }
    }
}

/// `auth` block of a cloud.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    pub auth_url: Option<String>,
    pub username: Option<String>,
    pub user_id: Option<String>,
    pub password: Option<String>,
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    pub user_domain_name: Option<String>,
    pub user_domain_id: Option<String>,
    pub project_domain_name: Option<String>,
    pub project_domain_id: Option<String>,
    /// Fallback for both user and project domain.
    pub domain_name: Option<String>,
    /// Fallback for both user and project domain.
    pub domain_id: Option<String>,
    pub application_credential_id: Option<String>,
    pub application_credential_name: Option<String>,
    pub application_credential_secret: Option<String>,
}

impl CloudsConfig {
    /// Parse clouds.yaml contents.
    ///
    /// # Errors
    /// Returns error if the YAML is malformed.
    pub fn from_yaml(contents: &str) -> Result<Self> {
        serde_yaml::from_str(contents)
            .map_err(|e| OpenStackError::Config(format!("Failed to parse clouds.yaml: {e}")))
    }

    /// Load clouds.yaml from a file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading clouds.yaml");
        let contents = std::fs::read_to_string(path).map_err(|e| {
            OpenStackError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        Self::from_yaml(&contents)
    }

    /// Locations searched for clouds.yaml, in order.
    #[must_use]
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(explicit) = std::env::var(CLIENT_CONFIG_FILE_ENV) {
            paths.push(PathBuf::from(explicit));
        }
        paths.push(PathBuf::from("clouds.yaml"));
        if let Ok(home) = std::env::var("HOME") {
            paths.push(PathBuf::from(home).join(".config/openstack/clouds.yaml"));
        }
        paths.push(PathBuf::from("/etc/openstack/clouds.yaml"));
        paths
    }

    /// Load the first clouds.yaml found in [`Self::search_paths`].
    ///
    /// # Errors
    /// Returns error if no file exists or the first one found is invalid.
    pub fn discover() -> Result<Self> {
        let paths = Self::search_paths();
        let path = paths.iter().find(|p| p.is_file()).ok_or_else(|| {
            OpenStackError::Config(format!(
                "no clouds.yaml found (searched {})",
                paths
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        Self::load(path)
    }

    /// Look up a cloud by name.
    ///
    /// # Errors
    /// Returns error if the cloud is not defined.
    pub fn cloud(&self, name: &str) -> Result<&CloudConfig> {
        self.clouds
            .get(name)
            .ok_or_else(|| OpenStackError::Config(format!("cloud {name} not found in clouds.yaml")))
    }
}

/// Pick an explicit domain, then the shared fallback.
fn domain(
    name: Option<&String>,
    id: Option<&String>,
    fallback_name: Option<&String>,
    fallback_id: Option<&String>,
) -> Option<DomainRef> {
    id.map(|id| DomainRef::Id(id.clone()))
        .or_else(|| name.map(|n| DomainRef::Name(n.clone())))
        .or_else(|| fallback_id.map(|id| DomainRef::Id(id.clone())))
        .or_else(|| fallback_name.map(|n| DomainRef::Name(n.clone())))
}

impl AuthConfig {
    fn user(&self, cloud: &str) -> Result<UserRef> {
        if let Some(id) = &self.user_id {
            return Ok(UserRef::Id(id.clone()));
        }
        let name = self
            .username
            .clone()
            .ok_or_else(|| missing(cloud, "username or user_id"))?;
        let domain = domain(
            self.user_domain_name.as_ref(),
            self.user_domain_id.as_ref(),
            self.domain_name.as_ref(),
            self.domain_id.as_ref(),
        )
        .ok_or_else(|| missing(cloud, "user_domain_name or user_domain_id"))?;
        Ok(UserRef::Name { name, domain })
    }

    fn project(&self, cloud: &str) -> Result<Option<ProjectRef>> {
        if let Some(id) = &self.project_id {
            return Ok(Some(ProjectRef::Id(id.clone())));
        }
        let Some(name) = self.project_name.clone() else {
            return Ok(None);
        };
        let domain = domain(
            self.project_domain_name.as_ref(),
            self.project_domain_id.as_ref(),
            self.domain_name.as_ref(),
            self.domain_id.as_ref(),
        )
        .ok_or_else(|| missing(cloud, "project_domain_name or project_domain_id"))?;
        Ok(Some(ProjectRef::Name { name, domain }))
    }
}

fn missing(cloud: &str, key: &str) -> OpenStackError {
    OpenStackError::Config(format!("cloud {cloud}: auth.{key} is required"))
}

impl CloudConfig {
    /// Keystone URL.
    ///
    /// # Errors
    /// Returns error if `auth.auth_url` is missing.
    pub fn auth_url(&self, cloud: &str) -> Result<&str> {
        self.auth
            .auth_url
            .as_deref()
            .ok_or_else(|| missing(cloud, "auth_url"))
    }

    /// Build credentials from the `auth` block.
    ///
    /// # Errors
    /// Returns error naming the first missing key.
    pub fn credentials(&self, cloud: &str) -> Result<Credentials> {
        if let Some(version) = &self.identity_api_version {
            let v3 = match version {
                serde_yaml::Value::Number(n) => n.as_f64() == Some(3.0),
                serde_yaml::Value::String(s) => s == "3",
                _ => false,
            };
            if !v3 {
                return Err(OpenStackError::Config(format!(
                    "cloud {cloud}: only identity_api_version 3 is supported"
                )));
            }
        }

        let auth_type = self.auth_type.as_deref().unwrap_or_else(|| {
            if self.auth.application_credential_secret.is_some() {
                "v3applicationcredential"
            } else {
                "password"
            }
        });

        match auth_type {
            "password" | "v3password" => Ok(Credentials::Password {
                user: self.auth.user(cloud)?,
                password: self
                    .auth
                    .password
                    .clone()
                    .ok_or_else(|| missing(cloud, "password"))?,
                project: self.auth.project(cloud)?,
            }),
            "v3applicationcredential" => {
                let secret = self
                    .auth
                    .application_credential_secret
                    .clone()
                    .ok_or_else(|| missing(cloud, "application_credential_secret"))?;
                let credential = if let Some(id) = &self.auth.application_credential_id {
                    ApplicationCredentialRef::Id(id.clone())
                } else if let Some(name) = &self.auth.application_credential_name {
                    ApplicationCredentialRef::Name {
                        name: name.clone(),
                        user: self.auth.user(cloud)?,
                    }
                } else {
                    return Err(missing(
                        cloud,
                        "application_credential_id or application_credential_name",
                    ));
                };
                Ok(Credentials::ApplicationCredential { credential, secret })
            }
            other => Err(OpenStackError::Config(format!(
                "cloud {cloud}: unsupported auth_type {other}"
            ))),
        }
    }

    /// Endpoint selection for service clients.
    ///
    /// # Errors
    /// Returns error if `interface` is not public, internal or admin.
    pub fn endpoint_opts(&self) -> Result<EndpointOpts> {
        let interface = match &self.interface {
            Some(raw) => raw.parse::<Interface>().map_err(OpenStackError::Config)?,
            None => Interface::default(),
        };
        Ok(EndpointOpts {
            region: self.region_name.clone().filter(|r| !r.is_empty()),
            interface,
        })
    }

    /// HTTP client honoring `verify` and `cacert`.
    ///
    /// # Errors
    /// Returns error if the CA bundle cannot be read or the client cannot be
    /// built.
    pub fn http_client(&self) -> Result<Client> {
        let mut builder = Client::builder().timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        if let Some(path) = &self.cacert {
            let pem = std::fs::read(path).map_err(|e| {
                OpenStackError::Config(format!("Failed to read cacert {}: {e}", path.display()))
            })?;
            for cert in Certificate::from_pem_bundle(&pem)? {
                builder = builder.add_root_certificate(cert);
            }
        }

        if !self.verify {
            warn!("TLS certificate verification disabled for OpenStack API");
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(builder.build()?)
    }
}
