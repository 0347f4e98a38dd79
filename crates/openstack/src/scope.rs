//! Authenticated session plus endpoint selection for one cloud.

use std::sync::Arc;

use tracing::warn;

use crate::compute::{new_compute_client, ComputeClient, ComputeErrorClient, NovaClient};
use crate::config::CloudConfig;
use crate::error::Result;
use crate::identity::{EndpointOpts, ProviderClient};

/// Everything needed to build service clients for a cloud.
#[derive(Debug, Clone)]
pub struct Scope {
    /// Authenticated session.
    pub provider: Arc<ProviderClient>,
    /// Region and interface to pick endpoints with.
    pub endpoint_opts: EndpointOpts,
}

impl Scope {
    /// Authenticate using a cloud from clouds.yaml.
    ///
    /// # Errors
    /// Returns error if the cloud config is incomplete or Keystone rejects
    /// the credentials.
    pub async fn from_cloud(cloud: &CloudConfig, name: &str) -> Result<Self> {
        let http = cloud.http_client()?;
        let credentials = cloud.credentials(name)?;
        let endpoint_opts = cloud.endpoint_opts()?;
        let provider =
            ProviderClient::authenticate(http, cloud.auth_url(name)?, credentials).await?;

        Ok(Self {
            provider: Arc::new(provider),
            endpoint_opts,
        })
    }

    /// Build a compute client.
    ///
    /// # Errors
    /// Returns error if the catalog has no unique compute endpoint.
    pub async fn compute_client(&self) -> Result<NovaClient> {
        new_compute_client(Arc::clone(&self.provider), &self.endpoint_opts).await
    }

    /// Build a compute client, falling back to one that reports the
    /// construction error on every call.
    pub async fn compute_client_or_error(&self) -> Arc<dyn ComputeClient> {
        match self.compute_client().await {
            Ok(client) => Arc::new(client),
            Err(e) => {
                warn!(error = %e, "Compute client unavailable");
                Arc::new(ComputeErrorClient::from_error(&e))
            }
        }
    }
}
