//! A compute client that fails every call with the same error.

use async_trait::async_trait;

use super::models::{
    AttachedInterface, AvailabilityZone, CreateServerOpts, ListServersOpts, ServerExt,
};
use super::traits::ComputeClient;
use crate::error::{OpenStackError, Result};

/// Stand-in [`ComputeClient`] for when a real client could not be built.
///
/// Every method returns [`OpenStackError::ClientUnavailable`] with the
/// reason given at construction.
#[derive(Debug, Clone)]
pub struct ComputeErrorClient {
    reason: String,
}

impl ComputeErrorClient {
    /// Create an error client reporting `reason`.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Create an error client reporting the given error.
    #[must_use]
    pub fn from_error(err: &OpenStackError) -> Self {
        Self::new(err.to_string())
    }

    fn error(&self) -> OpenStackError {
        OpenStackError::ClientUnavailable(self.reason.clone())
    }
}

#[async_trait]
impl ComputeClient for ComputeErrorClient {
    async fn list_availability_zones(&self) -> Result<Vec<AvailabilityZone>> {
        Err(self.error())
    }

    async fn get_flavor_id_from_name(&self, _flavor: &str) -> Result<String> {
        Err(self.error())
    }

    async fn create_server(&self, _opts: CreateServerOpts) -> Result<ServerExt> {
        Err(self.error())
    }

    async fn delete_server(&self, _server_id: &str) -> Result<()> {
        Err(self.error())
    }

    async fn get_server(&self, _server_id: &str) -> Result<ServerExt> {
        Err(self.error())
    }

    async fn list_servers(&self, _opts: &ListServersOpts) -> Result<Vec<ServerExt>> {
        Err(self.error())
    }

    async fn list_attached_interfaces(&self, _server_id: &str) -> Result<Vec<AttachedInterface>> {
        Err(self.error())
    }

    async fn delete_attached_interface(&self, _server_id: &str, _port_id: &str) -> Result<()> {
        Err(self.error())
    }
}
