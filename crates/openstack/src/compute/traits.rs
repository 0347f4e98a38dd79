//! Compute client trait.

use async_trait::async_trait;

use super::models::{
    AttachedInterface, AvailabilityZone, CreateServerOpts, ListServersOpts, ServerExt,
};
use crate::error::Result;

/// Narrow view of the compute API used by cluster controllers.
///
/// Every call is observed by [`crate::metrics::MetricContext`]. Not-found
/// and conflict errors are still returned; the controller decides whether
/// they mean success (for example a delete of an already-deleted server).
#[async_trait]
pub trait ComputeClient: Send + Sync {
    /// List availability zones.
    async fn list_availability_zones(&self) -> Result<Vec<AvailabilityZone>>;

    /// Resolve a flavor name to its ID.
    async fn get_flavor_id_from_name(&self, flavor: &str) -> Result<String>;

    /// Create a server. The returned server is Nova's create response, which
    /// carries little beyond the ID.
    async fn create_server(&self, opts: CreateServerOpts) -> Result<ServerExt>;

    /// Delete a server.
    async fn delete_server(&self, server_id: &str) -> Result<()>;

    /// Get a server by ID.
    async fn get_server(&self, server_id: &str) -> Result<ServerExt>;

    /// List servers matching the filters, following pagination.
    async fn list_servers(&self, opts: &ListServersOpts) -> Result<Vec<ServerExt>>;

    /// List network interfaces attached to a server.
    async fn list_attached_interfaces(&self, server_id: &str) -> Result<Vec<AttachedInterface>>;

    /// Detach a port from a server.
    async fn delete_attached_interface(&self, server_id: &str, port_id: &str) -> Result<()>;
}
