//! OpenStack compute client for CTO Platform.
//!
//! A thin adapter between cluster controllers and an OpenStack cloud's
//! compute API (Nova):
//!
//! - **Servers** - create, get, delete, list
//! - **Availability zones** - list
//! - **Flavors** - resolve names to IDs
//! - **Attached interfaces** - list, detach
//!
//! Every call is timed and counted through [`metrics::MetricContext`].
//! Not-found and conflict responses surface as
//! [`OpenStackError::NotFound`] and [`OpenStackError::Conflict`] so callers
//! can treat them as success where that is what they mean.
//!
//! # Example
//!
//! ```rust,ignore
//! use cto_openstack::compute::{ComputeClient, ListServersOpts};
//! use cto_openstack::{CloudsConfig, Scope};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let clouds = CloudsConfig::discover()?;
//!     let scope = Scope::from_cloud(clouds.cloud("openstack")?, "openstack").await?;
//!     let compute = scope.compute_client().await?;
//!
//!     for server in compute.list_servers(&ListServersOpts::default()).await? {
//!         println!("{} {} {}", server.server.id, server.server.status, server.availability_zone());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compute;
pub mod config;
mod error;
pub mod identity;
pub mod metrics;
mod scope;

pub use compute::{
    ComputeClient, ComputeErrorClient, CreateServerOpts, ListServersOpts, NovaClient, ServerExt,
    ServerStatus, NOVA_MINIMUM_MICROVERSION,
};
pub use config::{CloudConfig, CloudsConfig};
pub use error::{OpenStackError, Result};
pub use identity::{Credentials, EndpointOpts, Interface, ProviderClient};
pub use scope::Scope;
