//! Nova (compute) client.
//!
//! Implements the [`ComputeClient`] trait for the OpenStack compute API.
//!
//! ## Operations
//!
//! - **Servers** - create, get, delete, list (all pages)
//! - **Availability zones** - list
//! - **Flavors** - resolve a name to an ID
//! - **Attached interfaces** - list, detach
//!
//! Requests pin microversion [`NOVA_MINIMUM_MICROVERSION`].

mod client;
mod error_client;
mod models;
mod traits;

pub use client::{new_compute_client, NovaClient, NOVA_MINIMUM_MICROVERSION};
pub use error_client::ComputeErrorClient;
pub use models::*;
pub use traits::ComputeClient;
