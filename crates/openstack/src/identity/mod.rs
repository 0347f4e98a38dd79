//! Keystone (identity v3) authentication.
//!
//! Issues the token every service call carries and resolves service
//! endpoints from the catalog returned with it.

mod client;
mod models;

pub use client::{ProviderClient, Token};
pub use models::*;
