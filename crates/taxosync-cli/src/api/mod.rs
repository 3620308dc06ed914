//! HTTP access to the Specify-style remote store
//!
//! - [`endpoints`] builds request URLs
//! - [`types`] holds the serde wire types and resource-URI helpers
//! - [`client`] implements the core's `TaxonGateway` over the session

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::HttpTaxonGateway;
