//! Taxosync Core Library
//!
//! The hierarchical resolve-or-create engine behind taxosync.
//!
//! Given one CSV row at a time, the engine guarantees that the row's
//! Order→Family→Genus→Species chain exists under a fixed root taxon in
//! the remote store, creating any missing link exactly once per run,
//! linking synonym species to their accepted counterparts, and keeping
//! author-of-record fields consistent. Every species touched is
//! collected into a named record set at the end of the run.
//!
//! The remote store is only reached through the [`gateway::TaxonGateway`]
//! trait; the engine itself never speaks HTTP.

pub mod audit;
pub mod author;
pub mod cache;
pub mod collector;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod model;
pub mod progress;
pub mod resolver;
pub mod synonym;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use engine::{ImportEngine, RowOutcome, RunReport};
pub use error::{GatewayError, ImportError};
pub use gateway::{NewTaxon, RecordSetHandle, RecordSetScope, TaxonGateway, TaxonPatch};
pub use model::{
    AcceptedBranch, ChainNames, Rank, RowInput, TaxonId, TaxonRecord, WORKING_RANKS,
};
