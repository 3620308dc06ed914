//! Error types for the reconciliation engine
//!
//! `GatewayError` covers failures raised by the remote store itself;
//! `ImportError` is the row-level error the engine reports. Every
//! `ImportError` is fatal for the current row only — the run always
//! continues with the next row.

use crate::model::{Rank, TaxonId};
use thiserror::Error;

/// Failure from the remote taxon gateway.
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("authorization denied: {0}")]
    Unauthorized(String),

    #[error("remote store rejected the request: {0}")]
    Rejected(String),

    #[error("malformed response from remote store: {0}")]
    Malformed(String),
}

impl GatewayError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }
}

/// Row-level failure during import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// A lookup that must be unique returned more than one node.
    #[error("ambiguous match: {count} taxa named '{name}' at rank {rank} under parent {parent}")]
    AmbiguousMatch {
        rank: Rank,
        name: String,
        parent: TaxonId,
        count: usize,
    },

    /// Any gateway call failed.
    #[error("gateway failure: {0}")]
    Gateway(#[from] GatewayError),

    /// Remote state disagrees with a structural expectation.
    #[error("integrity violation: {0}")]
    Integrity(String),
}

impl ImportError {
    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    /// Stable kind label for reports and progress events.
    pub fn kind(&self) -> &'static str {
        match self {
            ImportError::AmbiguousMatch { .. } => "ambiguous-match",
            ImportError::Gateway(_) => "gateway-failure",
            ImportError::Integrity(_) => "integrity-violation",
        }
    }
}
