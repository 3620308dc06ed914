//! Run configuration for the taxosync CLI
//!
//! Values are usually supplied through clap flags with env fallbacks;
//! this module holds the defaults and the assembled configuration passed
//! to the import command.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// Configuration Constants
// ============================================================================

/// Default server URL when not specified via flag or environment.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Default name of the fixed root node every chain is anchored under.
pub const DEFAULT_ROOT_NAME: &str = "Mammalia";

/// Default name for the record set created at the end of a run.
pub const DEFAULT_RECORD_SET_NAME: &str = "Imported Species (taxosync)";

/// Default provenance remark stamped on every created node.
pub const DEFAULT_REMARKS: &str = "Imported by taxosync";

/// Assembled configuration for one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Remote store base URL
    pub server_url: String,

    /// Login username
    pub username: String,

    /// Login password
    pub password: String,

    /// Collection to log into (by name)
    pub collection: String,

    /// Name of the fixed root Class node
    pub root_name: String,

    /// Name of the record set created at the end of the run
    pub record_set_name: String,

    /// Provenance remark for created nodes
    pub remarks: String,

    /// Input CSV path
    pub input: PathBuf,

    /// JSONL transcript of every gateway call
    pub audit_file: PathBuf,
}

impl RunConfig {
    /// Request timeout, overridable via `TAXOSYNC_API_TIMEOUT_SECS`.
    pub fn api_timeout_secs() -> u64 {
        std::env::var("TAXOSYNC_API_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(60)
    }
}
