//! Per-row progress events
//!
//! The engine reports one event per processed row for operator
//! visibility. No core logic depends on a sink's behavior.

use crate::model::TaxonId;

/// Outcome of one processed row.
#[derive(Debug, Clone)]
pub enum RowStatus {
    Resolved {
        /// Slash-joined chain summary, e.g. "Afrosoricida/Tenrecidae/Microgale/talazaci".
        chain: String,
        species: TaxonId,
        accepted: Option<TaxonId>,
    },
    Failed {
        kind: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone)]
pub struct RowEvent {
    pub index: usize,
    pub status: RowStatus,
}

/// Consumer of per-row progress events.
pub trait ProgressSink: Send + Sync {
    fn row_completed(&self, event: RowEvent);
}

/// Sink that discards every event.
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn row_completed(&self, _event: RowEvent) {}
}
