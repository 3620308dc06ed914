//! Import collector
//!
//! Accumulates every species node touched during the run (created,
//! fetched or updated) and materializes a named record set referencing
//! each exactly once, in first-touched order.

use crate::error::ImportError;
use crate::gateway::{RecordSetHandle, RecordSetScope, TaxonGateway};
use crate::model::TaxonId;
use indexmap::IndexSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

#[derive(Default)]
pub struct ImportCollector {
    registered: Mutex<IndexSet<TaxonId>>,
}

impl ImportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a touched species. Duplicate registrations are idempotent.
    pub async fn register(&self, id: TaxonId) {
        self.registered.lock().await.insert(id);
    }

    /// Ids registered so far, in first-touched order.
    pub async fn registered(&self) -> Vec<TaxonId> {
        self.registered.lock().await.iter().copied().collect()
    }

    /// Create one named record set in `scope` containing every registered
    /// species exactly once. An empty run yields an empty record set.
    pub async fn finalize(
        &self,
        gateway: &Arc<dyn TaxonGateway>,
        scope: &RecordSetScope,
        name: &str,
    ) -> Result<RecordSetHandle, ImportError> {
        let ids = self.registered().await;
        let handle = gateway.create_record_set(scope, name).await?;
        if !ids.is_empty() {
            gateway.add_record_set_items(&handle, &ids).await?;
        }
        info!(record_set = %handle.name, members = ids.len(), "record set created");
        Ok(handle)
    }
}
