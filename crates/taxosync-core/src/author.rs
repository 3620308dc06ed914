//! Author reconciler
//!
//! Compares and, when necessary, corrects the author-of-record field on
//! species-rank nodes. Conflicts across rows follow last-applied-wins:
//! whichever row is processed later overwrites the previous value.
//!
//! A per-run write log tracks the latest author applied to each node, so
//! a cached record with a stale author field never triggers a redundant
//! update for a value already written this run.

use crate::error::ImportError;
use crate::gateway::{TaxonGateway, TaxonPatch};
use crate::model::{normalize_author, TaxonId, TaxonRecord};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

pub struct AuthorReconciler {
    gateway: Arc<dyn TaxonGateway>,
    written: Mutex<HashMap<TaxonId, String>>,
}

impl AuthorReconciler {
    pub fn new(gateway: Arc<dyn TaxonGateway>) -> Self {
        Self {
            gateway,
            written: Mutex::new(HashMap::new()),
        }
    }

    /// Ensure `node.author` equals `expected`.
    ///
    /// No-op when `expected` is absent or blank, and for non-Species
    /// ranks (author is only meaningful on species).
    pub async fn reconcile(
        &self,
        node: &TaxonRecord,
        expected: Option<&str>,
    ) -> Result<(), ImportError> {
        let Some(expected) = normalize_author(expected) else {
            return Ok(());
        };
        if !node.rank.is_species() {
            debug!(id = %node.id, rank = %node.rank, "author ignored on non-species rank");
            return Ok(());
        }

        let mut written = self.written.lock().await;
        let current = written
            .get(&node.id)
            .cloned()
            .or_else(|| node.author.clone());

        if current.as_deref() == Some(expected.as_str()) {
            written.insert(node.id, expected);
            return Ok(());
        }

        debug!(id = %node.id, author = %expected, "updating author of record");
        self.gateway
            .update(node.id, TaxonPatch::author(expected.clone()))
            .await?;
        written.insert(node.id, expected);
        Ok(())
    }
}
