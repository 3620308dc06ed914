//! Hierarchy resolver
//!
//! Walks a rank chain from a fixed root, resolving or creating each node
//! under its already-resolved parent. Every step goes through the node
//! cache, so a (rank, name, parent) seen by an earlier row costs no
//! further gateway calls.
//!
//! Ordering within a chain is strictly sequential: the parent node is
//! fully resolved before the child lookup is issued, and the literal
//! parent identity (never a re-lookup by name) is what the child is
//! keyed and created under.

use crate::cache::NodeCache;
use crate::error::ImportError;
use crate::gateway::{NewTaxon, TaxonGateway};
use crate::model::{Rank, ResolutionKey, TaxonRecord};
use std::sync::Arc;
use tracing::debug;

pub struct HierarchyResolver {
    gateway: Arc<dyn TaxonGateway>,
    cache: NodeCache,
    remarks: String,
}

impl HierarchyResolver {
    /// `remarks` is the provenance marker stamped on every node this
    /// resolver creates.
    pub fn new(gateway: Arc<dyn TaxonGateway>, remarks: impl Into<String>) -> Self {
        Self {
            gateway,
            cache: NodeCache::new(),
            remarks: remarks.into(),
        }
    }

    pub fn cache(&self) -> &NodeCache {
        &self.cache
    }

    /// Resolve every step in order under `root`, returning the full chain
    /// (deepest node last).
    pub async fn resolve_chain(
        &self,
        root: &TaxonRecord,
        steps: &[(Rank, &str)],
    ) -> Result<Vec<TaxonRecord>, ImportError> {
        let mut chain = Vec::with_capacity(steps.len());
        let mut current = root.clone();
        for (rank, name) in steps {
            current = self.resolve_step(*rank, name, &current).await?;
            chain.push(current.clone());
        }
        Ok(chain)
    }

    /// Resolve or create a single node with the given rank and name under
    /// `parent`.
    ///
    /// A failed fetch or create is not cached; the key stays retryable
    /// and the retry re-checks via `find` before creating.
    pub async fn resolve_step(
        &self,
        rank: Rank,
        name: &str,
        parent: &TaxonRecord,
    ) -> Result<TaxonRecord, ImportError> {
        let key = ResolutionKey::new(rank, name, parent.id);
        let gateway = Arc::clone(&self.gateway);
        let remarks = self.remarks.clone();
        let parent_id = parent.id;
        let name = key.name.clone();

        self.cache
            .get_or_resolve(key, move || async move {
                let mut matches = gateway.find(rank, &name, parent_id).await?;
                match matches.len() {
                    0 => {
                        debug!(%rank, %name, %parent_id, "creating taxon");
                        let created = gateway
                            .create(NewTaxon {
                                rank,
                                name,
                                parent: parent_id,
                                remarks,
                            })
                            .await?;
                        Ok(created)
                    }
                    1 => {
                        let record = matches.remove(0);
                        if record.rank != rank || record.parent != Some(parent_id) {
                            return Err(ImportError::integrity(format!(
                                "taxon {} '{}' does not match expected rank {} under parent {}",
                                record.id, record.name, rank, parent_id
                            )));
                        }
                        debug!(%rank, %name, id = %record.id, "resolved existing taxon");
                        Ok(record)
                    }
                    count => Err(ImportError::AmbiguousMatch {
                        rank,
                        name,
                        parent: parent_id,
                        count,
                    }),
                }
            })
            .await
    }
}
