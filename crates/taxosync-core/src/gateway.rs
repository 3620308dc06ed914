//! Remote taxon gateway trait
//!
//! The only seam between the engine and the remote store. Implementations
//! perform record-oriented calls (fetch-by-filter, create, update) — the
//! store offers no bulk or transactional primitives, so the engine's own
//! discipline (cache + single-flight) is what prevents duplicate creates.

use crate::error::GatewayError;
use crate::model::{Rank, TaxonId, TaxonRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Payload for creating one taxon node.
///
/// A created node is always fully initialized (rank, name, parent and
/// provenance remark) before the gateway returns it; aborting a run never
/// leaves a half-initialized node behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTaxon {
    pub rank: Rank,
    pub name: String,
    pub parent: TaxonId,
    /// Provenance marker stamped on every node created by this run.
    pub remarks: String,
}

/// Partial update of one taxon node.
///
/// Only `author` and the synonym link are ever updated by this system.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<TaxonId>,
}

impl TaxonPatch {
    pub fn author(author: impl Into<String>) -> Self {
        Self {
            author: Some(author.into()),
            ..Self::default()
        }
    }

    pub fn synonym_of(accepted: TaxonId) -> Self {
        Self {
            is_accepted: Some(false),
            accepted: Some(accepted),
            ..Self::default()
        }
    }
}

/// Owner/collection identity a record set is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSetScope {
    pub owner: String,
    pub collection: String,
}

/// Handle to a created record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSetHandle {
    pub id: i64,
    pub name: String,
}

/// Record-oriented access to the remote taxon store.
///
/// All operations may fail with a connectivity, authorization or
/// validation error; the engine treats each call as an independent
/// remote-state change and never retries a create without re-checking
/// via `find` first.
#[async_trait]
pub trait TaxonGateway: Send + Sync {
    /// Exact match on rank + name + parent. Zero, one or more results.
    async fn find(
        &self,
        rank: Rank,
        name: &str,
        parent: TaxonId,
    ) -> Result<Vec<TaxonRecord>, GatewayError>;

    /// Create one fully-initialized taxon node.
    async fn create(&self, taxon: NewTaxon) -> Result<TaxonRecord, GatewayError>;

    /// Apply a partial update to an existing node.
    async fn update(&self, id: TaxonId, patch: TaxonPatch) -> Result<TaxonRecord, GatewayError>;

    /// Create one named record set in the given scope.
    async fn create_record_set(
        &self,
        scope: &RecordSetScope,
        name: &str,
    ) -> Result<RecordSetHandle, GatewayError>;

    /// Append members to a record set, preserving the given order.
    async fn add_record_set_items(
        &self,
        handle: &RecordSetHandle,
        ids: &[TaxonId],
    ) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_constructors() {
        let patch = TaxonPatch::author("Major, 1896");
        assert_eq!(patch.author.as_deref(), Some("Major, 1896"));
        assert_eq!(patch.is_accepted, None);

        let patch = TaxonPatch::synonym_of(TaxonId(42));
        assert_eq!(patch.is_accepted, Some(false));
        assert_eq!(patch.accepted, Some(TaxonId(42)));
        assert_eq!(patch.author, None);
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let json = serde_json::to_string(&TaxonPatch::synonym_of(TaxonId(7))).unwrap();
        assert!(json.contains("is_accepted"));
        assert!(!json.contains("author"));
    }
}
