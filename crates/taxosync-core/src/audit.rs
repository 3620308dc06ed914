//! Audit sink and gateway transcript
//!
//! Every gateway call attempted by the engine is mirrored to an
//! [`AuditSink`] as a `{timestamp, operation, payload}` event. Emission
//! is fire-and-forget: sinks swallow their own errors and the engine
//! never depends on their success.

use crate::error::GatewayError;
use crate::gateway::{NewTaxon, RecordSetHandle, RecordSetScope, TaxonGateway, TaxonPatch};
use crate::model::{Rank, TaxonId, TaxonRecord};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// One attempted gateway operation.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub timestamp: DateTime<Utc>,
    pub operation: &'static str,
    pub payload: serde_json::Value,
}

impl AuditEvent {
    pub fn now(operation: &'static str, payload: serde_json::Value) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            payload,
        }
    }
}

/// Destination for the request transcript.
pub trait AuditSink: Send + Sync {
    /// Record one event. Must not fail and must not block meaningfully.
    fn record(&self, event: AuditEvent);
}

/// Sink that discards every event.
pub struct NullAuditSink;

impl AuditSink for NullAuditSink {
    fn record(&self, _event: AuditEvent) {}
}

/// Sink that mirrors events to the tracing subscriber.
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "taxosync::audit",
            operation = event.operation,
            payload = %event.payload,
            "gateway call"
        );
    }
}

/// Decorator emitting one audit event per gateway call before delegating.
pub struct AuditedGateway<G> {
    inner: G,
    sink: Arc<dyn AuditSink>,
}

impl<G: TaxonGateway> AuditedGateway<G> {
    pub fn new(inner: G, sink: Arc<dyn AuditSink>) -> Self {
        Self { inner, sink }
    }
}

#[async_trait]
impl<G: TaxonGateway> TaxonGateway for AuditedGateway<G> {
    async fn find(
        &self,
        rank: Rank,
        name: &str,
        parent: TaxonId,
    ) -> Result<Vec<TaxonRecord>, GatewayError> {
        self.sink.record(AuditEvent::now(
            "find",
            json!({ "rank": rank, "name": name, "parent": parent }),
        ));
        self.inner.find(rank, name, parent).await
    }

    async fn create(&self, taxon: NewTaxon) -> Result<TaxonRecord, GatewayError> {
        self.sink
            .record(AuditEvent::now("create", json!(&taxon)));
        self.inner.create(taxon).await
    }

    async fn update(&self, id: TaxonId, patch: TaxonPatch) -> Result<TaxonRecord, GatewayError> {
        self.sink.record(AuditEvent::now(
            "update",
            json!({ "id": id, "patch": &patch }),
        ));
        self.inner.update(id, patch).await
    }

    async fn create_record_set(
        &self,
        scope: &RecordSetScope,
        name: &str,
    ) -> Result<RecordSetHandle, GatewayError> {
        self.sink.record(AuditEvent::now(
            "create_record_set",
            json!({ "scope": scope, "name": name }),
        ));
        self.inner.create_record_set(scope, name).await
    }

    async fn add_record_set_items(
        &self,
        handle: &RecordSetHandle,
        ids: &[TaxonId],
    ) -> Result<(), GatewayError> {
        self.sink.record(AuditEvent::now(
            "add_record_set_items",
            json!({ "record_set": handle.id, "ids": ids }),
        ));
        self.inner.add_record_set_items(handle, ids).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryGateway;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink {
        events: Mutex<Vec<AuditEvent>>,
    }

    impl AuditSink for RecordingSink {
        fn record(&self, event: AuditEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[tokio::test]
    async fn test_every_call_emits_one_event() {
        let sink = Arc::new(RecordingSink::default());
        let inner = InMemoryGateway::new();
        inner.seed_root("Mammalia");
        let gateway = AuditedGateway::new(inner, sink.clone());

        gateway
            .find(Rank::Order, "Afrosoricida", TaxonId(1))
            .await
            .unwrap();
        let created = gateway
            .create(NewTaxon {
                rank: Rank::Order,
                name: "Afrosoricida".to_string(),
                parent: TaxonId(1),
                remarks: "run".to_string(),
            })
            .await
            .unwrap();
        gateway
            .update(created.id, TaxonPatch::author("Major, 1896"))
            .await
            .unwrap();

        let events = sink.events.lock().unwrap();
        let operations: Vec<_> = events.iter().map(|e| e.operation).collect();
        assert_eq!(operations, vec!["find", "create", "update"]);
        assert_eq!(events[0].payload["name"], "Afrosoricida");
        assert_eq!(events[2].payload["patch"]["author"], "Major, 1896");
    }

    #[tokio::test]
    async fn test_failed_calls_still_audited() {
        let sink = Arc::new(RecordingSink::default());
        let inner = InMemoryGateway::new();
        inner.fail_finds_for("Tenrecidae");
        let gateway = AuditedGateway::new(inner, sink.clone());

        let result = gateway.find(Rank::Family, "Tenrecidae", TaxonId(1)).await;
        assert!(result.is_err());
        assert_eq!(sink.events.lock().unwrap().len(), 1);
    }
}
