//! Import engine
//!
//! Orchestrates the per-row algorithm: resolve the primary chain, link
//! synonyms, reconcile authors, and collect touched species. Failures
//! are contained at row granularity — a failed row is reported and the
//! run continues with the next one.

use crate::author::AuthorReconciler;
use crate::collector::ImportCollector;
use crate::error::ImportError;
use crate::gateway::{RecordSetHandle, RecordSetScope, TaxonGateway};
use crate::model::{RowInput, TaxonId, TaxonRecord};
use crate::progress::{NullProgressSink, ProgressSink, RowEvent, RowStatus};
use crate::resolver::HierarchyResolver;
use crate::synonym::SynonymLinker;
use std::sync::Arc;
use tracing::{info, warn};

/// Successfully processed row.
#[derive(Debug, Clone)]
pub struct RowOutcome {
    pub index: usize,
    /// Slash-joined Order/Family/Genus/Species names.
    pub chain: String,
    pub species: TaxonId,
    /// Accepted counterpart, for synonym rows.
    pub accepted: Option<TaxonId>,
}

/// Failed row.
#[derive(Debug)]
pub struct RowFailure {
    pub index: usize,
    pub error: ImportError,
}

/// Per-run outcome report.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<RowOutcome>,
    pub failures: Vec<RowFailure>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

pub struct ImportEngine {
    gateway: Arc<dyn TaxonGateway>,
    resolver: Arc<HierarchyResolver>,
    linker: SynonymLinker,
    authors: AuthorReconciler,
    collector: ImportCollector,
    progress: Arc<dyn ProgressSink>,
    root: TaxonRecord,
}

impl ImportEngine {
    /// `root` is the fixed node every chain is anchored under (Class
    /// "Mammalia" or configured equivalent); `remarks` is stamped on
    /// every node this run creates.
    pub fn new(
        gateway: Arc<dyn TaxonGateway>,
        root: TaxonRecord,
        remarks: impl Into<String>,
    ) -> Self {
        let resolver = Arc::new(HierarchyResolver::new(Arc::clone(&gateway), remarks));
        Self {
            linker: SynonymLinker::new(Arc::clone(&gateway), Arc::clone(&resolver)),
            authors: AuthorReconciler::new(Arc::clone(&gateway)),
            collector: ImportCollector::new(),
            progress: Arc::new(NullProgressSink),
            gateway,
            resolver,
            root,
        }
    }

    pub fn with_progress(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.progress = sink;
        self
    }

    pub fn collector(&self) -> &ImportCollector {
        &self.collector
    }

    /// Process one row end to end.
    pub async fn process_row(
        &self,
        index: usize,
        row: &RowInput,
    ) -> Result<RowOutcome, ImportError> {
        let chain_names = row.chain();
        let chain = self
            .resolver
            .resolve_chain(&self.root, &chain_names.steps())
            .await?;
        // resolve_chain returns exactly one node per step.
        let family = &chain[1];
        let primary = &chain[3];

        let accepted_id = match row {
            RowInput::Accepted { author, .. } => {
                self.authors.reconcile(primary, author.as_deref()).await?;
                self.collector.register(primary.id).await;
                None
            }
            RowInput::Synonym {
                author, accepted, ..
            } => {
                let accepted_node = self.linker.link_synonym(primary, family, accepted).await?;
                self.authors.reconcile(primary, author.as_deref()).await?;
                self.authors
                    .reconcile(&accepted_node, accepted.author.as_deref())
                    .await?;
                self.collector.register(primary.id).await;
                self.collector.register(accepted_node.id).await;
                Some(accepted_node.id)
            }
        };

        Ok(RowOutcome {
            index,
            chain: format!(
                "{}/{}/{}/{}",
                chain_names.order, chain_names.family, chain_names.genus, chain_names.species
            ),
            species: primary.id,
            accepted: accepted_id,
        })
    }

    /// Process every row in sequence, containing failures per row.
    pub async fn run<I>(&self, rows: I) -> RunReport
    where
        I: IntoIterator<Item = RowInput>,
    {
        let mut report = RunReport::default();
        for (index, row) in rows.into_iter().enumerate() {
            match self.process_row(index, &row).await {
                Ok(outcome) => {
                    info!(row = index, chain = %outcome.chain, "row resolved");
                    self.progress.row_completed(RowEvent {
                        index,
                        status: RowStatus::Resolved {
                            chain: outcome.chain.clone(),
                            species: outcome.species,
                            accepted: outcome.accepted,
                        },
                    });
                    report.outcomes.push(outcome);
                }
                Err(error) => {
                    warn!(row = index, kind = error.kind(), %error, "row failed");
                    self.progress.row_completed(RowEvent {
                        index,
                        status: RowStatus::Failed {
                            kind: error.kind(),
                            message: error.to_string(),
                        },
                    });
                    report.failures.push(RowFailure { index, error });
                }
            }
        }
        info!(
            succeeded = report.succeeded(),
            failed = report.failed(),
            "run complete"
        );
        report
    }

    /// Materialize the record set of every species touched this run.
    pub async fn finalize(
        &self,
        scope: &RecordSetScope,
        name: &str,
    ) -> Result<RecordSetHandle, ImportError> {
        self.collector.finalize(&self.gateway, scope, name).await
    }
}
