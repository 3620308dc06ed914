//! In-memory gateway used by the unit tests
//!
//! Behaves like the remote store for the paths the engine exercises:
//! exact-match find, sequential id assignment on create, partial updates,
//! and record set membership. Supports injecting transport failures and
//! seeding duplicate rows to provoke ambiguous matches.

use crate::error::GatewayError;
use crate::gateway::{NewTaxon, RecordSetHandle, RecordSetScope, TaxonGateway, TaxonPatch};
use crate::model::{Rank, TaxonId, TaxonRecord};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
struct State {
    next_id: i64,
    taxa: HashMap<TaxonId, TaxonRecord>,
    record_sets: Vec<(RecordSetHandle, RecordSetScope, Vec<TaxonId>)>,
    fail_finds_for: HashSet<String>,
}

pub struct InMemoryGateway {
    state: Mutex<State>,
    finds: AtomicUsize,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                ..State::default()
            }),
            finds: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
            updates: AtomicUsize::new(0),
        }
    }

    /// Insert a pre-existing node with an explicit id.
    pub fn seed(&self, record: TaxonRecord) {
        let mut state = self.state.lock().unwrap();
        state.next_id = state.next_id.max(record.id.0 + 1);
        state.taxa.insert(record.id, record);
    }

    /// Insert a root Class node and return it.
    pub fn seed_root(&self, name: &str) -> TaxonRecord {
        let root = TaxonRecord {
            id: TaxonId(1),
            rank: Rank::Class,
            name: name.to_string(),
            parent: None,
            author: None,
            is_accepted: true,
            accepted: None,
            remarks: None,
        };
        self.seed(root.clone());
        root
    }

    /// Make every `find` for the given name fail with a transport error.
    pub fn fail_finds_for(&self, name: &str) {
        self.state
            .lock()
            .unwrap()
            .fail_finds_for
            .insert(name.to_string());
    }

    pub fn taxon(&self, id: TaxonId) -> Option<TaxonRecord> {
        self.state.lock().unwrap().taxa.get(&id).cloned()
    }

    pub fn find_count(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn record_sets(&self) -> Vec<(RecordSetHandle, RecordSetScope, Vec<TaxonId>)> {
        self.state.lock().unwrap().record_sets.clone()
    }
}

#[async_trait]
impl TaxonGateway for InMemoryGateway {
    async fn find(
        &self,
        rank: Rank,
        name: &str,
        parent: TaxonId,
    ) -> Result<Vec<TaxonRecord>, GatewayError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        let state = self.state.lock().unwrap();
        if state.fail_finds_for.contains(name) {
            return Err(GatewayError::transport(format!(
                "injected failure finding '{}'",
                name
            )));
        }
        let mut matches: Vec<TaxonRecord> = state
            .taxa
            .values()
            .filter(|t| t.rank == rank && t.name == name && t.parent == Some(parent))
            .cloned()
            .collect();
        matches.sort_by_key(|t| t.id);
        Ok(matches)
    }

    async fn create(&self, taxon: NewTaxon) -> Result<TaxonRecord, GatewayError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let id = TaxonId(state.next_id);
        state.next_id += 1;
        let record = TaxonRecord {
            id,
            rank: taxon.rank,
            name: taxon.name,
            parent: Some(taxon.parent),
            author: None,
            is_accepted: true,
            accepted: None,
            remarks: Some(taxon.remarks),
        };
        state.taxa.insert(id, record.clone());
        Ok(record)
    }

    async fn update(&self, id: TaxonId, patch: TaxonPatch) -> Result<TaxonRecord, GatewayError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        let record = state
            .taxa
            .get_mut(&id)
            .ok_or_else(|| GatewayError::rejected(format!("no taxon with id {}", id)))?;
        if let Some(author) = patch.author {
            record.author = Some(author);
        }
        if let Some(is_accepted) = patch.is_accepted {
            record.is_accepted = is_accepted;
        }
        if let Some(accepted) = patch.accepted {
            record.accepted = Some(accepted);
        }
        Ok(record.clone())
    }

    async fn create_record_set(
        &self,
        scope: &RecordSetScope,
        name: &str,
    ) -> Result<RecordSetHandle, GatewayError> {
        let mut state = self.state.lock().unwrap();
        let handle = RecordSetHandle {
            id: state.record_sets.len() as i64 + 1,
            name: name.to_string(),
        };
        state
            .record_sets
            .push((handle.clone(), scope.clone(), Vec::new()));
        Ok(handle)
    }

    async fn add_record_set_items(
        &self,
        handle: &RecordSetHandle,
        ids: &[TaxonId],
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        let entry = state
            .record_sets
            .iter_mut()
            .find(|(h, _, _)| h.id == handle.id)
            .ok_or_else(|| GatewayError::rejected(format!("no record set {}", handle.id)))?;
        entry.2.extend_from_slice(ids);
        Ok(())
    }
}
