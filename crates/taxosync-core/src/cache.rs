//! Run-scoped node cache
//!
//! Memoizes resolved taxon identities by [`ResolutionKey`] so that rows
//! sharing ancestors (the common case — many rows under one Order/Family)
//! trigger at most one resolution attempt per distinct key per run.
//!
//! Each key owns a single-flight slot: concurrent misses collapse to one
//! producer invocation, with losers waiting for the winner's result. A
//! failed producer leaves the slot empty, so a later row may retry the
//! key (the producer always re-checks via `find` before creating).
//!
//! The table grows monotonically for the run's duration; it is bounded by
//! the number of distinct taxa in the input and is never persisted.

use crate::error::ImportError;
use crate::model::{ResolutionKey, TaxonRecord};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

#[derive(Default)]
pub struct NodeCache {
    slots: Mutex<HashMap<ResolutionKey, Arc<OnceCell<TaxonRecord>>>>,
}

impl NodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached node for `key`, or run `producer` to resolve it.
    ///
    /// On a hit the producer is not invoked and no gateway call is made.
    /// On a miss the producer performs the fetch-or-create and its result
    /// is stored under the key.
    pub async fn get_or_resolve<F, Fut>(
        &self,
        key: ResolutionKey,
        producer: F,
    ) -> Result<TaxonRecord, ImportError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TaxonRecord, ImportError>>,
    {
        let cell = {
            let mut slots = self.slots.lock().await;
            slots.entry(key).or_default().clone()
        };

        let record = cell.get_or_try_init(producer).await?;
        Ok(record.clone())
    }

    /// Number of keys resolved so far (failed attempts excluded).
    pub async fn resolved_len(&self) -> usize {
        let slots = self.slots.lock().await;
        slots.values().filter(|cell| cell.get().is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GatewayError;
    use crate::model::{Rank, TaxonId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn record(id: i64, rank: Rank, name: &str, parent: i64) -> TaxonRecord {
        TaxonRecord {
            id: TaxonId(id),
            rank,
            name: name.to_string(),
            parent: Some(TaxonId(parent)),
            author: None,
            is_accepted: true,
            accepted: None,
            remarks: None,
        }
    }

    #[tokio::test]
    async fn test_hit_skips_producer() {
        let cache = NodeCache::new();
        let key = ResolutionKey::new(Rank::Order, "Afrosoricida", TaxonId(1));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let resolved = cache
                .get_or_resolve(key.clone(), || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(record(10, Rank::Order, "Afrosoricida", 1))
                })
                .await
                .unwrap();
            assert_eq!(resolved.id, TaxonId(10));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.resolved_len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_keys_resolve_independently() {
        let cache = NodeCache::new();
        let a = ResolutionKey::new(Rank::Genus, "Microgale", TaxonId(2));
        let b = ResolutionKey::new(Rank::Genus, "Microgale", TaxonId(3));

        let ra = cache
            .get_or_resolve(a, || async { Ok(record(20, Rank::Genus, "Microgale", 2)) })
            .await
            .unwrap();
        let rb = cache
            .get_or_resolve(b, || async { Ok(record(21, Rank::Genus, "Microgale", 3)) })
            .await
            .unwrap();

        assert_ne!(ra.id, rb.id);
        assert_eq!(cache.resolved_len().await, 2);
    }

    #[tokio::test]
    async fn test_failed_resolution_does_not_poison_key() {
        let cache = NodeCache::new();
        let key = ResolutionKey::new(Rank::Species, "hova", TaxonId(4));

        let err = cache
            .get_or_resolve(key.clone(), || async {
                Err(GatewayError::transport("connection reset").into())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::Gateway(_)));
        assert_eq!(cache.resolved_len().await, 0);

        // The key is retryable and the second attempt is cached normally.
        let resolved = cache
            .get_or_resolve(key.clone(), || async {
                Ok(record(30, Rank::Species, "hova", 4))
            })
            .await
            .unwrap();
        assert_eq!(resolved.id, TaxonId(30));

        let resolved = cache
            .get_or_resolve(key, || async {
                panic!("cached key must not invoke the producer")
            })
            .await
            .unwrap();
        assert_eq!(resolved.id, TaxonId(30));
    }

    #[tokio::test]
    async fn test_concurrent_misses_single_flight() {
        let cache = Arc::new(NodeCache::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let key = ResolutionKey::new(Rank::Family, "Tenrecidae", TaxonId(5));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            let key = key.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_resolve(key, || async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
                        Ok(record(40, Rank::Family, "Tenrecidae", 5))
                    })
                    .await
            }));
        }

        for handle in handles {
            let resolved = handle.await.unwrap().unwrap();
            assert_eq!(resolved.id, TaxonId(40));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
