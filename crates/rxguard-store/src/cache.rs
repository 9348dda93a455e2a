//! Resolution orchestration over the four cache tiers.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use lru::LruCache;
use rxguard_core::{LabelSnapshot, ResolutionOutcome, normalize_query};
use rxguard_source::{LabelSource, detect_ambiguity, select_canonical};
use tracing::{debug, info};

use crate::durable::DurableStore;
use crate::error::StoreError;

const MEMORY_CAPACITY: usize = 256;

/// Candidates requested from the label source on a full miss.
const SEARCH_LIMIT: usize = 10;

/// Resolves drug-name queries to pinned snapshots with minimal redundant
/// upstream calls.
///
/// Lookup order: memory map, durable query index + primary store, then the
/// external label source with write-through population. Snapshots are cached
/// indefinitely once written; there is no invalidation path.
///
/// Concurrent first-resolutions of the same key may each fetch upstream and
/// redundantly write the same records. Writes are idempotent overwrites, so
/// the race is safe but not exactly-once.
///
/// Durable-tier access is synchronous SQLite and filesystem I/O on the
/// calling task: single-row statements, with blob reads only for evidence
/// text above [`crate::durable::INLINE_EVIDENCE_LIMIT`]. Callers that cannot
/// tolerate that on the runtime should wrap `resolve` in
/// `tokio::task::block_in_place`.
pub struct ResolutionCache<S> {
    memory: Mutex<LruCache<String, Arc<LabelSnapshot>>>,
    durable: DurableStore,
    source: S,
}

impl<S: LabelSource> ResolutionCache<S> {
    pub fn new(durable: DurableStore, source: S) -> Self {
        let capacity = NonZeroUsize::new(MEMORY_CAPACITY).expect("nonzero capacity");
        Self {
            memory: Mutex::new(LruCache::new(capacity)),
            durable,
            source,
        }
    }

    /// Resolve a free-text query to a snapshot, not-found, or ambiguity.
    ///
    /// Ambiguous outcomes persist nothing; the caller must come back with a
    /// disambiguated name. Upstream failures propagate unrecovered.
    pub async fn resolve(&self, query: &str) -> Result<ResolutionOutcome, StoreError> {
        let key = normalize_query(query);
        if key.is_empty() {
            return Ok(ResolutionOutcome::NotFound {
                reason: "query is empty after normalization".to_string(),
            });
        }

        // Tier 1: in-process memory map. Lock scope must not cross an await.
        {
            let mut memory = self.memory.lock().map_err(|_| StoreError::Poisoned)?;
            if let Some(hit) = memory.get(&key) {
                debug!(key = %key, "memory cache hit");
                return Ok(ResolutionOutcome::Resolved((**hit).clone()));
            }
        }

        // Tiers 2-4: durable index, primary store, overflow blob.
        if let Some(doc_id) = self.durable.lookup_query(&key)?
            && let Some(snapshot) = self.durable.get_snapshot(&doc_id)?
        {
            debug!(key = %key, doc_id = %doc_id, "durable cache hit");
            self.remember(&key, &snapshot)?;
            return Ok(ResolutionOutcome::Resolved(snapshot));
        }

        // Full miss: one upstream fetch, no retry.
        let candidates = self.source.search(query, SEARCH_LIMIT).await?;
        if candidates.is_empty() {
            info!(key = %key, "no label records matched");
            return Ok(ResolutionOutcome::NotFound {
                reason: format!("no label records matched \"{}\"", query.trim()),
            });
        }
        if let Some(options) = detect_ambiguity(&candidates) {
            info!(key = %key, groups = options.len(), "query is ambiguous; nothing persisted");
            return Ok(ResolutionOutcome::Ambiguous {
                reason: format!(
                    "\"{}\" matches {} distinct formulations",
                    query.trim(),
                    options.len()
                ),
                options,
            });
        }

        let Some(record) = select_canonical(candidates) else {
            return Ok(ResolutionOutcome::NotFound {
                reason: format!("no label records matched \"{}\"", query.trim()),
            });
        };
        let snapshot = LabelSnapshot::from_record(&record)?;
        let doc_id = snapshot.doc_id();

        // Write through every durable tier, then re-read from the primary
        // store so the returned snapshot took the same path future readers
        // will take (exercises the overflow reassembly on first return).
        self.durable.put_snapshot(&snapshot)?;
        self.durable.index_query(&key, &doc_id)?;
        let stored = self
            .durable
            .get_snapshot(&doc_id)?
            .ok_or_else(|| StoreError::MissingRecord(doc_id.clone()))?;
        self.remember(&key, &stored)?;

        info!(key = %key, doc_id = %doc_id, hash = %stored.evidence_hash, "pinned new label snapshot");
        Ok(ResolutionOutcome::Resolved(stored))
    }

    fn remember(&self, key: &str, snapshot: &LabelSnapshot) -> Result<(), StoreError> {
        let mut memory = self.memory.lock().map_err(|_| StoreError::Poisoned)?;
        memory.put(key.to_string(), Arc::new(snapshot.clone()));
        Ok(())
    }
}
