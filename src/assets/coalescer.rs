//! Batches scattered per-ID asset lookups into one call per debounce window.
//!
//! The cache lives as long as the coalescer (create one at startup and clone
//! the handle). Entries are only ever added. Callers re-read the cache once
//! their batch signals completion, whether or not the batch succeeded.

use crate::error::AppError;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

pub type PerkId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetInfo {
    pub icon: String,
    pub name: String,
}

/// Batched lookup service. Blocking; the coalescer runs it off the async
/// workers. IDs it does not know are simply left out of the result.
pub trait AssetSource: Send + Sync + 'static {
    fn fetch(&self, ids: &[PerkId]) -> Result<HashMap<PerkId, AssetInfo>, AppError>;
}

/// Flips to `true` once a batch has been merged into the cache.
type BatchSignal = watch::Receiver<bool>;

#[derive(Default)]
struct CoalescerState {
    cache: HashMap<PerkId, AssetInfo>,
    /// IDs waiting for the timer of `pending_batch`.
    pending: BTreeSet<PerkId>,
    pending_batch: Option<BatchSignal>,
    /// IDs drained into a batch whose call has not returned yet.
    in_flight: HashMap<PerkId, BatchSignal>,
}

struct Shared<S> {
    source: S,
    window: Duration,
    state: Mutex<CoalescerState>,
}

fn lock(state: &Mutex<CoalescerState>) -> MutexGuard<'_, CoalescerState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

pub struct AssetRequestCoalescer<S> {
    shared: Arc<Shared<S>>,
}

impl<S> Clone for AssetRequestCoalescer<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: AssetSource> AssetRequestCoalescer<S> {
    pub fn new(source: S, window: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                source,
                window,
                state: Mutex::new(CoalescerState::default()),
            }),
        }
    }

    /// Whatever is already known, without waiting.
    pub fn cached(&self, ids: &[PerkId]) -> HashMap<PerkId, AssetInfo> {
        let state = lock(&self.shared.state);
        ids.iter()
            .filter_map(|id| state.cache.get(id).map(|info| (*id, info.clone())))
            .collect()
    }

    /// Resolves once every uncached ID has been through a batch. IDs the
    /// source could not resolve stay absent from the cache.
    pub async fn request(&self, ids: &[PerkId]) {
        for mut signal in self.enlist(ids) {
            // A dropped sender means the batch task is gone; nothing more will arrive.
            let _ = signal.wait_for(|done| *done).await;
        }
    }

    pub async fn get(&self, ids: &[PerkId]) -> HashMap<PerkId, AssetInfo> {
        self.request(ids).await;
        self.cached(ids)
    }

    /// Registers the uncached IDs and returns the batch signals to wait on.
    fn enlist(&self, ids: &[PerkId]) -> Vec<BatchSignal> {
        let mut guard = lock(&self.shared.state);
        let state = &mut *guard;

        let mut waits: Vec<BatchSignal> = Vec::new();
        let mut joined_pending = false;

        for id in ids {
            if state.cache.contains_key(id) {
                continue;
            }
            if let Some(signal) = state.in_flight.get(id) {
                if !waits.iter().any(|w| w.same_channel(signal)) {
                    waits.push(signal.clone());
                }
                continue;
            }
            state.pending.insert(*id);
            joined_pending = true;
        }

        if joined_pending {
            let signal = match state.pending_batch.clone() {
                Some(signal) => signal,
                None => {
                    let (done, signal) = watch::channel(false);
                    state.pending_batch = Some(signal.clone());
                    self.schedule(done);
                    signal
                }
            };
            waits.push(signal);
        }

        waits
    }

    fn schedule(&self, done: watch::Sender<bool>) {
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            tokio::time::sleep(shared.window).await;
            run_batch(shared, done).await;
        });
    }
}

async fn run_batch<S: AssetSource>(shared: Arc<Shared<S>>, done: watch::Sender<bool>) {
    let ids: Vec<PerkId> = {
        let mut guard = lock(&shared.state);
        let state = &mut *guard;

        let signal = state.pending_batch.take();
        let drained = std::mem::take(&mut state.pending);
        let ids: Vec<PerkId> = drained
            .into_iter()
            .filter(|id| !state.cache.contains_key(id))
            .collect();

        if let Some(signal) = signal {
            for id in &ids {
                state.in_flight.insert(*id, signal.clone());
            }
        }
        ids
    };

    if !ids.is_empty() {
        debug!(count = ids.len(), ?ids, "dispatching asset batch");

        let fetch_shared = Arc::clone(&shared);
        let fetch_ids = ids.clone();
        let fetched = tokio::task::spawn_blocking(move || fetch_shared.source.fetch(&fetch_ids)).await;

        let assets = match fetched {
            Ok(Ok(assets)) => assets,
            Ok(Err(e)) => {
                warn!(error = %e, "asset batch failed; ids stay unresolved");
                HashMap::new()
            }
            Err(e) => {
                warn!(error = %e, "asset batch task did not finish");
                HashMap::new()
            }
        };

        let mut state = lock(&shared.state);
        for id in &ids {
            state.in_flight.remove(id);
        }
        for (id, info) in assets {
            state.cache.entry(id).or_insert(info);
        }
    }

    let _ = done.send(true);
}
