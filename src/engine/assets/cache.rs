// Deduplicating sprite cache with background loading and progress reporting

use super::{AssetError, SpriteImage};
use crossbeam_channel::{Receiver, Sender};
use log::warn;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::JoinHandle;

/// Number of background load workers
const LOAD_WORKERS: usize = 4;

/// Load function executed on cache workers
pub type LoadFn = dyn Fn(&str) -> Result<SpriteImage, AssetError> + Send + Sync;

/// Lifecycle of one cached sprite path
#[derive(Debug, Clone)]
pub enum LoadState {
    /// Queued or currently decoding on a worker
    Loading,
    /// Decoded and ready to display
    Loaded(Arc<SpriteImage>),
    /// Load failed; counted toward progress, not retried
    Failed,
}

impl LoadState {
    /// Check if this entry has finished loading, successfully or not
    pub fn is_settled(&self) -> bool {
        !matches!(self, LoadState::Loading)
    }
}

/// Handle for a progress subscription, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct LoadResult {
    path: String,
    result: Result<SpriteImage, AssetError>,
}

type ProgressCallback = Box<dyn FnMut(f32)>;

/// Sprite cache shared by every animation instance in the app
///
/// Each distinct path is loaded at most once: a second request for a path
/// that is already in flight joins the existing entry instead of issuing a
/// duplicate load. Decoding runs on a small worker pool; results are drained
/// on the owning thread by [`pump`](Self::pump), so all map and counter
/// mutation stays on one thread and no locking is needed.
///
/// The cache never evicts. Expected asset volume is a handful of rooms'
/// worth of frames, small enough to keep for the life of the process.
pub struct AssetCache {
    entries: HashMap<String, LoadState>,
    /// Paths requested but not yet settled
    in_flight: usize,
    /// Paths that finished loading, successfully or not
    settled: usize,
    /// Denominator for progress reporting, declared via set_total
    total: usize,
    subscribers: Vec<(SubscriptionId, ProgressCallback)>,
    next_subscription: u64,
    job_tx: Option<Sender<String>>,
    result_rx: Receiver<LoadResult>,
    workers: Vec<JoinHandle<()>>,
}

impl AssetCache {
    /// Create a new cache backed by the given load function
    pub fn new(loader: Arc<LoadFn>) -> Self {
        Self::with_workers(loader, LOAD_WORKERS)
    }

    /// Create a cache with an explicit worker count
    pub fn with_workers(loader: Arc<LoadFn>, worker_count: usize) -> Self {
        let (job_tx, job_rx) = crossbeam_channel::unbounded::<String>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<LoadResult>();

        let mut workers = Vec::with_capacity(worker_count.max(1));
        for _ in 0..worker_count.max(1) {
            let jobs = job_rx.clone();
            let results = result_tx.clone();
            let loader = Arc::clone(&loader);

            workers.push(std::thread::spawn(move || {
                while let Ok(path) = jobs.recv() {
                    let result = loader(&path);
                    if results.send(LoadResult { path, result }).is_err() {
                        break;
                    }
                }
            }));
        }

        Self {
            entries: HashMap::new(),
            in_flight: 0,
            settled: 0,
            total: 0,
            subscribers: Vec::new(),
            next_subscription: 0,
            job_tx: Some(job_tx),
            result_rx,
            workers,
        }
    }

    /// Request a sprite path, starting a load if it is not yet known
    ///
    /// Returns the current state of the entry. A path that is already
    /// loading or settled is never enqueued again, so the underlying load
    /// executes exactly once no matter how many instances request it.
    pub fn request(&mut self, path: &str) -> LoadState {
        if let Some(state) = self.entries.get(path) {
            return state.clone();
        }

        self.entries.insert(path.to_string(), LoadState::Loading);
        self.in_flight += 1;

        let enqueued = self
            .job_tx
            .as_ref()
            .map(|tx| tx.send(path.to_string()).is_ok())
            .unwrap_or(false);

        if !enqueued {
            // Worker pool is gone; settle immediately so progress still completes
            warn!("sprite load workers unavailable, marking {} failed", path);
            self.settle(path.to_string(), LoadState::Failed);
            return LoadState::Failed;
        }

        LoadState::Loading
    }

    /// Drain finished loads and notify progress subscribers
    ///
    /// Bounded work, never blocks: only results already sitting in the
    /// channel are applied. Returns the number of entries settled.
    pub fn pump(&mut self) -> usize {
        let mut settled_now = 0;

        while let Ok(done) = self.result_rx.try_recv() {
            // A result for an entry cleared by reset() is dropped on the floor
            if !matches!(self.entries.get(&done.path), Some(LoadState::Loading)) {
                continue;
            }

            let state = match done.result {
                Ok(image) => LoadState::Loaded(Arc::new(image)),
                Err(err) => {
                    warn!("failed to load sprite {}: {}", done.path, err);
                    LoadState::Failed
                }
            };

            self.settle(done.path, state);
            settled_now += 1;
        }

        settled_now
    }

    fn settle(&mut self, path: String, state: LoadState) {
        self.entries.insert(path, state);
        self.in_flight = self.in_flight.saturating_sub(1);
        self.settled += 1;

        let ratio = self.progress();
        for (_, callback) in self.subscribers.iter_mut() {
            callback(ratio);
        }
    }

    /// Get a loaded sprite by path
    pub fn get(&self, path: &str) -> Option<Arc<SpriteImage>> {
        match self.entries.get(path) {
            Some(LoadState::Loaded(image)) => Some(Arc::clone(image)),
            _ => None,
        }
    }

    /// Check whether a path has loaded successfully
    pub fn is_loaded(&self, path: &str) -> bool {
        matches!(self.entries.get(path), Some(LoadState::Loaded(_)))
    }

    /// Check whether a path has finished loading, successfully or not
    pub fn is_settled(&self, path: &str) -> bool {
        self.entries.get(path).is_some_and(LoadState::is_settled)
    }

    /// Get the state of a path, if it has ever been requested
    pub fn state(&self, path: &str) -> Option<LoadState> {
        self.entries.get(path).cloned()
    }

    /// Declare the progress denominator
    ///
    /// Progress reads 0 until a total is set.
    pub fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    /// Loaded/total ratio in 0..=1
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.settled as f32 / self.total as f32).min(1.0)
    }

    /// Number of entries that have finished loading
    pub fn settled(&self) -> usize {
        self.settled
    }

    /// Number of requested entries still in flight
    pub fn pending(&self) -> usize {
        self.in_flight
    }

    /// Declared total
    pub fn total(&self) -> usize {
        self.total
    }

    /// Subscribe to progress updates
    ///
    /// The callback receives the loaded/total ratio each time an entry
    /// settles. Returns an id to pass to [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe_progress(&mut self, callback: impl FnMut(f32) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a progress subscription
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
    }

    /// Clear all entries and counters
    ///
    /// Test isolation and dev tooling only; never called in the normal
    /// flow. In-flight worker results for cleared entries are discarded
    /// when they arrive.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.in_flight = 0;
        self.settled = 0;
        self.total = 0;
    }
}

impl Drop for AssetCache {
    fn drop(&mut self) {
        // Disconnect the job channel so workers exit their recv loops
        self.job_tx.take();
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}
