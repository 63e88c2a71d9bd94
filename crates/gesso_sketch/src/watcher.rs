//! Debounced change batching.
//!
//! File-watch events arrive in bursts: a save can produce several events for
//! the same file, and a branch switch touches hundreds of files. The batcher
//! collects changed paths and hands them over once no new change has arrived
//! for the debounce window (trailing edge). A single worker thread owns the
//! timer; [`ChangeBatcher::flush`] delivers early.
//!
//! Deliveries never overlap and a batch is delivered at most once. The
//! callback must not call back into the batcher's `flush`.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use gesso_primer::FxIndexSet;
use parking_lot::{Condvar, Mutex, MutexGuard};

type BatchCallback = Box<dyn Fn(Vec<PathBuf>) + Send + Sync>;

#[derive(Default)]
struct State {
    pending: FxIndexSet<PathBuf>,
    deadline: Option<Instant>,
    shutdown: bool,
}

struct Shared {
    state: Mutex<State>,
    wake: Condvar,
    /// Held for the whole of a delivery.
    delivery: Mutex<()>,
    callback: BatchCallback,
    debounce: Duration,
}

impl Shared {
    fn take_batch(&self, only_if_due: bool) -> Vec<PathBuf> {
        let mut state = self.state.lock();
        if only_if_due && !state.deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return Vec::new();
        }
        state.deadline = None;
        state.pending.drain(..).collect()
    }

    fn deliver(&self, only_if_due: bool) {
        let _delivery = self.delivery.lock();
        let batch = self.take_batch(only_if_due);
        if batch.is_empty() {
            return;
        }
        tracing::debug!(paths = batch.len(), "delivering change batch");
        (self.callback)(batch);
    }

    fn run(&self) {
        let mut state = self.state.lock();
        loop {
            if state.shutdown {
                return;
            }
            let Some(deadline) = state.deadline else {
                self.wake.wait(&mut state);
                continue;
            };
            if Instant::now() < deadline {
                self.wake.wait_until(&mut state, deadline);
                continue;
            }
            MutexGuard::unlocked(&mut state, || self.deliver(true));
        }
    }
}

/// Debounced accumulator of changed paths.
///
/// Dropping the batcher stops the worker; changes still pending are
/// discarded.
pub struct ChangeBatcher {
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl ChangeBatcher {
    /// Start a batcher delivering to `callback`.
    pub fn new<F>(debounce: Duration, callback: F) -> std::io::Result<Self>
    where
        F: Fn(Vec<PathBuf>) + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            state: Mutex::new(State::default()),
            wake: Condvar::new(),
            delivery: Mutex::new(()),
            callback: Box::new(callback),
            debounce,
        });
        let worker = thread::Builder::new().name("gesso-watch".into()).spawn({
            let shared = Arc::clone(&shared);
            move || shared.run()
        })?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Record a change and restart the debounce window.
    pub fn on_change(&self, path: impl Into<PathBuf>) {
        let mut state = self.shared.state.lock();
        state.pending.insert(path.into());
        state.deadline = Some(Instant::now() + self.shared.debounce);
        drop(state);
        self.shared.wake.notify_one();
    }

    /// Deliver pending changes now and cancel the timer.
    pub fn flush(&self) {
        self.shared.deliver(false);
    }

    /// Number of distinct paths waiting for delivery.
    pub fn pending(&self) -> usize {
        self.shared.state.lock().pending.len()
    }

    #[inline]
    pub fn debounce(&self) -> Duration {
        self.shared.debounce
    }

    /// Stop the worker. Equivalent to dropping the batcher.
    pub fn dispose(self) {}
}

impl Drop for ChangeBatcher {
    fn drop(&mut self) {
        self.shared.state.lock().shutdown = true;
        self.shared.wake.notify_all();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("change batch callback panicked");
            }
        }
    }
}

impl std::fmt::Debug for ChangeBatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeBatcher")
            .field("debounce", &self.shared.debounce)
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(debounce: Duration) -> (ChangeBatcher, Arc<Mutex<Vec<Vec<PathBuf>>>>) {
        let batches = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&batches);
        let batcher = ChangeBatcher::new(debounce, move |batch| sink.lock().push(batch)).unwrap();
        (batcher, batches)
    }

    #[test]
    fn test_rapid_changes_collapse_into_one_batch() {
        let (batcher, batches) = recording(Duration::from_millis(80));
        batcher.on_change("a.vue");
        batcher.on_change("b.vue");
        batcher.on_change("a.vue");
        assert_eq!(batcher.pending(), 2);

        thread::sleep(Duration::from_millis(400));
        let batches = batches.lock();
        assert_eq!(batches.len(), 1);
        assert_eq!(
            batches[0],
            vec![PathBuf::from("a.vue"), PathBuf::from("b.vue")]
        );
    }

    #[test]
    fn test_new_change_resets_the_window() {
        let (batcher, batches) = recording(Duration::from_millis(500));
        batcher.on_change("a.vue");
        thread::sleep(Duration::from_millis(150));
        batcher.on_change("b.vue");
        thread::sleep(Duration::from_millis(150));
        assert!(batches.lock().is_empty());

        thread::sleep(Duration::from_millis(1000));
        assert_eq!(batches.lock().len(), 1);
        assert_eq!(batches.lock()[0].len(), 2);
    }

    #[test]
    fn test_flush_delivers_immediately_and_cancels_timer() {
        let (batcher, batches) = recording(Duration::from_millis(100));
        batcher.on_change("a.vue");
        batcher.flush();
        assert_eq!(batches.lock().len(), 1);
        assert_eq!(batcher.pending(), 0);

        thread::sleep(Duration::from_millis(300));
        assert_eq!(batches.lock().len(), 1);
    }

    #[test]
    fn test_flush_without_changes_is_silent() {
        let (batcher, batches) = recording(Duration::from_millis(50));
        batcher.flush();
        assert!(batches.lock().is_empty());
    }

    #[test]
    fn test_drop_discards_pending() {
        let (batcher, batches) = recording(Duration::from_secs(10));
        batcher.on_change("a.vue");
        batcher.dispose();
        assert!(batches.lock().is_empty());
    }
}
