//! Background controller that adapts query-time parameters to live
//! latency and recall signals.
//!
//! The tuner holds only probe closures — no handles into the engine.
//! Published parameters are read lock-free via [`AutoTuner::params`] and
//! consumed by the vector store / retrievers at query time.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};
use tracing::{debug, info};

use fathom_core::config::TunerConfig;

/// Lower/upper clamps for the tuned values.
const EF_MIN: usize = 10;
const EF_MAX: usize = 500;
const TOPK_MIN: usize = 1;
const TOPK_MAX: usize = 100;

/// Initial search breadth and top-K before any tuning tick.
const EF_INITIAL: usize = 50;
const TOPK_INITIAL: usize = 10;

/// Snapshot of the tuned query-time parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunerParams {
    /// ANN search breadth (`ef_query`).
    pub ef: usize,
    /// Result count requested from the candidate stores.
    pub top_k: usize,
}

type Probe = Arc<dyn Fn() -> f64 + Send + Sync>;

struct TunerShared {
    ef: AtomicUsize,
    top_k: AtomicUsize,
    stop_flag: Mutex<bool>,
    stop_signal: Condvar,
}

/// Periodic latency/recall controller.
///
/// `start` and `stop` are idempotent; `stop` joins the worker thread.
pub struct AutoTuner {
    config: TunerConfig,
    latency_probe: Probe,
    recall_probe: Probe,
    shared: Arc<TunerShared>,
    worker: Mutex<Option<thread::JoinHandle<()>>>,
}

impl AutoTuner {
    pub fn new(
        config: TunerConfig,
        latency_probe: impl Fn() -> f64 + Send + Sync + 'static,
        recall_probe: impl Fn() -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            config,
            latency_probe: Arc::new(latency_probe),
            recall_probe: Arc::new(recall_probe),
            shared: Arc::new(TunerShared {
                ef: AtomicUsize::new(EF_INITIAL),
                top_k: AtomicUsize::new(TOPK_INITIAL),
                stop_flag: Mutex::new(false),
                stop_signal: Condvar::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Spawn the control loop. A second call while running is a no-op.
    pub fn start(&self) {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return;
        }
        *self.shared.stop_flag.lock() = false;

        let shared = Arc::clone(&self.shared);
        let latency_probe = Arc::clone(&self.latency_probe);
        let recall_probe = Arc::clone(&self.recall_probe);
        let config = self.config.clone();

        let handle = thread::Builder::new()
            .name("fathom-tuner".into())
            .spawn(move || control_loop(shared, latency_probe, recall_probe, config))
            .expect("spawn tuner thread");
        *worker = Some(handle);
        info!("auto-tuner started");
    }

    /// Signal the control loop and join it. A call while stopped is a
    /// no-op.
    pub fn stop(&self) {
        let handle = {
            let mut worker = self.worker.lock();
            match worker.take() {
                Some(handle) => handle,
                None => return,
            }
        };
        *self.shared.stop_flag.lock() = true;
        self.shared.stop_signal.notify_all();
        let _ = handle.join();
        info!("auto-tuner stopped");
    }

    /// Current tuned parameters.
    pub fn params(&self) -> TunerParams {
        TunerParams {
            ef: self.shared.ef.load(Ordering::Relaxed),
            top_k: self.shared.top_k.load(Ordering::Relaxed),
        }
    }

    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }
}

impl Drop for AutoTuner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn control_loop(
    shared: Arc<TunerShared>,
    latency_probe: Probe,
    recall_probe: Probe,
    config: TunerConfig,
) {
    let interval = Duration::from_secs(config.check_interval_seconds.max(1));
    let ef_delta = config.ef_delta.max(0) as usize;
    let topk_delta = config.topk_delta.max(0) as usize;

    loop {
        let latency = latency_probe();
        let recall = recall_probe();

        if latency > config.latency_max_ms {
            let ef = shared.ef.load(Ordering::Relaxed);
            let top_k = shared.top_k.load(Ordering::Relaxed);
            shared
                .ef
                .store(ef.saturating_sub(ef_delta).max(EF_MIN), Ordering::Relaxed);
            shared.top_k.store(
                top_k.saturating_sub(topk_delta).max(TOPK_MIN),
                Ordering::Relaxed,
            );
            debug!(latency, ef, top_k, "latency over budget, narrowing search");
        } else if recall < config.recall_min_pct {
            let ef = shared.ef.load(Ordering::Relaxed);
            let top_k = shared.top_k.load(Ordering::Relaxed);
            shared.ef.store((ef + ef_delta).min(EF_MAX), Ordering::Relaxed);
            shared
                .top_k
                .store((top_k + topk_delta).min(TOPK_MAX), Ordering::Relaxed);
            debug!(recall, ef, top_k, "recall under target, widening search");
        }

        let mut stop = shared.stop_flag.lock();
        if *stop {
            return;
        }
        let _ = shared.stop_signal.wait_for(&mut stop, interval);
        if *stop {
            return;
        }
    }
}
