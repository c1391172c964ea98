//! Fixed-size worker pool with FIFO task dispatch.
//!
//! `submit` enqueues a closure and returns a handle resolving to its
//! return value. Tasks carry no worker affinity. Dropping the pool lets
//! workers drain the remaining queue, then joins them.

use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use fathom_core::config::ThreadPoolConfig;

type Job = Box<dyn FnOnce() + Send + 'static>;

struct PoolState {
    jobs: VecDeque<Job>,
    shutdown: bool,
}

struct PoolShared {
    state: Mutex<PoolState>,
    available: Condvar,
}

/// Handle to a submitted task.
///
/// Resolves to the task's return value; a panicking task surfaces as
/// `Err` with the panic payload, mirroring `std::thread::JoinHandle`.
pub struct TaskHandle<T> {
    rx: mpsc::Receiver<thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task completes.
    pub fn join(self) -> thread::Result<T> {
        match self.rx.recv() {
            Ok(result) => result,
            // The pool was torn down before the task ran; only reachable
            // if a worker itself died, which catch_unwind prevents.
            Err(_) => Err(Box::new("task abandoned by worker pool")),
        }
    }
}

/// Fixed number of worker threads consuming a FIFO queue.
pub struct WorkerPool {
    shared: Arc<PoolShared>,
    workers: Vec<thread::JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new(config: &ThreadPoolConfig) -> Self {
        Self::with_workers(config.num_workers)
    }

    pub fn with_workers(num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        let shared = Arc::new(PoolShared {
            state: Mutex::new(PoolState {
                jobs: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        });

        let workers = (0..num_workers)
            .map(|i| {
                let shared = Arc::clone(&shared);
                thread::Builder::new()
                    .name(format!("fathom-worker-{i}"))
                    .spawn(move || worker_loop(shared))
                    .expect("spawn worker thread")
            })
            .collect();

        debug!(num_workers, "worker pool started");
        Self { shared, workers }
    }

    /// Enqueue a task and return a handle to its result.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let job: Job = Box::new(move || {
            let result = catch_unwind(AssertUnwindSafe(task));
            // The receiver may have been dropped; that just means nobody
            // is waiting for this result.
            let _ = tx.send(result);
        });

        {
            let mut state = self.shared.state.lock();
            state.jobs.push_back(job);
        }
        self.shared.available.notify_one();
        TaskHandle { rx }
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        {
            let mut state = self.shared.state.lock();
            state.shutdown = true;
        }
        self.shared.available.notify_all();
        // The pool can be dropped from one of its own workers when a
        // task owns the last handle to the pool's owner; that worker is
        // detached instead of self-joined.
        let current = thread::current().id();
        for worker in self.workers.drain(..) {
            if worker.thread().id() != current {
                let _ = worker.join();
            }
        }
    }
}

fn worker_loop(shared: Arc<PoolShared>) {
    loop {
        let job = {
            let mut state = shared.state.lock();
            loop {
                // Drain remaining jobs even during shutdown.
                if let Some(job) = state.jobs.pop_front() {
                    break Some(job);
                }
                if state.shutdown {
                    break None;
                }
                shared.available.wait(&mut state);
            }
        };
        match job {
            Some(job) => job(),
            None => return,
        }
    }
}
