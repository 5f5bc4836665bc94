use crate::context::{CURRENT_LOCALS, CURRENT_WORKER_ID};
use crate::error::Result;
use crate::executor::{Executor, Job};
use crate::pool::builder::PoolBuilder;
use crate::pool::injector::Injector;
use crate::pool::queue::LocalQueue;
use crate::pool::worker::Worker;

use parking_lot::Mutex;
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

/// Process-wide pool backing the default executor's overflow path and the
/// global timer.
pub(crate) static BACKGROUND: OnceLock<Arc<ThreadPool>> = OnceLock::new();

/// Returns the background pool, starting it with default settings on first
/// use.
///
/// # Panics
///
/// Panics if the worker threads cannot be spawned.
pub(crate) fn background() -> Arc<ThreadPool> {
    BACKGROUND
        .get_or_init(|| {
            PoolBuilder::new()
                .thread_name("ensue-background")
                .build()
                .unwrap_or_else(|err| panic!("failed to start background pool: {err}"))
        })
        .clone()
}

/// A work-stealing thread pool.
///
/// `ThreadPool` is the pooled [`Executor`]: every job handed to it runs on
/// one of its worker threads. Jobs submitted from one of the pool's own
/// workers go to that worker's local queue; everything else goes through
/// the global injector.
///
/// Dropping the pool shuts it down: queued jobs are still drained, then the
/// workers are joined.
pub struct ThreadPool {
    injector: Arc<Injector>,

    locals: Arc<Vec<Arc<LocalQueue>>>,

    handles: Mutex<Vec<JoinHandle<()>>>,

    name: String,
}

impl ThreadPool {
    /// Returns a builder with default configuration.
    pub fn builder() -> PoolBuilder {
        PoolBuilder::new()
    }

    /// Starts a pool with `worker_threads` workers and default settings.
    pub fn new(worker_threads: usize) -> Result<Arc<Self>> {
        PoolBuilder::new().worker_threads(worker_threads).build()
    }

    pub(crate) fn start(builder: PoolBuilder) -> Result<Arc<Self>> {
        let threads = builder.worker_threads;
        let injector = Arc::new(Injector::new());

        let locals: Arc<Vec<Arc<LocalQueue>>> =
            Arc::new((0..threads).map(|_| Arc::new(LocalQueue::new())).collect());

        let pool = ThreadPool {
            injector: injector.clone(),
            locals: locals.clone(),
            handles: Mutex::new(Vec::with_capacity(threads)),
            name: builder.thread_name.clone(),
        };

        for id in 0..threads {
            let worker = Worker::new(id, locals.clone(), injector.clone(), builder.park_interval);

            // On error `pool` drops here, which shuts down and joins the
            // workers spawned so far.
            let handle = thread::Builder::new()
                .name(format!("{}-{}", builder.thread_name, id))
                .spawn(move || worker.run())?;

            pool.handles.lock().push(handle);
        }

        debug!(name = %pool.name, workers = threads, "thread pool started");
        Ok(Arc::new(pool))
    }

    /// Number of worker threads.
    pub fn worker_threads(&self) -> usize {
        self.locals.len()
    }

    /// Signals all workers to shut down once the queues are drained.
    ///
    /// Jobs submitted afterwards run inline on the submitting thread.
    pub fn shutdown(&self) {
        self.injector.shutdown();
    }

    /// Returns the worker id if the calling thread is one of this pool's
    /// workers.
    fn current_worker(&self) -> Option<usize> {
        let ours = CURRENT_LOCALS.with(|cell| {
            cell.borrow()
                .as_ref()
                .is_some_and(|locals| Arc::ptr_eq(locals, &self.locals))
        });

        if ours {
            CURRENT_WORKER_ID.with(|cell| cell.get())
        } else {
            None
        }
    }
}

impl Executor for ThreadPool {
    fn execute(&self, job: Job) {
        if let Some(id) = self.current_worker() {
            self.locals[id].push(job);
            self.injector.notify();
            return;
        }

        if let Err(job) = self.injector.push(job) {
            warn!(name = %self.name, "job submitted after pool shutdown, running inline");
            job();
        }
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.injector.shutdown();

        let current = thread::current().id();
        for handle in self.handles.get_mut().drain(..) {
            // The last handle may be dropped from inside one of our own jobs.
            if handle.thread().id() == current {
                continue;
            }
            let _ = handle.join();
        }

        debug!(name = %self.name, "thread pool stopped");
    }
}
