use crate::Fault;
use crate::context::enter_worker;
use crate::executor::Job;
use crate::pool::injector::Injector;
use crate::pool::queue::LocalQueue;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, trace};

/// A worker thread of a [`ThreadPool`](crate::ThreadPool).
///
/// The lookup order for the next job is:
/// 1. Pop from the local queue
/// 2. Steal from the global injector
/// 3. Steal from other workers
/// 4. Park if no work is available
pub(crate) struct Worker {
    id: usize,

    /// All local queues (one per worker), shared for stealing.
    locals: Arc<Vec<Arc<LocalQueue>>>,

    injector: Arc<Injector>,

    park_interval: Duration,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        locals: Arc<Vec<Arc<LocalQueue>>>,
        injector: Arc<Injector>,
        park_interval: Duration,
    ) -> Self {
        Self {
            id,
            locals,
            injector,
            park_interval,
        }
    }

    /// Runs the worker loop until shutdown is signalled and every queue it
    /// can reach is empty.
    pub(crate) fn run(&self) {
        enter_worker(self.id, self.locals.clone(), || {
            loop {
                if let Some(job) = self.next_job() {
                    self.run_job(job);
                    continue;
                }

                if self.injector.is_shutdown() {
                    // Pushes racing the shutdown flag are visible now.
                    match self.next_job() {
                        Some(job) => self.run_job(job),
                        None => break,
                    }
                    continue;
                }

                self.injector.park(self.park_interval);
            }
        });

        trace!(worker = self.id, "worker exited");
    }

    fn next_job(&self) -> Option<Job> {
        self.locals[self.id]
            .pop()
            .or_else(|| self.injector.steal())
            .or_else(|| self.try_steal())
    }

    /// A panicking job must not take the worker down with it.
    fn run_job(&self, job: Job) {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            let fault = Fault::from_panic(payload);
            error!(worker = self.id, %fault, "job panicked on pool worker");
        }
    }

    /// Visits the other workers round-robin, starting after our own id.
    fn try_steal(&self) -> Option<Job> {
        let len = self.locals.len();

        if len <= 1 {
            return None;
        }

        for i in 0..len {
            let victim = (self.id + i + 1) % len;

            if victim == self.id {
                continue;
            }

            if let Some(job) = self.locals[victim].steal() {
                return Some(job);
            }
        }
        None
    }
}
