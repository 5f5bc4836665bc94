use crate::executor::Job;

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Global job queue of a pool.
///
/// Jobs submitted from outside the pool land here before a worker picks
/// them up. The injector also owns the condition variable idle workers
/// park on.
pub(crate) struct Injector {
    queue: Mutex<VecDeque<Job>>,

    condvar: Condvar,

    shutdown: AtomicBool,
}

impl Injector {
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals shutdown and wakes every parked worker.
    ///
    /// Workers keep draining queued jobs and exit once nothing is left.
    pub(crate) fn shutdown(&self) {
        let _queue = self.queue.lock();
        self.shutdown.store(true, Ordering::Release);
        self.condvar.notify_all();
    }

    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Queues `job`, or hands it back if shutdown has already begun.
    pub(crate) fn push(&self, job: Job) -> Result<(), Job> {
        let mut queue = self.queue.lock();

        if self.is_shutdown() {
            return Err(job);
        }

        queue.push_back(job);
        self.condvar.notify_one();
        Ok(())
    }

    /// Wakes one parked worker without queueing anything.
    ///
    /// Called after a job was pushed to a local queue, so that an idle
    /// worker gets a chance to steal it.
    pub(crate) fn notify(&self) {
        self.condvar.notify_one();
    }

    /// Parks the calling worker until a job is injected, shutdown begins,
    /// or `interval` elapses.
    ///
    /// The timeout bounds how long a job pushed to another worker's local
    /// queue can sit unnoticed by idle thieves.
    pub(crate) fn park(&self, interval: Duration) {
        let mut queue = self.queue.lock();

        if self.is_shutdown() || !queue.is_empty() {
            return;
        }

        let _ = self.condvar.wait_for(&mut queue, interval);
    }

    pub(crate) fn steal(&self) -> Option<Job> {
        self.queue.lock().pop_front()
    }
}
