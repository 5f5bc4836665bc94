use crate::executor::Job;

use parking_lot::Mutex;
use std::collections::VecDeque;

/// A per-worker job queue.
///
/// The owning worker pushes and pops at the back (LIFO), which keeps a
/// continuation chain hot on the thread that produced it. Other workers
/// steal from the front (FIFO).
pub(crate) struct LocalQueue {
    inner: Mutex<VecDeque<Job>>,
}

impl LocalQueue {
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(VecDeque::new()),
        }
    }

    pub(crate) fn push(&self, job: Job) {
        self.inner.lock().push_back(job);
    }

    pub(crate) fn pop(&self) -> Option<Job> {
        self.inner.lock().pop_back()
    }

    /// Removes the oldest job. Intended for other workers.
    pub(crate) fn steal(&self) -> Option<Job> {
        self.inner.lock().pop_front()
    }
}
