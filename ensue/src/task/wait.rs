use super::Task;
use crate::context::is_primary_thread;

use std::thread;

use tracing::warn;

impl<T> Task<T> {
    /// Blocks the calling thread until the task completes.
    ///
    /// The thread sleeps on a condition variable signalled by the completion
    /// itself; nothing is polled. No lock is held while sleeping, so the task
    /// may be completed from anywhere, including from an [`Immediate`]
    /// continuation on another thread.
    ///
    /// Never fails: check [`is_faulted`](Task::is_faulted),
    /// [`is_cancelled`](Task::is_cancelled) and [`result`](Task::result)
    /// afterwards.
    ///
    /// This pins a thread for the duration of the wait and should be
    /// avoided; prefer chaining with [`continue_with`](Task::continue_with).
    /// Waiting on the primary thread logs a warning.
    ///
    /// [`Immediate`]: crate::executor::Immediate
    pub fn wait_until_finished(&self) {
        if self.is_completed() {
            return;
        }

        if is_primary_thread() {
            warn!(
                thread = thread::current().name().unwrap_or("<unnamed>"),
                "blocking wait for a task on the primary thread"
            );
        }

        let mut registry = self.core.registry.lock();
        while !self.is_completed() {
            self.core.finished.wait(&mut registry);
        }
    }
}
