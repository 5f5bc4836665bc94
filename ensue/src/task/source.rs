use super::Task;
use super::core::Settled;
use super::state;
use crate::Fault;

use std::sync::Arc;
use std::sync::atomic::Ordering;

/// The producer side of a [`Task`].
///
/// A `TaskSource` owns the right to complete its task. Hand out
/// [`task`](TaskSource::task) to consumers and complete the source when the
/// work is done.
///
/// The plain completion methods treat a second completion as a bug in the
/// producer and panic. The `try_*` forms report whether they won instead,
/// for producers that legitimately race (several sources cloned from one).
///
/// # Examples
///
/// ```rust,ignore
/// let source = TaskSource::new();
/// let task = source.task();
///
/// std::thread::spawn(move || source.complete_with_result(42));
///
/// task.wait_until_finished();
/// assert_eq!(task.result(), Some(&42));
/// ```
pub struct TaskSource<T> {
    task: Task<T>,
}

impl<T> Clone for TaskSource<T> {
    fn clone(&self) -> Self {
        TaskSource {
            task: self.task.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> TaskSource<T> {
    /// Creates a source with a fresh pending task.
    pub fn new() -> Self {
        TaskSource {
            task: Task::pending(),
        }
    }

    /// Returns the consumer handle of the task.
    pub fn task(&self) -> Task<T> {
        self.task.clone()
    }

    /// Completes the task with a result.
    ///
    /// # Panics
    ///
    /// Panics if the task is already completed.
    pub fn complete_with_result(&self, value: T) {
        self.settle(Settled::Succeeded(Arc::new(value)));
    }

    /// Completes the task with a fault.
    ///
    /// # Panics
    ///
    /// Panics if the task is already completed.
    pub fn complete_with_fault(&self, fault: impl Into<Fault>) {
        self.settle(Settled::Faulted(fault.into()));
    }

    /// Cancels the task.
    ///
    /// # Panics
    ///
    /// Panics if the task is already completed.
    pub fn cancel(&self) {
        self.settle(Settled::Cancelled);
    }

    /// Completes the task with a result unless it is already completed.
    ///
    /// Returns `true` if this call completed the task.
    pub fn try_complete_with_result(&self, value: T) -> bool {
        self.task.complete(Settled::Succeeded(Arc::new(value)))
    }

    pub fn try_complete_with_fault(&self, fault: impl Into<Fault>) -> bool {
        self.task.complete(Settled::Faulted(fault.into()))
    }

    pub fn try_cancel(&self) -> bool {
        self.task.complete(Settled::Cancelled)
    }

    pub(crate) fn settle(&self, settled: Settled<T>) {
        if !self.task.complete(settled) {
            let current = self.task.core.state.load(Ordering::Acquire);
            panic!(
                "cannot complete a task twice (task is already {})",
                state::name(current)
            );
        }
    }

    /// Copies the terminal state of `other` onto this source's task.
    pub(crate) fn copy_from(&self, other: &Task<T>) {
        if let Some(settled) = other.settlement() {
            self.settle(settled.clone());
        }
    }
}

impl<T: Send + Sync + 'static> Default for TaskSource<T> {
    fn default() -> Self {
        Self::new()
    }
}
