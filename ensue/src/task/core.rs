use super::state::{self, CANCELLED, COMPLETING, FAULTED, PENDING, SUCCEEDED};
use crate::Fault;
use crate::executor::Executor;

use parking_lot::{Condvar, Mutex};
use std::cell::UnsafeCell;
use std::fmt;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;

/// The terminal outcome stored in a completed task.
///
/// Results are kept behind an `Arc` so that copying an outcome onto another
/// task (flattening) never needs to clone the value itself.
pub(crate) enum Settled<T> {
    Succeeded(Arc<T>),
    Faulted(Fault),
    Cancelled,
}

impl<T> Settled<T> {
    fn state(&self) -> usize {
        match self {
            Settled::Succeeded(_) => SUCCEEDED,
            Settled::Faulted(_) => FAULTED,
            Settled::Cancelled => CANCELLED,
        }
    }
}

impl<T> Clone for Settled<T> {
    fn clone(&self) -> Self {
        match self {
            Settled::Succeeded(value) => Settled::Succeeded(value.clone()),
            Settled::Faulted(fault) => Settled::Faulted(fault.clone()),
            Settled::Cancelled => Settled::Cancelled,
        }
    }
}

/// A continuation as stored in the registry: it receives the terminal
/// antecedent.
pub(crate) type Callback<T> = Box<dyn FnOnce(Task<T>) + Send>;

/// A continuation and the executor it was registered with.
pub(crate) struct Registration<T> {
    executor: Arc<dyn Executor>,

    callback: Callback<T>,
}

impl<T: Send + Sync + 'static> Registration<T> {
    fn dispatch(self, task: Task<T>) {
        let callback = self.callback;
        self.executor.execute(Box::new(move || callback(task)));
    }
}

/// Shared state behind every [`Task`] handle.
pub(crate) struct Core<T> {
    /// The current lifecycle state (PENDING, SUCCEEDED, etc.).
    pub(super) state: AtomicUsize,

    /// The outcome. Written exactly once by the thread that wins the
    /// PENDING -> COMPLETING transition, read only once a terminal state has
    /// been published.
    slot: UnsafeCell<Option<Settled<T>>>,

    /// Continuations registered while pending, in registration order.
    ///
    /// The terminal state is published while this lock is held, which is
    /// what makes registration and completion agree on who dispatches a
    /// continuation.
    pub(super) registry: Mutex<Vec<Registration<T>>>,

    /// Signalled (under `registry`) when the terminal state is published.
    pub(super) finished: Condvar,
}

// Safety: `slot` is only written by the single completing thread before the
// terminal state is published with `Release`, and only read after observing
// that state with `Acquire`. Results are shared between threads by reference.
unsafe impl<T: Send + Sync> Send for Core<T> {}
unsafe impl<T: Send + Sync> Sync for Core<T> {}

/// Handle to the eventual outcome of some work.
///
/// A task is pending until it completes exactly once, either successfully
/// with a result, with a [`Fault`], or by being cancelled. After that its
/// state never changes.
///
/// `Task` is a cheap, clonable handle; all clones observe the same task.
/// Continuations registered with [`continue_with`](Task::continue_with) and
/// friends run once the task completes.
pub struct Task<T> {
    pub(super) core: Arc<Core<T>>,
}

impl<T> Clone for Task<T> {
    fn clone(&self) -> Self {
        Task {
            core: self.core.clone(),
        }
    }
}

impl<T> Task<T> {
    fn state(&self) -> usize {
        self.core.state.load(Ordering::Acquire)
    }

    /// Whether the task has reached a terminal state.
    pub fn is_completed(&self) -> bool {
        state::is_terminal(self.state())
    }

    pub fn is_succeeded(&self) -> bool {
        self.state() == SUCCEEDED
    }

    /// Whether the task completed with a fault.
    pub fn is_faulted(&self) -> bool {
        self.state() == FAULTED
    }

    pub fn is_cancelled(&self) -> bool {
        self.state() == CANCELLED
    }

    /// The result of a succeeded task.
    ///
    /// Returns `None` while pending and for faulted or cancelled tasks.
    pub fn result(&self) -> Option<&T> {
        match self.settlement()? {
            Settled::Succeeded(value) => Some(&**value),
            _ => None,
        }
    }

    /// The fault of a faulted task.
    pub fn fault(&self) -> Option<&Fault> {
        match self.settlement()? {
            Settled::Faulted(fault) => Some(fault),
            _ => None,
        }
    }

    /// Returns `true` if both handles refer to the same task.
    pub fn ptr_eq(&self, other: &Task<T>) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }

    pub(crate) fn settlement(&self) -> Option<&Settled<T>> {
        if !self.is_completed() {
            return None;
        }

        // Safety: a terminal state was observed with `Acquire`, so the single
        // write to the slot happened-before this read and no write follows.
        unsafe { (*self.core.slot.get()).as_ref() }
    }
}

impl<T: Send + Sync + 'static> Task<T> {
    pub(crate) fn pending() -> Self {
        Task {
            core: Arc::new(Core {
                state: AtomicUsize::new(PENDING),
                slot: UnsafeCell::new(None),
                registry: Mutex::new(Vec::new()),
                finished: Condvar::new(),
            }),
        }
    }

    fn settled(settled: Settled<T>) -> Self {
        Task {
            core: Arc::new(Core {
                state: AtomicUsize::new(settled.state()),
                slot: UnsafeCell::new(Some(settled)),
                registry: Mutex::new(Vec::new()),
                finished: Condvar::new(),
            }),
        }
    }

    /// Creates a task that already succeeded with `value`.
    pub fn from_result(value: T) -> Self {
        Self::settled(Settled::Succeeded(Arc::new(value)))
    }

    /// Creates a task that already faulted.
    pub fn from_fault(fault: impl Into<Fault>) -> Self {
        Self::settled(Settled::Faulted(fault.into()))
    }

    /// Creates a task that is already cancelled.
    pub fn cancelled() -> Self {
        Self::settled(Settled::Cancelled)
    }

    /// Attempts the PENDING -> terminal transition.
    ///
    /// Returns `false` without touching the task if another completion
    /// already won. On success, every queued continuation is dispatched on
    /// the calling thread through its executor, in registration order.
    pub(crate) fn complete(&self, settled: Settled<T>) -> bool {
        if self
            .core
            .state
            .compare_exchange(PENDING, COMPLETING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return false;
        }

        let terminal = settled.state();

        // Safety: winning the transition to COMPLETING grants exclusive
        // write access to the slot; readers wait for a terminal state.
        unsafe {
            *self.core.slot.get() = Some(settled);
        }

        let pending = {
            let mut registry = self.core.registry.lock();
            self.core.state.store(terminal, Ordering::Release);
            self.core.finished.notify_all();
            mem::take(&mut *registry)
        };

        trace!(
            state = state::name(terminal),
            continuations = pending.len(),
            "task completed"
        );

        for registration in pending {
            registration.dispatch(self.clone());
        }

        true
    }

    /// Registers a continuation.
    ///
    /// If the task is still pending the continuation is queued; otherwise it
    /// is dispatched right away on the calling thread. Either way it runs
    /// exactly once.
    pub(crate) fn register(&self, executor: Arc<dyn Executor>, callback: Callback<T>) {
        let registration = Registration { executor, callback };

        {
            let mut registry = self.core.registry.lock();
            if !self.is_completed() {
                registry.push(registration);
                return;
            }
        }

        registration.dispatch(self.clone());
    }
}

impl<T: fmt::Debug> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Task");
        out.field("state", &state::name(self.state()));

        match self.settlement() {
            Some(Settled::Succeeded(value)) => {
                out.field("result", value);
            }
            Some(Settled::Faulted(fault)) => {
                out.field("fault", fault);
            }
            _ => {}
        }

        out.finish()
    }
}
