//! Per-thread execution state.
//!
//! Everything the executors need to know about "where am I running" lives
//! here as thread-local state:
//! - how deeply continuations are currently nested inline,
//! - which pool worker (if any) owns the current thread,
//! - whether the current thread is the application's primary thread.

use crate::pool::queue::LocalQueue;

use std::cell::{Cell, RefCell};
use std::sync::Arc;

thread_local! {
    /// Number of continuations currently running inline on this thread
    /// through the default executor.
    static INLINE_DEPTH: Cell<usize> = const { Cell::new(0) };

    /// Identifier of the pool worker running on this thread.
    pub(crate) static CURRENT_WORKER_ID: Cell<Option<usize>> = const { Cell::new(None) };

    /// Local queues of the pool the current worker belongs to.
    ///
    /// Used both to push locally submitted jobs and to recognise whether a
    /// submission comes from one of the pool's own workers.
    pub(crate) static CURRENT_LOCALS: RefCell<Option<Arc<Vec<Arc<LocalQueue>>>>> =
        const { RefCell::new(None) };

    /// Set by [`designate_primary_thread`].
    static PRIMARY_THREAD: Cell<bool> = const { Cell::new(false) };
}

/// Installs the worker identity for the duration of `f`.
///
/// The previous identity is restored afterwards, so nested pools on the
/// same thread (a pool built from inside another pool's job) stay correct.
pub(crate) fn enter_worker<R>(
    id: usize,
    locals: Arc<Vec<Arc<LocalQueue>>>,
    f: impl FnOnce() -> R,
) -> R {
    let prev_id = CURRENT_WORKER_ID.with(|cell| cell.replace(Some(id)));
    let prev_locals = CURRENT_LOCALS.with(|cell| cell.replace(Some(locals)));

    let out = f();

    CURRENT_LOCALS.with(|cell| cell.replace(prev_locals));
    CURRENT_WORKER_ID.with(|cell| cell.set(prev_id));

    out
}

/// Current inline nesting depth of the calling thread.
pub(crate) fn inline_depth() -> usize {
    INLINE_DEPTH.with(Cell::get)
}

/// Marks one more level of inline continuation on this thread.
///
/// The level is released when the guard drops, including during unwinding.
pub(crate) fn enter_inline() -> InlineGuard {
    INLINE_DEPTH.with(|depth| depth.set(depth.get() + 1));
    InlineGuard { _private: () }
}

pub(crate) struct InlineGuard {
    _private: (),
}

impl Drop for InlineGuard {
    fn drop(&mut self) {
        INLINE_DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Designates the calling thread as the application's primary thread.
///
/// Blocking on a task from the primary thread (for example a UI or event
/// loop thread) is reported with a warning by
/// [`Task::wait_until_finished`](crate::Task::wait_until_finished).
pub fn designate_primary_thread() {
    PRIMARY_THREAD.with(|flag| flag.set(true));
}

/// Returns `true` if the calling thread was designated as primary, or is the
/// process main thread on platforms where that can be detected.
pub fn is_primary_thread() -> bool {
    PRIMARY_THREAD.with(Cell::get) || is_process_main_thread()
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn is_process_main_thread() -> bool {
    // The main thread's kernel thread id equals the process id.
    unsafe { libc::syscall(libc::SYS_gettid) as libc::pid_t == libc::getpid() }
}

#[cfg(any(target_os = "macos", target_os = "ios"))]
fn is_process_main_thread() -> bool {
    unsafe { libc::pthread_main_np() != 0 }
}

#[cfg(not(any(
    target_os = "linux",
    target_os = "android",
    target_os = "macos",
    target_os = "ios"
)))]
fn is_process_main_thread() -> bool {
    false
}
