//! Execution policies.
//!
//! An [`Executor`] decides when and where a unit of work runs. Every
//! continuation is bound to exactly one executor when it is registered.
//!
//! Provided policies:
//! - [`Immediate`]: run synchronously on the calling thread,
//! - [`DefaultExecutor`]: run inline unless the thread is already nested
//!   too deeply, then hand off to the background pool,
//! - [`ThreadPool`](crate::ThreadPool): hand off to a worker pool,
//! - [`Delayed`]: run on another executor once a duration has elapsed.
//!
//! Any `Fn(Job) + Send + Sync` closure is an executor as well, which makes
//! it easy to bridge to an existing event loop.

mod delayed;
mod inline;

pub use delayed::Delayed;
pub use inline::{DefaultExecutor, MAX_INLINE_DEPTH};

use crate::ThreadPool;

use std::sync::{Arc, OnceLock};

/// A unit of work handed to an executor.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The capability to run a unit of work.
///
/// Implementations must be callable from any thread, including from inside
/// a job they are currently running, without deadlocking.
pub trait Executor: Send + Sync {
    /// Runs `job` now, later, or elsewhere, exactly once.
    fn execute(&self, job: Job);
}

impl<F> Executor for F
where
    F: Fn(Job) + Send + Sync,
{
    fn execute(&self, job: Job) {
        self(job)
    }
}

/// Runs every job synchronously on the calling thread.
///
/// Re-entrant use is fine: a job that submits another job simply runs it
/// nested. Unlike [`DefaultExecutor`], there is no depth bound.
#[derive(Debug, Default, Clone, Copy)]
pub struct Immediate;

impl Executor for Immediate {
    fn execute(&self, job: Job) {
        job()
    }
}

/// Shared [`Immediate`] executor.
pub fn immediate() -> Arc<dyn Executor> {
    static IMMEDIATE: OnceLock<Arc<dyn Executor>> = OnceLock::new();
    IMMEDIATE
        .get_or_init(|| {
            let executor: Arc<dyn Executor> = Arc::new(Immediate);
            executor
        })
        .clone()
}

/// Shared [`DefaultExecutor`] with the default depth bound.
///
/// Used by every `continue_with*` call that does not name an executor.
pub fn default_executor() -> Arc<dyn Executor> {
    static DEFAULT: OnceLock<Arc<dyn Executor>> = OnceLock::new();
    DEFAULT
        .get_or_init(|| {
            let executor: Arc<dyn Executor> = Arc::new(DefaultExecutor::new());
            executor
        })
        .clone()
}

/// The process-wide background pool.
///
/// Started on first use with one worker per logical CPU, unless a pool was
/// installed earlier through
/// [`PoolBuilder::install_background`](crate::PoolBuilder::install_background).
pub fn background() -> Arc<ThreadPool> {
    crate::pool::background()
}
