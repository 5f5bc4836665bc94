use super::ThreadPool;
use super::core::BACKGROUND;
use crate::error::{Error, Result};

use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Builder for configuring and starting a [`ThreadPool`].
///
/// # Examples
///
/// ```rust,ignore
/// let pool = PoolBuilder::new()
///     .worker_threads(4)
///     .thread_name("io")
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct PoolBuilder {
    pub(crate) worker_threads: usize,

    /// Prefix of the worker thread names; the worker id is appended.
    pub(crate) thread_name: String,

    /// Upper bound on how long an idle worker sleeps before looking for
    /// work to steal again.
    pub(crate) park_interval: Duration,
}

impl PoolBuilder {
    /// Creates a builder with default configuration.
    ///
    /// By default, the number of worker threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            thread_name: String::from("ensue-worker"),
            park_interval: Duration::from_millis(10),
        }
    }

    pub fn worker_threads(mut self, n: usize) -> Self {
        self.worker_threads = n;
        self
    }

    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    pub fn park_interval(mut self, interval: Duration) -> Self {
        self.park_interval = interval;
        self
    }

    /// Starts the pool.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroWorkers`] if no worker threads were requested,
    /// or [`Error::ThreadSpawn`] if a worker could not be spawned.
    pub fn build(self) -> Result<Arc<ThreadPool>> {
        if self.worker_threads == 0 {
            return Err(Error::ZeroWorkers);
        }

        ThreadPool::start(self)
    }

    /// Starts the pool and installs it as the process-wide background pool.
    ///
    /// Must run before anything touches the background pool, i.e. before
    /// the first continuation overflows the inline depth and before the
    /// first delay is scheduled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BackgroundAlreadyInitialized`] if the background
    /// pool is already running, plus the errors of [`build`](Self::build).
    pub fn install_background(self) -> Result<Arc<ThreadPool>> {
        if BACKGROUND.get().is_some() {
            return Err(Error::BackgroundAlreadyInitialized);
        }

        let pool = self.build()?;

        BACKGROUND
            .set(pool.clone())
            .map_err(|_| Error::BackgroundAlreadyInitialized)?;

        Ok(pool)
    }
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}
