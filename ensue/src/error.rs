use std::io;

use thiserror::Error;

/// Result type alias for library-level operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the library itself, as opposed to task outcomes.
///
/// Task outcomes are reported through [`Fault`](crate::Fault) and
/// cancellation; this type only covers configuring and starting the
/// execution machinery.
#[derive(Debug, Error)]
pub enum Error {
    /// The process-wide background pool was already started.
    #[error("background pool is already initialized")]
    BackgroundAlreadyInitialized,

    /// A pool was configured with no worker threads.
    #[error("worker_threads must be > 0")]
    ZeroWorkers,

    /// The operating system refused to spawn a thread.
    #[error("failed to spawn thread: {0}")]
    ThreadSpawn(#[from] io::Error),
}
