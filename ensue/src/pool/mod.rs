//! Work-stealing worker pool.
//!
//! It consists of:
//! - [`injector`]: the global queue for jobs submitted from outside,
//! - [`queue`]: per-worker local queues used for fast local execution
//!   and job stealing,
//! - [`worker`]: the worker loop,
//! - [`builder`]: pool configuration.

mod builder;
mod core;
mod injector;
mod worker;

pub(crate) mod queue;

pub use builder::PoolBuilder;
pub use self::core::ThreadPool;

pub(crate) use self::core::background;
