//! # Ensue
//!
//! **Ensue** is a small task primitive for composing asynchronous work
//! through continuations, for the **Nebula** ecosystem.
//!
//! A [`Task`] is a handle to the eventual outcome of some work. It completes
//! exactly once: with a result, with a [`Fault`], or by being cancelled.
//! Work is chained onto a task with continuations, each bound to an
//! [`Executor`](executor::Executor) that decides where and when it runs.
//!
//! Ensue provides:
//!
//! - **Tasks and sources**: [`Task`] for consumers, [`TaskSource`] for
//!   producers
//! - **Continuations** with automatic flattening of task-returning closures
//! - **Executors**: run immediately, inline with a depth bound, on a
//!   work-stealing [`ThreadPool`], or after a delay
//! - **Aggregation**: [`join_all`], [`join_all_collecting`] and the
//!   [`join!`] macro
//! - **Delays**: [`after_delay`] and a virtual-clock timer for tests
//! - **Blocking waits** and `.await` support for bridging to other code
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ensue::{Fault, Task, TaskSource};
//!
//! let source = TaskSource::new();
//! let length = source
//!     .task()
//!     .continue_with_success(|text: &String| Ok::<_, Fault>(text.len()));
//!
//! std::thread::spawn(move || source.complete_with_result(String::from("hello")));
//!
//! length.wait_until_finished();
//! assert_eq!(length.result(), Some(&5));
//! ```
//!
//! ## Modules
//!
//! - [`task`]: the task state machine and continuations
//! - [`executor`]: execution policies
//! - [`time`]: timers and delays
//!
//! ## Getting Started
//!
//! Add Ensue to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! ensue = { git = "https://github.com/Nebula-ecosystem/Ensue", package = "ensue" }
//! ```

mod aggregate;
mod context;
mod error;
mod fault;
mod pool;

pub mod executor;
pub mod task;
pub mod time;

pub use aggregate::{join_all, join_all_collecting};
pub use context::{designate_primary_thread, is_primary_thread};
pub use error::{Error, Result};
pub use fault::{Fault, StructuredError, TASK_ERROR_DOMAIN, UncaughtException};
pub use pool::{PoolBuilder, ThreadPool};
pub use task::{Finished, IntoOutcome, Outcome, Task, TaskSource};
pub use time::{after_delay, after_delay_millis, after_delay_with};

pub use ensue_macros::join;
