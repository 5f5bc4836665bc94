//! The task primitive.
//!
//! This module defines:
//! - [`Task`], the consumer handle with its completion state machine,
//! - [`TaskSource`], the producer side that completes a task,
//! - the continuation engine ([`Task::continue_with`] and friends) with
//!   flattening of task-returning continuations,
//! - blocking and async waits.

mod continuation;
mod core;
mod future;
mod source;
mod state;
mod wait;

pub use self::core::Task;
pub use continuation::{IntoOutcome, Outcome};
pub use future::Finished;
pub use source::TaskSource;
