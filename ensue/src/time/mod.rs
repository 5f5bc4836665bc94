//! Timers and delays.
//!
//! This module provides:
//! - the [`Timer`] capability used by [`after_delay`] and
//!   [`Delayed`](crate::executor::Delayed),
//! - [`TimerThread`], a real timer running on its own thread,
//! - [`ManualTimer`], a virtual-clock timer for deterministic tests.

mod delay;
mod entry;
mod manual;
mod thread;

#[doc(inline)]
pub use delay::{after_delay, after_delay_millis, after_delay_with};

pub use manual::ManualTimer;
pub use thread::TimerThread;

use crate::executor::Job;

use std::sync::{Arc, OnceLock};
use std::time::Duration;

/// The capability to run a job once a delay has elapsed.
pub trait Timer: Send + Sync {
    /// Schedules `job` to run no earlier than `delay` from now.
    fn schedule(&self, delay: Duration, job: Job);
}

/// The process-wide timer thread, started on first use.
///
/// # Panics
///
/// Panics if the timer thread cannot be spawned.
pub fn global_timer() -> Arc<dyn Timer> {
    static TIMER: OnceLock<Arc<dyn Timer>> = OnceLock::new();

    TIMER
        .get_or_init(|| {
            let timer: Arc<dyn Timer> = Arc::new(
                TimerThread::start()
                    .unwrap_or_else(|err| panic!("failed to start timer thread: {err}")),
            );
            timer
        })
        .clone()
}
