use super::{Timer, global_timer};
use crate::task::{Task, TaskSource};

use std::sync::Arc;
use std::time::Duration;

use tracing::trace;

/// Returns a task that succeeds once at least `duration` has elapsed.
///
/// The task never completes early; under load it may complete later. The
/// caller is never blocked.
///
/// # Examples
///
/// ```rust,ignore
/// after_delay(Duration::from_millis(10))
///     .continue_with(|_| Ok(println!("ten milliseconds later")));
/// ```
pub fn after_delay(duration: Duration) -> Task<()> {
    after_delay_with(global_timer(), duration)
}

pub fn after_delay_millis(millis: u64) -> Task<()> {
    after_delay(Duration::from_millis(millis))
}

/// Like [`after_delay`], measured by `timer` instead of the global timer.
pub fn after_delay_with(timer: Arc<dyn Timer>, duration: Duration) -> Task<()> {
    let source = TaskSource::new();
    let task = source.task();

    trace!(?duration, "delay scheduled");
    timer.schedule(duration, Box::new(move || source.complete_with_result(())));

    task
}
