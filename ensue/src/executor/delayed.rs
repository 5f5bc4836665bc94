use super::{Executor, Job};
use crate::time::{Timer, global_timer};

use std::sync::Arc;
use std::time::Duration;

/// Runs jobs on a target executor once a fixed delay has elapsed.
///
/// The delay is measured by a [`Timer`]; by default the global timer thread
/// and the background pool are used.
///
/// # Examples
///
/// ```rust,ignore
/// let later: Arc<dyn Executor> = Arc::new(Delayed::new(Duration::from_millis(50)));
/// task.continue_with_on(later, |t| Ok(t.is_completed()));
/// ```
#[derive(Clone)]
pub struct Delayed {
    delay: Duration,

    timer: Arc<dyn Timer>,

    target: Arc<dyn Executor>,
}

impl Delayed {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: global_timer(),
            target: super::background(),
        }
    }

    /// Runs the delayed jobs on `executor` instead of the background pool.
    pub fn on(mut self, executor: Arc<dyn Executor>) -> Self {
        self.target = executor;
        self
    }

    pub fn with_timer(mut self, timer: Arc<dyn Timer>) -> Self {
        self.timer = timer;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Executor for Delayed {
    fn execute(&self, job: Job) {
        let target = self.target.clone();
        self.timer
            .schedule(self.delay, Box::new(move || target.execute(job)));
    }
}
