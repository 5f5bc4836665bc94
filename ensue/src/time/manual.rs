use super::Timer;
use super::entry::TimerEntry;
use crate::executor::Job;

use parking_lot::Mutex;
use std::collections::BinaryHeap;
use std::time::Duration;

/// A timer driven by a virtual clock.
///
/// Nothing fires on its own: time only moves when [`advance`] is called,
/// and every job whose deadline has been reached runs on the advancing
/// thread, in deadline order. This makes delay behaviour deterministic in
/// tests.
///
/// [`advance`]: ManualTimer::advance
///
/// # Examples
///
/// ```rust,ignore
/// let timer = Arc::new(ManualTimer::new());
/// let delay = after_delay_with(timer.clone(), Duration::from_millis(100));
///
/// timer.advance(Duration::from_millis(99));
/// assert!(!delay.is_completed());
///
/// timer.advance(Duration::from_millis(1));
/// assert!(delay.is_completed());
/// ```
pub struct ManualTimer {
    state: Mutex<Clock>,
}

struct Clock {
    /// Virtual time elapsed since creation.
    now: Duration,

    next_seq: u64,

    heap: BinaryHeap<TimerEntry<Duration>>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(Clock {
                now: Duration::ZERO,
                next_seq: 0,
                heap: BinaryHeap::new(),
            }),
        }
    }

    /// Virtual time elapsed since the timer was created.
    pub fn elapsed(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of scheduled jobs that have not fired yet.
    pub fn pending(&self) -> usize {
        self.state.lock().heap.len()
    }

    /// Moves the virtual clock forward by `by`, firing every job that
    /// becomes due.
    ///
    /// While a job runs, the clock reads that job's deadline, so a job
    /// scheduled from inside a firing job is measured from there and fires
    /// within the same call if it falls inside the window.
    pub fn advance(&self, by: Duration) {
        let target = self.state.lock().now + by;

        loop {
            let job = {
                let mut clock = self.state.lock();

                match clock.heap.peek().map(|entry| entry.deadline) {
                    Some(deadline) if deadline <= target => {
                        clock.now = clock.now.max(deadline);
                        clock.heap.pop().map(|entry| entry.job)
                    }
                    _ => {
                        clock.now = clock.now.max(target);
                        None
                    }
                }
            };

            match job {
                Some(job) => job(),
                None => break,
            }
        }
    }
}

impl Default for ManualTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for ManualTimer {
    /// Jobs never fire during `schedule`, even with a zero delay; they wait
    /// for the next [`advance`](ManualTimer::advance).
    fn schedule(&self, delay: Duration, job: Job) {
        let mut clock = self.state.lock();

        let deadline = clock.now.saturating_add(delay);
        let seq = clock.next_seq;
        clock.next_seq += 1;

        clock.heap.push(TimerEntry { deadline, seq, job });
    }
}
