use super::Timer;
use super::entry::TimerEntry;
use crate::error::Result;
use crate::executor::{Executor, Job};

use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::BinaryHeap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

/// Longest delay honoured as is; anything longer is clamped.
const MAX_DELAY: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// A timer backed by a dedicated thread.
///
/// The thread sleeps on a condition variable until the earliest deadline,
/// then hands every due job to the dispatch executor. The timer thread
/// itself never runs user code.
///
/// Dropping the timer stops the thread; jobs that have not fired yet are
/// discarded.
pub struct TimerThread {
    shared: Arc<Shared>,

    handle: Mutex<Option<JoinHandle<()>>>,
}

struct Shared {
    heap: Mutex<BinaryHeap<TimerEntry<Instant>>>,

    condvar: Condvar,

    shutdown: AtomicBool,

    next_seq: AtomicU64,

    dispatch: Arc<dyn Executor>,
}

impl TimerThread {
    /// Starts a timer thread that dispatches due jobs on the background
    /// pool.
    pub fn start() -> Result<Self> {
        Self::with_dispatcher(crate::executor::background())
    }

    /// Starts a timer thread that dispatches due jobs on `dispatch`.
    pub fn with_dispatcher(dispatch: Arc<dyn Executor>) -> Result<Self> {
        let shared = Arc::new(Shared {
            heap: Mutex::new(BinaryHeap::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
            next_seq: AtomicU64::new(0),
            dispatch,
        });

        let runner = shared.clone();
        let handle = thread::Builder::new()
            .name(String::from("ensue-timer"))
            .spawn(move || runner.run())?;

        debug!("timer thread started");

        Ok(Self {
            shared,
            handle: Mutex::new(Some(handle)),
        })
    }

    /// Number of scheduled jobs that have not fired yet.
    pub fn pending(&self) -> usize {
        self.shared.heap.lock().len()
    }
}

impl Shared {
    fn run(&self) {
        let mut heap = self.heap.lock();

        loop {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            match heap.peek().map(|entry| entry.deadline) {
                None => self.condvar.wait(&mut heap),
                Some(deadline) if deadline <= Instant::now() => {
                    if let Some(entry) = heap.pop() {
                        trace!(seq = entry.seq, "timer fired");
                        MutexGuard::unlocked(&mut heap, || self.dispatch.execute(entry.job));
                    }
                }
                Some(deadline) => {
                    // Spurious and early wake-ups are re-checked against the
                    // clock on the next iteration.
                    let _ = self.condvar.wait_until(&mut heap, deadline);
                }
            }
        }

        trace!(discarded = heap.len(), "timer thread exited");
    }
}

impl Timer for TimerThread {
    fn schedule(&self, delay: Duration, job: Job) {
        if self.shared.shutdown.load(Ordering::Acquire) {
            warn!("job scheduled on a stopped timer was discarded");
            return;
        }

        let seq = self.shared.next_seq.fetch_add(1, Ordering::Relaxed);

        let deadline = Instant::now() + delay.min(MAX_DELAY);

        self.shared
            .heap
            .lock()
            .push(TimerEntry { deadline, seq, job });

        // The new entry may be the earliest one.
        self.shared.condvar.notify_one();
    }
}

impl Drop for TimerThread {
    fn drop(&mut self) {
        {
            let _heap = self.shared.heap.lock();
            self.shared.shutdown.store(true, Ordering::Release);
            self.shared.condvar.notify_all();
        }

        if let Some(handle) = self.handle.get_mut().take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }

        debug!("timer thread stopped");
    }
}
