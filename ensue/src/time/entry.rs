use crate::executor::Job;

use std::cmp::Ordering;

/// An entry in a timer queue.
///
/// Entries are stored in a `BinaryHeap` and popped earliest deadline
/// first. Entries sharing a deadline fire in scheduling order.
///
/// `D` is the clock's notion of a point in time: an `Instant` for the timer
/// thread, a virtual offset for the manual timer.
pub(crate) struct TimerEntry<D> {
    pub(crate) deadline: D,

    /// Scheduling sequence number, used to break deadline ties.
    pub(crate) seq: u64,

    pub(crate) job: Job,
}

impl<D: Ord> Eq for TimerEntry<D> {}

impl<D: Ord> PartialEq for TimerEntry<D> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<D: Ord> Ord for TimerEntry<D> {
    /// The comparison is **reversed** so that a `BinaryHeap<TimerEntry>`
    /// behaves as a min-heap.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .deadline
            .cmp(&self.deadline)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<D: Ord> PartialOrd for TimerEntry<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
