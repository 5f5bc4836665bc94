//! Joining many tasks into one.
//!
//! Both joins wait for every input to complete and then decide, in this
//! order:
//! 1. two or more inputs faulted: an aggregate fault listing every fault in
//!    input order,
//! 2. exactly one input faulted: that fault, unwrapped,
//! 3. at least one input was cancelled: cancelled,
//! 4. otherwise: success.

use crate::Fault;
use crate::executor::default_executor;
use crate::task::{Task, TaskSource};

use parking_lot::Mutex;
use std::mem;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::trace;

/// Returns a task that completes once every task in `tasks` has completed.
///
/// Individual results are ignored. An empty input completes immediately
/// and successfully.
///
/// # Examples
///
/// ```rust,ignore
/// let all = join_all(vec![upload_a, upload_b]);
/// all.continue_with(|t| Ok(t.is_succeeded()));
/// ```
pub fn join_all<T, I>(tasks: I) -> Task<()>
where
    T: Send + Sync + 'static,
    I: IntoIterator<Item = Task<T>>,
{
    let source = TaskSource::new();
    let composite = source.task();

    when_all(tasks.into_iter().collect(), move |finished| {
        match failure(&finished) {
            Some(Failure::Faulted(fault)) => source.complete_with_fault(fault),
            Some(Failure::Cancelled) => source.cancel(),
            None => source.complete_with_result(()),
        }
    });

    composite
}

/// Like [`join_all`], but on success the result holds every input's result
/// in input order, regardless of the order in which the inputs completed.
pub fn join_all_collecting<T, I>(tasks: I) -> Task<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
    I: IntoIterator<Item = Task<T>>,
{
    let source = TaskSource::new();
    let composite = source.task();

    when_all(tasks.into_iter().collect(), move |finished| {
        match failure(&finished) {
            Some(Failure::Faulted(fault)) => source.complete_with_fault(fault),
            Some(Failure::Cancelled) => source.cancel(),
            None => {
                let results = finished
                    .iter()
                    .filter_map(|task| task.result().cloned())
                    .collect();
                source.complete_with_result(results);
            }
        }
    });

    composite
}

enum Failure {
    Faulted(Fault),
    Cancelled,
}

/// Applies the join rule to the finished inputs.
///
/// Returns `None` when every input succeeded.
fn failure<T>(finished: &[Task<T>]) -> Option<Failure> {
    let faults: Vec<Fault> = finished
        .iter()
        .filter_map(|task| task.fault().cloned())
        .collect();

    if !faults.is_empty() {
        return Some(Failure::Faulted(Fault::aggregate(faults)));
    }

    if finished.iter().any(Task::is_cancelled) {
        return Some(Failure::Cancelled);
    }

    None
}

/// Bookkeeping shared by the continuations of one join.
struct Join<T, F> {
    /// Inputs that have not completed yet.
    remaining: AtomicUsize,

    /// Finished inputs, indexed by input position.
    slots: Mutex<Vec<Option<Task<T>>>>,

    on_all: Mutex<Option<F>>,
}

/// Calls `on_all` exactly once, with the inputs in input order, after every
/// input has completed.
///
/// Whichever input completes last runs `on_all`, on its own completing
/// thread.
fn when_all<T, F>(tasks: Vec<Task<T>>, on_all: F)
where
    T: Send + Sync + 'static,
    F: FnOnce(Vec<Task<T>>) + Send + 'static,
{
    if tasks.is_empty() {
        on_all(Vec::new());
        return;
    }

    trace!(inputs = tasks.len(), "joining tasks");

    let join = Arc::new(Join {
        remaining: AtomicUsize::new(tasks.len()),
        slots: Mutex::new((0..tasks.len()).map(|_| None).collect()),
        on_all: Mutex::new(Some(on_all)),
    });

    for (index, task) in tasks.iter().enumerate() {
        let join = join.clone();

        task.register(
            default_executor(),
            Box::new(move |finished: Task<T>| {
                join.slots.lock()[index] = Some(finished);

                if join.remaining.fetch_sub(1, Ordering::AcqRel) != 1 {
                    return;
                }

                let finished: Vec<Task<T>> = mem::take(&mut *join.slots.lock())
                    .into_iter()
                    .flatten()
                    .collect();

                if let Some(on_all) = join.on_all.lock().take() {
                    on_all(finished);
                }
            }),
        );
    }
}
