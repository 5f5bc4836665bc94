//! Continuations and flattening.
//!
//! A continuation is a closure run against a terminal antecedent. What it
//! returns decides how the continuation's own task completes; see
//! [`IntoOutcome`].

use super::core::Settled;
use super::{Task, TaskSource};
use crate::Fault;
use crate::executor::{Executor, default_executor, immediate};

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use tracing::debug;

/// An explicit terminal outcome, for continuations that want to pick any of
/// the three terminal states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Succeeded(T),
    Faulted(Fault),
    Cancelled,
}

/// What a continuation may return.
///
/// - `Ok(value)` / `Err(fault)`: the continuation's task succeeds with the
///   value or faults with the fault,
/// - an [`Outcome`]: the continuation's task takes exactly that state,
/// - another [`Task`]: the continuation's task stays pending until that task
///   completes and then copies its state (flattening),
/// - `()`: the continuation's task succeeds with `()`.
///
/// A continuation that panics faults its task with an
/// [`UncaughtException`](crate::UncaughtException) instead.
pub trait IntoOutcome {
    type Output: Send + Sync + 'static;

    /// Completes `source` from this value, now or later.
    fn settle(self, source: TaskSource<Self::Output>);
}

impl<T: Send + Sync + 'static> IntoOutcome for Result<T, Fault> {
    type Output = T;

    fn settle(self, source: TaskSource<T>) {
        match self {
            Ok(value) => source.complete_with_result(value),
            Err(fault) => source.complete_with_fault(fault),
        }
    }
}

impl<T: Send + Sync + 'static> IntoOutcome for Outcome<T> {
    type Output = T;

    fn settle(self, source: TaskSource<T>) {
        match self {
            Outcome::Succeeded(value) => source.complete_with_result(value),
            Outcome::Faulted(fault) => source.complete_with_fault(fault),
            Outcome::Cancelled => source.cancel(),
        }
    }
}

impl<T: Send + Sync + 'static> IntoOutcome for Task<T> {
    type Output = T;

    /// The inner task may itself be the result of a flattening continuation,
    /// so this chains through any number of levels.
    fn settle(self, source: TaskSource<T>) {
        self.register(
            default_executor(),
            Box::new(move |inner: Task<T>| source.copy_from(&inner)),
        );
    }
}

impl IntoOutcome for () {
    type Output = ();

    fn settle(self, source: TaskSource<()>) {
        source.complete_with_result(());
    }
}

/// Runs `f` and completes `source` from whatever it returns, capturing a
/// panic as an uncaught exception.
fn run_guarded<R: IntoOutcome>(source: TaskSource<R::Output>, f: impl FnOnce() -> R) {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(next) => next.settle(source),
        Err(payload) => {
            let fault = Fault::from_panic(payload);
            debug!(%fault, "continuation panicked");
            source.complete_with_fault(fault);
        }
    }
}

impl<T: Send + Sync + 'static> Task<T> {
    /// Runs `f` once this task completes in any state, using the default
    /// executor.
    ///
    /// Returns a task for whatever `f` returns (see [`IntoOutcome`]).
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let recovered = task.continue_with(|t| match t.fault() {
    ///     Some(_) => Ok(0),
    ///     None => Ok(*t.result().unwrap_or(&0)),
    /// });
    /// ```
    pub fn continue_with<F, R>(&self, f: F) -> Task<R::Output>
    where
        F: FnOnce(&Task<T>) -> R + Send + 'static,
        R: IntoOutcome,
    {
        self.continue_with_on(default_executor(), f)
    }

    /// Like [`continue_with`](Task::continue_with), running `f` through
    /// `executor`.
    pub fn continue_with_on<F, R>(&self, executor: Arc<dyn Executor>, f: F) -> Task<R::Output>
    where
        F: FnOnce(&Task<T>) -> R + Send + 'static,
        R: IntoOutcome,
    {
        let source = TaskSource::new();
        let task = source.task();

        self.register(
            executor,
            Box::new(move |antecedent: Task<T>| run_guarded(source, move || f(&antecedent))),
        );

        task
    }

    /// Runs `f` with the result once this task succeeds, using the default
    /// executor.
    ///
    /// If this task faults or is cancelled, `f` never runs and the returned
    /// task takes the same fault or cancellation.
    pub fn continue_with_success<F, R>(&self, f: F) -> Task<R::Output>
    where
        F: FnOnce(&T) -> R + Send + 'static,
        R: IntoOutcome,
    {
        self.continue_with_success_on(default_executor(), f)
    }

    pub fn continue_with_success_on<F, R>(
        &self,
        executor: Arc<dyn Executor>,
        f: F,
    ) -> Task<R::Output>
    where
        F: FnOnce(&T) -> R + Send + 'static,
        R: IntoOutcome,
    {
        let source = TaskSource::new();
        let task = source.task();

        self.register(
            executor,
            Box::new(move |antecedent: Task<T>| match antecedent.settlement() {
                Some(Settled::Succeeded(value)) => run_guarded(source, move || f(&**value)),
                Some(Settled::Faulted(fault)) => source.complete_with_fault(fault.clone()),
                Some(Settled::Cancelled) => source.cancel(),
                None => unreachable!("continuation dispatched before completion"),
            }),
        );

        task
    }

    /// Runs `work` through `executor` and returns a task for its outcome.
    ///
    /// `work` returns anything a continuation may return, so a task-returning
    /// job is flattened as well.
    pub fn from_executor<F, R>(executor: Arc<dyn Executor>, work: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
        R: IntoOutcome<Output = T>,
    {
        Task::from_result(()).continue_with_on(executor, move |_| work())
    }

    /// Returns a task that mirrors this task's terminal kind without its
    /// result.
    ///
    /// Useful to join tasks of different result types.
    pub fn ignore_result(&self) -> Task<()> {
        self.continue_with_success_on(immediate(), |_| ())
    }
}
