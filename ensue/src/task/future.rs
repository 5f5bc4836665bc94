use super::Task;
use crate::executor::immediate;

use parking_lot::Mutex;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

/// A future resolving to a task once it has completed.
///
/// Lets a task be awaited from any async runtime. The future resolves to
/// the terminal task itself; inspect it with the usual accessors.
///
/// Dropping the future does **not** cancel the task.
pub struct Finished<T> {
    task: Task<T>,

    /// Waker of the last poll, shared with the continuation that wakes it.
    waker: Option<Arc<Mutex<Waker>>>,
}

impl<T: Send + Sync + 'static> Task<T> {
    /// Returns a future that resolves once this task has completed.
    pub fn finished(&self) -> Finished<T> {
        Finished {
            task: self.clone(),
            waker: None,
        }
    }
}

impl<T: Send + Sync + 'static> IntoFuture for Task<T> {
    type Output = Task<T>;
    type IntoFuture = Finished<T>;

    fn into_future(self) -> Finished<T> {
        Finished {
            task: self,
            waker: None,
        }
    }
}

impl<T: Send + Sync + 'static> Future for Finished<T> {
    type Output = Task<T>;

    /// The continuation is registered only once; later polls just refresh
    /// the stored waker. The task state is re-checked after registering to
    /// avoid missed wake-ups.
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Task<T>> {
        let this = self.get_mut();

        if this.task.is_completed() {
            return Poll::Ready(this.task.clone());
        }

        match &this.waker {
            Some(slot) => {
                let mut stored = slot.lock();
                if !stored.will_wake(cx.waker()) {
                    *stored = cx.waker().clone();
                }
            }
            None => {
                let slot = Arc::new(Mutex::new(cx.waker().clone()));
                let wake = slot.clone();

                this.task.register(
                    immediate(),
                    Box::new(move |_: Task<T>| {
                        let waker = wake.lock().clone();
                        waker.wake();
                    }),
                );

                this.waker = Some(slot);
            }
        }

        if this.task.is_completed() {
            return Poll::Ready(this.task.clone());
        }

        Poll::Pending
    }
}
