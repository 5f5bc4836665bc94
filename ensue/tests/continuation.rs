use ensue::executor::{Executor, immediate};
use ensue::{Fault, Outcome, StructuredError, Task, TaskSource, UncaughtException};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

#[test]
fn test_continue_with_receives_antecedent() {
    let task = Task::from_result(20);

    let next = task.continue_with(|t| Ok::<_, Fault>(t.result().copied().unwrap_or(0) + 1));

    assert_eq!(next.result(), Some(&21));
}

#[test]
fn test_continue_with_runs_after_later_completion() {
    let source: TaskSource<String> = TaskSource::new();
    let next = source
        .task()
        .continue_with(|t| Ok::<_, Fault>(t.result().map(|s: &String| s.len())));

    assert!(!next.is_completed());

    source.complete_with_result(String::from("four"));

    assert_eq!(next.result(), Some(&Some(4)));
}

#[test]
fn test_continue_with_on_fault_can_recover() {
    let task: Task<i32> = Task::from_fault(Fault::error("disk", 5));

    let recovered = task.continue_with(|t| {
        assert!(t.is_faulted());
        Ok::<_, Fault>(-1)
    });

    assert!(recovered.is_succeeded());
    assert_eq!(recovered.result(), Some(&-1));
}

#[test]
fn test_continue_with_runs_for_cancelled_antecedent() {
    let task: Task<i32> = Task::cancelled();

    let seen = task.continue_with(|t| Ok::<_, Fault>(t.is_cancelled()));

    assert_eq!(seen.result(), Some(&true));
}

#[test]
fn test_continue_with_err_faults_result_task() {
    let task = Task::from_result(1);

    let next: Task<i32> = task.continue_with(|_| Err(Fault::error("parse", 2)));

    assert_eq!(next.fault(), Some(&Fault::error("parse", 2)));
}

#[test]
fn test_continue_with_outcome_can_cancel() {
    let task = Task::from_result(1);

    let next = task.continue_with(|_| Outcome::<i32>::Cancelled);

    assert!(next.is_cancelled());
}

#[test]
fn test_continue_with_unit_succeeds() {
    let counter = Arc::new(AtomicUsize::new(0));
    let c = counter.clone();

    let next = Task::from_result(1).continue_with(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });

    assert!(next.is_succeeded());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn test_panicking_continuation_faults_with_exception() {
    let task = Task::from_result(1);

    let next = task.continue_with(|_| -> Result<i32, Fault> { panic!("boom") });

    assert!(next.is_faulted());
    match next.fault() {
        Some(Fault::Exception(UncaughtException { reason, .. })) => assert_eq!(reason, "boom"),
        other => panic!("expected an uncaught exception, got {other:?}"),
    }
}

#[test]
fn test_success_continuation_skipped_on_fault() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();
    let fault = Fault::from(StructuredError::new("auth", 401).with_info("user", "alice"));

    let task: Task<i32> = Task::from_fault(fault.clone());
    let next = task.continue_with_success(move |v| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Fault>(*v)
    });

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(next.fault(), Some(&fault));
}

#[test]
fn test_success_continuation_copies_cancellation() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c = calls.clone();

    let next = Task::<i32>::cancelled().continue_with_success(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
        Ok::<_, Fault>(0)
    });

    assert!(next.is_cancelled());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_success_continuation_receives_value() {
    let next = Task::from_result(vec![1, 2, 3])
        .continue_with_success(|v: &Vec<i32>| Ok::<_, Fault>(v.iter().sum::<i32>()));

    assert_eq!(next.result(), Some(&6));
}

#[test]
fn test_success_continuation_panic_becomes_exception() {
    let next =
        Task::from_result(0).continue_with_success(|_| -> Result<(), Fault> { panic!("bad input") });

    assert!(next.fault().is_some_and(Fault::is_exception));
}

#[test]
fn test_chain_of_success_continuations() {
    let source: TaskSource<i32> = TaskSource::new();

    let last = source
        .task()
        .continue_with_success(|v: &i32| Ok::<_, Fault>(v * 2))
        .continue_with_success(|v: &i32| Ok::<_, Fault>(v + 3))
        .continue_with_success(|v: &i32| Ok::<_, Fault>(v.to_string()));

    source.complete_with_result(5);

    assert_eq!(last.result().map(String::as_str), Some("13"));
}

#[test]
fn test_fault_propagates_through_chain_unchanged() {
    let source: TaskSource<i32> = TaskSource::new();

    let last = source
        .task()
        .continue_with_success(|v| Ok::<_, Fault>(v + 1))
        .continue_with_success(|v| Ok::<_, Fault>(v + 1));

    source.complete_with_fault(Fault::exception_with_detail("io", "socket closed"));

    assert_eq!(
        last.fault(),
        Some(&Fault::exception_with_detail("io", "socket closed"))
    );
}

#[test]
fn test_registration_order_is_kept_for_queued_continuations() {
    let source: TaskSource<()> = TaskSource::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..5 {
        let order = order.clone();
        source
            .task()
            .continue_with_on(immediate(), move |_| order.lock().unwrap().push(i));
    }

    source.complete_with_result(());

    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_continuation_registered_after_completion_runs_once() {
    let task = Task::from_result(());
    let calls = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let calls = calls.clone();
        task.continue_with(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
        });
    }

    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_concurrent_registration_runs_each_exactly_once() {
    const THREADS: usize = 16;

    for _ in 0..20 {
        let source: TaskSource<usize> = TaskSource::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(THREADS + 1));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let task = source.task();
                let calls = calls.clone();
                let barrier = barrier.clone();

                thread::spawn(move || {
                    barrier.wait();
                    task.continue_with_on(immediate(), move |_| {
                        calls.fetch_add(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();

        barrier.wait();
        source.complete_with_result(1);

        let results: Vec<Task<()>> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(calls.load(Ordering::SeqCst), THREADS);
        assert!(results.iter().all(Task::is_succeeded));
    }
}

#[test]
fn test_custom_closure_executor_is_used() {
    let dispatched = Arc::new(AtomicUsize::new(0));
    let d = dispatched.clone();

    let executor: Arc<dyn Executor> = Arc::new(move |job: ensue::executor::Job| {
        d.fetch_add(1, Ordering::SeqCst);
        job();
    });

    let next = Task::from_result(2).continue_with_on(executor, |t| {
        Ok::<_, Fault>(t.result().copied().unwrap_or_default() * 10)
    });

    assert_eq!(dispatched.load(Ordering::SeqCst), 1);
    assert_eq!(next.result(), Some(&20));
}

#[test]
fn test_long_inline_chain_completes() {
    let source: TaskSource<u32> = TaskSource::new();
    let mut last = source.task();

    for _ in 0..200 {
        last = last.continue_with_success(|v: &u32| Ok::<_, Fault>(v + 1));
    }

    source.complete_with_result(0);
    last.wait_until_finished();

    assert_eq!(last.result(), Some(&200));
}

#[test]
fn test_from_executor_runs_work() {
    let task = Task::from_executor(immediate(), || Ok::<_, Fault>("computed"));

    assert_eq!(task.result(), Some(&"computed"));
}

#[test]
fn test_from_executor_captures_panic() {
    let task: Task<u8> = Task::from_executor(immediate(), || -> Result<u8, Fault> {
        panic!("worker failed")
    });

    assert!(task.fault().is_some_and(Fault::is_exception));
}

#[test]
fn test_ignore_result_mirrors_terminal_kind() {
    assert!(Task::from_result(5).ignore_result().is_succeeded());
    assert!(
        Task::<i32>::from_fault(Fault::error("x", 1))
            .ignore_result()
            .is_faulted()
    );
    assert!(Task::<i32>::cancelled().ignore_result().is_cancelled());
}
