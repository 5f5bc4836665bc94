use ensue::{Fault, Task, TaskSource, join_all, join_all_collecting};
use std::sync::{Arc, Barrier};
use std::thread;

#[test]
fn test_join_all_empty_succeeds_immediately() {
    let joined = join_all(Vec::<Task<i32>>::new());

    assert!(joined.is_succeeded());
}

#[test]
fn test_join_all_collecting_empty_yields_empty_vec() {
    let joined = join_all_collecting(Vec::<Task<i32>>::new());

    assert_eq!(joined.result(), Some(&Vec::new()));
}

#[test]
fn test_join_all_waits_for_every_input() {
    let a: TaskSource<i32> = TaskSource::new();
    let b: TaskSource<i32> = TaskSource::new();

    let joined = join_all([a.task(), b.task()]);

    a.complete_with_result(1);
    assert!(!joined.is_completed());

    b.complete_with_result(2);
    assert!(joined.is_succeeded());
}

#[test]
fn test_join_all_single_fault_is_not_wrapped() {
    let joined = join_all([
        Task::from_result(1),
        Task::from_fault(Fault::error("db", 7)),
        Task::from_result(3),
    ]);

    assert_eq!(joined.fault(), Some(&Fault::error("db", 7)));
    assert!(!joined.fault().is_some_and(Fault::is_aggregate));
}

#[test]
fn test_join_all_faults_aggregate_in_input_order() {
    let first: TaskSource<()> = TaskSource::new();
    let second: TaskSource<()> = TaskSource::new();

    let joined = join_all([first.task(), second.task()]);

    second.complete_with_fault(Fault::error("e", 2));
    first.complete_with_fault(Fault::error("e", 1));

    let fault = joined.fault().expect("join should fault");
    assert!(fault.is_aggregate());
    assert_eq!(
        fault.inner_faults(),
        &[Fault::error("e", 1), Fault::error("e", 2)]
    );
}

#[test]
fn test_join_all_cancelled_without_faults_is_cancelled() {
    let joined = join_all([Task::from_result(1), Task::cancelled(), Task::from_result(2)]);

    assert!(joined.is_cancelled());
}

#[test]
fn test_join_all_fault_wins_over_cancellation() {
    let joined = join_all([
        Task::<i32>::cancelled(),
        Task::from_fault(Fault::exception("crash")),
    ]);

    assert_eq!(joined.fault(), Some(&Fault::exception("crash")));
}

#[test]
fn test_join_all_collecting_keeps_input_order() {
    let sources: Vec<TaskSource<i32>> = (0..3).map(|_| TaskSource::new()).collect();

    let joined = join_all_collecting(sources.iter().map(TaskSource::task));

    sources[2].complete_with_result(3);
    sources[0].complete_with_result(1);
    assert!(!joined.is_completed());
    sources[1].complete_with_result(2);

    assert_eq!(joined.result(), Some(&vec![1, 2, 3]));
}

#[test]
fn test_join_all_collecting_faults_like_join_all() {
    let joined = join_all_collecting([
        Task::from_result(String::from("ok")),
        Task::from_fault(Fault::error("x", 1)),
        Task::from_fault(Fault::error("x", 2)),
    ]);

    assert_eq!(
        joined.fault(),
        Some(&Fault::Aggregate(vec![
            Fault::error("x", 1),
            Fault::error("x", 2)
        ]))
    );
}

#[test]
fn test_join_all_with_concurrent_completion() {
    const INPUTS: usize = 32;

    for _ in 0..20 {
        let sources: Vec<TaskSource<usize>> = (0..INPUTS).map(|_| TaskSource::new()).collect();
        let joined = join_all_collecting(sources.iter().map(TaskSource::task));
        let barrier = Arc::new(Barrier::new(INPUTS));

        let handles: Vec<_> = sources
            .into_iter()
            .enumerate()
            .map(|(i, source)| {
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    source.complete_with_result(i);
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        joined.wait_until_finished();
        assert_eq!(joined.result(), Some(&(0..INPUTS).collect::<Vec<_>>()));
    }
}

#[test]
fn test_join_all_result_can_be_continued() {
    let joined = join_all([Task::from_result(()), Task::from_result(())])
        .continue_with(|t| Ok::<_, Fault>(t.is_succeeded()));

    assert_eq!(joined.result(), Some(&true));
}
