use ensue::{Fault, Task, TaskSource, join};

#[test]
fn test_join_no_tasks() {
    let joined = join!();

    assert!(joined.is_succeeded());
    assert_eq!(joined.result(), Some(&()));
}

#[test]
fn test_join_single_task() {
    let joined = join!(Task::from_result(42));

    assert_eq!(joined.result(), Some(&(42,)));
}

#[test]
fn test_join_different_types() {
    let joined = join!(
        Task::from_result(100i32),
        Task::from_result(String::from("test")),
        Task::from_result(vec![1, 2, 3])
    );

    let (num, text, v) = joined.result().cloned().expect("join should succeed");
    assert_eq!(num, 100);
    assert_eq!(text, "test");
    assert_eq!(v, vec![1, 2, 3]);
}

#[test]
fn test_join_with_trailing_comma() {
    let joined = join!(Task::from_result(1), Task::from_result(2),);

    assert_eq!(joined.result(), Some(&(1, 2)));
}

#[test]
fn test_join_waits_for_pending_tasks() {
    let a: TaskSource<u8> = TaskSource::new();
    let b: TaskSource<&str> = TaskSource::new();

    let joined = join!(a.task(), b.task());

    b.complete_with_result("b");
    assert!(!joined.is_completed());

    a.complete_with_result(1);
    assert_eq!(joined.result(), Some(&(1, "b")));
}

#[test]
fn test_join_reports_fault() {
    let joined = join!(
        Task::from_result(1),
        Task::<String>::from_fault(Fault::error("macro", 3))
    );

    assert_eq!(joined.fault(), Some(&Fault::error("macro", 3)));
}

#[test]
fn test_join_reports_cancellation() {
    let joined = join!(Task::<u8>::cancelled(), Task::from_result(true));

    assert!(joined.is_cancelled());
}

#[test]
fn test_join_nested_call_arguments() {
    fn make(a: i32, b: i32) -> Task<i32> {
        Task::from_result(a + b)
    }

    let joined = join!(make(1, 2), make(3, 4));

    assert_eq!(joined.result(), Some(&(3, 7)));
}
