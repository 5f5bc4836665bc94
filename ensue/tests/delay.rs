use ensue::executor::{Delayed, Executor, immediate};
use ensue::time::{ManualTimer, Timer, TimerThread};
use ensue::{Fault, Task, after_delay, after_delay_millis, after_delay_with};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::{Duration, Instant};

#[test]
fn test_after_delay_not_completed_before_deadline() {
    let timer = Arc::new(ManualTimer::new());
    let delay = after_delay_with(timer.clone(), Duration::from_millis(100));

    assert!(!delay.is_completed());

    timer.advance(Duration::from_millis(99));
    assert!(!delay.is_completed());
    assert_eq!(timer.elapsed(), Duration::from_millis(99));

    timer.advance(Duration::from_millis(1));
    assert!(delay.is_succeeded());
    assert_eq!(delay.result(), Some(&()));
}

#[test]
fn test_manual_timer_zero_delay_waits_for_advance() {
    let timer = Arc::new(ManualTimer::new());
    let delay = after_delay_with(timer.clone(), Duration::ZERO);

    assert!(!delay.is_completed());
    assert_eq!(timer.pending(), 1);

    timer.advance(Duration::ZERO);

    assert!(delay.is_completed());
    assert_eq!(timer.pending(), 0);
}

#[test]
fn test_manual_timer_fires_in_deadline_order() {
    let timer = ManualTimer::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for (label, millis) in [("c", 30), ("a", 10), ("b", 20), ("a2", 10)] {
        let order = order.clone();
        timer.schedule(
            Duration::from_millis(millis),
            Box::new(move || order.lock().unwrap().push(label)),
        );
    }

    timer.advance(Duration::from_millis(25));
    assert_eq!(*order.lock().unwrap(), vec!["a", "a2", "b"]);
    assert_eq!(timer.pending(), 1);

    timer.advance(Duration::from_millis(5));
    assert_eq!(*order.lock().unwrap(), vec!["a", "a2", "b", "c"]);
}

#[test]
fn test_delay_continuation_runs_after_fire() {
    let timer = Arc::new(ManualTimer::new());

    let next = after_delay_with(timer.clone(), Duration::from_secs(5))
        .continue_with(|_| Ok::<_, Fault>("woke"));

    timer.advance(Duration::from_secs(4));
    assert!(!next.is_completed());

    timer.advance(Duration::from_secs(1));
    assert_eq!(next.result(), Some(&"woke"));
}

#[test]
fn test_after_delay_real_lower_bound() {
    let started = Instant::now();
    let delay = after_delay(Duration::from_millis(50));

    assert!(!delay.is_completed());

    delay.wait_until_finished();

    assert!(delay.is_succeeded());
    assert!(started.elapsed() >= Duration::from_millis(50));
}

#[test]
fn test_after_delay_millis() {
    let started = Instant::now();
    let delay = after_delay_millis(20);

    delay.wait_until_finished();

    assert!(started.elapsed() >= Duration::from_millis(20));
}

#[test]
fn test_delayed_executor_with_manual_timer() {
    let timer = Arc::new(ManualTimer::new());
    let executor: Arc<dyn Executor> = Arc::new(
        Delayed::new(Duration::from_millis(30))
            .with_timer(timer.clone())
            .on(immediate()),
    );

    let next = Task::from_result(4).continue_with_on(executor, |t| {
        Ok::<_, Fault>(t.result().copied().unwrap_or_default() + 1)
    });

    assert!(!next.is_completed());

    timer.advance(Duration::from_millis(30));

    assert_eq!(next.result(), Some(&5));
}

#[test]
fn test_timer_thread_dispatches_on_given_executor() {
    let dispatched = Arc::new(AtomicUsize::new(0));
    let d = dispatched.clone();

    let dispatch: Arc<dyn Executor> = Arc::new(move |job: ensue::executor::Job| {
        d.fetch_add(1, Ordering::SeqCst);
        job();
    });

    let timer = TimerThread::with_dispatcher(dispatch).expect("timer thread should start");
    let (tx, rx) = mpsc::channel();
    let started = Instant::now();

    timer.schedule(
        Duration::from_millis(30),
        Box::new(move || tx.send(started.elapsed()).unwrap()),
    );

    let elapsed = rx
        .recv_timeout(Duration::from_secs(5))
        .expect("timer should fire");

    assert!(elapsed >= Duration::from_millis(30));
    assert_eq!(dispatched.load(Ordering::SeqCst), 1);
    assert_eq!(timer.pending(), 0);
}

#[test]
fn test_timer_thread_drop_discards_pending_jobs() {
    let fired = Arc::new(AtomicUsize::new(0));

    {
        let timer = TimerThread::with_dispatcher(immediate()).expect("timer thread should start");
        let fired = fired.clone();
        timer.schedule(
            Duration::from_secs(60),
            Box::new(move || {
                fired.fetch_add(1, Ordering::SeqCst);
            }),
        );
        assert_eq!(timer.pending(), 1);
    }

    assert_eq!(fired.load(Ordering::SeqCst), 0);
}
