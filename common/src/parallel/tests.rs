use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};

use rand::Rng;

use super::*;

fn pool(workers: usize) -> WorkerPool {
    WorkerPool::with_workers(NonZeroUsize::new(workers).unwrap())
}

#[derive(Debug, PartialEq)]
enum TaskError {
    Pool,
    Bad(i32),
}

impl From<PoolError> for TaskError {
    fn from(_: PoolError) -> Self {
        TaskError::Pool
    }
}

#[test]
fn test_map_basic() {
    let items: Vec<i32> = (0..10).collect();
    let result = pool(3).map(&items, |&x| x * 2).unwrap();
    assert_eq!(result, vec![0, 2, 4, 6, 8, 10, 12, 14, 16, 18]);
}

#[test]
fn test_map_preserves_order_with_uneven_task_durations() {
    let items: Vec<u64> = (0..64).collect();
    let result = pool(8)
        .map(&items, |&x| {
            // Early tasks sleep longest so they finish last.
            std::thread::sleep(std::time::Duration::from_micros((64 - x) * 50));
            x
        })
        .unwrap();
    assert_eq!(result, items);
}

#[test]
fn test_single_and_many_workers_agree() {
    let mut rng = rand::rng();
    let items: Vec<f64> = (0..500).map(|_| rng.random_range(-100.0..100.0)).collect();
    let f = |x: &f64| (x * 1.5).sin() + x.abs().sqrt();

    let serial = pool(1).map(&items, f).unwrap();
    let parallel = pool(7).map(&items, f).unwrap();
    let auto = WorkerPool::auto().map(&items, f).unwrap();

    assert_eq!(serial, parallel);
    assert_eq!(serial, auto);
    for (i, item) in items.iter().enumerate() {
        assert_eq!(serial[i], f(item));
    }
}

#[test]
fn test_map_empty() {
    let items: Vec<i32> = vec![];
    let result = pool(4).map(&items, |&x| x).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_concurrency_is_bounded_by_workers() {
    let items: Vec<i32> = (0..24).collect();
    let in_flight = AtomicUsize::new(0);
    let max_observed = AtomicUsize::new(0);

    pool(3)
        .map(&items, |&x| {
            let current = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_observed.fetch_max(current, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(2));
            in_flight.fetch_sub(1, Ordering::SeqCst);
            x
        })
        .unwrap();

    let max = max_observed.load(Ordering::SeqCst);
    assert!(max <= 3, "max in-flight was {max}, expected <= 3");
}

#[test]
fn test_try_map_ok() {
    let items: Vec<i32> = (0..10).collect();
    let result: Result<Vec<i32>, TaskError> = pool(3).try_map(&items, |&x| Ok(x + 1));
    assert_eq!(result.unwrap(), (1..11).collect::<Vec<_>>());
}

#[test]
fn test_try_map_error_fails_batch() {
    let items: Vec<i32> = (0..100).collect();
    let result: Result<Vec<i32>, TaskError> = pool(4).try_map(&items, |&x| {
        if x == 57 {
            Err(TaskError::Bad(x))
        } else {
            Ok(x)
        }
    });
    assert_eq!(result, Err(TaskError::Bad(57)));
}

#[test]
fn test_try_map_several_failures_return_one_of_them() {
    let items: Vec<i32> = (0..200).collect();
    for _ in 0..10 {
        let result: Result<Vec<i32>, TaskError> = pool(4).try_map(&items, |&x| {
            if x % 50 == 7 {
                Err(TaskError::Bad(x))
            } else {
                Ok(x)
            }
        });
        match result {
            Err(TaskError::Bad(x)) => assert_eq!(x % 50, 7, "error from task {x}"),
            other => panic!("expected a task error, got {other:?}"),
        }
    }
}

#[test]
fn test_from_override() {
    assert_eq!(WorkerPool::from_override(NonZeroUsize::new(5)).workers(), 5);
    assert!(WorkerPool::from_override(None).workers() >= 1);
}
