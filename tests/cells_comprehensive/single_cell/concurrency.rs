//! SingleCell Concurrency Tests
//!
//! Tests for thread safety:
//! - readers blocked before assignment
//! - racing writers
//! - visibility of the value through the lock-free fast path

use crate::*;
use std::sync::{Arc, Barrier};
use std::thread;

/// A reader that arrives before the write blocks until it happens
#[test]
fn test_single_read_blocks_until_assigned() {
    let cell = Arc::new(SingleCell::<String>::new());

    let reader = {
        let cell = Arc::clone(&cell);
        spawn_blocked(move || cell.read_ff().unwrap())
    };

    cell.write_ef("done".to_string()).unwrap();
    assert_eq!(reader.join().unwrap(), "done");
}

/// Every blocked reader wakes with the assigned value
#[test]
fn test_single_all_blocked_readers_wake() {
    const NUM_READERS: usize = 8;

    let cell = Arc::new(SingleCell::<u32>::new());
    let readers: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let cell = Arc::clone(&cell);
            thread::spawn(move || cell.read_ff().unwrap())
        })
        .collect();

    thread::sleep(BLOCK_PROBE);
    cell.write_ef(5).unwrap();

    for r in readers {
        assert_eq!(r.join().unwrap(), 5);
    }
}

/// Exactly one of many racing writers succeeds
#[test]
fn test_single_racing_writers_one_wins() {
    const NUM_WRITERS: usize = 10;

    let (reporter, config) = RecordingReporter::install();
    let cell = Arc::new(SingleCell::<usize>::with_config(config));
    let barrier = Arc::new(Barrier::new(NUM_WRITERS));

    let writers: Vec<_> = (0..NUM_WRITERS)
        .map(|i| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cell.write_ef(i).is_ok().then_some(i)
            })
        })
        .collect();

    let winners: Vec<_> = writers
        .into_iter()
        .filter_map(|w| w.join().unwrap())
        .collect();

    assert_eq!(winners.len(), 1);
    assert_eq!(cell.read_ff().unwrap(), winners[0]);
    assert_eq!(reporter.errors().len(), NUM_WRITERS - 1);
    assert!(reporter.errors().iter().all(|e| e.is_protocol_violation()));
}

/// Readers spinning on the fast path always see the complete value
#[test]
fn test_single_fast_path_sees_complete_value() {
    const NUM_READERS: usize = 4;
    const ROUNDS: usize = 50;

    for _ in 0..ROUNDS {
        let cell = Arc::new(SingleCell::<Vec<u64>>::new());
        let barrier = Arc::new(Barrier::new(NUM_READERS + 1));

        let readers: Vec<_> = (0..NUM_READERS)
            .map(|_| {
                let cell = Arc::clone(&cell);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    loop {
                        if let Some(v) = cell.peek() {
                            return v;
                        }
                        std::hint::spin_loop();
                    }
                })
            })
            .collect();

        barrier.wait();
        cell.write_ef((0..256).collect()).unwrap();

        for r in readers {
            let v = r.join().unwrap();
            assert_eq!(v.len(), 256);
            assert_eq!(v[255], 255);
        }
    }
}

/// Mixed fast-path and blocking readers agree on the value
#[test]
fn test_single_mixed_readers_agree() {
    const NUM_READERS: usize = 6;

    let cell = Arc::new(SingleCell::<String>::new());
    let barrier = Arc::new(Barrier::new(NUM_READERS + 1));

    let readers: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cell.read_ff().unwrap()
            })
        })
        .collect();

    barrier.wait();
    cell.write_ef("shared".to_string()).unwrap();

    for r in readers {
        assert_eq!(r.join().unwrap(), "shared");
    }
}
