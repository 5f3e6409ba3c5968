//! SyncCell Concurrency Tests
//!
//! Tests for blocking behavior:
//! - write_ef blocks while full
//! - read_fe / read_ff / write_ff block while empty
//! - hand-off delivers each value exactly once
//! - broadcast wakes every eligible waiter

use crate::*;
use rand::Rng;
use std::collections::HashSet;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

/// write_ef on a full cell does not return until the cell is emptied
#[test]
fn test_sync_write_ef_blocks_while_full() {
    let cell = Arc::new(SyncCell::new());
    cell.write_ef(1u32);

    let writer = {
        let cell = Arc::clone(&cell);
        spawn_blocked(move || cell.write_ef(2))
    };

    assert_eq!(cell.read_fe().unwrap(), 1);
    writer.join().unwrap();
    assert_eq!(cell.read_fe().unwrap(), 2);
}

/// read_fe on an empty cell waits for a writer
#[test]
fn test_sync_read_fe_blocks_while_empty() {
    let cell = Arc::new(SyncCell::<u32>::new());

    let reader = {
        let cell = Arc::clone(&cell);
        spawn_blocked(move || cell.read_fe().unwrap())
    };

    cell.write_ef(77);
    assert_eq!(reader.join().unwrap(), 77);
    assert!(!cell.is_full(false));
}

/// write_ff waits for a full cell
#[test]
fn test_sync_write_ff_blocks_while_empty() {
    let cell = Arc::new(SyncCell::<u32>::new());

    let writer = {
        let cell = Arc::clone(&cell);
        spawn_blocked(move || cell.write_ff(3))
    };

    cell.write_ef(1);
    writer.join().unwrap();
    assert_eq!(cell.read_ff().unwrap(), 3);
}

/// Many read_ff callers waiting on the same cell all wake on one write
#[test]
fn test_sync_read_ff_broadcast() {
    const NUM_READERS: usize = 8;

    let cell = Arc::new(SyncCell::<u64>::new());
    let readers: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let cell = Arc::clone(&cell);
            thread::spawn(move || cell.read_ff().unwrap())
        })
        .collect();

    thread::sleep(BLOCK_PROBE);
    cell.write_ef(99);

    for r in readers {
        assert_eq!(r.join().unwrap(), 99);
    }
    assert!(cell.is_full(false));
}

/// After one write_ef, concurrent read_ff calls never block
#[test]
fn test_sync_concurrent_read_ff_on_full() {
    const NUM_READERS: usize = 10;
    const READS_PER_THREAD: usize = 100;

    let cell = Arc::new(SyncCell::new());
    cell.write_ef(42i64);

    let barrier = Arc::new(Barrier::new(NUM_READERS));
    let handles: Vec<_> = (0..NUM_READERS)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..READS_PER_THREAD {
                    assert_eq!(cell.read_ff().unwrap(), 42);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }
    assert!(cell.is_full(false));
}

/// Producers and consumers hand off every value exactly once
#[test]
fn test_sync_hand_off_exactly_once() {
    const NUM_PRODUCERS: usize = 4;
    const NUM_CONSUMERS: usize = 4;
    const PER_PRODUCER: usize = 50;

    init_tracing();
    let cell = Arc::new(SyncCell::<usize>::new());
    let barrier = Arc::new(Barrier::new(NUM_PRODUCERS + NUM_CONSUMERS));

    let producers: Vec<_> = (0..NUM_PRODUCERS)
        .map(|p| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut rng = rand::thread_rng();
                for i in 0..PER_PRODUCER {
                    if rng.gen_bool(0.1) {
                        thread::sleep(Duration::from_micros(rng.gen_range(0..200)));
                    }
                    cell.write_ef(p * PER_PRODUCER + i);
                }
            })
        })
        .collect();

    let per_consumer = NUM_PRODUCERS * PER_PRODUCER / NUM_CONSUMERS;
    let consumers: Vec<_> = (0..NUM_CONSUMERS)
        .map(|_| {
            let cell = Arc::clone(&cell);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                (0..per_consumer)
                    .map(|_| cell.read_fe().unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for p in producers {
        p.join().unwrap();
    }

    let mut seen = HashSet::new();
    for c in consumers {
        for v in c.join().unwrap() {
            assert!(seen.insert(v), "value {} consumed twice", v);
        }
    }
    assert_eq!(seen.len(), NUM_PRODUCERS * PER_PRODUCER);
    assert!(!cell.is_full(false));
}

/// Several blocked writers each get a turn as a reader drains the cell
#[test]
fn test_sync_blocked_writers_drain_in_turn() {
    const NUM_WRITERS: u32 = 5;

    let cell = Arc::new(SyncCell::new());
    cell.write_ef(0u32);

    let writers: Vec<_> = (1..=NUM_WRITERS)
        .map(|i| {
            let cell = Arc::clone(&cell);
            thread::spawn(move || cell.write_ef(i))
        })
        .collect();

    let mut drained = vec![cell.read_fe().unwrap()];
    for _ in 0..NUM_WRITERS {
        drained.push(cell.read_fe().unwrap());
    }
    for w in writers {
        w.join().unwrap();
    }

    drained.sort_unstable();
    assert_eq!(drained, (0..=NUM_WRITERS).collect::<Vec<_>>());
}

/// write_xf wakes a reader blocked on an empty cell
#[test]
fn test_sync_write_xf_wakes_reader() {
    let cell = Arc::new(SyncCell::<u8>::new());

    let reader = {
        let cell = Arc::clone(&cell);
        spawn_blocked(move || cell.read_ff().unwrap())
    };

    cell.write_xf(4);
    assert_eq!(reader.join().unwrap(), 4);
}
