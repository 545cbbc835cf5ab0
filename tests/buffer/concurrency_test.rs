/*!
 * Buffer Concurrency Tests
 * Blocking, ordering and conservation under real threads
 */

use bounded_handoff::core::sync::{BoundedBuffer, CancellationToken, HandoffBuffer, StrategyType};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

fn shared<T: Send>(strategy: StrategyType, capacity: usize) -> Arc<HandoffBuffer<T>> {
    Arc::new(HandoffBuffer::with_capacity(strategy, capacity).unwrap())
}

#[test]
fn test_put_blocks_while_full() {
    for strategy in StrategyType::ALL {
        let buffer = shared(strategy, 2);
        let token = CancellationToken::never();
        buffer.put(1, &token).unwrap();
        buffer.put(2, &token).unwrap();

        let returned = Arc::new(AtomicBool::new(false));
        let buffer_clone = buffer.clone();
        let returned_clone = returned.clone();
        let handle = thread::spawn(move || {
            buffer_clone.put(3, &CancellationToken::never()).unwrap();
            returned_clone.store(true, Ordering::SeqCst);
        });

        thread::sleep(Duration::from_millis(60));
        assert!(!returned.load(Ordering::SeqCst), "{}: put returned while full", strategy);
        assert_eq!(buffer.size(), 2);

        assert_eq!(buffer.take(&token).unwrap(), 1);
        handle.join().unwrap();
        assert!(returned.load(Ordering::SeqCst));

        assert_eq!(buffer.take(&token).unwrap(), 2);
        assert_eq!(buffer.take(&token).unwrap(), 3);
    }
}

#[test]
fn test_take_blocks_while_empty() {
    for strategy in StrategyType::ALL {
        let buffer = shared::<u32>(strategy, 2);

        let buffer_clone = buffer.clone();
        let handle = thread::spawn(move || {
            let start = Instant::now();
            let item = buffer_clone.take(&CancellationToken::never()).unwrap();
            (item, start.elapsed())
        });

        thread::sleep(Duration::from_millis(60));
        assert!(!handle.is_finished(), "{}: take returned while empty", strategy);

        buffer.put(42, &CancellationToken::never()).unwrap();
        let (item, waited) = handle.join().unwrap();
        assert_eq!(item, 42);
        assert!(waited >= Duration::from_millis(50));
    }
}

#[test]
fn test_two_by_two_scenario() {
    // Capacity 5, 2 producers x 5 items, 2 consumers x 5 items
    for strategy in StrategyType::ALL {
        let buffer = shared::<u64>(strategy, 5);
        let taken = Arc::new(AtomicUsize::new(0));

        let producers: Vec<_> = (1..=2u64)
            .map(|id| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    let token = CancellationToken::never();
                    for seq in 1..=5 {
                        buffer.put(id * 1000 + seq, &token).unwrap();
                    }
                })
            })
            .collect();

        let consumers: Vec<_> = (0..2)
            .map(|_| {
                let buffer = buffer.clone();
                let taken = taken.clone();
                thread::spawn(move || {
                    let token = CancellationToken::never();
                    for _ in 0..5 {
                        buffer.take(&token).unwrap();
                        taken.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();

        for handle in producers.into_iter().chain(consumers) {
            handle.join().unwrap();
        }

        assert_eq!(buffer.size(), 0, "{}", strategy);
        assert_eq!(taken.load(Ordering::SeqCst), 10);
    }
}

#[test]
fn test_no_loss_no_duplication_under_contention() {
    const PRODUCERS: u64 = 4;
    const CONSUMERS: usize = 4;
    const PER_PRODUCER: u64 = 500;

    for strategy in StrategyType::ALL {
        let buffer = shared::<u64>(strategy, 3);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let producers: Vec<_> = (0..PRODUCERS)
            .map(|id| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    let token = CancellationToken::never();
                    for seq in 0..PER_PRODUCER {
                        buffer.put(id * PER_PRODUCER + seq, &token).unwrap();
                    }
                })
            })
            .collect();

        let per_consumer = (PRODUCERS * PER_PRODUCER) as usize / CONSUMERS;
        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let buffer = buffer.clone();
                let seen = seen.clone();
                thread::spawn(move || {
                    let token = CancellationToken::never();
                    let mut local = Vec::with_capacity(per_consumer);
                    for _ in 0..per_consumer {
                        local.push(buffer.take(&token).unwrap());
                        assert!(buffer.size() <= buffer.capacity());
                    }
                    seen.lock().extend(local);
                })
            })
            .collect();

        for handle in producers.into_iter().chain(consumers) {
            handle.join().unwrap();
        }

        let mut values = seen.lock().clone();
        values.sort_unstable();
        let expected: Vec<u64> = (0..PRODUCERS * PER_PRODUCER).collect();
        assert_eq!(values, expected, "{}", strategy);
        assert!(buffer.is_empty());

        let stats = buffer.stats();
        assert_eq!(stats.total_put, stats.total_taken);
    }
}

#[test]
fn test_per_producer_order_preserved() {
    // Single consumer: each producer's items must come out in its own order
    for strategy in StrategyType::ALL {
        let buffer = shared::<(u32, u32)>(strategy, 2);

        let producers: Vec<_> = (0..3u32)
            .map(|id| {
                let buffer = buffer.clone();
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(u64::from(id));
                    let token = CancellationToken::never();
                    for seq in 0..100 {
                        if rng.gen_bool(0.1) {
                            thread::yield_now();
                        }
                        buffer.put((id, seq), &token).unwrap();
                    }
                })
            })
            .collect();

        let token = CancellationToken::never();
        let mut last: HashMap<u32, u32> = HashMap::new();
        for _ in 0..300 {
            let (id, seq) = buffer.take(&token).unwrap();
            if let Some(prev) = last.insert(id, seq) {
                assert!(seq > prev, "{}: producer {} went {} -> {}", strategy, id, prev, seq);
            }
        }

        for handle in producers {
            handle.join().unwrap();
        }
        assert_eq!(last.len(), 3);
        assert!(last.values().all(|&seq| seq == 99));
    }
}

#[test]
fn test_many_blocked_consumers_all_released() {
    // Broadcast wake must not strand any waiter
    for strategy in StrategyType::ALL {
        let buffer = shared::<u32>(strategy, 1);

        let consumers: Vec<_> = (0..6)
            .map(|_| {
                let buffer = buffer.clone();
                thread::spawn(move || buffer.take(&CancellationToken::never()).unwrap())
            })
            .collect();

        thread::sleep(Duration::from_millis(30));
        let token = CancellationToken::never();
        for i in 0..6 {
            buffer.put(i, &token).unwrap();
        }

        let mut values: Vec<_> = consumers.into_iter().map(|h| h.join().unwrap()).collect();
        values.sort_unstable();
        assert_eq!(values, vec![0, 1, 2, 3, 4, 5]);
    }
}
