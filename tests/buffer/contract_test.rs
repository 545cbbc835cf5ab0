/*!
 * Buffer Contract Tests
 * Single-threaded behavior shared by every strategy
 */

use bounded_handoff::core::sync::{
    BoundedBuffer, BufferConfig, CancellationToken, ChannelBuffer, CondvarBuffer, HandoffBuffer,
    StrategyType,
};
use bounded_handoff::core::limits::MAX_BUFFER_CAPACITY;
use bounded_handoff::BufferError;
use pretty_assertions::assert_eq;
use std::time::{Duration, Instant};

fn each_strategy<T: Send>(capacity: usize) -> Vec<HandoffBuffer<T>> {
    StrategyType::ALL
        .iter()
        .map(|&s| HandoffBuffer::with_capacity(s, capacity).unwrap())
        .collect()
}

#[test]
fn test_zero_capacity_is_invalid_configuration() {
    for strategy in StrategyType::ALL {
        let result = HandoffBuffer::<u32>::with_capacity(strategy, 0);
        assert!(
            matches!(result, Err(BufferError::InvalidConfiguration(_))),
            "{} accepted capacity 0",
            strategy
        );
    }
}

#[test]
fn test_oversized_capacity_is_invalid_configuration() {
    let config = BufferConfig::new(StrategyType::Channel, MAX_BUFFER_CAPACITY + 1);
    assert!(matches!(
        ChannelBuffer::<u8>::with_config(&config),
        Err(BufferError::InvalidConfiguration(_))
    ));
    assert!(matches!(
        CondvarBuffer::<u8>::with_config(&config),
        Err(BufferError::InvalidConfiguration(_))
    ));
}

#[test]
fn test_new_buffer_is_empty() {
    for buffer in each_strategy::<u32>(3) {
        assert_eq!(buffer.size(), 0);
        assert_eq!(buffer.capacity(), 3);
        assert!(buffer.is_empty());
        assert!(!buffer.is_full());
        assert_eq!(buffer.remaining_capacity(), 3);
    }
}

#[test]
fn test_fill_and_drain_in_order() {
    let token = CancellationToken::never();
    for buffer in each_strategy(4) {
        for value in ["a", "b", "c", "d"] {
            buffer.put(value, &token).unwrap();
        }
        assert!(buffer.is_full());
        assert_eq!(buffer.try_put("e"), Err("e"));

        let drained: Vec<_> = (0..4).map(|_| buffer.take(&token).unwrap()).collect();
        assert_eq!(drained, vec!["a", "b", "c", "d"]);
        assert!(buffer.is_empty());
        assert_eq!(buffer.try_take(), None);
    }
}

#[test]
fn test_capacity_one_alternating() {
    // Producer enqueues A then B with a take in between
    let token = CancellationToken::never();
    for buffer in each_strategy(1) {
        let mut taken = Vec::new();
        let mut max_seen = 0;

        buffer.put('A', &token).unwrap();
        max_seen = max_seen.max(buffer.size());
        taken.push(buffer.take(&token).unwrap());

        buffer.put('B', &token).unwrap();
        max_seen = max_seen.max(buffer.size());
        taken.push(buffer.take(&token).unwrap());

        assert_eq!(taken, vec!['A', 'B']);
        assert_eq!(max_seen, 1);
    }
}

#[test]
fn test_take_timeout_on_empty() {
    for buffer in each_strategy::<u32>(2) {
        let start = Instant::now();
        let result = buffer.take_timeout(Duration::from_millis(40), &CancellationToken::never());

        assert_eq!(result, Err(BufferError::Timeout(Duration::from_millis(40))));
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(buffer.size(), 0);
    }
}

#[test]
fn test_put_timeout_on_full_keeps_contents() {
    let token = CancellationToken::never();
    for buffer in each_strategy(2) {
        buffer.put(1, &token).unwrap();
        buffer.put(2, &token).unwrap();

        let result = buffer.put_timeout(3, Duration::from_millis(30), &token);
        assert_eq!(result, Err(BufferError::Timeout(Duration::from_millis(30))));
        assert_eq!(buffer.size(), 2);
        assert_eq!(buffer.try_take(), Some(1));
        assert_eq!(buffer.try_take(), Some(2));
    }
}

#[test]
fn test_timeout_succeeds_when_room() {
    let token = CancellationToken::never();
    for buffer in each_strategy(1) {
        buffer
            .put_timeout(9u8, Duration::from_millis(10), &token)
            .unwrap();
        assert_eq!(buffer.take_timeout(Duration::from_millis(10), &token), Ok(9));
    }
}

#[test]
fn test_zero_timeout_completes_when_possible() {
    let token = CancellationToken::never();
    for buffer in each_strategy(4) {
        assert_eq!(buffer.put_timeout(1u32, Duration::ZERO, &token), Ok(()));
        assert_eq!(buffer.size(), 1);

        assert_eq!(buffer.take_timeout(Duration::ZERO, &token), Ok(1));
        assert_eq!(buffer.size(), 0);
    }
}

#[test]
fn test_zero_timeout_fails_only_when_blocked() {
    let token = CancellationToken::never();
    for buffer in each_strategy(1) {
        assert_eq!(
            buffer.take_timeout(Duration::ZERO, &token),
            Err(BufferError::Timeout(Duration::ZERO))
        );

        buffer.put_timeout(7u32, Duration::ZERO, &token).unwrap();
        assert_eq!(
            buffer.put_timeout(8, Duration::ZERO, &token),
            Err(BufferError::Timeout(Duration::ZERO))
        );
        assert_eq!(buffer.size(), 1);
        assert_eq!(buffer.stats().total_put, 1);
        assert_eq!(buffer.try_take(), Some(7));
    }
}

#[test]
fn test_stats_track_operations() {
    let token = CancellationToken::never();
    for buffer in each_strategy(3) {
        buffer.put(1u64, &token).unwrap();
        buffer.put(2, &token).unwrap();
        buffer.try_put(3).unwrap();
        buffer.take(&token).unwrap();

        let stats = buffer.stats();
        assert_eq!(stats.strategy, buffer.strategy_name());
        assert_eq!(stats.capacity, 3);
        assert_eq!(stats.size, 2);
        assert_eq!(stats.total_put, 3);
        assert_eq!(stats.total_taken, 1);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["size"], serde_json::json!(2));
    }
}

#[test]
fn test_cancelled_token_never_mutates() {
    let token = CancellationToken::new();
    token.cancel();

    for buffer in each_strategy(2) {
        assert_eq!(buffer.put(1u8, &token), Err(BufferError::Cancelled));
        assert_eq!(buffer.size(), 0);

        buffer.try_put(5).unwrap();
        assert_eq!(buffer.take(&token), Err(BufferError::Cancelled));
        assert_eq!(buffer.size(), 1);
    }
}
