/*!
 * Buffer Property Tests
 * Random operation sequences checked against a VecDeque model
 */

use bounded_handoff::core::sync::{BoundedBuffer, HandoffBuffer, StrategyType};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Put(u16),
    Take,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![any::<u16>().prop_map(Op::Put), Just(Op::Take)]
}

fn strategy_type() -> impl Strategy<Value = StrategyType> {
    prop_oneof![Just(StrategyType::Condvar), Just(StrategyType::Channel)]
}

proptest! {
    #[test]
    fn prop_matches_fifo_model(
        strategy in strategy_type(),
        capacity in 1usize..8,
        ops in prop::collection::vec(op_strategy(), 0..200),
    ) {
        let buffer = HandoffBuffer::with_capacity(strategy, capacity).unwrap();
        let mut model: VecDeque<u16> = VecDeque::new();

        for op in ops {
            match op {
                Op::Put(value) => {
                    let accepted = buffer.try_put(value).is_ok();
                    prop_assert_eq!(accepted, model.len() < capacity);
                    if accepted {
                        model.push_back(value);
                    }
                }
                Op::Take => {
                    prop_assert_eq!(buffer.try_take(), model.pop_front());
                }
            }

            prop_assert!(buffer.size() <= buffer.capacity());
            prop_assert_eq!(buffer.size(), model.len());
            prop_assert_eq!(buffer.is_full(), model.len() == capacity);
        }
    }

    #[test]
    fn prop_counters_reconcile(
        strategy in strategy_type(),
        capacity in 1usize..6,
        ops in prop::collection::vec(op_strategy(), 0..100),
    ) {
        let buffer = HandoffBuffer::with_capacity(strategy, capacity).unwrap();
        for op in ops {
            match op {
                Op::Put(value) => { let _ = buffer.try_put(value); }
                Op::Take => { let _ = buffer.try_take(); }
            }
        }

        let stats = buffer.stats();
        prop_assert_eq!(stats.total_put, stats.total_taken + stats.size as u64);
        prop_assert_eq!(stats.capacity, capacity);
    }
}
