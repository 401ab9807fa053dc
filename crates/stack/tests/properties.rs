//! Property tests for growth, copy independence and LIFO behaviour
//!
//! - Capacity after n pushes follows the growth law from any start
//! - Count always equals pushes minus successful pops
//! - A copy and its source never observe each other's mutations
//! - Any push/pop/clear/take sequence behaves like a `Vec` used as a stack

use nebula_stack::{GrowthPolicy, Stack, StackConfig};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategy: stack operations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Pop,
    Top,
    Clear,
    Take,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Push),
        3 => Just(Op::Pop),
        1 => Just(Op::Top),
        1 => Just(Op::Clear),
        1 => Just(Op::Take),
    ]
}

fn arb_growth() -> impl Strategy<Value = GrowthPolicy> {
    (2usize..5).prop_map(|factor| GrowthPolicy::new(factor).unwrap())
}

// ---------------------------------------------------------------------------
// Property: capacity after n pushes matches the growth law
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn growth_follows_policy(
        initial in 0usize..20,
        pushes in 0usize..300,
        growth in arb_growth(),
    ) {
        let config = StackConfig::new(initial).with_growth(growth);
        let mut stack = Stack::with_config(config).unwrap();

        for value in 0..pushes {
            stack.push(value).unwrap();
        }

        prop_assert_eq!(stack.count(), pushes);
        prop_assert_eq!(stack.size(), growth.capacity_for(initial, pushes).unwrap());
        prop_assert!(stack.count() <= stack.size());
    }

    #[test]
    fn with_capacity_never_starts_empty(initial in 0usize..20, pushes in 0usize..100) {
        let mut stack = Stack::with_capacity(initial).unwrap();
        prop_assert_eq!(stack.size(), initial.max(1));

        for value in 0..pushes {
            stack.push(value).unwrap();
        }
        let expected = GrowthPolicy::doubling().capacity_for(initial.max(1), pushes).unwrap();
        prop_assert_eq!(stack.size(), expected);
    }

    #[test]
    fn count_tracks_pushes_minus_pops(pushes in 0usize..64, pops in 0usize..96) {
        let mut stack = Stack::new();
        for value in 0..pushes {
            stack.push(value).unwrap();
        }

        let mut popped = 0;
        for _ in 0..pops {
            if stack.pop().is_ok() {
                popped += 1;
            }
        }

        prop_assert_eq!(popped, pops.min(pushes));
        prop_assert_eq!(stack.count(), pushes - popped);
    }
}

// ---------------------------------------------------------------------------
// Property: copies are independent of their source
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn copy_is_independent(
        original in proptest::collection::vec(any::<i32>(), 0..40),
        extra in proptest::collection::vec(any::<i32>(), 1..10),
    ) {
        let source: Stack<i32> = original.iter().copied().collect();
        let mut copy = source.clone();

        prop_assert_eq!(copy.size(), source.size());
        prop_assert_eq!(copy.as_slice(), source.as_slice());

        for value in &extra {
            copy.push(*value).unwrap();
        }
        let _ = copy.pop();

        prop_assert_eq!(source.as_slice(), original.as_slice());
        prop_assert_eq!(source.count(), original.len());
    }

    #[test]
    fn clone_from_replaces_contents(
        destination in proptest::collection::vec(any::<i32>(), 0..20),
        source in proptest::collection::vec(any::<i32>(), 0..20),
    ) {
        let source: Stack<i32> = source.into_iter().collect();
        let mut destination: Stack<i32> = destination.into_iter().collect();

        destination.clone_from(&source);

        prop_assert_eq!(&destination, &source);
        prop_assert_eq!(destination.size(), source.size());
    }
}

// ---------------------------------------------------------------------------
// Property: the stack behaves like a Vec used as a stack
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn matches_vec_model(ops in proptest::collection::vec(arb_op(), 0..200)) {
        let mut stack = Stack::new();
        let mut model: Vec<i32> = Vec::new();

        for op in ops {
            match op {
                Op::Push(value) => {
                    stack.push(value).unwrap();
                    model.push(value);
                }
                Op::Pop => {
                    let expected = model.pop();
                    match stack.pop() {
                        Ok(value) => {
                            prop_assert_eq!(Some(value), expected);
                        }
                        Err(err) => {
                            prop_assert!(expected.is_none());
                            prop_assert!(err.is_empty_stack());
                        }
                    }
                }
                Op::Top => {
                    prop_assert_eq!(stack.top().ok(), model.last());
                }
                Op::Clear => {
                    let capacity = stack.size();
                    stack.clear();
                    model.clear();
                    prop_assert_eq!(stack.size(), capacity);
                }
                Op::Take => {
                    let moved = stack.take();
                    prop_assert_eq!(moved.as_slice(), model.as_slice());
                    prop_assert_eq!(stack.size(), 0);
                    model.clear();
                }
            }

            prop_assert_eq!(stack.count(), model.len());
            prop_assert_eq!(stack.as_slice(), model.as_slice());
            prop_assert!(stack.count() <= stack.size());
        }
    }
}
