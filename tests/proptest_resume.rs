//! Property-based tests for suspend/resume and snapshot invariants.
//!
//! The program under test keeps a running total: it reads a value, adds it to
//! memory cell 50, outputs the total and waits for the next value.

use intcode::{Machine, RunState};
use proptest::prelude::*;

const ACCUMULATOR: &str = "3,51,1,50,51,50,4,50,1105,1,0";

fn running_totals(values: &[i64]) -> Vec<i64> {
    values
        .iter()
        .scan(0i64, |total, &value| {
            *total = total.wrapping_add(value);
            Some(*total)
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_one_at_a_time_matches_preloaded(values in prop::collection::vec(any::<i64>(), 1..32)) {
        let mut stepped = Machine::parse(ACCUMULATOR).unwrap();
        for &value in &values {
            prop_assert_eq!(stepped.run().unwrap(), RunState::AwaitingInput);
            stepped.push_input(value);
        }
        prop_assert_eq!(stepped.run().unwrap(), RunState::AwaitingInput);

        let mut preloaded = Machine::parse(ACCUMULATOR).unwrap();
        prop_assert_eq!(preloaded.run_with_inputs(values.iter().copied()).unwrap(), RunState::AwaitingInput);

        let expected = running_totals(&values);
        prop_assert_eq!(stepped.drain_output(), expected.clone());
        prop_assert_eq!(preloaded.drain_output(), expected);
    }

    #[test]
    fn prop_snapshot_diverges_independently(
        prefix in prop::collection::vec(-1000i64..1000, 0..8),
        left in prop::collection::vec(-1000i64..1000, 0..8),
        right in prop::collection::vec(-1000i64..1000, 0..8),
    ) {
        let mut original = Machine::parse(ACCUMULATOR).unwrap();
        original.run_with_inputs(prefix.iter().copied()).unwrap();
        original.output_mut().clear();

        let mut snapshot = original.clone();
        snapshot.run_with_inputs(right.iter().copied()).unwrap();
        original.run_with_inputs(left.iter().copied()).unwrap();

        let base: i64 = prefix.iter().sum();
        let expected_left: Vec<i64> = running_totals(&left).iter().map(|t| base + t).collect();
        let expected_right: Vec<i64> = running_totals(&right).iter().map(|t| base + t).collect();
        prop_assert_eq!(original.drain_output(), expected_left);
        prop_assert_eq!(snapshot.drain_output(), expected_right);
    }

    #[test]
    fn prop_step_budget_never_overruns(budget in 0u64..200) {
        // Counts forever in cell 20
        let mut machine = Machine::parse("1001,20,1,20,1105,1,0").unwrap();
        prop_assert_eq!(machine.run_for(budget).unwrap(), RunState::StepLimit);
        // Every other instruction increments the counter
        prop_assert_eq!(machine.peek(20), ((budget + 1) / 2) as i64);
    }
}
