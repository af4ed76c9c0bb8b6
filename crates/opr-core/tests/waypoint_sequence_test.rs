//! Property tests for waypoint sequence numbering
//!
//! Any interleaving of inserts and deletes must leave the list numbered
//! exactly 1..=N in list order.

use opr_core::models::{Coordinate, Waypoint, WaypointField};
use opr_core::mutations::{add_waypoint, delete_waypoint, is_densely_numbered, update_waypoint_field};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(f64, f64),
    Delete(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-90.0..90.0f64, -180.0..180.0f64).prop_map(|(lat, lng)| Op::Add(lat, lng)),
        (0usize..64).prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn sequences_stay_dense(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut list: Vec<Waypoint> = Vec::new();

        for op in ops {
            list = match op {
                Op::Add(lat, lng) => add_waypoint(&list, Coordinate::new(lat, lng)),
                Op::Delete(i) if list.is_empty() => {
                    prop_assert!(delete_waypoint(&list, i).is_err());
                    list
                }
                Op::Delete(i) => delete_waypoint(&list, i % list.len()).unwrap(),
            };

            let sequences: Vec<u32> = list.iter().map(|w| w.sequence).collect();
            let expected: Vec<u32> = (1..=list.len() as u32).collect();
            prop_assert_eq!(sequences, expected);
        }
    }

    #[test]
    fn delete_preserves_relative_order(n in 1usize..30, victim in 0usize..30) {
        let list = (0..n).fold(Vec::new(), |acc, i| {
            add_waypoint(&acc, Coordinate::new(i as f64, 0.0))
        });
        let victim = victim % n;

        let next = delete_waypoint(&list, victim).unwrap();
        let expected: Vec<f64> = (0..n).filter(|i| *i != victim).map(|i| i as f64).collect();
        let actual: Vec<f64> = next.iter().map(|w| w.latitude).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn structural_edit_repairs_manual_sequence(n in 1usize..20, bogus in 0u32..100) {
        let list = (0..n).fold(Vec::new(), |acc, _| add_waypoint(&acc, Coordinate::default()));
        let edited = update_waypoint_field(&list, 0, WaypointField::Sequence(bogus)).unwrap();

        let repaired = add_waypoint(&edited, Coordinate::default());
        prop_assert!(is_densely_numbered(&repaired));
    }
}
