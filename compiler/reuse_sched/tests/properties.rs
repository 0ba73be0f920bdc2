//! Property-based tests for the reuse scheduler.
//!
//! Random read-attribute sets (1-3 dimensions, small offsets so reuse edges
//! actually occur) are pushed through the full pipeline and checked for:
//! 1. Determinism: the same document always yields the same bytes
//! 2. Lower bound: any non-empty read set computes at least one op
//! 3. Monotonicity: one more read never lowers ops + reuses
//! 4. Pass-through: caller fields survive unchanged and in order, numbers
//!    byte for byte
//! 5. Forward-only reuse with schedule-gap distances

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use std::collections::BTreeMap;

use proptest::prelude::*;
use reuse_sched::{
    plan, schedule, CandidateGraph, Document, NeighborShift, Producer, ScheduleContext,
};
use serde_json::{json, Map, Value};

// -- Strategies --

/// Read tuples sharing one arity.
fn reads_strategy() -> impl Strategy<Value = Vec<Vec<i64>>> {
    (1usize..=3).prop_flat_map(|arity| {
        prop::collection::vec(prop::collection::vec(-4i64..=4, arity), 0..24)
    })
}

/// JSON number literals of any width, with fractions and exponents.
fn number_literal() -> impl Strategy<Value = String> {
    "-?(0|[1-9][0-9]{0,40})(\\.[0-9]{1,6})?([eE][+-]?[0-9]{1,2})?"
}

/// Opaque caller fields with keys that never collide with scheduler fields.
fn extras_strategy() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map("[a-m]{1,6}", number_literal(), 0..6)
}

fn document(reads: &[Vec<i64>], extras: &BTreeMap<String, String>) -> Document {
    let mut fields = Map::new();
    for (key, literal) in extras {
        fields.insert(key.clone(), serde_json::from_str(literal).unwrap());
    }
    fields.insert("rattrs".to_owned(), json!(reads));
    fields.insert("aattrs".to_owned(), json!([]));
    Document::from(fields)
}

fn figures(doc: &Document) -> (u64, u64) {
    (
        doc.get("num_ops").and_then(Value::as_u64).unwrap(),
        doc.get("total_distance").and_then(Value::as_u64).unwrap(),
    )
}

proptest! {
    #[test]
    fn deterministic(reads in reads_strategy(), extras in extras_strategy()) {
        let a = schedule(document(&reads, &extras)).unwrap().to_json().unwrap();
        let b = schedule(document(&reads, &extras)).unwrap().to_json().unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn at_least_one_op(reads in reads_strategy()) {
        let (num_ops, _) = figures(&schedule(document(&reads, &BTreeMap::new())).unwrap());
        prop_assert_eq!(num_ops == 0, reads.is_empty());
    }

    #[test]
    fn one_more_read_never_shrinks(reads in reads_strategy(), extra in prop::collection::vec(-4i64..=4, 3)) {
        let ctx = ScheduleContext::default();
        let before = plan(&document(&reads, &BTreeMap::new()), &ctx).unwrap();

        let arity = reads.first().map_or(extra.len(), Vec::len);
        let mut grown = reads.clone();
        grown.push(extra[..arity].to_vec());
        let after = plan(&document(&grown, &BTreeMap::new()), &ctx).unwrap();

        let reuses = |s: &reuse_sched::Schedule| {
            s.operations().iter().filter(|op| !op.is_computed()).count() as u64
        };
        prop_assert!(after.num_ops() + reuses(&after) >= before.num_ops() + reuses(&before));
        prop_assert!(after.num_ops() >= before.num_ops() || reuses(&after) > reuses(&before));
    }

    #[test]
    fn caller_fields_pass_through(reads in reads_strategy(), extras in extras_strategy()) {
        let input = document(&reads, &extras);
        let output = schedule(input.clone()).unwrap();

        let in_keys: Vec<&str> = input.keys().collect();
        let out_keys: Vec<&str> = output.keys().collect();
        prop_assert_eq!(&out_keys[..in_keys.len()], &in_keys[..]);
        prop_assert_eq!(&out_keys[in_keys.len()..], &["num_ops", "total_distance"][..]);
        for key in input.keys() {
            prop_assert_eq!(input.get(key), output.get(key));
        }
        for (key, literal) in &extras {
            prop_assert_eq!(output.get(key).map(Value::to_string), Some(literal.clone()));
        }
    }

    #[test]
    fn reuse_points_backwards(reads in reads_strategy()) {
        let s = plan(&document(&reads, &BTreeMap::new()), &ScheduleContext::default()).unwrap();
        let mut total = 0u64;
        for op in s.operations() {
            if let Producer::ReusedFrom { source, distance } = op.producer {
                prop_assert!(source < op.id);
                prop_assert_eq!(distance, u64::from(op.id.raw() - source.raw()));
                total += distance;
            }
        }
        prop_assert_eq!(total, s.total_distance());
    }

    #[test]
    fn no_candidates_means_no_distance(reads in reads_strategy()) {
        let doc = document(&reads, &BTreeMap::new());
        let model = reuse_sched::AttributeModel::from_document(&doc).unwrap();
        let graph = CandidateGraph::build(&model, &NeighborShift::default()).unwrap();
        let s = plan(&doc, &ScheduleContext::default()).unwrap();
        if graph.edge_count() == 0 {
            prop_assert_eq!(s.total_distance(), 0);
            prop_assert_eq!(s.num_ops(), reads.len() as u64);
        }
    }
}
