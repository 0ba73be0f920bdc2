//! Reuse scheduler.
//!
//! Walks the candidate graph in canonical order and decides, per node,
//! whether its value is computed or reused from an earlier node. The
//! objective is
//!
//! ```text
//! num_ops * op_weight + total_distance * distance_weight
//! ```
//!
//! A single greedy pass is optimal for it:
//!
//! - Candidate edges come from raw offsets, so no choice changes another
//!   node's candidates.
//! - `num_ops` is fixed by which nodes have no candidates at all. Computing
//!   a node that could reuse only adds an op, so every node with a
//!   candidate reuses.
//! - With `num_ops` fixed, the sum of distances is minimized by letting
//!   each node take its own nearest candidate.
//!
//! Ties on distance go to the canonically earliest source.

use serde::Serialize;

use crate::graph::{CandidateGraph, OpId, ReuseEdge};

/// Cost of one computed operation.
pub const OP_WEIGHT: u64 = 64;

/// Cost of holding a reused value for one schedule step.
pub const DISTANCE_WEIGHT: u64 = 1;

/// Objective weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weights {
    pub op: u64,
    pub distance: u64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            op: OP_WEIGHT,
            distance: DISTANCE_WEIGHT,
        }
    }
}

/// How an operation obtains its value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Producer {
    /// Executed from scratch.
    Computed,
    /// Taken from an earlier operation `distance` steps back.
    ReusedFrom {
        source: OpId,
        distance: u64,
    },
}

/// One scheduled read access.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Operation {
    #[serde(rename = "position")]
    pub id: OpId,
    /// Index into the request's `rattrs`.
    pub declared: usize,
    pub offsets: Vec<i64>,
    pub producer: Producer,
}

impl Operation {
    pub fn is_computed(&self) -> bool {
        matches!(self.producer, Producer::Computed)
    }
}

/// Operations sharing one computed root through reuse links.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReuseChain {
    pub root: OpId,
    /// Members in schedule order, root first.
    pub members: Vec<OpId>,
    /// Schedule-order gap between the root and the last member.
    pub depth: u64,
}

/// Outcome of scheduling: the two figures folded into the result document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub num_ops: u64,
    pub total_distance: u64,
}

/// Ordered operations; order is the canonical order of the graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    operations: Vec<Operation>,
    policy: String,
}

impl Schedule {
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Count of computed operations.
    pub fn num_ops(&self) -> u64 {
        self.operations.iter().filter(|op| op.is_computed()).count() as u64
    }

    /// Sum of the distances of all reused operations.
    pub fn total_distance(&self) -> u64 {
        self.operations
            .iter()
            .map(|op| match op.producer {
                Producer::Computed => 0,
                Producer::ReusedFrom { distance, .. } => distance,
            })
            .fold(0u64, u64::saturating_add)
    }

    pub fn report(&self) -> Report {
        Report {
            num_ops: self.num_ops(),
            total_distance: self.total_distance(),
        }
    }

    /// Weighted objective value.
    pub fn cost(&self, weights: Weights) -> u64 {
        self.num_ops()
            .saturating_mul(weights.op)
            .saturating_add(self.total_distance().saturating_mul(weights.distance))
    }

    /// Group operations by the computed root their reuse links lead to.
    ///
    /// Chains are returned in order of their roots.
    pub fn chains(&self) -> Vec<ReuseChain> {
        // Sources always precede their targets, so one forward pass resolves
        // every root.
        let mut root_of: Vec<usize> = Vec::with_capacity(self.operations.len());
        let mut chain_of_root: Vec<Option<usize>> = vec![None; self.operations.len()];
        let mut chains: Vec<ReuseChain> = Vec::new();

        for (pos, op) in self.operations.iter().enumerate() {
            let root = match op.producer {
                Producer::Computed => pos,
                Producer::ReusedFrom { source, .. } => root_of[source.index()],
            };
            root_of.push(root);

            let chain_idx = match chain_of_root[root] {
                Some(idx) => idx,
                None => {
                    chains.push(ReuseChain {
                        root: op.id,
                        members: Vec::new(),
                        depth: 0,
                    });
                    chain_of_root[root] = Some(chains.len() - 1);
                    chains.len() - 1
                }
            };
            let chain = &mut chains[chain_idx];
            chain.members.push(op.id);
            chain.depth = (pos - root) as u64;
        }
        chains
    }

    /// Name of the policy the candidate graph was built with.
    pub fn policy_name(&self) -> &str {
        &self.policy
    }

    /// Serializable view of the whole schedule.
    pub fn summary(&self, weights: Weights) -> ScheduleSummary<'_> {
        ScheduleSummary {
            policy: &self.policy,
            num_ops: self.num_ops(),
            total_distance: self.total_distance(),
            cost: self.cost(weights),
            operations: &self.operations,
            chains: self.chains(),
        }
    }
}

/// Diagnostic dump of a schedule.
#[derive(Debug, Serialize)]
pub struct ScheduleSummary<'a> {
    pub policy: &'a str,
    pub num_ops: u64,
    pub total_distance: u64,
    pub cost: u64,
    pub operations: &'a [Operation],
    pub chains: Vec<ReuseChain>,
}

/// Schedule every node of `graph`.
pub fn schedule_graph(graph: &CandidateGraph) -> Schedule {
    let operations: Vec<Operation> = graph
        .nodes()
        .iter()
        .map(|node| {
            let producer = match nearest_source(graph.incoming(node.id)) {
                Some(edge) => Producer::ReusedFrom {
                    source: edge.source,
                    distance: edge.distance,
                },
                None => Producer::Computed,
            };
            tracing::trace!(op = node.id.raw(), ?producer, "scheduled");
            Operation {
                id: node.id,
                declared: node.declared,
                offsets: node.attr.offsets().to_vec(),
                producer,
            }
        })
        .collect();

    let schedule = Schedule {
        operations,
        policy: graph.policy_name().to_owned(),
    };
    tracing::debug!(
        operations = schedule.len(),
        num_ops = schedule.num_ops(),
        total_distance = schedule.total_distance(),
        "scheduled candidate graph"
    );
    schedule
}

/// Minimum-distance edge; ties go to the earliest source.
fn nearest_source(edges: &[ReuseEdge]) -> Option<&ReuseEdge> {
    edges.iter().min_by_key(|edge| (edge.distance, edge.source))
}
