//! Access graph builder.
//!
//! Read attributes are placed in canonical order (lexicographic over offset
//! tuples, ties broken by declaration order). Every node then receives one
//! incoming candidate edge per canonically-earlier node the [`ReusePolicy`]
//! accepts. Edges only point backwards, so the graph is acyclic by
//! construction.
//!
//! The candidate distance of an edge is the schedule-order gap between its
//! endpoints: adjacent nodes are distance 1 apart.

use serde::Serialize;
use smallvec::SmallVec;

use crate::attr::{AttrKind, Attribute, AttributeModel};
use crate::error::{Field, ReuseError};
use crate::policy::ReusePolicy;

/// Position of a node in canonical (= schedule) order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OpId(u32);

impl OpId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        OpId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// One read access, placed in canonical order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessNode {
    pub id: OpId,
    /// Index into the request's `rattrs`.
    pub declared: usize,
    pub attr: Attribute,
}

/// A reuse candidate: the target may take its value from `source`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReuseEdge {
    pub source: OpId,
    /// Schedule-order gap between source and target (always ≥ 1).
    pub distance: u64,
    /// Shift magnitude reported by the policy.
    pub shift: u64,
}

/// Directed acyclic graph of reuse candidates.
///
/// Every accepted edge is stored, so memory grows with the edge count. A
/// policy that accepts every pair (for example [`LineBuffer`] with unroll 1
/// and no depth bound) makes that quadratic in the number of reads.
///
/// [`LineBuffer`]: crate::policy::LineBuffer
#[derive(Clone, Debug)]
pub struct CandidateGraph {
    nodes: Vec<AccessNode>,
    /// Incoming edges per node, indexed by [`OpId::index`], sources ascending.
    incoming: Vec<SmallVec<[ReuseEdge; 4]>>,
    policy: String,
}

impl CandidateGraph {
    /// Build the candidate graph for the read attributes of `model`.
    pub fn build(model: &AttributeModel, policy: &dyn ReusePolicy) -> Result<Self, ReuseError> {
        let policy_name = policy.name();
        if let Some(arity) = model.read_arity()? {
            policy.check_arity(arity)?;
        }

        let reads = model.reads();
        if u32::try_from(reads.len()).is_err() {
            return Err(ReuseError::malformed(
                Field::Attrs(AttrKind::Read),
                None,
                format!("too many read attributes ({})", reads.len()),
            ));
        }

        let nodes: Vec<AccessNode> = canonical_order(reads)
            .into_iter()
            .enumerate()
            .map(|(pos, declared)| AccessNode {
                id: OpId::new(pos as u32),
                declared,
                attr: reads[declared].clone(),
            })
            .collect();

        let mut incoming = Vec::with_capacity(nodes.len());
        let mut edge_count = 0usize;
        for (target_pos, target) in nodes.iter().enumerate() {
            let mut edges: SmallVec<[ReuseEdge; 4]> = SmallVec::new();
            for (source_pos, source) in nodes[..target_pos].iter().enumerate() {
                let Some(shift) = policy.shift(source.attr.offsets(), target.attr.offsets())
                else {
                    continue;
                };
                let edge = ReuseEdge {
                    source: source.id,
                    distance: (target_pos - source_pos) as u64,
                    shift,
                };
                tracing::trace!(
                    source = source.id.raw(),
                    target = target.id.raw(),
                    distance = edge.distance,
                    shift,
                    "reuse candidate"
                );
                edges.push(edge);
            }
            edge_count += edges.len();
            incoming.push(edges);
        }

        tracing::debug!(
            nodes = nodes.len(),
            edges = edge_count,
            policy = %policy_name,
            "built candidate graph"
        );
        Ok(CandidateGraph {
            nodes,
            incoming,
            policy: policy_name,
        })
    }

    /// Nodes in canonical order.
    pub fn nodes(&self) -> &[AccessNode] {
        &self.nodes
    }

    pub fn node(&self, id: OpId) -> &AccessNode {
        &self.nodes[id.index()]
    }

    /// Incoming candidate edges of `id`, sources in ascending order.
    pub fn incoming(&self, id: OpId) -> &[ReuseEdge] {
        &self.incoming[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.incoming.iter().map(SmallVec::len).sum()
    }

    /// Name of the policy the graph was built with.
    pub fn policy_name(&self) -> &str {
        &self.policy
    }
}

/// Declaration indices of `reads` in canonical order.
///
/// The sort is stable, so equal tuples keep their declaration order.
pub fn canonical_order(reads: &[Attribute]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..reads.len()).collect();
    order.sort_by(|&a, &b| reads[a].offsets().cmp(reads[b].offsets()));
    order
}
