//! Computation-reuse scheduling for stencil access graphs.
//!
//! Given the read attributes (`rattrs`) and address attributes (`aattrs`) of
//! a stencil computation, this crate decides which reads must be computed and
//! which can reuse an earlier value, then reports the number of computed
//! operations and the total reuse distance.
//!
//! # Pipeline
//!
//! ```text
//! Document → AttributeModel → CandidateGraph → Schedule → Document
//!             (attr)           (graph+policy)   (schedule)  (report)
//! ```
//!
//! - [`attr`]: typed attributes parsed from the request document.
//! - [`policy`]: the pluggable edge-validity predicate ([`ReusePolicy`]).
//! - [`graph`]: canonical ordering and reuse-candidate edges.
//! - [`schedule`]: the greedy distance-minimizing scheduler.
//! - [`report`]: pass-through merge of `num_ops` / `total_distance`.
//!
//! Every call is self-contained: attributes, graph, and schedule are built
//! fresh from the document and dropped afterwards. Configuration travels in
//! a [`ScheduleContext`].

pub mod attr;
mod document;
mod error;
pub mod graph;
pub mod policy;
pub mod report;
pub mod schedule;

pub use attr::{AttrKind, Attribute, AttributeModel, Offsets};
pub use document::Document;
pub use error::{Field, ReuseError};
pub use graph::{AccessNode, CandidateGraph, OpId, ReuseEdge};
pub use policy::{LineBuffer, NeighborShift, ReusePolicy};
pub use schedule::{
    schedule_graph, Operation, Producer, Report, ReuseChain, Schedule, ScheduleSummary, Weights,
    DISTANCE_WEIGHT, OP_WEIGHT,
};

/// Per-invocation configuration: the reuse policy and the cost weights.
#[derive(Debug)]
pub struct ScheduleContext {
    policy: Box<dyn ReusePolicy>,
    weights: Weights,
}

impl ScheduleContext {
    pub fn new(policy: Box<dyn ReusePolicy>) -> Self {
        ScheduleContext {
            policy,
            weights: Weights::default(),
        }
    }

    #[must_use]
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.weights = weights;
        self
    }

    pub fn policy(&self) -> &dyn ReusePolicy {
        self.policy.as_ref()
    }

    pub fn weights(&self) -> Weights {
        self.weights
    }
}

impl Default for ScheduleContext {
    fn default() -> Self {
        Self::new(Box::new(NeighborShift::default()))
    }
}

/// Schedule a request document with the default context.
pub fn schedule(document: Document) -> Result<Document, ReuseError> {
    schedule_with(document, &ScheduleContext::default())
}

/// Schedule a request document and fold the report into it.
///
/// On error nothing is produced; the input document is dropped.
#[tracing::instrument(level = "debug", skip_all, fields(policy = %ctx.policy().name()))]
pub fn schedule_with(document: Document, ctx: &ScheduleContext) -> Result<Document, ReuseError> {
    let schedule = plan(&document, ctx)?;
    Ok(report::emit(document, schedule.report()))
}

/// Build the schedule for a document without emitting a result.
#[tracing::instrument(level = "debug", skip_all)]
pub fn plan(document: &Document, ctx: &ScheduleContext) -> Result<Schedule, ReuseError> {
    let model = AttributeModel::from_document(document)?;
    let graph = CandidateGraph::build(&model, ctx.policy())?;
    let schedule = schedule_graph(&graph);
    tracing::debug!(
        num_ops = schedule.num_ops(),
        total_distance = schedule.total_distance(),
        cost = schedule.cost(ctx.weights()),
        "planned schedule"
    );
    Ok(schedule)
}
