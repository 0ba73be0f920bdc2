//! Report emitter: folds a schedule's figures back into the request.

use serde_json::Value;

use crate::document::Document;
use crate::schedule::Report;

/// Result field holding the number of computed operations.
pub const NUM_OPS: &str = "num_ops";

/// Result field holding the summed reuse distance.
pub const TOTAL_DISTANCE: &str = "total_distance";

/// Produce the result document.
///
/// Only `num_ops` and `total_distance` are written. Existing values are
/// overwritten where they stand; missing ones are appended.
pub fn emit(mut document: Document, report: Report) -> Document {
    document.set(NUM_OPS, Value::from(report.num_ops));
    document.set(TOTAL_DISTANCE, Value::from(report.total_distance));
    document
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
