//! Errors produced while scheduling a request document.
//!
//! Every variant aborts the current request. There is no partial result and
//! no fallback: a malformed attribute would silently corrupt the op-count and
//! distance accounting.

use std::fmt;

use crate::attr::AttrKind;

/// Where in the document a malformed value was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// The top-level value itself.
    Root,
    /// One of the two attribute lists.
    Attrs(AttrKind),
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Root => f.write_str("document"),
            Field::Attrs(kind) => f.write_str(kind.field_name()),
        }
    }
}

/// All errors the scheduler can report.
#[derive(Debug, thiserror::Error)]
pub enum ReuseError {
    /// Input text is not JSON.
    #[error("invalid JSON document: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// The result document could not be rendered as JSON text.
    #[error("failed to serialize result document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A present attribute field is not a sequence of integer tuples, or the
    /// document is not an object.
    #[error("malformed input in `{field}`{}: {reason}", entry_suffix(.index))]
    MalformedInput {
        field: Field,
        index: Option<usize>,
        reason: String,
    },

    /// Read attributes do not share one coordinate space.
    #[error(
        "inconsistent attribute arity: rattrs[{index}] has {found} coordinates, expected {expected}"
    )]
    InconsistentAttributeArity {
        expected: usize,
        found: usize,
        index: usize,
    },

    /// The reuse policy describes a coordinate space of a different rank.
    #[error("policy `{policy}` expects {expected} coordinates, but rattrs have {found}")]
    PolicyArity {
        policy: String,
        expected: usize,
        found: usize,
    },
}

fn entry_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at entry {i}"),
        None => String::new(),
    }
}

impl ReuseError {
    pub(crate) fn malformed(field: Field, index: Option<usize>, reason: impl Into<String>) -> Self {
        ReuseError::MalformedInput {
            field,
            index,
            reason: reason.into(),
        }
    }
}
