//! Attribute model: typed read and address attributes.
//!
//! Both `rattrs` and `aattrs` are lists of integer offset tuples relative to
//! the stencil's iteration origin. A field may be absent, `null`, or empty;
//! all three mean "no attributes".

use serde_json::Value;
use smallvec::SmallVec;

use crate::document::{is_integer_literal, value_kind, Document};
use crate::error::{Field, ReuseError};

/// Offset tuple. Stencils rarely exceed four dimensions.
pub type Offsets = SmallVec<[i64; 4]>;

/// Which attribute list an attribute came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttrKind {
    /// A value consumed by the stencil (`rattrs`).
    Read,
    /// The addressing expression that produced a value (`aattrs`).
    Address,
}

impl AttrKind {
    /// Document field holding attributes of this kind.
    pub const fn field_name(self) -> &'static str {
        match self {
            AttrKind::Read => "rattrs",
            AttrKind::Address => "aattrs",
        }
    }
}

/// One memory access point.
///
/// Identity is kind plus offsets; the declaration position is tracked by
/// the graph builder, not here.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Attribute {
    kind: AttrKind,
    offsets: Offsets,
}

impl Attribute {
    pub fn new(kind: AttrKind, offsets: impl IntoIterator<Item = i64>) -> Self {
        Attribute {
            kind,
            offsets: offsets.into_iter().collect(),
        }
    }

    pub fn read(offsets: impl IntoIterator<Item = i64>) -> Self {
        Self::new(AttrKind::Read, offsets)
    }

    pub fn address(offsets: impl IntoIterator<Item = i64>) -> Self {
        Self::new(AttrKind::Address, offsets)
    }

    pub fn kind(&self) -> AttrKind {
        self.kind
    }

    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    pub fn arity(&self) -> usize {
        self.offsets.len()
    }
}

/// Read and address attributes of one request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributeModel {
    reads: Vec<Attribute>,
    addresses: Vec<Attribute>,
}

impl AttributeModel {
    pub fn new(reads: Vec<Attribute>, addresses: Vec<Attribute>) -> Self {
        AttributeModel { reads, addresses }
    }

    /// Parse `rattrs` and `aattrs` out of a document.
    ///
    /// Address attributes must agree in arity here. Read-attribute arity is
    /// left to [`AttributeModel::read_arity`] so the graph builder can report
    /// it as an inconsistent coordinate space.
    pub fn from_document(doc: &Document) -> Result<Self, ReuseError> {
        let reads = parse_field(doc, AttrKind::Read)?;
        let addresses = parse_field(doc, AttrKind::Address)?;

        if let Some(first) = addresses.first() {
            let expected = first.arity();
            if let Some((index, attr)) = addresses
                .iter()
                .enumerate()
                .find(|(_, a)| a.arity() != expected)
            {
                return Err(ReuseError::malformed(
                    Field::Attrs(AttrKind::Address),
                    Some(index),
                    format!(
                        "tuple has {} coordinates, expected {expected}",
                        attr.arity()
                    ),
                ));
            }
        }

        tracing::debug!(
            reads = reads.len(),
            addresses = addresses.len(),
            "parsed attribute model"
        );
        Ok(AttributeModel { reads, addresses })
    }

    pub fn reads(&self) -> &[Attribute] {
        &self.reads
    }

    pub fn addresses(&self) -> &[Attribute] {
        &self.addresses
    }

    /// Common arity of all read attributes, `None` when there are none.
    pub fn read_arity(&self) -> Result<Option<usize>, ReuseError> {
        let Some(first) = self.reads.first() else {
            return Ok(None);
        };
        let expected = first.arity();
        for (index, attr) in self.reads.iter().enumerate().skip(1) {
            if attr.arity() != expected {
                return Err(ReuseError::InconsistentAttributeArity {
                    expected,
                    found: attr.arity(),
                    index,
                });
            }
        }
        Ok(Some(expected))
    }
}

fn parse_field(doc: &Document, kind: AttrKind) -> Result<Vec<Attribute>, ReuseError> {
    let field = Field::Attrs(kind);
    let entries = match doc.get(kind.field_name()) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(ReuseError::malformed(
                field,
                None,
                format!("expected a list of offset tuples, found {}", value_kind(other)),
            ))
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_tuple(entry, kind, index))
        .collect()
}

fn parse_tuple(entry: &Value, kind: AttrKind, index: usize) -> Result<Attribute, ReuseError> {
    let field = Field::Attrs(kind);
    let Value::Array(coords) = entry else {
        return Err(ReuseError::malformed(
            field,
            Some(index),
            format!("expected an offset tuple, found {}", value_kind(entry)),
        ));
    };

    let mut offsets = Offsets::with_capacity(coords.len());
    for coord in coords {
        match coord.as_i64() {
            Some(offset) => offsets.push(offset),
            None if matches!(coord, Value::Number(n) if is_integer_literal(n)) => {
                return Err(ReuseError::malformed(
                    field,
                    Some(index),
                    format!("offset {coord} does not fit in a signed 64-bit integer"),
                ))
            }
            None => {
                return Err(ReuseError::malformed(
                    field,
                    Some(index),
                    format!("offsets must be integers, found {}", value_kind(coord)),
                ))
            }
        }
    }
    Ok(Attribute { kind, offsets })
}
