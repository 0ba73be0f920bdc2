//! Reuse-edge policies.
//!
//! A policy answers one question: can the value read at `target` be obtained
//! from the value read at `source` by a constant, data-independent shift?
//! The answer is a pure function of the two offset tuples, so the candidate
//! graph never depends on choices the scheduler makes.
//!
//! Two policies ship with the crate:
//!
//! - [`NeighborShift`] (default): tuples whose L1 distance is at most
//!   `max_shift` are reuse-linked.
//! - [`LineBuffer`]: tuples are linearized into a stream offset using the
//!   tile size (first coordinate fastest). Pairs whose stream distance is a
//!   multiple of the unroll factor share a reuse chain, optionally bounded
//!   by a buffer depth.

use std::fmt;

use crate::error::ReuseError;

/// Edge-validity predicate for the access graph builder.
pub trait ReusePolicy: fmt::Debug {
    /// Stable, human-readable description used in logs and dumps.
    fn name(&self) -> String;

    /// Shift magnitude from `source` to `target`, or `None` if `target`
    /// cannot be reused from `source`.
    ///
    /// Both slices have the same length. Overflow yields `None`.
    fn shift(&self, source: &[i64], target: &[i64]) -> Option<u64>;

    /// Reject coordinate spaces the policy cannot describe.
    fn check_arity(&self, _arity: usize) -> Result<(), ReuseError> {
        Ok(())
    }
}

/// Reuse between accesses at most `max_shift` apart (L1 norm).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NeighborShift {
    pub max_shift: u64,
}

impl NeighborShift {
    pub const DEFAULT_MAX_SHIFT: u64 = 1;

    pub const fn new(max_shift: u64) -> Self {
        NeighborShift { max_shift }
    }
}

impl Default for NeighborShift {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SHIFT)
    }
}

impl ReusePolicy for NeighborShift {
    fn name(&self) -> String {
        format!("neighbor(max_shift={})", self.max_shift)
    }

    fn shift(&self, source: &[i64], target: &[i64]) -> Option<u64> {
        let shift = l1_distance(source, target)?;
        (shift <= self.max_shift).then_some(shift)
    }
}

/// Sum of per-coordinate absolute differences.
pub fn l1_distance(a: &[i64], b: &[i64]) -> Option<u64> {
    a.iter()
        .zip(b)
        .try_fold(0u64, |acc, (&x, &y)| acc.checked_add(x.abs_diff(y)))
}

/// Reuse through a linearized line buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineBuffer {
    /// Extent of each tile dimension. Only the first `arity - 1` entries
    /// take part in linearization; the outermost extent may be 0
    /// (unbounded).
    pub tile_size: Vec<u64>,
    /// Number of parallel lanes; pairs on different lanes never share a
    /// chain. Always at least 1.
    pub unroll_factor: u64,
    /// Upper bound on the stream distance a value may be held, if any.
    pub max_depth: Option<u64>,
}

impl LineBuffer {
    pub fn new(tile_size: Vec<u64>) -> Self {
        LineBuffer {
            tile_size,
            unroll_factor: 1,
            max_depth: None,
        }
    }

    #[must_use]
    pub fn with_unroll_factor(mut self, unroll_factor: u64) -> Self {
        self.unroll_factor = unroll_factor.max(1);
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u64) -> Self {
        self.max_depth = Some(max_depth);
        self
    }

    /// Flatten an offset tuple into a stream offset:
    /// `o[0] + o[1]*t[0] + o[2]*t[0]*t[1] + ...`.
    pub fn linearize(&self, offsets: &[i64]) -> Option<i128> {
        let mut stride: i128 = 1;
        let mut total: i128 = 0;
        for (i, &offset) in offsets.iter().enumerate() {
            if i > 0 {
                let extent = i128::from(*self.tile_size.get(i - 1)?);
                stride = stride.checked_mul(extent)?;
            }
            total = total.checked_add(i128::from(offset).checked_mul(stride)?)?;
        }
        Some(total)
    }
}

impl ReusePolicy for LineBuffer {
    fn name(&self) -> String {
        let tiles: Vec<String> = self.tile_size.iter().map(u64::to_string).collect();
        let mut name = format!(
            "line-buffer(tile_size=[{}], unroll={}",
            tiles.join(","),
            self.unroll_factor
        );
        if let Some(depth) = self.max_depth {
            name.push_str(&format!(", max_depth={depth}"));
        }
        name.push(')');
        name
    }

    fn shift(&self, source: &[i64], target: &[i64]) -> Option<u64> {
        let distance = self.linearize(target)?.checked_sub(self.linearize(source)?)?;
        let shift = u64::try_from(distance.unsigned_abs()).ok()?;
        if shift % self.unroll_factor.max(1) != 0 {
            return None;
        }
        match self.max_depth {
            Some(depth) if shift > depth => None,
            _ => Some(shift),
        }
    }

    fn check_arity(&self, arity: usize) -> Result<(), ReuseError> {
        if self.tile_size.len() == arity {
            Ok(())
        } else {
            Err(ReuseError::PolicyArity {
                policy: self.name(),
                expected: self.tile_size.len(),
                found: arity,
            })
        }
    }
}
