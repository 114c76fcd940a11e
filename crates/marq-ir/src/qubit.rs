//! Qubit identifiers and planar coordinates.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Unique identifier for a qubit within a circuit.
///
/// Ids are dense: a circuit with `n` coordinate entries owns ids `0..n`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The id as an index into a coordinate table.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// A position on the editor plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Coord {
    /// Create a coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// A hashable key that identifies this position exactly.
    ///
    /// `-0.0` and `0.0` produce the same key.
    pub fn key(self) -> CoordKey {
        CoordKey(normalize_zero(self.x).to_bits(), normalize_zero(self.y).to_bits())
    }

    /// Total order on `(x, y)`, with `-0.0` equal to `0.0`.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        normalize_zero(self.x)
            .total_cmp(&normalize_zero(other.x))
            .then_with(|| normalize_zero(self.y).total_cmp(&normalize_zero(other.y)))
    }
}

impl From<(f64, f64)> for Coord {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Exact, hashable identity of a [`Coord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CoordKey(u64, u64);

fn normalize_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}
