//! Phase-free Pauli algebra.
//!
//! A single-qubit Pauli is stored as two bits, bit 0 for its X component and
//! bit 1 for its Z component, so `Y = X | Z` and multiplication up to phase is
//! a XOR. Rendering the values `0..4` through `"IXZY"` gives the letter.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{IrError, IrResult};

/// Prefix that marks a conjugation result as a forced, detected error.
pub const ERROR_PREFIX: &str = "ERR:";

const LETTERS: [char; 4] = ['I', 'X', 'Z', 'Y'];

/// A single-qubit Pauli operator, ignoring phase.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Pauli {
    /// Identity.
    #[default]
    I,
    /// Pauli X.
    X,
    /// Pauli Y.
    Y,
    /// Pauli Z.
    Z,
}

impl Pauli {
    /// All four Paulis, identity first.
    pub const ALL: [Pauli; 4] = [Pauli::I, Pauli::X, Pauli::Y, Pauli::Z];

    /// Two-bit encoding: X = 1, Z = 2, Y = 3.
    #[inline]
    pub const fn bits(self) -> u8 {
        match self {
            Pauli::I => 0,
            Pauli::X => 1,
            Pauli::Z => 2,
            Pauli::Y => 3,
        }
    }

    /// Inverse of [`Pauli::bits`]. Only the two low bits are read.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 3 {
            0 => Pauli::I,
            1 => Pauli::X,
            2 => Pauli::Z,
            _ => Pauli::Y,
        }
    }

    /// Parse a letter from `IXYZ`.
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Pauli::I),
            'X' => Some(Pauli::X),
            'Y' => Some(Pauli::Y),
            'Z' => Some(Pauli::Z),
            _ => None,
        }
    }

    /// The letter for this Pauli.
    #[inline]
    pub const fn as_char(self) -> char {
        LETTERS[self.bits() as usize]
    }

    /// Product of two Paulis up to phase (`X∘Z = Y`, `Y∘Y = I`, ...).
    #[inline]
    #[must_use]
    pub const fn compose(self, other: Pauli) -> Pauli {
        Pauli::from_bits(self.bits() ^ other.bits())
    }

    /// True for X and Y.
    #[inline]
    pub const fn has_x(self) -> bool {
        self.bits() & 1 != 0
    }

    /// True for Z and Y.
    #[inline]
    pub const fn has_z(self) -> bool {
        self.bits() & 2 != 0
    }

    /// True for the identity.
    #[inline]
    pub const fn is_identity(self) -> bool {
        matches!(self, Pauli::I)
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Pauli {
    type Error = IrError;

    fn try_from(c: char) -> IrResult<Self> {
        Pauli::from_char(c).ok_or_else(|| IrError::InvalidBasis(c.to_string()))
    }
}

/// A basis string: one Pauli per target qubit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PauliString(Vec<Pauli>);

impl PauliString {
    /// The all-identity string of the given length.
    pub fn identity(len: usize) -> Self {
        Self(vec![Pauli::I; len])
    }

    /// Number of positions.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no positions.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The Pauli at position `k`.
    pub fn get(&self, k: usize) -> Option<Pauli> {
        self.0.get(k).copied()
    }

    /// Iterate over the positions.
    pub fn iter(&self) -> impl Iterator<Item = Pauli> + '_ {
        self.0.iter().copied()
    }

    /// True if every position is the identity.
    pub fn is_identity(&self) -> bool {
        self.0.iter().all(|p| p.is_identity())
    }

    /// Multiply in another string position by position.
    ///
    /// Positions beyond `other`'s length are left untouched.
    pub fn compose_assign(&mut self, other: &PauliString) {
        for (mine, theirs) in self.0.iter_mut().zip(other.iter()) {
            *mine = mine.compose(theirs);
        }
    }

    /// Decompose into single-letter basis vectors.
    ///
    /// Every position holding X or Y yields the vector with `X` at that
    /// position, and every position holding Z or Y yields the vector with `Z`
    /// there. Composing the vectors gives back `self`.
    pub fn basis_vectors(&self) -> Vec<PauliString> {
        let mut result = Vec::new();
        for (k, p) in self.iter().enumerate() {
            if p.has_x() {
                result.push(self.unit(k, Pauli::X));
            }
            if p.has_z() {
                result.push(self.unit(k, Pauli::Z));
            }
        }
        result
    }

    fn unit(&self, k: usize, p: Pauli) -> PauliString {
        let mut v = PauliString::identity(self.len());
        v.0[k] = p;
        v
    }
}

impl From<Vec<Pauli>> for PauliString {
    fn from(paulis: Vec<Pauli>) -> Self {
        Self(paulis)
    }
}

impl FromIterator<Pauli> for PauliString {
    fn from_iter<T: IntoIterator<Item = Pauli>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for PauliString {
    type Err = IrError;

    fn from_str(s: &str) -> IrResult<Self> {
        s.chars()
            .map(|c| Pauli::from_char(c).ok_or_else(|| IrError::InvalidBasis(s.to_string())))
            .collect()
    }
}

impl fmt::Display for PauliString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in &self.0 {
            write!(f, "{p}")?;
        }
        Ok(())
    }
}

/// The image of a basis string under a gate.
///
/// `error` is a single flag for the whole application: when set, the gate
/// could not map the input to a deterministic eigenstate and every target is
/// forced into a detected error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Conjugated {
    /// Resulting Pauli per target.
    pub paulis: PauliString,
    /// Whether the transition forces an error.
    pub error: bool,
}

impl Conjugated {
    /// A deterministic result.
    pub fn clean(paulis: PauliString) -> Self {
        Self {
            paulis,
            error: false,
        }
    }
}

impl FromStr for Conjugated {
    type Err = IrError;

    fn from_str(s: &str) -> IrResult<Self> {
        match s.strip_prefix(ERROR_PREFIX) {
            Some(rest) => Ok(Self {
                paulis: rest.parse()?,
                error: true,
            }),
            None => Ok(Self::clean(s.parse()?)),
        }
    }
}

impl fmt::Display for Conjugated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error {
            write!(f, "{ERROR_PREFIX}")?;
        }
        write!(f, "{}", self.paulis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_law() {
        use Pauli::{I, X, Y, Z};
        assert_eq!(X.compose(X), I);
        assert_eq!(X.compose(Y), Z);
        assert_eq!(X.compose(Z), Y);
        assert_eq!(Y.compose(Z), X);
        assert_eq!(Y.compose(X), Z);
        assert_eq!(Z.compose(Y), X);
        for p in Pauli::ALL {
            assert_eq!(p.compose(I), p);
            assert_eq!(I.compose(p), p);
            assert_eq!(p.compose(p), I);
        }
    }

    #[test]
    fn test_bits_render_through_ixzy() {
        for bits in 0..4u8 {
            let p = Pauli::from_bits(bits);
            assert_eq!(p.bits(), bits);
            assert_eq!(p.as_char(), LETTERS[bits as usize]);
        }
    }

    #[test]
    fn test_pauli_string_parse() {
        let s: PauliString = "IXYZ".parse().unwrap();
        assert_eq!(s.len(), 4);
        assert_eq!(s.to_string(), "IXYZ");
        assert!("IXQ".parse::<PauliString>().is_err());
        assert!(PauliString::identity(3).is_identity());
    }

    #[test]
    fn test_basis_vectors_recompose() {
        let s: PauliString = "YXIZ".parse().unwrap();
        let parts = s.basis_vectors();
        let rendered: Vec<String> = parts.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["XIII", "ZIII", "IXII", "IIIZ"]);

        let mut acc = PauliString::identity(4);
        for part in &parts {
            acc.compose_assign(part);
        }
        assert_eq!(acc, s);
    }

    #[test]
    fn test_conjugated_prefix() {
        let c: Conjugated = "ERR:XY".parse().unwrap();
        assert!(c.error);
        assert_eq!(c.paulis.to_string(), "XY");
        assert_eq!(c.to_string(), "ERR:XY");

        let plain: Conjugated = "Z".parse().unwrap();
        assert!(!plain.error);
        assert_eq!(plain.to_string(), "Z");
    }

    #[test]
    fn test_pauli_serde_is_a_letter() {
        assert_eq!(serde_json::to_string(&Pauli::Y).unwrap(), "\"Y\"");
        let p: Pauli = serde_json::from_str("\"Z\"").unwrap();
        assert_eq!(p, Pauli::Z);
    }
}
