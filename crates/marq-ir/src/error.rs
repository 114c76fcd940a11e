//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A non-marker operation was placed on a qubit that is already occupied
    /// and overwriting was not allowed.
    #[error("Qubit {qubit} is already occupied by {occupant} (placing {gate_name})")]
    Collision {
        /// The contested qubit.
        qubit: QubitId,
        /// Name of the gate that was being placed.
        gate_name: String,
        /// Name of the gate already occupying the qubit.
        occupant: String,
    },

    /// No gate with this name exists in the gate table.
    #[error("Unknown gate '{0}'")]
    UnknownGate(String),

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A qubit is referenced by an operation but has no coordinates.
    #[error("Qubit {qubit} has no coordinates{}", format_gate_context(.gate_name))]
    MissingCoordinates {
        /// The qubit without coordinates.
        qubit: QubitId,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A qubit could not be mapped into another circuit.
    #[error("Qubit {0} has no counterpart in the target circuit")]
    UnmappedQubit(QubitId),

    /// A basis string contained a character outside `IXYZ`.
    #[error("Invalid basis string '{0}'")]
    InvalidBasis(String),

    /// A basis string length does not match the gate arity.
    #[error("Basis '{basis}' has length {got} but gate '{gate_name}' acts on {expected} qubits")]
    BasisLengthMismatch {
        /// Name of the gate.
        gate_name: String,
        /// The offending basis.
        basis: String,
        /// Arity of the gate.
        expected: usize,
        /// Length of the basis.
        got: usize,
    },

    /// A conjugation rule has no entry for a basis vector it needs.
    #[error("Gate '{gate_name}' has no conjugation entry for '{basis}'")]
    MissingConjugation {
        /// Name of the gate.
        gate_name: String,
        /// The basis vector that was looked up.
        basis: String,
    },
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
