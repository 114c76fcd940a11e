//! Error types for the circuit text parser.

use marq_ir::IrError;
use thiserror::Error;

/// Errors that can occur during parsing.
///
/// Line numbers count lines after `;` has been turned into a line break.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    LexerError { line: usize, message: String },

    /// Unexpected token.
    #[error("Unexpected token at line {line}: expected {expected}, found {found}")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Gate name not in the gate table.
    #[error("Unrecognized gate name '{name}' at line {line}")]
    UnknownGate { line: usize, name: String },

    /// Target count is not a multiple of the gate arity.
    #[error("Incorrect number of targets at line {line}: '{gate}' takes {arity} per operation, got {got}")]
    WrongTargetCount {
        line: usize,
        gate: String,
        arity: usize,
        got: usize,
    },

    /// A target that is not a qubit where a qubit is required.
    #[error("Invalid target '{target}' at line {line}")]
    InvalidTarget { line: usize, target: String },

    /// A measurement-record target on a gate that cannot be dropped.
    #[error("Measurement record target not supported by '{gate}' at line {line}")]
    RecordTarget { line: usize, gate: String },

    /// A `REPEAT` block without its closing brace.
    #[error("Repeat block didn't end (opened at line {line})")]
    UnterminatedRepeat { line: usize },

    /// A qubit id above [`MAX_QUBIT_ID`](crate::MAX_QUBIT_ID).
    #[error("Qubit {qubit} at line {line} is out of range (largest allowed id is {max})")]
    QubitOutOfRange { line: usize, qubit: u32, max: u32 },

    /// Unrolling `REPEAT` blocks takes more than
    /// [`MAX_UNROLLED_STEPS`](crate::MAX_UNROLLED_STEPS) steps.
    #[error("Repeat block at line {line} unrolls to more than {limit} steps")]
    RepeatTooLarge { line: usize, limit: usize },

    /// An operation rejected by the circuit model.
    #[error("Invalid operation at line {line}: {source}")]
    InvalidOperation {
        line: usize,
        #[source]
        source: IrError,
    },

    /// IR error during circuit construction.
    #[error("Circuit error: {0}")]
    CircuitError(#[from] IrError),
}

impl ParseError {
    /// The offending line, when known.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::LexerError { line, .. }
            | ParseError::UnexpectedToken { line, .. }
            | ParseError::UnknownGate { line, .. }
            | ParseError::WrongTargetCount { line, .. }
            | ParseError::InvalidTarget { line, .. }
            | ParseError::RecordTarget { line, .. }
            | ParseError::UnterminatedRepeat { line }
            | ParseError::QubitOutOfRange { line, .. }
            | ParseError::RepeatTooLarge { line, .. }
            | ParseError::InvalidOperation { line, .. } => Some(*line),
            ParseError::CircuitError(_) => None,
        }
    }
}

/// Result type for parsing operations.
pub type ParseResult<T> = Result<T, ParseError>;
