//! Grader error types.

use thiserror::Error;

/// Result type for grading operations.
pub type GradeResult<T> = Result<T, GradeError>;

/// Errors that stop grading before a verdict is reached.
///
/// Answer-shaped problems are verdicts, not errors. Only an unreadable
/// reference, an unreadable answer under [`AnswerParseFailure::Propagate`]
/// and malformed request documents end up here.
///
/// [`AnswerParseFailure::Propagate`]: crate::AnswerParseFailure::Propagate
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GradeError {
    /// The reference circuit text could not be parsed.
    #[error("Reference circuit is invalid: {0}")]
    ReferenceParse(#[source] marq_stim::ParseError),

    /// The answer text could not be parsed.
    #[error("Answer circuit is invalid: {0}")]
    AnswerParse(#[source] marq_stim::ParseError),

    /// A circuit operation failed while assembling the graded circuit.
    #[error("Circuit error: {0}")]
    Ir(#[from] marq_ir::IrError),

    /// A request or response document could not be (de)serialized.
    #[error("Document error: {0}")]
    Document(#[from] serde_json::Error),
}
