//! Verdicts and the feedback text shown for each.

use std::collections::BTreeMap;
use std::fmt;

use marq_ir::{Pauli, QubitId};
use serde::{Deserialize, Serialize};

/// Outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    /// The marks produce the expected errors.
    Correct,
    /// The reference's mark layer is not empty.
    ConfigurationError,
    /// The answer changed the circuit beyond adding marks.
    Illformed,
    /// A marker carries an index other than 0.
    WrongMarkerIndex,
    /// The marks produce different errors.
    WrongErrors,
    /// The answer text could not be parsed.
    UnreadableAnswer,
}

impl Verdict {
    /// Whether the answer is accepted.
    pub fn is_correct(self) -> bool {
        self == Verdict::Correct
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verdict::Correct => "correct",
            Verdict::ConfigurationError => "configuration error",
            Verdict::Illformed => "illformed",
            Verdict::WrongMarkerIndex => "wrong marker index",
            Verdict::WrongErrors => "wrong errors",
            Verdict::UnreadableAnswer => "unreadable answer",
        };
        write!(f, "{name}")
    }
}

pub(crate) const CORRECT: &str = "Correct, well done!";

pub(crate) const CONFIGURATION_ERROR: &str =
    "Incorrect grader configuration. Please contact instructors";

pub(crate) const WRONG_MARKER_INDEX: &str = "Incorrect. Please only use the 1-tagged markers: \
The X1, Y1 and Z1 buttons/hotkeys, which appear as MARKX(0), MARKY(0) and MARKZ(0) in the \
import/export panel.";

pub(crate) fn illformed(mark_index: usize) -> String {
    format!(
        "Incorrect. Please do not modify the circuit except by adding marks on layer {mark_index}"
    )
}

pub(crate) fn unreadable_answer(error: &impl fmt::Display) -> String {
    format!("Incorrect. Your answer could not be read as a circuit: {error}")
}

pub(crate) fn wrong_errors(
    observed: &BTreeMap<QubitId, Pauli>,
    measure_index: usize,
    expected: &BTreeMap<QubitId, Pauli>,
) -> String {
    format!(
        "Incorrect. Your circuit yielded the following errors on each qubit index: {} on layer \
         {measure_index}.  Please yield these errors instead: {}",
        render_errors(observed),
        render_errors(expected)
    )
}

/// `{0:Y,1:Y}`: a JSON object without quotes, keys ascending.
pub fn render_errors(errors: &BTreeMap<QubitId, Pauli>) -> String {
    let entries: Vec<String> = errors.iter().map(|(q, p)| format!("{q}:{p}")).collect();
    format!("{{{}}}", entries.join(","))
}
