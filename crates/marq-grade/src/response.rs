//! Grading response document.

use serde::{Deserialize, Serialize};

use crate::error::GradeResult;
use crate::feedback::Verdict;

/// What the editor needs to show the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackConfiguration {
    /// Canonical text of the graded circuit, or of the reference when
    /// grading stopped early.
    pub circuit: String,
    /// The mark layer.
    pub init_index: usize,
    /// Canonical text of the reference.
    pub original_circuit: String,
    /// Same as [`GradingResponse::feedback`].
    pub feedback: String,
    /// Same as [`GradingResponse::is_correct`].
    pub is_correct: bool,
}

/// Result of grading one answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GradingResponse {
    /// Whether the answer is accepted.
    pub is_correct: bool,
    /// Human-readable explanation.
    pub feedback: String,
    /// Editor state for displaying the feedback.
    pub feedback_configuration: FeedbackConfiguration,
    /// The outcome, for callers and logs. Not part of the document.
    #[serde(skip)]
    pub verdict: Verdict,
}

impl GradingResponse {
    pub(crate) fn new(
        verdict: Verdict,
        feedback: String,
        circuit: String,
        init_index: usize,
        original_circuit: String,
    ) -> Self {
        let is_correct = verdict.is_correct();
        Self {
            is_correct,
            feedback: feedback.clone(),
            feedback_configuration: FeedbackConfiguration {
                circuit,
                init_index,
                original_circuit,
                feedback,
                is_correct,
            },
            verdict,
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> GradeResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_json_shape() {
        let response = GradingResponse::new(
            Verdict::Correct,
            "Correct, well done!".into(),
            "H 0".into(),
            1,
            "X 0".into(),
        );
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["isCorrect"], true);
        assert_eq!(value["feedback"], "Correct, well done!");
        assert_eq!(value["feedbackConfiguration"]["circuit"], "H 0");
        assert_eq!(value["feedbackConfiguration"]["initIndex"], 1);
        assert_eq!(value["feedbackConfiguration"]["originalCircuit"], "X 0");
        assert_eq!(value["feedbackConfiguration"]["isCorrect"], true);
        assert!(value.get("verdict").is_none());
    }
}
