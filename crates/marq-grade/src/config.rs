//! Grading configuration and request documents.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use marq_ir::{Pauli, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::GradeResult;

/// One exercise: a reference circuit, where marks go, and what they must
/// produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraderConfig {
    /// Reference circuit text.
    pub circuit: String,
    /// Expected error letter per qubit at the measurement layer.
    #[serde(deserialize_with = "error_map::deserialize")]
    pub errors: BTreeMap<QubitId, Pauli>,
    /// Layer where the answer places its marks.
    pub mark_index: usize,
    /// Layer whose propagated errors are checked.
    pub measure_index: usize,
}

/// Qubit keys arrive as strings in JSON and as integers in YAML, and a
/// flattened request buffers them before they reach `QubitId`.
mod error_map {
    use std::collections::BTreeMap;

    use marq_ir::{Pauli, QubitId};
    use serde::de::Error;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize, PartialEq, Eq, PartialOrd, Ord)]
    #[serde(untagged)]
    enum Key {
        Index(u32),
        Text(String),
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<BTreeMap<QubitId, Pauli>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<Key, Pauli>::deserialize(deserializer)?;
        raw.into_iter()
            .map(|(key, pauli)| {
                let id = match key {
                    Key::Index(id) => id,
                    Key::Text(text) => text.trim().parse().map_err(|_| {
                        D::Error::custom(format!("qubit key '{text}' is not a qubit index"))
                    })?,
                };
                Ok((QubitId(id), pauli))
            })
            .collect()
    }
}

/// What to do with an answer that is not valid circuit text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerParseFailure {
    /// Return the parse error to the caller.
    #[default]
    Propagate,
    /// Report an incorrect answer with the parse error as feedback.
    Reject,
}

impl fmt::Display for AnswerParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerParseFailure::Propagate => write!(f, "propagate"),
            AnswerParseFailure::Reject => write!(f, "reject"),
        }
    }
}

impl FromStr for AnswerParseFailure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "propagate" => Ok(AnswerParseFailure::Propagate),
            "reject" => Ok(AnswerParseFailure::Reject),
            other => Err(format!(
                "unknown answer parse policy '{other}' (expected 'propagate' or 'reject')"
            )),
        }
    }
}

/// Grader behavior knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraderOptions {
    /// Policy for unparseable answers.
    pub answer_parse_failure: AnswerParseFailure,
    /// How many 45 degree rotations to try when matching the answer to the
    /// reference. Eight covers a full turn.
    pub rotations: usize,
}

impl Default for GraderOptions {
    fn default() -> Self {
        Self {
            answer_parse_failure: AnswerParseFailure::Propagate,
            rotations: 8,
        }
    }
}

/// A configuration and an answer in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradingRequest {
    /// The exercise.
    #[serde(flatten)]
    pub config: GraderConfig,
    /// Candidate circuit text.
    pub answer: String,
}

impl GradingRequest {
    /// Read a request from JSON.
    pub fn from_json(text: &str) -> GradeResult<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_shape() {
        let json = r#"{
            "circuit": "H 0",
            "errors": {"0": "Y", "3": "X"},
            "markIndex": 1,
            "measureIndex": 4
        }"#;
        let config: GraderConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.mark_index, 1);
        assert_eq!(config.measure_index, 4);
        assert_eq!(config.errors.get(&QubitId(0)), Some(&Pauli::Y));
        assert_eq!(config.errors.get(&QubitId(3)), Some(&Pauli::X));

        let back = serde_json::to_value(&config).unwrap();
        assert_eq!(back["errors"]["3"], "X");
        assert_eq!(back["markIndex"], 1);
    }

    #[test]
    fn test_request_flattens_config() {
        let json = r#"{"circuit": "H 0", "errors": {}, "markIndex": 0, "measureIndex": 0, "answer": "X 0"}"#;
        let request = GradingRequest::from_json(json).unwrap();
        assert_eq!(request.config.circuit, "H 0");
        assert_eq!(request.answer, "X 0");

        let json = r#"{"circuit": "H 0", "errors": {"1": "Z"}, "markIndex": 0, "measureIndex": 0, "answer": ""}"#;
        let request = GradingRequest::from_json(json).unwrap();
        assert_eq!(request.config.errors.get(&QubitId(1)), Some(&Pauli::Z));
    }

    #[test]
    fn test_bad_qubit_key_is_rejected() {
        let json = r#"{"circuit": "", "errors": {"a": "Z"}, "markIndex": 0, "measureIndex": 0}"#;
        assert!(serde_json::from_str::<GraderConfig>(json).is_err());
    }

    #[test]
    fn test_options_defaults() {
        let options: GraderOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, GraderOptions::default());
        assert_eq!(options.rotations, 8);

        let options: GraderOptions =
            serde_json::from_str(r#"{"answerParseFailure": "reject"}"#).unwrap();
        assert_eq!(options.answer_parse_failure, AnswerParseFailure::Reject);
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Reject".parse::<AnswerParseFailure>(), Ok(AnswerParseFailure::Reject));
        assert_eq!("propagate".parse::<AnswerParseFailure>(), Ok(AnswerParseFailure::Propagate));
        assert!("ignore".parse::<AnswerParseFailure>().is_err());
    }
}
