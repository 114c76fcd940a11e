//! End-to-end grading from request documents.

use marq_grade::{AnswerParseFailure, Grader, GraderOptions, GradingRequest, Verdict};
use marq_ir::Circuit;
use marq_stim::StimCircuitExt;
use proptest::prelude::*;

const REFERENCE: &str =
    "QUBIT_COORDS(0,0) 0; QUBIT_COORDS(0.5,0.5) 1; X 0; TICK; TICK; H 1; CX 0 1; TICK; M 0 1";

const ANSWER: &str = "QUBIT_COORDS(0,0) 0; QUBIT_COORDS(0.5,0.5) 1; X 0; TICK; MARKX(0) 0 1; \
                      TICK; H 1; CX 0 1; TICK; M 0 1";

fn request(answer: &str) -> GradingRequest {
    let json = serde_json::json!({
        "circuit": REFERENCE,
        "errors": {"0": "Y", "1": "Y"},
        "markIndex": 1,
        "measureIndex": 4,
        "answer": answer,
    });
    serde_json::from_value(json).unwrap()
}

#[test]
fn test_correct_answer_document() {
    let response = Grader::default().grade_request(&request(ANSWER)).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&response.to_json_pretty().unwrap()).unwrap();
    assert_eq!(value["isCorrect"], true);
    assert_eq!(value["feedback"], "Correct, well done!");
    assert_eq!(value["feedbackConfiguration"]["initIndex"], 1);
    assert_eq!(value["feedbackConfiguration"]["feedback"], "Correct, well done!");
}

#[test]
fn test_compact_answer_is_accepted() {
    let compact = Circuit::from_stim_circuit(ANSWER)
        .unwrap()
        .to_compact_stim_circuit();
    let response = Grader::default().grade_request(&request(&compact)).unwrap();
    assert_eq!(response.verdict, Verdict::Correct);
}

#[test]
fn test_exported_answer_is_accepted() {
    let export = marq_stim::to_stim_export(&Circuit::from_stim_circuit(ANSWER).unwrap());
    assert!(export.contains("#!pragma MARKX(0) 0 1"));
    let response = Grader::default().grade_request(&request(&export)).unwrap();
    assert_eq!(response.verdict, Verdict::Correct);
}

#[test]
fn test_reject_policy_reports_parse_errors() {
    let grader = Grader::new(GraderOptions {
        answer_parse_failure: AnswerParseFailure::Reject,
        ..GraderOptions::default()
    });
    let response = grader.grade_request(&request("H 0 1.5")).unwrap();
    assert!(!response.is_correct);
    assert_eq!(response.verdict, Verdict::UnreadableAnswer);
    assert_eq!(
        response.feedback_configuration.circuit,
        response.feedback_configuration.original_circuit
    );
}

proptest! {
    #[test]
    fn rotated_answers_grade_like_unrotated_ones(
        steps in 0_usize..8,
        basis in prop::sample::select(vec!["X", "Y", "Z"]),
    ) {
        let answer = ANSWER.replace("MARKX", &format!("MARK{basis}"));
        let expected = Grader::default().grade_request(&request(&answer)).unwrap().verdict;

        let rotated = Circuit::from_stim_circuit(&answer)
            .unwrap()
            .after_rotations_and_rectification(steps)
            .to_stim_circuit();
        let verdict = Grader::default().grade_request(&request(&rotated)).unwrap().verdict;
        prop_assert_eq!(verdict, expected);
    }
}
