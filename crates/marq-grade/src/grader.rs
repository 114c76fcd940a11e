//! The grading algorithm.

use std::collections::BTreeMap;

use marq_ir::{Circuit, IrError, Layer, Pauli, PropagatedPauliFrames, QubitId};
use marq_stim::{ParseError, parse, to_stim_circuit};
use tracing::{debug, info};

use crate::config::{AnswerParseFailure, GraderConfig, GraderOptions, GradingRequest};
use crate::error::{GradeError, GradeResult};
use crate::feedback::{self, Verdict};
use crate::response::GradingResponse;

/// Grades marker-placement answers against a reference circuit.
#[derive(Debug, Clone, Default)]
pub struct Grader {
    options: GraderOptions,
}

impl Grader {
    /// Create a grader with the given options.
    pub fn new(options: GraderOptions) -> Self {
        Self { options }
    }

    /// The options in use.
    pub fn options(&self) -> &GraderOptions {
        &self.options
    }

    /// Grade a request document.
    pub fn grade_request(&self, request: &GradingRequest) -> GradeResult<GradingResponse> {
        self.grade(&request.config, &request.answer)
    }

    /// Grade `answer` against `config`.
    ///
    /// The answer must equal the reference, up to rotation, once markers are
    /// removed. Its markers must all carry index 0 and sit in the mark layer.
    /// Those markers, spliced into the reference and propagated, must yield
    /// exactly the expected errors at the measurement layer.
    pub fn grade(&self, config: &GraderConfig, answer: &str) -> GradeResult<GradingResponse> {
        let reference = parse(&config.circuit).map_err(GradeError::ReferenceParse)?;
        let reference_text = to_stim_circuit(&reference);
        let mark_index = config.mark_index;
        let stop = |verdict: Verdict, text: String| {
            finish(verdict, text, reference_text.clone(), mark_index, &reference_text)
        };

        let answer = match parse(answer) {
            Ok(circuit) => circuit,
            Err(e) => return self.unreadable(e, &stop),
        };
        debug!(
            qubits = answer.num_qubits(),
            depth = answer.depth(),
            "parsed answer"
        );

        let rotations = self.rotations_to_match(&answer, &reference);
        debug!(?rotations, "rotation search finished");

        let reference_cut = reference.excise(mark_index);
        if !reference_cut.layer.as_ref().is_some_and(Layer::is_empty) {
            debug!(mark_index, "reference mark layer is missing or occupied");
            return Ok(stop(
                Verdict::ConfigurationError,
                feedback::CONFIGURATION_ERROR.to_string(),
            ));
        }

        let Some(rotations) = rotations else {
            return Ok(stop(Verdict::Illformed, feedback::illformed(mark_index)));
        };

        if !markers_use_index_zero(&answer) {
            return Ok(stop(
                Verdict::WrongMarkerIndex,
                feedback::WRONG_MARKER_INDEX.to_string(),
            ));
        }

        let aligned = answer.after_rotations_and_rectification(rotations);
        let answer_cut = aligned.excise(mark_index);
        let same_context = to_stim_circuit(&answer_cut.pre) == to_stim_circuit(&reference_cut.pre)
            && to_stim_circuit(&answer_cut.post) == to_stim_circuit(&reference_cut.post);
        if !same_context {
            debug!("layers around the mark layer differ");
            return Ok(stop(Verdict::Illformed, feedback::illformed(mark_index)));
        }

        // The marker-free match above leaves only markers in this layer.
        let mark_layer = answer_cut.layer.unwrap_or_default();

        let by_coord = reference.coord_to_qubit_map();
        let remapped = mark_layer.remapped(|q| {
            aligned
                .coord(q)
                .and_then(|c| by_coord.get(&c.key()).copied())
        });
        let mark_layer = match remapped {
            Ok(layer) => layer,
            Err(IrError::UnmappedQubit(q)) => {
                debug!(%q, "mark placed off the reference circuit");
                return Ok(stop(Verdict::Illformed, feedback::illformed(mark_index)));
            }
            Err(e) => return Err(e.into()),
        };

        let spliced = reference_cut.spliced(mark_layer)?;
        let observed = errors_at(&spliced, config.measure_index)?;
        debug!(
            observed = %feedback::render_errors(&observed),
            expected = %feedback::render_errors(&config.errors),
            "compared errors at measurement layer"
        );

        let (verdict, text) = if observed == config.errors {
            (Verdict::Correct, feedback::CORRECT.to_string())
        } else {
            (
                Verdict::WrongErrors,
                feedback::wrong_errors(&observed, config.measure_index, &config.errors),
            )
        };
        Ok(finish(
            verdict,
            text,
            to_stim_circuit(&spliced),
            mark_index,
            &reference_text,
        ))
    }

    fn unreadable(
        &self,
        error: ParseError,
        stop: &impl Fn(Verdict, String) -> GradingResponse,
    ) -> GradeResult<GradingResponse> {
        match self.options.answer_parse_failure {
            AnswerParseFailure::Propagate => Err(GradeError::AnswerParse(error)),
            AnswerParseFailure::Reject => Ok(stop(
                Verdict::UnreadableAnswer,
                feedback::unreadable_answer(&error),
            )),
        }
    }

    /// Smallest number of rotate-and-rectify steps that makes the marker-free
    /// answer read the same as the marker-free reference.
    fn rotations_to_match(&self, answer: &Circuit, reference: &Circuit) -> Option<usize> {
        let target = to_stim_circuit(&reference.without_markers());
        let mut candidate = answer.without_markers();
        for k in 0..self.options.rotations {
            if to_stim_circuit(&candidate) == target {
                return Some(k);
            }
            candidate = candidate.rotated45().after_rectification();
        }
        None
    }
}

/// Grade with default options.
pub fn grade_answer(config: &GraderConfig, answer: &str) -> GradeResult<GradingResponse> {
    Grader::default().grade(config, answer)
}

fn finish(
    verdict: Verdict,
    feedback: String,
    circuit: String,
    init_index: usize,
    original_circuit: &str,
) -> GradingResponse {
    info!(%verdict, layer = init_index, "graded answer");
    GradingResponse::new(
        verdict,
        feedback,
        circuit,
        init_index,
        original_circuit.to_string(),
    )
}

/// Every marker must be written with the single argument 0.
fn markers_use_index_zero(circuit: &Circuit) -> bool {
    circuit
        .layers()
        .iter()
        .flat_map(Layer::markers)
        .all(|m| m.args() == [0.0])
}

/// Errored qubits at layer `k` with the Pauli they carry; `I` when none.
fn errors_at(circuit: &Circuit, k: usize) -> GradeResult<BTreeMap<QubitId, Pauli>> {
    let frames = PropagatedPauliFrames::from_circuit(circuit, 0)?;
    let layer = frames.at_layer(k);
    Ok(layer
        .errors
        .iter()
        .map(|&q| (q, layer.bases.get(&q).copied().unwrap_or(Pauli::I)))
        .collect())
}
