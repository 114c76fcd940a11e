//! Marq Grader: Marker-Placement Exercises
//!
//! An exercise gives a reference circuit with an empty "mark layer" and the
//! errors a measurement layer should detect. A student answers by placing
//! Pauli markers (`MARKX(0)`, `MARKY(0)`, `MARKZ(0)`) on that layer; the
//! grader propagates them and compares the detected errors.
//!
//! # Pipeline
//!
//! ```text
//! [reference text] ──parse──┐
//!                           ├─> rotation search ─> mark-layer checks
//! [answer text] ────parse───┘                            |
//!                                                        v
//!                       splice marks into reference ─> propagate ─> verdict
//! ```
//!
//! Every answer-shaped problem ends in a [`GradingResponse`] with feedback;
//! only unreadable inputs produce a [`GradeError`].
//!
//! # Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//!
//! use marq_grade::{GraderConfig, grade_answer};
//! use marq_ir::{Pauli, QubitId};
//!
//! let config = GraderConfig {
//!     circuit: "QUBIT_COORDS(0,0) 0; QUBIT_COORDS(0.5,0.5) 1; X 0; TICK; TICK; H 1; \
//!               CX 0 1; TICK; M 0 1"
//!         .into(),
//!     errors: BTreeMap::from([(QubitId(0), Pauli::Y), (QubitId(1), Pauli::Y)]),
//!     mark_index: 1,
//!     measure_index: 4,
//! };
//! let answer = "QUBIT_COORDS(0,0) 0; QUBIT_COORDS(0.5,0.5) 1; X 0; TICK; MARKX(0) 0 1; \
//!               TICK; H 1; CX 0 1; TICK; M 0 1";
//!
//! let response = grade_answer(&config, answer).unwrap();
//! assert!(response.is_correct);
//! assert_eq!(response.feedback, "Correct, well done!");
//! ```

pub mod config;
pub mod error;
pub mod feedback;
pub mod grader;
pub mod response;

pub use config::{AnswerParseFailure, GraderConfig, GraderOptions, GradingRequest};
pub use error::{GradeError, GradeResult};
pub use feedback::{Verdict, render_errors};
pub use grader::{Grader, grade_answer};
pub use response::{FeedbackConfiguration, GradingResponse};
