//! Grade command implementation.
//!
//! `marq grade --config <exercise.json|yaml> [--answer <answer.stim>] [--reject-unparseable]`

use anyhow::{Context, Result};
use console::style;
use serde::Deserialize;

use marq_grade::{AnswerParseFailure, Grader, GraderConfig, GraderOptions};

use super::common::{load_document, read_text};

/// Exit code for a graded but incorrect answer.
pub const INCORRECT_EXIT_CODE: i32 = 2;

/// An exercise, optionally carrying its answer.
#[derive(Deserialize)]
struct ExerciseDocument {
    #[serde(flatten)]
    config: GraderConfig,
    answer: Option<String>,
}

/// Execute the grade command. Returns the process exit code.
pub fn execute(config: &str, answer: Option<&str>, policy: AnswerParseFailure) -> Result<i32> {
    let document: ExerciseDocument = load_document(config)?;
    let answer = match answer {
        Some(path) => read_text(path)?,
        None => document.answer.with_context(|| {
            format!("No answer given: pass --answer or add an `answer` field to {config}")
        })?,
    };

    let grader = Grader::new(GraderOptions {
        answer_parse_failure: policy,
        ..GraderOptions::default()
    });
    let response = grader
        .grade(&document.config, &answer)
        .context("Grading failed")?;

    println!("{}", response.to_json_pretty()?);

    if response.is_correct {
        eprintln!("{} {}", style("✓").green().bold(), response.feedback);
        Ok(0)
    } else {
        eprintln!(
            "{} {} ({})",
            style("✗").red().bold(),
            response.feedback,
            response.verdict
        );
        Ok(INCORRECT_EXIT_CODE)
    }
}
