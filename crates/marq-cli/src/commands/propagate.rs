//! Propagate command implementation.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use console::style;
use marq_ir::{Crossing, CrossingColor, Pauli, PropagatedLayer, PropagatedPauliFrames, QubitId};

use super::common::load_circuit;

/// Execute the propagate command.
pub fn execute(input: &str, marker: u32, layer: Option<usize>, json: bool) -> Result<()> {
    let circuit = load_circuit(input)?;
    let frames = PropagatedPauliFrames::from_circuit(&circuit, marker)
        .with_context(|| format!("Failed to propagate markers with index {marker}"))?;

    if json {
        let text = match layer {
            Some(k) => serde_json::to_string_pretty(&frames.at_layer(k))?,
            None => serde_json::to_string_pretty(&frames)?,
        };
        println!("{text}");
        return Ok(());
    }

    if let Some(k) = layer {
        print_layer(k, &frames.at_layer(k));
        return Ok(());
    }

    println!(
        "{} Marker {} through {} layers",
        style("→").cyan().bold(),
        style(marker).yellow(),
        frames.layer_count()
    );
    let mut printed = false;
    for (k, result) in frames.iter() {
        print_layer(k, result);
        printed = true;
    }
    if !printed {
        println!("  (no markers with index {marker})");
    }

    Ok(())
}

fn print_layer(k: usize, result: &PropagatedLayer) {
    println!("{}", style(format!("layer {k}")).bold());
    println!("  bases:     {}", render_bases(&result.bases));
    if !result.errors.is_empty() {
        println!("  errors:    {}", style(render_errors(&result.errors)).red());
    }
    if !result.crossings.is_empty() {
        let crossings: Vec<String> = result.crossings.iter().map(render_crossing).collect();
        println!("  crossings: {}", crossings.join(" "));
    }
}

fn render_bases(bases: &BTreeMap<QubitId, Pauli>) -> String {
    let entries: Vec<String> = bases.iter().map(|(q, p)| format!("{q}:{p}")).collect();
    format!("{{{}}}", entries.join(","))
}

fn render_errors(errors: &BTreeSet<QubitId>) -> String {
    let entries: Vec<String> = errors.iter().map(ToString::to_string).collect();
    format!("{{{}}}", entries.join(","))
}

fn render_crossing(crossing: &Crossing) -> String {
    let color = match crossing.color {
        CrossingColor::Basis(p) => p.to_string(),
        CrossingColor::Ambiguous => "?".to_string(),
    };
    format!("{}-{}:{color}", crossing.q1, crossing.q2)
}
