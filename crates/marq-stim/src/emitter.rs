//! Canonical text emitter.

use std::cmp::Ordering;

use marq_ir::{Circuit, Operation, QubitId};
use rustc_hash::FxHashMap;

use crate::parser::PRAGMA_PREFIX;

/// Emit the canonical text of a circuit.
///
/// Only qubits used by some operation are written, renumbered by ascending
/// `(x, y, old id)`. Within a layer, operations are grouped by name and
/// arguments; fusable groups share one line. Groups are sorted by text with
/// marker groups last, markers without arguments ahead of indexed ones so
/// that reparsing places them in the same order. Every layer ends with
/// `TICK`, and trailing `TICK`s are dropped.
pub fn to_stim_circuit(circuit: &Circuit) -> String {
    let mut packed: Vec<(QubitId, f64, f64)> = circuit
        .all_qubits()
        .into_iter()
        .filter_map(|q| circuit.coord(q).map(|c| (q, c.x, c.y)))
        .collect();
    packed.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.2.partial_cmp(&b.2).unwrap_or(Ordering::Equal))
            .then_with(|| a.0.cmp(&b.0))
    });

    let mut out = Vec::new();
    let mut old_to_new = FxHashMap::default();
    for (new_id, &(old_id, x, y)) in packed.iter().enumerate() {
        old_to_new.insert(old_id, new_id);
        out.push(format!(
            "QUBIT_COORDS({}, {}) {new_id}",
            format_number(x),
            format_number(y)
        ));
    }

    for layer in circuit.layers() {
        let mut groups: Vec<(String, Vec<&Operation>)> = Vec::new();
        let mut index: FxHashMap<String, usize> = FxHashMap::default();
        for op in layer.iter() {
            let key = group_key(op);
            match index.get(&key) {
                Some(&k) => groups[k].1.push(op),
                None => {
                    index.insert(key.clone(), groups.len());
                    groups.push((key, vec![op]));
                }
            }
        }
        groups.sort_by(|(a, _), (b, _)| {
            marker_rank(a)
                .cmp(&marker_rank(b))
                .then_with(|| a.cmp(b))
        });

        for (key, ops) in &groups {
            let fusable = ops.first().is_some_and(|op| op.gate().is_fusable());
            let target_groups: Vec<Vec<QubitId>> = if fusable {
                vec![ops.iter().flat_map(|op| op.targets().iter().copied()).collect()]
            } else {
                ops.iter().map(|op| op.targets().to_vec()).collect()
            };
            for targets in target_groups {
                let mut line = key.clone();
                for t in targets {
                    if let Some(new_id) = old_to_new.get(&t) {
                        line.push(' ');
                        line.push_str(&new_id.to_string());
                    }
                }
                out.push(line);
            }
        }
        out.push("TICK".to_string());
    }
    while out.last().is_some_and(|line| line == "TICK") {
        out.pop();
    }

    out.join("\n")
}

/// Emit the compact shorthand: `Q(x,y)q` lines, `_` for spaces, `;` for
/// line breaks.
pub fn to_compact_stim_circuit(circuit: &Circuit) -> String {
    to_stim_circuit(circuit)
        .replace("QUBIT_COORDS", "Q")
        .replace(", ", ",")
        .replace(") ", ")")
        .replace(' ', "_")
        .replace('\n', ";")
}

/// Emit canonical text with marker lines behind `#!pragma`, so that Stim
/// reads them as comments.
pub fn to_stim_export(circuit: &Circuit) -> String {
    to_stim_circuit(circuit)
        .split('\n')
        .map(|line| {
            if line.starts_with("MARK") || line.starts_with("POLYGON") {
                format!("{PRAGMA_PREFIX}{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format a number the way the circuit text writes it: shortest round-trip
/// digits, no fractional part for integers, `0` for negative zero, and
/// exponent notation only for very large or very small magnitudes.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".into();
    }
    if v.is_nan() {
        return "NaN".into();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.into();
    }
    let magnitude = v.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{v}");
    }
    let exp = format!("{v:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

fn group_key(op: &Operation) -> String {
    let mut key = op.name().to_string();
    if !op.args().is_empty() {
        let args: Vec<String> = op.args().iter().map(|&a| format_number(a)).collect();
        key.push('(');
        key.push_str(&args.join(","));
        key.push(')');
    }
    key
}

/// 0 for gates, 1 for markers without arguments, 2 for the rest.
fn marker_rank(key: &str) -> u8 {
    match (key.starts_with("MARK") || key.starts_with("POLY"), key.contains('(')) {
        (false, _) => 0,
        (true, false) => 1,
        (true, true) => 2,
    }
}
