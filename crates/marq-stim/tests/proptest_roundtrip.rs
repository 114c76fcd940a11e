//! Property-based tests for circuit text round-trips.
//!
//! Circuits are generated as text, parsed once, and then pushed through the
//! emitter, the compact form and the coordinate transforms.

use std::collections::BTreeSet;

use marq_ir::{Circuit, PropagatedPauliFrames};
use marq_stim::{parse, to_compact_stim_circuit, to_stim_circuit};
use proptest::prelude::*;

/// One line of generated circuit text.
#[derive(Debug, Clone)]
enum Line {
    Single(&'static str, u32),
    Pair(&'static str, u32, u32),
    Marker(char, Option<u8>, u32),
    Tick,
}

impl Line {
    fn render(&self) -> String {
        match self {
            Line::Single(name, q) => format!("{name} {q}"),
            Line::Pair(name, a, b) => format!("{name} {a} {b}"),
            Line::Marker(basis, Some(index), q) => format!("MARK{basis}({index}) {q}"),
            Line::Marker(basis, None, q) => format!("MARK{basis} {q}"),
            Line::Tick => "TICK".to_string(),
        }
    }
}

const SINGLE: &[&str] = &["H", "S", "SQRT_X", "SQRT_X_DAG", "S_DAG", "X", "Z", "M", "R"];
const PAIR: &[&str] = &["CX", "CZ", "SWAP"];

fn arb_line(num_qubits: u32) -> BoxedStrategy<Line> {
    let single = (prop::sample::select(SINGLE), 0..num_qubits)
        .prop_map(|(name, q)| Line::Single(name, q));
    let marker = (
        prop::sample::select(vec!['X', 'Y', 'Z']),
        prop::option::of(0_u8..3),
        0..num_qubits,
    )
        .prop_map(|(basis, index, q)| Line::Marker(basis, index, q));
    if num_qubits < 2 {
        return prop_oneof![single, marker, Just(Line::Tick)].boxed();
    }
    let pair = (prop::sample::select(PAIR), 0..num_qubits, 1..num_qubits)
        .prop_map(move |(name, a, d)| Line::Pair(name, a, (a + d) % num_qubits));
    prop_oneof![3 => single, 2 => pair, 1 => marker, 2 => Just(Line::Tick)].boxed()
}

/// Circuit text over distinct integer positions, touching every qubit.
fn arb_circuit_text() -> impl Strategy<Value = String> {
    prop::collection::btree_set((0_u8..=6, 0_u8..=6), 1..=5).prop_flat_map(
        |positions: BTreeSet<(u8, u8)>| {
            let positions: Vec<(u8, u8)> = positions.into_iter().collect();
            let n = u32::try_from(positions.len()).unwrap();
            prop::collection::vec(arb_line(n), 0..=12).prop_map(move |lines| {
                let mut text: Vec<String> = positions
                    .iter()
                    .enumerate()
                    .map(|(q, (x, y))| format!("QUBIT_COORDS({x}, {y}) {q}"))
                    .collect();
                text.push(format!(
                    "R {}",
                    (0..n).map(|q| q.to_string()).collect::<Vec<_>>().join(" ")
                ));
                text.push("TICK".to_string());
                text.extend(lines.iter().map(Line::render));
                text.join("\n")
            })
        },
    )
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    arb_circuit_text().prop_map(|text| parse(&text).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn canonical_text_is_a_fixed_point(circuit in arb_circuit()) {
        let text = to_stim_circuit(&circuit);
        let reparsed = parse(&text).unwrap();
        prop_assert_eq!(to_stim_circuit(&reparsed), text);
    }

    #[test]
    fn compact_form_round_trips(circuit in arb_circuit()) {
        let compact = to_compact_stim_circuit(&circuit);
        prop_assert!(!compact.contains(' '));
        prop_assert!(!compact.contains('\n'));
        let reparsed = parse(&compact).unwrap();
        prop_assert_eq!(to_stim_circuit(&reparsed), to_stim_circuit(&circuit));
    }

    #[test]
    fn full_turn_returns_rectified_circuit(circuit in arb_circuit()) {
        let rectified = circuit.after_rectification();
        // Only circuits already in rectified form are closed under a full turn.
        prop_assume!(rectified.after_rectification() == rectified);
        let turned = rectified.after_rotations_and_rectification(8);
        prop_assert_eq!(to_stim_circuit(&turned), to_stim_circuit(&rectified));
    }

    #[test]
    fn propagation_ignores_coordinates(circuit in arb_circuit()) {
        let direct = PropagatedPauliFrames::from_circuit(&circuit, 0).ok();
        let rotated = PropagatedPauliFrames::from_circuit(&circuit.rotated45(), 0).ok();
        prop_assert_eq!(direct, rotated);
    }

    #[test]
    fn layer_count_survives_emission(circuit in arb_circuit()) {
        let reparsed = parse(&to_stim_circuit(&circuit)).unwrap();
        let trailing_empty = circuit
            .layers()
            .iter()
            .rev()
            .take_while(|layer| layer.is_empty())
            .count();
        prop_assert_eq!(reparsed.depth(), circuit.depth() - trailing_empty);
    }
}
