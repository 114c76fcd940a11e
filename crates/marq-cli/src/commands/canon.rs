//! Canon command implementation.

use anyhow::Result;
use marq_stim::{to_compact_stim_circuit, to_stim_circuit, to_stim_export};
use tracing::info;

use super::common::load_circuit;

/// Execute the canon command.
pub fn execute(input: &str, rotate: usize, compact: bool, export: bool) -> Result<()> {
    let circuit = load_circuit(input)?;
    info!(
        qubits = circuit.num_qubits(),
        depth = circuit.depth(),
        "loaded {input}"
    );

    let circuit = if rotate > 0 {
        circuit.after_rotations_and_rectification(rotate)
    } else {
        circuit
    };

    let text = if compact {
        to_compact_stim_circuit(&circuit)
    } else if export {
        to_stim_export(&circuit)
    } else {
        to_stim_circuit(&circuit)
    };
    println!("{text}");

    Ok(())
}
