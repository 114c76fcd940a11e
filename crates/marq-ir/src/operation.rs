//! Operations: gates bound to arguments and targets.

use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::pauli::{Conjugated, Pauli, PauliString};
use crate::qubit::QubitId;

/// A gate applied to an ordered list of qubits.
///
/// Operations are immutable once built. Target order is significant: for
/// controlled gates the control comes first.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    gate: Gate,
    args: Vec<f64>,
    targets: Vec<QubitId>,
}

impl Operation {
    /// Create an operation, checking the target count against the gate arity.
    ///
    /// Non-marker operations may not name a qubit twice.
    pub fn new(
        gate: Gate,
        args: Vec<f64>,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        let targets: Vec<QubitId> = targets.into_iter().collect();
        if let Some(arity) = gate.arity() {
            if targets.len() != arity {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected: arity,
                    got: targets.len(),
                });
            }
        }
        if !gate.is_marker() {
            for (i, q) in targets.iter().enumerate() {
                if targets[..i].contains(q) {
                    return Err(IrError::DuplicateQubit {
                        qubit: *q,
                        gate_name: Some(gate.name().to_string()),
                    });
                }
            }
        }
        Ok(Self {
            gate,
            args,
            targets,
        })
    }

    /// Look the gate up by name and build the operation.
    pub fn named(
        name: &str,
        args: Vec<f64>,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<Self> {
        let gate = Gate::by_name(name).ok_or_else(|| IrError::UnknownGate(name.to_string()))?;
        Self::new(*gate, args, targets)
    }

    /// The gate.
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Shorthand for the gate name.
    pub fn name(&self) -> &'static str {
        self.gate.name()
    }

    /// Arguments in order.
    pub fn args(&self) -> &[f64] {
        &self.args
    }

    /// Targets in order.
    pub fn targets(&self) -> &[QubitId] {
        &self.targets
    }

    /// Whether the gate is a marker.
    pub fn is_marker(&self) -> bool {
        self.gate.is_marker()
    }

    /// The marker channel, i.e. the first argument.
    pub fn marker_index(&self) -> Option<f64> {
        self.args.first().copied()
    }

    /// The Pauli toggled by an X/Y/Z marker.
    pub fn marker_pauli(&self) -> Option<Pauli> {
        self.gate.marker_pauli()
    }

    /// Whether this operation touches `qubit`.
    pub fn acts_on(&self, qubit: QubitId) -> bool {
        self.targets.contains(&qubit)
    }

    /// Conjugate a basis string given in target order.
    pub fn pauli_frame_after(&self, before: &PauliString) -> IrResult<Conjugated> {
        if before.len() != self.targets.len() {
            return Err(IrError::BasisLengthMismatch {
                gate_name: self.gate.name().to_string(),
                basis: before.to_string(),
                expected: self.targets.len(),
                got: before.len(),
            });
        }
        self.gate.conjugate(before)
    }

    /// The same operation with its targets renamed.
    pub fn remapped(&self, mut f: impl FnMut(QubitId) -> Option<QubitId>) -> IrResult<Self> {
        let targets = self
            .targets
            .iter()
            .map(|&q| f(q).ok_or(IrError::UnmappedQubit(q)))
            .collect::<IrResult<Vec<_>>>()?;
        Self::new(self.gate, self.args.clone(), targets)
    }
}
