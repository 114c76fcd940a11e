//! Pauli frame propagation.
//!
//! A frame is a sparse map from qubit to Pauli, absence meaning identity.
//! Propagation starts from an empty frame, pushes it through every layer in
//! order and lets markers of one chosen index inject Paulis along the way.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::IrResult;
use crate::pauli::{ERROR_PREFIX, Pauli};
use crate::qubit::QubitId;

/// One qubit's entry in a frame right after a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameEntry {
    /// The tracked Pauli.
    pub pauli: Pauli,
    /// Whether the layer forced a detected error on this qubit.
    pub error: bool,
}

impl FrameEntry {
    /// An entry without the error flag.
    pub fn clean(pauli: Pauli) -> Self {
        Self {
            pauli,
            error: false,
        }
    }
}

impl fmt::Display for FrameEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.error {
            write!(f, "{ERROR_PREFIX}")?;
        }
        write!(f, "{}", self.pauli)
    }
}

/// Color of a two-qubit gate that changed the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrossingColor {
    /// Every changed letter, before and after, was this Pauli.
    Basis(Pauli),
    /// The changed letters disagree.
    Ambiguous,
}

/// A two-qubit gate whose targets saw the frame change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crossing {
    /// First target.
    pub q1: QubitId,
    /// Second target.
    pub q2: QubitId,
    /// Highlight color.
    pub color: CrossingColor,
}

/// Propagation result after one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagatedLayer {
    /// Non-identity Paulis carried out of the layer.
    pub bases: BTreeMap<QubitId, Pauli>,
    /// Qubits on which the layer detected an error.
    pub errors: BTreeSet<QubitId>,
    /// Two-qubit gates that changed the frame.
    pub crossings: Vec<Crossing>,
}

impl PropagatedLayer {
    /// True if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty() && self.errors.is_empty() && self.crossings.is_empty()
    }
}

/// Per-layer propagation results for one marker index.
///
/// Only layers where something happened are stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagatedPauliFrames {
    layers: BTreeMap<usize, PropagatedLayer>,
    layer_count: usize,
}

impl PropagatedPauliFrames {
    /// Propagate the markers with index `marker_index` through `circuit`.
    ///
    /// Errors are carried forward with their Pauli: a qubit forced into an
    /// error keeps its letter in `bases` for later layers.
    pub fn from_circuit(circuit: &Circuit, marker_index: u32) -> IrResult<Self> {
        let marker_index = f64::from(marker_index);
        let mut layers = BTreeMap::new();
        let mut bases: BTreeMap<QubitId, Pauli> = BTreeMap::new();

        for (k, layer) in circuit.layers().iter().enumerate() {
            let after = layer.frame_after(&bases, marker_index)?;
            let prev = std::mem::take(&mut bases);

            let mut errors = BTreeSet::new();
            for (q, entry) in after {
                if entry.error {
                    errors.insert(q);
                }
                if !entry.pauli.is_identity() {
                    bases.insert(q, entry.pauli);
                }
            }

            let mut crossings = Vec::new();
            for op in layer.operations() {
                let &[q1, q2] = op.targets() else {
                    continue;
                };
                let mut differences = BTreeSet::new();
                for t in [q1, q2] {
                    let now = bases.get(&t);
                    let was = prev.get(&t);
                    if now != was {
                        differences.extend(now.copied());
                        differences.extend(was.copied());
                    }
                }
                let color = match differences.len() {
                    0 => continue,
                    1 => differences
                        .first()
                        .map_or(CrossingColor::Ambiguous, |&p| CrossingColor::Basis(p)),
                    _ => CrossingColor::Ambiguous,
                };
                crossings.push(Crossing { q1, q2, color });
            }

            let result = PropagatedLayer {
                bases: bases.clone(),
                errors,
                crossings,
            };
            if !result.is_empty() {
                layers.insert(k, result);
            }
        }

        Ok(Self {
            layers,
            layer_count: circuit.layers().len(),
        })
    }

    /// The result after layer `k`; empty when nothing was recorded there.
    pub fn at_layer(&self, k: usize) -> PropagatedLayer {
        self.layers.get(&k).cloned().unwrap_or_default()
    }

    /// Stored layers in order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &PropagatedLayer)> {
        self.layers.iter().map(|(&k, v)| (k, v))
    }

    /// Number of layers in the propagated circuit.
    pub fn layer_count(&self) -> usize {
        self.layer_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::Layer;
    use crate::operation::Operation;
    use crate::qubit::Coord;

    fn op(name: &str, args: &[f64], targets: &[u32]) -> Operation {
        Operation::named(name, args.to_vec(), targets.iter().map(|&t| QubitId(t))).unwrap()
    }

    fn circuit(layers: Vec<Vec<Operation>>, num_qubits: u32) -> Circuit {
        let coords = (0..num_qubits).map(|q| Coord::new(f64::from(q), 0.0)).collect();
        let layers = layers
            .into_iter()
            .map(|ops| {
                let mut layer = Layer::new();
                for op in ops {
                    layer.put(op, false).unwrap();
                }
                layer
            })
            .collect();
        Circuit::new(coords, layers).unwrap()
    }

    fn bases(layer: &PropagatedLayer) -> Vec<(u32, Pauli)> {
        layer.bases.iter().map(|(q, p)| (q.0, *p)).collect()
    }

    #[test]
    fn test_regression_example_frames() {
        let c = circuit(
            vec![
                vec![op("X", &[], &[0])],
                vec![op("MARKX", &[0.0], &[0]), op("MARKX", &[0.0], &[1])],
                vec![op("H", &[], &[1])],
                vec![op("CX", &[], &[0, 1])],
                vec![op("M", &[], &[0]), op("M", &[], &[1])],
            ],
            2,
        );
        let frames = PropagatedPauliFrames::from_circuit(&c, 0).unwrap();
        assert_eq!(frames.layer_count(), 5);
        assert!(frames.at_layer(0).is_empty());
        assert_eq!(bases(&frames.at_layer(1)), vec![(0, Pauli::X), (1, Pauli::X)]);
        assert_eq!(bases(&frames.at_layer(2)), vec![(0, Pauli::X), (1, Pauli::Z)]);

        let l3 = frames.at_layer(3);
        assert_eq!(bases(&l3), vec![(0, Pauli::Y), (1, Pauli::Y)]);
        assert_eq!(l3.crossings.len(), 1);
        assert_eq!(l3.crossings[0].color, CrossingColor::Ambiguous);

        let l4 = frames.at_layer(4);
        assert_eq!(l4.errors.iter().map(|q| q.0).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(bases(&l4), vec![(0, Pauli::Y), (1, Pauli::Y)]);
    }

    #[test]
    fn test_other_marker_index_is_ignored() {
        let c = circuit(
            vec![vec![op("MARKZ", &[1.0], &[0])], vec![op("H", &[], &[0])]],
            1,
        );
        let frames = PropagatedPauliFrames::from_circuit(&c, 0).unwrap();
        assert_eq!(frames.iter().count(), 0);

        let frames = PropagatedPauliFrames::from_circuit(&c, 1).unwrap();
        assert_eq!(bases(&frames.at_layer(1)), vec![(0, Pauli::X)]);
    }

    #[test]
    fn test_identity_is_dropped_and_reset_errors() {
        let c = circuit(
            vec![
                vec![op("MARKX", &[0.0], &[0]), op("MARKZ", &[0.0], &[1])],
                vec![op("R", &[], &[0]), op("MARKZ", &[0.0], &[1])],
            ],
            2,
        );
        let frames = PropagatedPauliFrames::from_circuit(&c, 0).unwrap();
        let l1 = frames.at_layer(1);
        assert!(l1.bases.is_empty());
        assert_eq!(l1.errors.iter().copied().collect::<Vec<_>>(), vec![QubitId(0)]);
    }

    #[test]
    fn test_single_letter_crossing() {
        let c = circuit(
            vec![
                vec![op("MARKX", &[0.0], &[0])],
                vec![op("CX", &[], &[0, 1])],
            ],
            2,
        );
        let frames = PropagatedPauliFrames::from_circuit(&c, 0).unwrap();
        let l1 = frames.at_layer(1);
        assert_eq!(bases(&l1), vec![(0, Pauli::X), (1, Pauli::X)]);
        assert_eq!(
            l1.crossings,
            vec![Crossing {
                q1: QubitId(0),
                q2: QubitId(1),
                color: CrossingColor::Basis(Pauli::X),
            }]
        );
    }

    #[test]
    fn test_propagation_is_deterministic() {
        let c = circuit(
            vec![
                vec![op("MARKY", &[0.0], &[0]), op("MARKX", &[0.0], &[2])],
                vec![op("ISWAP", &[], &[0, 1]), op("SQRT_X", &[], &[2])],
                vec![op("MXX", &[], &[1, 2])],
            ],
            3,
        );
        let a = PropagatedPauliFrames::from_circuit(&c, 0).unwrap();
        let b = PropagatedPauliFrames::from_circuit(&c, 0).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_frames_serialize() {
        let c = circuit(vec![vec![op("MARKX", &[0.0], &[0])]], 1);
        let frames = PropagatedPauliFrames::from_circuit(&c, 0).unwrap();
        let json = serde_json::to_value(&frames).unwrap();
        assert_eq!(json["layers"]["0"]["bases"]["0"], "X");
    }
}
