//! A single time slice of a circuit.

use std::collections::BTreeMap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};
use crate::frame::FrameEntry;
use crate::operation::Operation;
use crate::pauli::{Pauli, PauliString};
use crate::qubit::QubitId;

/// One time slice.
///
/// Real gates live in an arena and are found through a qubit index; every
/// target of an operation points at the same slot, so no qubit is ever held by
/// two operations. Evicted slots become tombstones, keeping the append order of
/// the survivors stable; [`Layer::copy`] compacts them.
///
/// Markers are kept in a separate list and may overlap freely.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    slots: Vec<Option<Operation>>,
    occupancy: FxHashMap<QubitId, usize>,
    markers: Vec<Operation>,
}

impl Layer {
    /// Create an empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the layer holds neither gates nor markers.
    pub fn is_empty(&self) -> bool {
        self.occupancy.is_empty() && self.markers.is_empty()
    }

    /// A compacted deep copy.
    #[must_use]
    pub fn copy(&self) -> Layer {
        let mut result = Layer::new();
        for op in self.operations() {
            result.insert(op.clone());
        }
        result.markers = self.markers.clone();
        result
    }

    /// Place an operation.
    ///
    /// X/Y/Z markers first replace any X/Y/Z marker with the same index on
    /// their qubit; other markers are appended. A gate whose targets are
    /// already occupied either evicts the occupants (whole operations, along
    /// with the markers on the contested qubits) or, when `allow_overwrite` is
    /// false, fails with [`IrError::Collision`] and leaves the layer untouched.
    pub fn put(&mut self, op: Operation, allow_overwrite: bool) -> IrResult<()> {
        if op.is_marker() {
            if op.marker_pauli().is_some() {
                if let Some(&q) = op.targets().first() {
                    self.drop_markers_at(q, op.marker_index());
                }
            }
            self.markers.push(op);
            return Ok(());
        }

        if !allow_overwrite {
            if let Some((q, occupant)) = op
                .targets()
                .iter()
                .find_map(|&q| self.op_at(q).map(|occupant| (q, occupant)))
            {
                return Err(IrError::Collision {
                    qubit: q,
                    gate_name: op.name().to_string(),
                    occupant: occupant.name().to_string(),
                });
            }
        }
        for &t in op.targets() {
            if self.occupancy.contains_key(&t) {
                self.pop_at(t);
            }
        }
        self.insert(op);
        Ok(())
    }

    fn insert(&mut self, op: Operation) {
        let slot = self.slots.len();
        for &t in op.targets() {
            self.occupancy.insert(t, slot);
        }
        self.slots.push(Some(op));
    }

    /// Remove the gate occupying `qubit` (all of its targets are freed) and
    /// every marker touching `qubit`.
    pub fn pop_at(&mut self, qubit: QubitId) -> Option<Operation> {
        self.markers.retain(|m| !m.acts_on(qubit));
        let slot = self.occupancy.remove(&qubit)?;
        let op = self.slots.get_mut(slot).and_then(Option::take)?;
        for t in op.targets() {
            self.occupancy.remove(t);
        }
        Some(op)
    }

    /// Remove X/Y/Z markers on `qubit`, restricted to one marker index when
    /// `index` is given.
    pub fn drop_markers_at(&mut self, qubit: QubitId, index: Option<f64>) {
        self.markers.retain(|m| {
            if let Some(index) = index {
                if m.marker_index() != Some(index) {
                    return true;
                }
            }
            m.marker_pauli().is_none() || m.targets().first() != Some(&qubit)
        });
    }

    /// The gate occupying `qubit`, if any.
    pub fn op_at(&self, qubit: QubitId) -> Option<&Operation> {
        self.occupancy
            .get(&qubit)
            .and_then(|&slot| self.slots.get(slot))
            .and_then(Option::as_ref)
    }

    /// Gates in append order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        self.slots.iter().flatten()
    }

    /// Markers in append order.
    pub fn markers(&self) -> &[Operation] {
        &self.markers
    }

    /// Every gate once, then every marker.
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations().chain(self.markers.iter())
    }

    /// Qubits touched by a gate or a marker.
    pub fn touched_qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.iter().flat_map(|op| op.targets().iter().copied())
    }

    /// A layer holding only the operations accepted by `predicate`.
    #[must_use]
    pub fn filtered(&self, mut predicate: impl FnMut(&Operation) -> bool) -> Layer {
        let mut result = Layer::new();
        for op in self.operations() {
            if predicate(op) {
                result.insert(op.clone());
            }
        }
        result.markers = self
            .markers
            .iter()
            .filter(|&m| predicate(m))
            .cloned()
            .collect();
        result
    }

    /// A layer holding only the operations with at least one target accepted
    /// by `predicate`.
    #[must_use]
    pub fn filtered_by_qubit(&self, mut predicate: impl FnMut(QubitId) -> bool) -> Layer {
        self.filtered(|op| op.targets().iter().any(|&q| predicate(q)))
    }

    /// The same layer without markers.
    #[must_use]
    pub fn without_markers(&self) -> Layer {
        self.filtered(|op| !op.is_marker())
    }

    /// The same layer with every qubit renamed through `f`.
    pub fn remapped(&self, mut f: impl FnMut(QubitId) -> Option<QubitId>) -> IrResult<Layer> {
        let mut result = Layer::new();
        for op in self.operations() {
            result.put(op.remapped(&mut f)?, false)?;
        }
        for m in &self.markers {
            result.markers.push(m.remapped(&mut f)?);
        }
        Ok(result)
    }

    /// Push a Pauli frame through this layer.
    ///
    /// Every operation touched by the frame is conjugated once, reading the
    /// frame on all of its targets (absent = `I`). Untouched entries pass
    /// through. Afterwards every X/Y/Z marker whose index equals
    /// `marker_index` multiplies its Pauli into the entry at its qubit;
    /// entries already flagged as errors are left alone.
    pub fn frame_after(
        &self,
        before: &BTreeMap<QubitId, Pauli>,
        marker_index: f64,
    ) -> IrResult<BTreeMap<QubitId, FrameEntry>> {
        let mut after = BTreeMap::new();
        let mut handled: FxHashSet<usize> = FxHashSet::default();

        for (&q, &pauli) in before {
            let Some(&slot) = self.occupancy.get(&q) else {
                after.insert(q, FrameEntry::clean(pauli));
                continue;
            };
            if !handled.insert(slot) {
                continue;
            }
            let Some(op) = self.slots.get(slot).and_then(Option::as_ref) else {
                continue;
            };

            let basis: PauliString = op
                .targets()
                .iter()
                .map(|t| before.get(t).copied().unwrap_or_default())
                .collect();
            let image = op.pauli_frame_after(&basis)?;
            for (&t, p) in op.targets().iter().zip(image.paulis.iter()) {
                after.insert(
                    t,
                    FrameEntry {
                        pauli: p,
                        error: image.error,
                    },
                );
            }
        }

        for m in &self.markers {
            let Some(toggle) = m.marker_pauli() else {
                continue;
            };
            if m.marker_index() != Some(marker_index) {
                continue;
            }
            let Some(&q) = m.targets().first() else {
                continue;
            };
            let entry = after.entry(q).or_insert_with(|| FrameEntry::clean(Pauli::I));
            if !entry.error {
                entry.pauli = entry.pauli.compose(toggle);
            }
        }

        Ok(after)
    }
}

impl PartialEq for Layer {
    fn eq(&self, other: &Self) -> bool {
        self.operations().eq(other.operations()) && self.markers == other.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(name: &str, args: &[f64], targets: &[u32]) -> Operation {
        Operation::named(name, args.to_vec(), targets.iter().map(|&t| QubitId(t))).unwrap()
    }

    fn frame(entries: &[(u32, Pauli)]) -> BTreeMap<QubitId, Pauli> {
        entries.iter().map(|&(q, p)| (QubitId(q), p)).collect()
    }

    fn render(after: &BTreeMap<QubitId, FrameEntry>) -> Vec<String> {
        after.iter().map(|(q, e)| format!("{q}:{e}")).collect()
    }

    #[test]
    fn test_put_and_occupancy() {
        let mut layer = Layer::new();
        assert!(layer.is_empty());
        layer.put(op("CX", &[], &[0, 1]), true).unwrap();
        assert_eq!(layer.op_at(QubitId(1)).unwrap().name(), "CX");
        assert!(layer.op_at(QubitId(2)).is_none());
        assert!(!layer.is_empty());
    }

    #[test]
    fn test_collision_without_overwrite() {
        let mut layer = Layer::new();
        layer.put(op("CX", &[], &[0, 1]), true).unwrap();
        let err = layer.put(op("H", &[], &[1]), false).unwrap_err();
        assert!(matches!(err, IrError::Collision { qubit: QubitId(1), .. }));
        assert_eq!(layer.op_at(QubitId(0)).unwrap().name(), "CX");
    }

    #[test]
    fn test_overwrite_evicts_whole_operation() {
        let mut layer = Layer::new();
        layer.put(op("CX", &[], &[0, 1]), true).unwrap();
        layer.put(op("H", &[], &[1]), true).unwrap();
        assert!(layer.op_at(QubitId(0)).is_none());
        assert_eq!(layer.op_at(QubitId(1)).unwrap().name(), "H");
        assert_eq!(layer.operations().count(), 1);
    }

    #[test]
    fn test_pop_at_removes_markers() {
        let mut layer = Layer::new();
        layer.put(op("SWAP", &[], &[2, 3]), true).unwrap();
        layer.put(op("MARKX", &[0.0], &[3]), true).unwrap();
        layer.put(op("MARKZ", &[0.0], &[4]), true).unwrap();
        let popped = layer.pop_at(QubitId(3)).unwrap();
        assert_eq!(popped.name(), "SWAP");
        assert!(layer.op_at(QubitId(2)).is_none());
        assert_eq!(layer.markers().len(), 1);
        assert!(layer.pop_at(QubitId(3)).is_none());
    }

    #[test]
    fn test_marker_replaces_same_index() {
        let mut layer = Layer::new();
        layer.put(op("MARKX", &[0.0], &[5]), true).unwrap();
        layer.put(op("MARKX", &[1.0], &[5]), true).unwrap();
        layer.put(op("MARKZ", &[0.0], &[5]), true).unwrap();
        let names: Vec<_> = layer
            .markers()
            .iter()
            .map(|m| (m.name(), m.marker_index()))
            .collect();
        assert_eq!(names, vec![("MARKX", Some(1.0)), ("MARKZ", Some(0.0))]);

        layer.put(op("MARK", &[0.0], &[5]), true).unwrap();
        layer.put(op("MARK", &[0.0], &[5]), true).unwrap();
        assert_eq!(layer.markers().len(), 4);
    }

    #[test]
    fn test_drop_markers_at() {
        let mut layer = Layer::new();
        layer.put(op("MARKX", &[0.0], &[1]), true).unwrap();
        layer.put(op("MARKY", &[2.0], &[1]), true).unwrap();
        layer.put(op("MARKY", &[2.0], &[2]), true).unwrap();
        layer.drop_markers_at(QubitId(1), Some(2.0));
        assert_eq!(layer.markers().len(), 2);
        layer.drop_markers_at(QubitId(1), None);
        assert_eq!(layer.markers().len(), 1);
        assert_eq!(layer.markers()[0].targets(), &[QubitId(2)]);
    }

    #[test]
    fn test_iter_yields_each_gate_once() {
        let mut layer = Layer::new();
        layer.put(op("CX", &[], &[0, 1]), true).unwrap();
        layer.put(op("H", &[], &[2]), true).unwrap();
        layer.put(op("MARKX", &[0.0], &[0]), true).unwrap();
        let names: Vec<_> = layer.iter().map(Operation::name).collect();
        assert_eq!(names, vec!["CX", "H", "MARKX"]);
    }

    #[test]
    fn test_copy_compacts_and_preserves_order() {
        let mut layer = Layer::new();
        layer.put(op("H", &[], &[0]), true).unwrap();
        layer.put(op("S", &[], &[1]), true).unwrap();
        layer.put(op("X", &[], &[2]), true).unwrap();
        layer.pop_at(QubitId(1));
        let copy = layer.copy();
        assert_eq!(copy, layer);
        assert_eq!(copy.slots.len(), 2);
        let names: Vec<_> = copy.operations().map(Operation::name).collect();
        assert_eq!(names, vec!["H", "X"]);
    }

    #[test]
    fn test_filtered_by_qubit() {
        let mut layer = Layer::new();
        layer.put(op("CX", &[], &[0, 1]), true).unwrap();
        layer.put(op("H", &[], &[2]), true).unwrap();
        layer.put(op("MARKZ", &[0.0], &[2]), true).unwrap();
        let kept = layer.filtered_by_qubit(|q| q == QubitId(1));
        assert_eq!(kept.iter().count(), 1);
        assert_eq!(kept.op_at(QubitId(0)).unwrap().name(), "CX");
        assert!(layer.without_markers().markers().is_empty());
    }

    #[test]
    fn test_frame_through_gates() {
        let mut layer = Layer::new();
        layer.put(op("CX", &[], &[0, 1]), true).unwrap();
        layer.put(op("H", &[], &[2]), true).unwrap();
        let after = layer
            .frame_after(&frame(&[(0, Pauli::X), (2, Pauli::Z), (5, Pauli::Y)]), 0.0)
            .unwrap();
        assert_eq!(render(&after), vec!["0:X", "1:X", "2:X", "5:Y"]);
    }

    #[test]
    fn test_frame_error_flag() {
        let mut layer = Layer::new();
        layer.put(op("M", &[], &[0]), true).unwrap();
        layer.put(op("MZZ", &[], &[1, 2]), true).unwrap();
        let after = layer
            .frame_after(&frame(&[(0, Pauli::Y), (1, Pauli::X)]), 0.0)
            .unwrap();
        assert_eq!(render(&after), vec!["0:ERR:Y", "1:ERR:X", "2:ERR:I"]);
    }

    #[test]
    fn test_marker_toggles() {
        let mut layer = Layer::new();
        layer.put(op("MARKX", &[0.0], &[0]), true).unwrap();
        layer.put(op("MARKZ", &[0.0], &[1]), true).unwrap();
        layer.put(op("MARKY", &[1.0], &[2]), true).unwrap();
        let after = layer
            .frame_after(&frame(&[(1, Pauli::X), (2, Pauli::X)]), 0.0)
            .unwrap();
        assert_eq!(render(&after), vec!["0:X", "1:Y", "2:X"]);
    }

    #[test]
    fn test_marker_leaves_errors_alone() {
        let mut layer = Layer::new();
        layer.put(op("M", &[], &[0]), true).unwrap();
        layer.put(op("MARKZ", &[0.0], &[0]), true).unwrap();
        let after = layer.frame_after(&frame(&[(0, Pauli::X)]), 0.0).unwrap();
        assert_eq!(render(&after), vec!["0:ERR:X"]);
    }

    #[test]
    fn test_remapped() {
        let mut layer = Layer::new();
        layer.put(op("CZ", &[], &[0, 1]), true).unwrap();
        layer.put(op("MARKX", &[0.0], &[1]), true).unwrap();
        let moved = layer.remapped(|q| Some(QubitId(q.0 * 2))).unwrap();
        assert_eq!(moved.op_at(QubitId(2)).unwrap().name(), "CZ");
        assert_eq!(moved.markers()[0].targets(), &[QubitId(2)]);
    }
}
