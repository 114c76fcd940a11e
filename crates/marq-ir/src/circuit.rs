//! Circuits: layers plus a qubit coordinate table.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};
use crate::layer::Layer;
use crate::qubit::{Coord, CoordKey, QubitId};

const MAX_LATTICE_STEP: f64 = 256.0;
const MIN_LATTICE_STEP: f64 = 1.0 / 256.0;

/// An ordered list of layers over qubits placed on a plane.
///
/// Qubit `q` sits at `qubit_coords()[q]`. Every qubit used by an operation
/// has coordinates; [`Circuit::new`] checks this. Transforms never mutate:
/// they return a new circuit with copied layers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Circuit {
    qubit_coords: Vec<Coord>,
    layers: Vec<Layer>,
}

impl Circuit {
    /// Create a circuit, checking that every used qubit has coordinates.
    pub fn new(qubit_coords: Vec<Coord>, layers: Vec<Layer>) -> IrResult<Self> {
        for layer in &layers {
            for op in layer.iter() {
                if let Some(&q) = op.targets().iter().find(|q| q.index() >= qubit_coords.len()) {
                    return Err(IrError::MissingCoordinates {
                        qubit: q,
                        gate_name: Some(op.name().to_string()),
                    });
                }
            }
        }
        Ok(Self {
            qubit_coords,
            layers,
        })
    }

    /// The coordinate table, indexed by qubit id.
    pub fn qubit_coords(&self) -> &[Coord] {
        &self.qubit_coords
    }

    /// Coordinates of one qubit.
    pub fn coord(&self, qubit: QubitId) -> Option<Coord> {
        self.qubit_coords.get(qubit.index()).copied()
    }

    /// Number of entries in the coordinate table.
    pub fn num_qubits(&self) -> usize {
        self.qubit_coords.len()
    }

    /// The layers in time order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Consume the circuit, keeping its layers.
    pub fn into_layers(self) -> Vec<Layer> {
        self.layers
    }

    /// Qubits touched by any gate or marker.
    pub fn all_qubits(&self) -> BTreeSet<QubitId> {
        self.layers.iter().flat_map(Layer::touched_qubits).collect()
    }

    /// Map from exact position to qubit. Later ids win on duplicates.
    pub fn coord_to_qubit_map(&self) -> FxHashMap<CoordKey, QubitId> {
        self.qubit_coords
            .iter()
            .zip(0u32..)
            .map(|(c, q)| (c.key(), QubitId(q)))
            .collect()
    }

    /// Same coordinates, new layers.
    pub fn with_layers(&self, layers: Vec<Layer>) -> IrResult<Circuit> {
        Circuit::new(self.qubit_coords.clone(), layers)
    }

    /// Apply `f` to every coordinate. Qubit ids are unchanged.
    #[must_use]
    pub fn after_coord_transform(&self, f: impl Fn(Coord) -> Coord) -> Circuit {
        Circuit {
            qubit_coords: self.qubit_coords.iter().map(|&c| f(c)).collect(),
            layers: self.layers.iter().map(Layer::copy).collect(),
        }
    }

    /// Rotate by 45 degrees, scaling by √2: `(x, y) -> (x - y, x + y)`.
    #[must_use]
    pub fn rotated45(&self) -> Circuit {
        self.after_coord_transform(|c| Coord::new(c.x - c.y, c.x + c.y))
    }

    /// Apply [`rotated45_transform`].
    #[must_use]
    pub fn rotated(&self, steps: i32) -> Circuit {
        self.after_coord_transform(rotated45_transform(steps))
    }

    /// Translate by `(dx, dy)`.
    #[must_use]
    pub fn shifted(&self, dx: f64, dy: f64) -> Circuit {
        self.after_coord_transform(|c| Coord::new(c.x + dx, c.y + dy))
    }

    /// A deep copy.
    #[must_use]
    pub fn copy(&self) -> Circuit {
        self.shifted(0.0, 0.0)
    }

    /// The transform that moves the coordinates onto the canonical lattice.
    ///
    /// The lattice step is the largest power of two in `[1/256, 256]` that
    /// divides every coordinate. Coordinates are translated so the minimum x
    /// and y become zero and scaled by the inverse step. A point set that only
    /// occupies one diagonal parity class (a 45°-rotated lattice) is scaled by
    /// a further half; for the odd class the origin is first moved back a step.
    pub fn coord_transform_for_rectification(&self) -> CoordTransform {
        let mut seen = BTreeSet::new();
        let points: Vec<Coord> = self
            .qubit_coords
            .iter()
            .copied()
            .filter(|c| seen.insert(c.key()))
            .collect();
        if points.is_empty() {
            return CoordTransform::identity();
        }

        let mut min_x = f64::INFINITY;
        let mut min_y = f64::INFINITY;
        let mut step = MAX_LATTICE_STEP;
        for c in &points {
            min_x = min_x.min(c.x);
            min_y = min_y.min(c.y);
            while (c.x % step != 0.0 || c.y % step != 0.0) && step > MIN_LATTICE_STEP {
                step /= 2.0;
            }
        }

        let mut scale = 1.0;
        if step > MIN_LATTICE_STEP {
            scale = 1.0 / step;
            let mut mask = 0u8;
            for c in &points {
                let b1 = (c.x - min_x + c.y - min_y) % (2.0 * step);
                let b2 = (c.x - min_x - c.y + min_y) % (2.0 * step);
                mask |= if b1 == 0.0 { 1 } else { 2 };
                mask |= if b2 == 0.0 { 4 } else { 8 };
            }
            if mask == 1 | 4 {
                scale /= 2.0;
            } else if mask == 2 | 8 {
                min_x -= step;
                scale /= 2.0;
            }
        }

        CoordTransform {
            offset_x: -min_x,
            offset_y: -min_y,
            scale,
        }
    }

    /// Move the coordinates onto the canonical lattice.
    #[must_use]
    pub fn after_rectification(&self) -> Circuit {
        let transform = self.coord_transform_for_rectification();
        self.after_coord_transform(|c| transform.apply(c))
    }

    /// Rotate by 45 degrees and rectify, `count` times.
    #[must_use]
    pub fn after_rotations_and_rectification(&self, count: usize) -> Circuit {
        let mut result = self.copy();
        for _ in 0..count {
            result = result.rotated45().after_rectification();
        }
        result
    }

    /// Append the positions not yet present as new qubits.
    #[must_use]
    pub fn with_coords_included(&self, coords: impl IntoIterator<Item = Coord>) -> Circuit {
        let mut known: FxHashSet<CoordKey> =
            self.qubit_coords.iter().map(|c| c.key()).collect();
        let mut qubit_coords = self.qubit_coords.clone();
        for c in coords {
            if known.insert(c.key()) {
                qubit_coords.push(c);
            }
        }
        Circuit {
            qubit_coords,
            layers: self.layers.iter().map(Layer::copy).collect(),
        }
    }

    /// The same circuit with every marker removed.
    #[must_use]
    pub fn without_markers(&self) -> Circuit {
        Circuit {
            qubit_coords: self.qubit_coords.clone(),
            layers: self.layers.iter().map(Layer::without_markers).collect(),
        }
    }

    /// Split around the layer at `index`.
    pub fn excise(&self, index: usize) -> Excision {
        let split = index.min(self.layers.len());
        let after = index.saturating_add(1).min(self.layers.len());
        Excision {
            pre: Circuit {
                qubit_coords: self.qubit_coords.clone(),
                layers: self.layers[..split].iter().map(Layer::copy).collect(),
            },
            layer: self.layers.get(index).map(Layer::copy),
            post: Circuit {
                qubit_coords: self.qubit_coords.clone(),
                layers: self.layers[after..].iter().map(Layer::copy).collect(),
            },
        }
    }
}

/// A circuit cut around one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Excision {
    /// Layers before the cut.
    pub pre: Circuit,
    /// The layer at the cut, if the circuit was deep enough.
    pub layer: Option<Layer>,
    /// Layers after the cut.
    pub post: Circuit,
}

impl Excision {
    /// Rejoin `pre` and `post` around a replacement layer.
    pub fn spliced(&self, layer: Layer) -> IrResult<Circuit> {
        let layers = self
            .pre
            .layers
            .iter()
            .map(Layer::copy)
            .chain(std::iter::once(layer))
            .chain(self.post.layers.iter().map(Layer::copy))
            .collect();
        self.pre.with_layers(layers)
    }
}

/// Translate-then-scale map produced by rectification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordTransform {
    /// Added to x before scaling.
    pub offset_x: f64,
    /// Added to y before scaling.
    pub offset_y: f64,
    /// Multiplier applied after translation.
    pub scale: f64,
}

impl CoordTransform {
    /// The map that changes nothing.
    pub const fn identity() -> Self {
        Self {
            offset_x: 0.0,
            offset_y: 0.0,
            scale: 1.0,
        }
    }

    /// Map one point.
    pub fn apply(&self, c: Coord) -> Coord {
        Coord::new(
            (c.x + self.offset_x) * self.scale,
            (c.y + self.offset_y) * self.scale,
        )
    }
}

/// `steps` applications of `(x, y) -> (x - y, x + y)`, as one linear map.
///
/// `steps` is taken modulo 8; negative values are allowed.
pub fn rotated45_transform(steps: i32) -> impl Fn(Coord) -> Coord {
    let mut vx = (1.0, 0.0);
    let mut vy = (0.0, 1.0);
    let rotate = |(x, y): (f64, f64)| (x - y, x + y);
    for _ in 0..steps.rem_euclid(8) {
        vx = rotate(vx);
        vy = rotate(vy);
    }
    move |c: Coord| Coord::new(vx.0 * c.x + vy.0 * c.y, vx.1 * c.x + vy.1 * c.y)
}
