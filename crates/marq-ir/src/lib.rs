//! Marq Stabilizer Circuit Model
//!
//! This crate provides the data structures behind the marq circuit editor:
//! a fixed table of Clifford gates, measurements, resets and annotation
//! markers, layered circuits over qubits placed on a plane, and the Pauli
//! frame propagation that drives marker highlighting and grading.
//!
//! # Core Components
//!
//! - **Paulis**: [`Pauli`], [`PauliString`] and [`Conjugated`] (a string plus
//!   an error flag raised by measurements and resets)
//! - **Gates**: [`Gate`] with its conjugation table, looked up by name
//! - **Operations**: [`Operation`], a gate bound to args and targets
//! - **Layers**: [`Layer`], at most one gate per qubit plus markers
//! - **Circuits**: [`Circuit`], layers plus a coordinate table, with
//!   rotation and rectification
//! - **Propagation**: [`PropagatedPauliFrames`]
//!
//! # Example: Propagating a Marker
//!
//! ```rust
//! use marq_ir::{Circuit, Coord, Layer, Operation, Pauli, PropagatedPauliFrames, QubitId};
//!
//! let mut mark = Layer::new();
//! mark.put(Operation::named("MARKX", vec![0.0], [QubitId(0)]).unwrap(), false).unwrap();
//! let mut cx = Layer::new();
//! cx.put(Operation::named("CX", vec![], [QubitId(0), QubitId(1)]).unwrap(), false).unwrap();
//!
//! let coords = vec![Coord::new(0.0, 0.0), Coord::new(1.0, 0.0)];
//! let circuit = Circuit::new(coords, vec![mark, cx]).unwrap();
//!
//! let frames = PropagatedPauliFrames::from_circuit(&circuit, 0).unwrap();
//! assert_eq!(frames.at_layer(1).bases.get(&QubitId(1)), Some(&Pauli::X));
//! ```
//!
//! # Gate Families
//!
//! | Family | Gates |
//! |--------|-------|
//! | Pauli | `I`, `X`, `Y`, `Z` |
//! | Hadamard-like | `H`, `H_XY`, `H_YZ` |
//! | Axis cycles | `C_XYZ`, `C_ZYX` |
//! | Square roots | `S`, `SQRT_X`, `SQRT_Y` and daggers |
//! | Controlled | `CX`, `CY`, `CZ`, `XCX`, `XCY`, `YCY`, `CXSWAP` |
//! | Pair roots | `SQRT_XX`, `SQRT_YY`, `SQRT_ZZ` and daggers |
//! | Swaps | `SWAP`, `ISWAP`, `ISWAP_DAG` |
//! | Measurement | `M`, `MX`, `MY`, `MR`, `MRX`, `MRY`, `MXX`, `MYY`, `MZZ` |
//! | Reset | `R`, `RX`, `RY` |
//! | Markers | `MARKX`, `MARKY`, `MARKZ`, `MARK`, `POLYGON` |

pub mod circuit;
pub mod error;
pub mod frame;
pub mod gate;
pub mod layer;
pub mod operation;
pub mod pauli;
pub mod qubit;

pub use circuit::{Circuit, CoordTransform, Excision, rotated45_transform};
pub use error::{IrError, IrResult};
pub use frame::{Crossing, CrossingColor, FrameEntry, PropagatedLayer, PropagatedPauliFrames};
pub use gate::{ConjugationTable, GATES, Gate, GateFamily};
pub use layer::Layer;
pub use operation::Operation;
pub use pauli::{Conjugated, ERROR_PREFIX, Pauli, PauliString};
pub use qubit::{Coord, CoordKey, QubitId};
