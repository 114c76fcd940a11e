//! The gate table.
//!
//! Every gate the editor understands is described once, in [`GATES`], as
//! plain data. Conjugation rules are tables from basis vectors to their images
//! and are interpreted by [`Gate::conjugate`].

use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use rustc_hash::FxHashMap;

use crate::error::{IrError, IrResult};
use crate::pauli::{Conjugated, Pauli, PauliString};

/// A conjugation rule: basis string to image, images optionally `ERR:`-prefixed.
pub type ConjugationTable = &'static [(&'static str, &'static str)];

/// Broad classification of gates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateFamily {
    /// CX, CY, CZ and their basis-changed relatives.
    ControlledPauli,
    /// Measure-and-reset gates.
    DemolitionMeasurement,
    /// H and its axis-swapping relatives.
    HadamardLike,
    /// Non-physical annotations.
    Marker,
    /// Two-qubit parity measurements.
    PairMeasurement,
    /// I, X, Y, Z.
    Pauli,
    /// Square roots of single-qubit Paulis.
    QuarterTurn,
    /// Resets.
    Reset,
    /// Single-qubit measurements.
    SoloMeasurement,
    /// Square roots of two-qubit Pauli products.
    SqrtPauliPair,
    /// SWAP and ISWAP.
    Swap,
    /// Axis-cycling gates.
    ThirdTurn,
}

impl GateFamily {
    /// True for families that collapse or reinitialize state.
    pub const fn is_measurement_or_reset(self) -> bool {
        matches!(
            self,
            GateFamily::DemolitionMeasurement
                | GateFamily::PairMeasurement
                | GateFamily::Reset
                | GateFamily::SoloMeasurement
        )
    }
}

/// Descriptor of a gate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    name: &'static str,
    arity: Option<usize>,
    fusable: bool,
    marker: bool,
    marker_pauli: Option<Pauli>,
    family: GateFamily,
    rule: Option<ConjugationTable>,
    default_argument: Option<f64>,
}

impl Gate {
    const fn unitary(
        name: &'static str,
        arity: usize,
        family: GateFamily,
        rule: ConjugationTable,
    ) -> Self {
        Self {
            name,
            arity: Some(arity),
            fusable: true,
            marker: false,
            marker_pauli: None,
            family,
            rule: Some(rule),
            default_argument: None,
        }
    }

    const fn annotation(
        name: &'static str,
        arity: Option<usize>,
        fusable: bool,
        marker_pauli: Option<Pauli>,
    ) -> Self {
        Self {
            name,
            arity,
            fusable,
            marker: true,
            marker_pauli,
            family: GateFamily::Marker,
            rule: None,
            default_argument: None,
        }
    }

    /// Look up a gate by its canonical name.
    pub fn by_name(name: &str) -> Option<&'static Gate> {
        GATE_INDEX.get(name).copied()
    }

    /// Iterate over the whole table.
    pub fn all() -> impl Iterator<Item = &'static Gate> {
        GATES.iter()
    }

    /// Canonical name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of targets, or `None` for variable-arity gates.
    pub fn arity(&self) -> Option<usize> {
        self.arity
    }

    /// Whether several instances may share one instruction line.
    pub fn is_fusable(&self) -> bool {
        self.fusable
    }

    /// Whether this is a non-physical annotation.
    pub fn is_marker(&self) -> bool {
        self.marker
    }

    /// The Pauli toggled by MARKX, MARKY and MARKZ.
    pub fn marker_pauli(&self) -> Option<Pauli> {
        self.marker_pauli
    }

    /// Classification.
    pub fn family(&self) -> GateFamily {
        self.family
    }

    /// The conjugation table, if the gate takes part in propagation.
    pub fn rule(&self) -> Option<ConjugationTable> {
        self.rule
    }

    /// Argument used when the gate is placed without explicit arguments.
    pub fn default_argument(&self) -> Option<f64> {
        self.default_argument
    }

    /// A copy of this gate with a different default argument.
    #[must_use]
    pub fn with_default_argument(&self, value: f64) -> Gate {
        Gate {
            default_argument: Some(value),
            ..*self
        }
    }

    /// Map a basis string through this gate, ignoring phase.
    ///
    /// Direct table hits are returned as-is. Other inputs are split into
    /// basis vectors whose images are multiplied together; if any image is an
    /// error the whole result is flagged as one. Gates without a rule leave
    /// the input untouched.
    pub fn conjugate(&self, before: &PauliString) -> IrResult<Conjugated> {
        let Some(rule) = self.rule else {
            return Ok(Conjugated::clean(before.clone()));
        };
        if let Some(arity) = self.arity {
            if before.len() != arity {
                return Err(IrError::BasisLengthMismatch {
                    gate_name: self.name.to_string(),
                    basis: before.to_string(),
                    expected: arity,
                    got: before.len(),
                });
            }
        }

        let key = before.to_string();
        if let Some(image) = lookup(rule, &key) {
            return image.parse();
        }

        let mut paulis = PauliString::identity(before.len());
        let mut error = false;
        for vector in before.basis_vectors() {
            let key = vector.to_string();
            let image: Conjugated = lookup(rule, &key)
                .ok_or_else(|| IrError::MissingConjugation {
                    gate_name: self.name.to_string(),
                    basis: key.clone(),
                })?
                .parse()?;
            error |= image.error;
            paulis.compose_assign(&image.paulis);
        }
        Ok(Conjugated { paulis, error })
    }
}

fn lookup(rule: ConjugationTable, key: &str) -> Option<&'static str> {
    rule.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

static GATE_INDEX: LazyLock<FxHashMap<&'static str, &'static Gate>> =
    LazyLock::new(|| GATES.iter().map(|g| (g.name, g)).collect());

// Conjugation tables. Signs are dropped: H_XY sends Z to -Z and H_YZ sends X
// to -X, both recorded without the sign.

const CXSWAP: ConjugationTable = &[("IX", "XI"), ("IZ", "ZZ"), ("XI", "XX"), ("ZI", "IZ")];
const CX: ConjugationTable = &[("IX", "IX"), ("IZ", "ZZ"), ("XI", "XX"), ("ZI", "ZI")];
const CY: ConjugationTable = &[("IX", "ZX"), ("IZ", "ZZ"), ("XI", "XY"), ("ZI", "ZI")];
const XCX: ConjugationTable = &[("IX", "IX"), ("IZ", "XZ"), ("XI", "XI"), ("ZI", "ZX")];
const XCY: ConjugationTable = &[("IX", "XX"), ("IZ", "XZ"), ("XI", "XI"), ("ZI", "ZY")];
const YCY: ConjugationTable = &[("IX", "YX"), ("IZ", "YZ"), ("XI", "XY"), ("ZI", "ZY")];
const CZ: ConjugationTable = &[("IX", "ZX"), ("IZ", "IZ"), ("XI", "XZ"), ("ZI", "ZI")];

const MR: ConjugationTable = &[("X", "ERR:I"), ("Y", "ERR:I"), ("Z", "I")];
const MRY: ConjugationTable = &[("X", "ERR:I"), ("Y", "I"), ("Z", "ERR:I")];
const MRX: ConjugationTable = &[("X", "I"), ("Y", "ERR:I"), ("Z", "ERR:I")];

const H: ConjugationTable = &[("X", "Z"), ("Z", "X")];
const H_XY: ConjugationTable = &[("X", "Y"), ("Z", "Z")];
const H_YZ: ConjugationTable = &[("X", "X"), ("Z", "Y")];

const MXX: ConjugationTable = &[
    ("II", "II"),
    ("IX", "IX"),
    ("IY", "ERR:IY"),
    ("IZ", "ERR:IZ"),
    ("XI", "XI"),
    ("XX", "XX"),
    ("XY", "ERR:XY"),
    ("XZ", "ERR:XZ"),
    ("YI", "ERR:YI"),
    ("YX", "ERR:YX"),
    ("YY", "YY"),
    ("YZ", "YZ"),
    ("ZI", "ERR:ZI"),
    ("ZX", "ERR:ZX"),
    ("ZY", "ZY"),
    ("ZZ", "ZZ"),
];
const MYY: ConjugationTable = &[
    ("II", "II"),
    ("IX", "ERR:IX"),
    ("IY", "IY"),
    ("IZ", "ERR:IZ"),
    ("XI", "ERR:XI"),
    ("XX", "XX"),
    ("XY", "ERR:XY"),
    ("XZ", "XZ"),
    ("YI", "YI"),
    ("YX", "ERR:YX"),
    ("YY", "YY"),
    ("YZ", "ERR:YZ"),
    ("ZI", "ERR:ZI"),
    ("ZX", "ZX"),
    ("ZY", "ERR:ZY"),
    ("ZZ", "ZZ"),
];
const MZZ: ConjugationTable = &[
    ("II", "II"),
    ("IX", "ERR:IX"),
    ("IY", "ERR:IY"),
    ("IZ", "IZ"),
    ("XI", "ERR:XI"),
    ("XX", "XX"),
    ("XY", "XY"),
    ("XZ", "ERR:XZ"),
    ("YI", "ERR:YI"),
    ("YX", "YX"),
    ("YY", "YY"),
    ("YZ", "ERR:YZ"),
    ("ZI", "ZI"),
    ("ZX", "ERR:ZX"),
    ("ZY", "ERR:ZY"),
    ("ZZ", "ZZ"),
];

const PAULI: ConjugationTable = &[("X", "X"), ("Z", "Z")];

const S: ConjugationTable = &[("X", "Y"), ("Z", "Z")];
const SQRT_X: ConjugationTable = &[("X", "X"), ("Z", "Y")];
const SQRT_Y: ConjugationTable = &[("X", "Z"), ("Z", "X")];

const RESET: ConjugationTable = &[("X", "ERR:I"), ("Y", "ERR:I"), ("Z", "ERR:I")];

const M: ConjugationTable = &[("X", "ERR:X"), ("Y", "ERR:Y"), ("Z", "Z")];
const MX: ConjugationTable = &[("X", "X"), ("Y", "ERR:Y"), ("Z", "ERR:Z")];
const MY: ConjugationTable = &[("X", "ERR:X"), ("Y", "Y"), ("Z", "ERR:Z")];

const SQRT_XX: ConjugationTable = &[("IX", "IX"), ("IZ", "XY"), ("XI", "XI"), ("ZI", "YX")];
const SQRT_YY: ConjugationTable = &[("IX", "YZ"), ("IZ", "YX"), ("XI", "ZY"), ("ZI", "XY")];
const SQRT_ZZ: ConjugationTable = &[("IX", "ZY"), ("IZ", "IZ"), ("XI", "YZ"), ("ZI", "ZI")];

const ISWAP: ConjugationTable = &[("IX", "YZ"), ("IZ", "ZI"), ("XI", "ZY"), ("ZI", "IZ")];
const SWAP: ConjugationTable = &[("IX", "XI"), ("IZ", "ZI"), ("XI", "IX"), ("ZI", "IZ")];

const C_XYZ: ConjugationTable = &[("X", "Y"), ("Z", "X")];
const C_ZYX: ConjugationTable = &[("X", "Z"), ("Z", "Y")];

use GateFamily as F;

/// Every gate, grouped by family.
pub static GATES: &[Gate] = &[
    Gate::unitary("CXSWAP", 2, F::ControlledPauli, CXSWAP),
    Gate::unitary("CX", 2, F::ControlledPauli, CX),
    Gate::unitary("CY", 2, F::ControlledPauli, CY),
    Gate::unitary("XCX", 2, F::ControlledPauli, XCX),
    Gate::unitary("XCY", 2, F::ControlledPauli, XCY),
    Gate::unitary("YCY", 2, F::ControlledPauli, YCY),
    Gate::unitary("CZ", 2, F::ControlledPauli, CZ),
    Gate::unitary("MR", 1, F::DemolitionMeasurement, MR),
    Gate::unitary("MRY", 1, F::DemolitionMeasurement, MRY),
    Gate::unitary("MRX", 1, F::DemolitionMeasurement, MRX),
    Gate::unitary("H", 1, F::HadamardLike, H),
    Gate::unitary("H_XY", 1, F::HadamardLike, H_XY),
    Gate::unitary("H_YZ", 1, F::HadamardLike, H_YZ),
    Gate::annotation("POLYGON", None, false, None),
    Gate::annotation("MARKX", Some(1), true, Some(Pauli::X)),
    Gate::annotation("MARKY", Some(1), true, Some(Pauli::Y)),
    Gate::annotation("MARKZ", Some(1), true, Some(Pauli::Z)),
    Gate::annotation("MARK", Some(1), false, None),
    Gate::unitary("MXX", 2, F::PairMeasurement, MXX),
    Gate::unitary("MYY", 2, F::PairMeasurement, MYY),
    Gate::unitary("MZZ", 2, F::PairMeasurement, MZZ),
    Gate::unitary("I", 1, F::Pauli, PAULI),
    Gate::unitary("X", 1, F::Pauli, PAULI),
    Gate::unitary("Y", 1, F::Pauli, PAULI),
    Gate::unitary("Z", 1, F::Pauli, PAULI),
    Gate::unitary("S", 1, F::QuarterTurn, S),
    Gate::unitary("S_DAG", 1, F::QuarterTurn, S),
    Gate::unitary("SQRT_X", 1, F::QuarterTurn, SQRT_X),
    Gate::unitary("SQRT_X_DAG", 1, F::QuarterTurn, SQRT_X),
    Gate::unitary("SQRT_Y", 1, F::QuarterTurn, SQRT_Y),
    Gate::unitary("SQRT_Y_DAG", 1, F::QuarterTurn, SQRT_Y),
    Gate::unitary("R", 1, F::Reset, RESET),
    Gate::unitary("RX", 1, F::Reset, RESET),
    Gate::unitary("RY", 1, F::Reset, RESET),
    Gate::unitary("M", 1, F::SoloMeasurement, M),
    Gate::unitary("MX", 1, F::SoloMeasurement, MX),
    Gate::unitary("MY", 1, F::SoloMeasurement, MY),
    Gate::unitary("SQRT_XX", 2, F::SqrtPauliPair, SQRT_XX),
    Gate::unitary("SQRT_XX_DAG", 2, F::SqrtPauliPair, SQRT_XX),
    Gate::unitary("SQRT_YY", 2, F::SqrtPauliPair, SQRT_YY),
    Gate::unitary("SQRT_YY_DAG", 2, F::SqrtPauliPair, SQRT_YY),
    Gate::unitary("SQRT_ZZ", 2, F::SqrtPauliPair, SQRT_ZZ),
    Gate::unitary("SQRT_ZZ_DAG", 2, F::SqrtPauliPair, SQRT_ZZ),
    Gate::unitary("ISWAP", 2, F::Swap, ISWAP),
    Gate::unitary("ISWAP_DAG", 2, F::Swap, ISWAP),
    Gate::unitary("SWAP", 2, F::Swap, SWAP),
    Gate::unitary("C_XYZ", 1, F::ThirdTurn, C_XYZ),
    Gate::unitary("C_ZYX", 1, F::ThirdTurn, C_ZYX),
];
