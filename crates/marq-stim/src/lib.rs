//! Circuit Text Parser and Emitter for Marq
//!
//! This crate reads and writes the Stim-style text the editor uses for import,
//! export and undo history, including the editor-only marker instructions.
//!
//! # Supported Syntax
//!
//! | Feature | Example |
//! |---------|---------|
//! | Gates | `H 0 1`, `CX 0 1 2 3` |
//! | Arguments | `MARKX(0) 3`, `POLYGON(1,0,0,0.5) 0 1 2` |
//! | Layer breaks | `TICK` |
//! | Coordinates | `QUBIT_COORDS(0.5, 1) 4` |
//! | Pauli products | `MPP X0*X1 Z2` |
//! | Repeat blocks | `REPEAT 3 { ... }` |
//! | Comments | `# comment` |
//! | Hidden markers | `#!pragma MARKZ(0) 1` |
//! | Compact form | `Q(0,0)0;H_0;TICK;MARKX(0)0` |
//!
//! Legacy names (`CNOT`, `ZCX`, `XCZ`, `MZ`, ...) are rewritten to canonical
//! ones. Noise channels, detectors, observables and `SHIFT_COORDS` are
//! accepted and dropped.
//!
//! # Example: Round-Trip
//!
//! ```rust
//! use marq_stim::{parse, to_stim_circuit};
//!
//! let circuit = parse("Q(0,0)0;Q(1,0)1;H_0;CNOT_0_1").unwrap();
//! assert_eq!(
//!     to_stim_circuit(&circuit),
//!     "QUBIT_COORDS(0, 0) 0\nQUBIT_COORDS(1, 0) 1\nH 0\nTICK\nCX 0 1",
//! );
//! ```
//!
//! # Example: Structural Equality
//!
//! ```rust
//! use marq_ir::Circuit;
//! use marq_stim::StimCircuitExt;
//!
//! let a = Circuit::from_stim_circuit("QUBIT_COORDS(5,5) 7\nH 7").unwrap();
//! let b = Circuit::from_stim_circuit("H 0").unwrap();
//! assert!(a.shifted(-5.0, -5.0).is_equal_to(&b));
//! ```

mod ast;
mod emitter;
mod error;
mod lexer;
mod parser;

use marq_ir::Circuit;

pub use emitter::{format_number, to_compact_stim_circuit, to_stim_circuit, to_stim_export};
pub use error::{ParseError, ParseResult};
pub use parser::{
    MAX_QUBIT_ID, MAX_UNROLLED_STEPS, PRAGMA_PREFIX, normalize, parse, parse_ast, resolve_alias,
};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}

/// Text conversions as methods on [`Circuit`].
pub trait StimCircuitExt: Sized {
    /// Parse circuit text.
    fn from_stim_circuit(text: &str) -> ParseResult<Self>;

    /// Canonical text.
    fn to_stim_circuit(&self) -> String;

    /// Compact shorthand.
    fn to_compact_stim_circuit(&self) -> String;

    /// Equality of canonical text.
    fn is_equal_to(&self, other: &Self) -> bool;
}

impl StimCircuitExt for Circuit {
    fn from_stim_circuit(text: &str) -> ParseResult<Self> {
        parse(text)
    }

    fn to_stim_circuit(&self) -> String {
        to_stim_circuit(self)
    }

    fn to_compact_stim_circuit(&self) -> String {
        to_compact_stim_circuit(self)
    }

    fn is_equal_to(&self, other: &Self) -> bool {
        to_stim_circuit(self) == to_stim_circuit(other)
    }
}
