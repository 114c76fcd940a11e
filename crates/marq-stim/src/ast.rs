//! Abstract syntax tree for circuit text.

use marq_ir::Pauli;
use serde::{Deserialize, Serialize};

/// A parsed circuit text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Statements in source order.
    pub statements: Vec<Statement>,
}

/// A statement in circuit text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Statement {
    /// `NAME(args) targets...`
    Instruction(Instruction),

    /// `TICK`: ends the current layer.
    Tick { line: usize },

    /// `REPEAT n { ... }`
    Repeat {
        count: u64,
        body: Vec<Statement>,
        line: usize,
    },
}

/// One instruction line, before name resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// Name as written.
    pub name: String,
    /// Parenthesized arguments.
    pub args: Vec<f64>,
    /// Targets in order.
    pub targets: Vec<Target>,
    /// Source line.
    pub line: usize,
}

/// An instruction target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Target {
    /// A qubit id.
    Qubit(u32),
    /// A measurement record lookback, e.g. `rec[-1]`.
    Record(i64),
    /// A Pauli product, e.g. `X0*Z1`.
    Product(Vec<PauliTerm>),
}

/// One factor of a Pauli product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PauliTerm {
    pub pauli: Pauli,
    pub qubit: u32,
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Target::Qubit(q) => write!(f, "{q}"),
            Target::Record(k) => write!(f, "rec[{k}]"),
            Target::Product(terms) => {
                for (k, term) in terms.iter().enumerate() {
                    if k > 0 {
                        write!(f, "*")?;
                    }
                    write!(f, "{}{}", term.pauli, term.qubit)?;
                }
                Ok(())
            }
        }
    }
}
