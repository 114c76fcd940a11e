//! AST-to-Circuit lowering.

use marq_ir::{Circuit, Coord, CoordKey, Gate, IrError, Layer, Operation, QubitId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, warn};

use crate::ast::{Instruction, Program, Statement, Target};
use crate::error::{ParseError, ParseResult};

/// Alternate gate names: (alias, canonical, reverse target pairs).
const ALIASES: &[(&str, &str, bool)] = &[
    ("XCZ", "CX", true),
    ("SWAPCX", "CXSWAP", true),
    ("YCX", "XCY", true),
    ("YCZ", "CY", true),
    ("CNOT", "CX", false),
    ("ZCX", "CX", false),
    ("ZCY", "CY", false),
    ("ZCZ", "CZ", false),
    ("RZ", "R", false),
    ("MZ", "M", false),
    ("MRZ", "MR", false),
];

/// Directives that are accepted and dropped.
const DISCARDED: &[&str] = &[
    "X_ERROR",
    "Y_ERROR",
    "Z_ERROR",
    "DEPOLARIZE1",
    "DEPOLARIZE2",
    "E",
    "CORRELATED_ERROR",
    "DETECTOR",
    "OBSERVABLE_INCLUDE",
    "SHIFT_COORDS",
];

/// Largest qubit id accepted in circuit text.
pub const MAX_QUBIT_ID: u32 = 65_535;

/// Budget for unrolling `REPEAT` blocks: every statement lowered and every
/// repetition started counts as one step.
pub const MAX_UNROLLED_STEPS: usize = 1_000_000;

/// Canonical name for `name`, and whether target pairs must be swapped.
pub fn resolve_alias(name: &str) -> (&str, bool) {
    ALIASES
        .iter()
        .find(|(alias, _, _)| *alias == name)
        .map_or((name, false), |&(_, canonical, reverse)| (canonical, reverse))
}

/// Lower an AST Program to a Circuit.
pub(crate) fn lower_to_circuit(program: &Program) -> ParseResult<Circuit> {
    let mut lowerer = Lowerer::new();
    lowerer.lower_chunk(&program.statements, 1, 1)?;
    lowerer.finish()
}

/// Lowers AST to Circuit.
struct Lowerer {
    layers: Vec<Layer>,
    /// Qubit id -> position.
    coords: FxHashMap<u32, Coord>,
    /// Positions already claimed.
    used_positions: FxHashSet<CoordKey>,
    /// Next x tried for automatic placement on the y = 0 row.
    next_auto_x: u32,
    /// Steps spent so far against `MAX_UNROLLED_STEPS`.
    steps: usize,
}

impl Lowerer {
    fn new() -> Self {
        Self {
            layers: vec![Layer::new()],
            coords: FxHashMap::default(),
            used_positions: FxHashSet::default(),
            next_auto_x: 0,
            steps: 0,
        }
    }

    fn current(&mut self) -> &mut Layer {
        if self.layers.is_empty() {
            self.layers.push(Layer::new());
        }
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    fn break_if_nonempty(&mut self) {
        if !self.current().is_empty() {
            self.layers.push(Layer::new());
        }
    }

    /// Lower `statements` `repetitions` times, with a layer break before the
    /// chunk and after each repetition. `line` is where the chunk opens.
    fn lower_chunk(
        &mut self,
        statements: &[Statement],
        repetitions: u64,
        line: usize,
    ) -> ParseResult<()> {
        self.break_if_nonempty();
        for _ in 0..repetitions {
            self.step(line)?;
            for statement in statements {
                self.step(line)?;
                match statement {
                    Statement::Instruction(inst) => self.lower_instruction(inst)?,
                    Statement::Tick { .. } => self.layers.push(Layer::new()),
                    Statement::Repeat { count, body, line } => {
                        self.lower_chunk(body, *count, *line)?;
                    }
                }
            }
            self.break_if_nonempty();
        }
        Ok(())
    }

    fn step(&mut self, line: usize) -> ParseResult<()> {
        self.steps += 1;
        if self.steps > MAX_UNROLLED_STEPS {
            return Err(ParseError::RepeatTooLarge {
                line,
                limit: MAX_UNROLLED_STEPS,
            });
        }
        Ok(())
    }

    fn check_qubit(qubit: u32, line: usize) -> ParseResult<u32> {
        if qubit > MAX_QUBIT_ID {
            return Err(ParseError::QubitOutOfRange {
                line,
                qubit,
                max: MAX_QUBIT_ID,
            });
        }
        Ok(qubit)
    }

    /// Give `qubit` the next free spot on the y = 0 row unless it is placed.
    fn ensure_coords(&mut self, qubit: u32) {
        while !self.coords.contains_key(&qubit) {
            let spot = Coord::new(f64::from(self.next_auto_x), 0.0);
            if self.used_positions.insert(spot.key()) {
                self.coords.insert(qubit, spot);
            }
            self.next_auto_x += 1;
        }
    }

    /// Put `op` in the current layer, starting a new layer on collision.
    fn place(&mut self, op: Operation, line: usize) -> ParseResult<()> {
        match self.current().put(op.clone(), false) {
            Ok(()) => Ok(()),
            Err(IrError::Collision { qubit, .. }) => {
                debug!(line, %qubit, gate = op.name(), "collision, starting new layer");
                self.layers.push(Layer::new());
                self.current()
                    .put(op, false)
                    .map_err(|source| ParseError::InvalidOperation { line, source })
            }
            Err(source) => Err(ParseError::InvalidOperation { line, source }),
        }
    }

    fn operation(
        gate: Gate,
        args: &[f64],
        qubits: impl IntoIterator<Item = u32>,
        line: usize,
    ) -> ParseResult<Operation> {
        Operation::new(gate, args.to_vec(), qubits.into_iter().map(QubitId))
            .map_err(|source| ParseError::InvalidOperation { line, source })
    }

    fn lower_instruction(&mut self, inst: &Instruction) -> ParseResult<()> {
        let (name, reverse) = resolve_alias(&inst.name);
        let line = inst.line;
        match name {
            "MPP" => return self.lower_mpp(inst),
            "QUBIT_COORDS" => return self.lower_coords(inst),
            _ if DISCARDED.contains(&name) => return Ok(()),
            _ => {}
        }

        let gate = *Gate::by_name(name).ok_or_else(|| ParseError::UnknownGate {
            line,
            name: inst.name.clone(),
        })?;

        if inst.targets.iter().any(|t| matches!(t, Target::Record(_))) {
            if gate.arity() == Some(2) {
                warn!(line, gate = name, "ignoring instruction with measurement record target");
                return Ok(());
            }
            return Err(ParseError::RecordTarget {
                line,
                gate: name.to_string(),
            });
        }

        let qubits = inst
            .targets
            .iter()
            .map(|t| match t {
                Target::Qubit(q) => Self::check_qubit(*q, line),
                other => Err(ParseError::InvalidTarget {
                    line,
                    target: other.to_string(),
                }),
            })
            .collect::<ParseResult<Vec<u32>>>()?;
        for &q in &qubits {
            self.ensure_coords(q);
        }

        match gate.arity() {
            None => {
                if !qubits.is_empty() {
                    let op = Self::operation(gate, &inst.args, qubits, line)?;
                    self.place(op, line)?;
                }
            }
            Some(arity) => {
                if arity == 0 || qubits.len() % arity != 0 {
                    return Err(ParseError::WrongTargetCount {
                        line,
                        gate: name.to_string(),
                        arity,
                        got: qubits.len(),
                    });
                }
                for chunk in qubits.chunks(arity) {
                    let mut chunk = chunk.to_vec();
                    if reverse {
                        chunk.reverse();
                    }
                    let op = Self::operation(gate, &inst.args, chunk, line)?;
                    self.place(op, line)?;
                }
            }
        }
        Ok(())
    }

    /// `QUBIT_COORDS(x, y) q...`: place qubits, refusing to move a placed
    /// qubit or to stack two qubits on one spot.
    fn lower_coords(&mut self, inst: &Instruction) -> ParseResult<()> {
        let x = inst.args.first().copied().unwrap_or(0.0);
        let y = inst.args.get(1).copied().unwrap_or(0.0);
        let spot = Coord::new(x, y);
        for target in &inst.targets {
            let Target::Qubit(q) = *target else {
                return Err(ParseError::InvalidTarget {
                    line: inst.line,
                    target: target.to_string(),
                });
            };
            let q = Self::check_qubit(q, inst.line)?;
            if self.coords.contains_key(&q) {
                warn!(
                    line = inst.line,
                    qubit = q,
                    "ignoring QUBIT_COORDS: qubit already has coordinates"
                );
            } else if !self.used_positions.insert(spot.key()) {
                warn!(
                    line = inst.line,
                    x, y, "ignoring QUBIT_COORDS: a qubit is already placed there"
                );
            } else {
                self.coords.insert(q, spot);
            }
        }
        Ok(())
    }

    /// `MPP`: one `M<letters>` gate per product, split into single-qubit
    /// measurements when no such gate exists.
    fn lower_mpp(&mut self, inst: &Instruction) -> ParseResult<()> {
        let line = inst.line;
        for target in &inst.targets {
            let Target::Product(terms) = target else {
                return Err(ParseError::InvalidTarget {
                    line,
                    target: target.to_string(),
                });
            };
            for term in terms {
                Self::check_qubit(term.qubit, line)?;
                self.ensure_coords(term.qubit);
            }

            let compound: String = std::iter::once('M')
                .chain(terms.iter().map(|t| t.pauli.as_char()))
                .collect();
            let (resolved, _) = resolve_alias(&compound);
            let qubits = terms.iter().map(|t| t.qubit);
            match Gate::by_name(resolved) {
                Some(gate) if gate.arity() == Some(terms.len()) => {
                    let op = Self::operation(*gate, &inst.args, qubits, line)?;
                    self.place(op, line)?;
                }
                _ => {
                    warn!(line, product = %target, "splitting MPP into individual measurements");
                    for term in terms {
                        let single = format!("M{}", term.pauli.as_char());
                        let (resolved, _) = resolve_alias(&single);
                        let gate = *Gate::by_name(resolved).ok_or_else(|| {
                            ParseError::UnknownGate {
                                line,
                                name: single.clone(),
                            }
                        })?;
                        let op = Self::operation(gate, &inst.args, [term.qubit], line)?;
                        self.place(op, line)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Drop a trailing empty layer and fill the coordinate table.
    fn finish(mut self) -> ParseResult<Circuit> {
        if self.layers.last().is_some_and(Layer::is_empty) {
            self.layers.pop();
        }
        let num_qubits = self.coords.keys().max().map_or(0, |&m| m + 1);
        for q in 0..num_qubits {
            self.ensure_coords(q);
        }
        let qubit_coords = (0..num_qubits)
            .map(|q| self.coords.get(&q).copied().unwrap_or_default())
            .collect();
        Ok(Circuit::new(qubit_coords, self.layers)?)
    }
}
