//! Statement parsing for circuit text.

use marq_ir::Pauli;

use super::Parser;
use crate::ast::{Instruction, PauliTerm, Statement, Target};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let line = self.next_line();
        let token = self.peek().cloned();
        let statement = match token {
            Some(Token::Identifier(name)) if name.eq_ignore_ascii_case("repeat") => {
                return self.parse_repeat();
            }
            Some(Token::Identifier(name)) if name == "TICK" => {
                self.advance();
                Statement::Tick { line }
            }
            Some(Token::Identifier(_)) => Statement::Instruction(self.parse_instruction()?),
            other => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "instruction name".into(),
                    found: other.map_or_else(|| "end of input".into(), |t| t.to_string()),
                });
            }
        };
        self.end_line()?;
        Ok(statement)
    }

    /// Parse `NAME(args) targets...` up to the end of the line.
    fn parse_instruction(&mut self) -> ParseResult<Instruction> {
        let line = self.next_line();
        let name = match self.advance() {
            Some(Token::Identifier(name)) => name,
            other => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "instruction name".into(),
                    found: other.map_or_else(|| "end of input".into(), |t| t.to_string()),
                });
            }
        };

        let mut args = Vec::new();
        if self.consume(&Token::LParen) {
            if !self.check(&Token::RParen) {
                loop {
                    args.push(self.parse_number()?);
                    if !self.consume(&Token::Comma) {
                        break;
                    }
                }
            }
            self.expect(Token::RParen)?;
        }

        let mut targets = Vec::new();
        while !self.at_line_end() {
            targets.push(self.parse_target()?);
        }

        Ok(Instruction {
            name,
            args,
            targets,
            line,
        })
    }

    /// Parse a numeric argument.
    #[allow(clippy::cast_precision_loss)]
    fn parse_number(&mut self) -> ParseResult<f64> {
        let line = self.next_line();
        match self.advance() {
            Some(Token::FloatLiteral(v)) => Ok(v),
            Some(Token::IntLiteral(v)) => Ok(v as f64),
            other => Err(ParseError::UnexpectedToken {
                line,
                expected: "number".into(),
                found: other.map_or_else(|| "end of input".into(), |t| t.to_string()),
            }),
        }
    }

    /// Parse one target: a qubit, a record lookback or a Pauli product.
    fn parse_target(&mut self) -> ParseResult<Target> {
        let line = self.next_line();
        match self.advance() {
            Some(Token::IntLiteral(v)) => u32::try_from(v)
                .map(Target::Qubit)
                .map_err(|_| ParseError::InvalidTarget {
                    line,
                    target: v.to_string(),
                }),
            Some(Token::FloatLiteral(v)) => Err(ParseError::InvalidTarget {
                line,
                target: v.to_string(),
            }),
            Some(Token::Record(k)) => Ok(Target::Record(k)),
            Some(Token::PauliTerm(first)) => {
                let mut terms = vec![pauli_term(&first, line)?];
                while self.consume(&Token::Star) {
                    match self.advance() {
                        Some(Token::PauliTerm(next)) => terms.push(pauli_term(&next, line)?),
                        other => {
                            return Err(ParseError::UnexpectedToken {
                                line,
                                expected: "Pauli term".into(),
                                found: other.map_or_else(|| "end of input".into(), |t| t.to_string()),
                            });
                        }
                    }
                }
                Ok(Target::Product(terms))
            }
            Some(other) => Err(ParseError::InvalidTarget {
                line,
                target: other.to_string(),
            }),
            None => Err(ParseError::UnexpectedToken {
                line,
                expected: "target".into(),
                found: "end of input".into(),
            }),
        }
    }
}

/// Split `X12` into its Pauli and qubit.
fn pauli_term(text: &str, line: usize) -> ParseResult<PauliTerm> {
    let invalid = || ParseError::InvalidTarget {
        line,
        target: text.to_string(),
    };
    let mut chars = text.chars();
    let pauli = chars
        .next()
        .and_then(|c| Pauli::from_char(c.to_ascii_uppercase()))
        .ok_or_else(invalid)?;
    let qubit = chars.as_str().parse::<u32>().map_err(|_| invalid())?;
    Ok(PauliTerm { pauli, qubit })
}
