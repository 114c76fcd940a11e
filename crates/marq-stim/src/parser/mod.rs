//! Parser for circuit text.

mod lowering;
mod statement;

pub(crate) use lowering::lower_to_circuit;
pub use lowering::{MAX_QUBIT_ID, MAX_UNROLLED_STEPS, resolve_alias};

use marq_ir::Circuit;

use crate::ast::{Program, Statement};
use crate::error::{ParseError, ParseResult};
use crate::lexer::{SpannedToken, Token, tokenize};

/// Prefix that hides an instruction from Stim while keeping it readable here.
pub const PRAGMA_PREFIX: &str = "#!pragma ";

/// Shorthand expansions, applied in order before tokenizing.
const NORMALIZATIONS: &[(&str, &str)] = &[
    ("_", " "),
    ("Q(", "QUBIT_COORDS("),
    ("DT", "DETECTOR"),
    (" COORDS", "_COORDS"),
    (" ERROR", "_ERROR"),
    ("C XYZ", "C_XYZ"),
    ("H XY", "H_XY"),
    ("H YZ", "H_YZ"),
    (" INCLUDE", "_INCLUDE"),
    ("SQRT ", "SQRT_"),
    (" DAG ", "_DAG "),
    ("C ZYX", "C_ZYX"),
];

/// Parse circuit text (full or compact form) into a Circuit.
pub fn parse(source: &str) -> ParseResult<Circuit> {
    let program = parse_ast(source)?;
    lower_to_circuit(&program)
}

/// Parse circuit text into an AST Program.
pub fn parse_ast(source: &str) -> ParseResult<Program> {
    let normalized = normalize(source);
    let mut parser = Parser::new(&normalized)?;
    parser.parse_program()
}

/// Expand the compact shorthand and unwrap `#!pragma` lines.
///
/// Line structure is preserved except that every `;` becomes a line break.
/// Pragmas are unwrapped after that, so `H 0;#!pragma MARKX(0) 0` keeps its
/// marker.
pub fn normalize(source: &str) -> String {
    let mut text = source
        .replace(';', "\n")
        .split('\n')
        .map(|line| {
            let trimmed = line.trim_start();
            trimmed.strip_prefix(PRAGMA_PREFIX).unwrap_or(line)
        })
        .collect::<Vec<_>>()
        .join("\n");
    for (from, to) in NORMALIZATIONS {
        text = text.replace(from, to);
    }
    text
}

/// Parser state.
pub(super) struct Parser {
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    pub(super) line: usize,
}

impl Parser {
    /// Create a new parser from normalized source.
    fn new(source: &str) -> ParseResult<Self> {
        let tokens =
            tokenize(source).map_err(|(line, message)| ParseError::LexerError { line, message })?;
        Ok(Self {
            tokens,
            pos: 0,
            line: 1,
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        let spanned = self.tokens.get(self.pos)?;
        self.line = spanned.line;
        let token = spanned.token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Line of the next token, or of the last one at end of input.
    pub(super) fn next_line(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or(self.tokens.last())
            .map_or(self.line, |t| t.line)
    }

    /// Expect a specific token.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> ParseResult<()> {
        let line = self.next_line();
        match self.advance() {
            Some(found) if std::mem::discriminant(&found) == std::mem::discriminant(&expected) => {
                Ok(())
            }
            Some(found) => Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: found.to_string(),
            }),
            None => Err(ParseError::UnexpectedToken {
                line,
                expected: expected.to_string(),
                found: "end of input".into(),
            }),
        }
    }

    /// Check if current token matches.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// True at a line break or the end of input.
    pub(super) fn at_line_end(&self) -> bool {
        self.is_eof() || self.check(&Token::Newline)
    }

    /// Consume the line break ending a statement.
    pub(super) fn end_line(&mut self) -> ParseResult<()> {
        if self.is_eof() {
            return Ok(());
        }
        self.expect(Token::Newline)
    }

    /// Parse the entire program.
    fn parse_program(&mut self) -> ParseResult<Program> {
        let statements = self.parse_block(None)?;
        Ok(Program { statements })
    }

    /// Parse statements until the closing brace of the block opened at
    /// `opened_at`, or until the end of input at top level.
    ///
    /// A closing brace outside any block is ignored.
    fn parse_block(&mut self, opened_at: Option<usize>) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            while self.consume(&Token::Newline) {}
            if self.is_eof() {
                return match opened_at {
                    Some(line) => Err(ParseError::UnterminatedRepeat { line }),
                    None => Ok(statements),
                };
            }
            if self.consume(&Token::RBrace) {
                self.end_line()?;
                if opened_at.is_some() {
                    return Ok(statements);
                }
                continue;
            }
            statements.push(self.parse_statement()?);
        }
    }

    /// Parse `REPEAT n {` and its body.
    pub(super) fn parse_repeat(&mut self) -> ParseResult<Statement> {
        self.advance();
        let line = self.line;
        let count = match self.advance() {
            Some(Token::IntLiteral(n)) => n,
            other => {
                return Err(ParseError::UnexpectedToken {
                    line,
                    expected: "repetition count".into(),
                    found: other.map_or_else(|| "end of input".into(), |t| t.to_string()),
                });
            }
        };
        self.expect(Token::LBrace)?;
        self.end_line()?;
        let body = self.parse_block(Some(line))?;
        Ok(Statement::Repeat { count, body, line })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Instruction, Target};

    fn instruction(statement: &Statement) -> &Instruction {
        match statement {
            Statement::Instruction(inst) => inst,
            other => panic!("expected instruction, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_compact_form() {
        assert_eq!(
            normalize("Q(0,1)0;H_XY_0;SQRT_X_DAG_0;C_XYZ_1"),
            "QUBIT_COORDS(0,1)0\nH_XY 0\nSQRT_X_DAG 0\nC_XYZ 1"
        );
        assert_eq!(normalize("DT rec[-1]"), "DETECTOR rec[-1]");
        assert_eq!(normalize("X_ERROR(0.1) 0"), "X_ERROR(0.1) 0");
    }

    #[test]
    fn test_normalize_unwraps_pragmas() {
        assert_eq!(
            normalize("H 0\n#!pragma MARKX(0) 0\n  #!pragma POLYGON(1,0,0,0.5) 0"),
            "H 0\nMARKX(0) 0\nPOLYGON(1,0,0,0.5) 0"
        );
    }

    #[test]
    fn test_normalize_unwraps_pragmas_after_semicolons() {
        assert_eq!(normalize("H 0;#!pragma MARKX(0) 0"), "H 0\nMARKX(0) 0");
        assert_eq!(normalize("H_0;  #!pragma MARKZ(1)_2"), "H 0\nMARKZ(1) 2");
    }

    #[test]
    fn test_parse_ast_lines() {
        let program = parse_ast("H 0 1\nTICK\nMARKX(0) 2").unwrap();
        assert_eq!(program.statements.len(), 3);
        let h = instruction(&program.statements[0]);
        assert_eq!(h.name, "H");
        assert_eq!(h.targets, vec![Target::Qubit(0), Target::Qubit(1)]);
        assert!(matches!(program.statements[1], Statement::Tick { line: 2 }));
        let mark = instruction(&program.statements[2]);
        assert_eq!(mark.args, vec![0.0]);
        assert_eq!(mark.line, 3);
    }

    #[test]
    fn test_parse_nested_repeat() {
        let program = parse_ast("repeat 2 {\n H 0\n REPEAT 3 {\n  X 0\n }\n}\nM 0").unwrap();
        assert_eq!(program.statements.len(), 2);
        let Statement::Repeat { count, body, line } = &program.statements[0] else {
            panic!("expected repeat");
        };
        assert_eq!((*count, *line), (2, 1));
        assert_eq!(body.len(), 2);
        assert!(matches!(body[1], Statement::Repeat { count: 3, .. }));
    }

    #[test]
    fn test_unterminated_repeat() {
        let err = parse_ast("H 0\nREPEAT 2 {\nX 0").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedRepeat { line: 2 });
        assert!(err.to_string().contains("Repeat block didn't end"));
    }

    #[test]
    fn test_stray_closing_brace_is_ignored() {
        let program = parse_ast("H 0\n}\nX 0").unwrap();
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn test_lexer_error_reports_line() {
        let err = parse_ast("H 0;X $").unwrap_err();
        assert!(matches!(err, ParseError::LexerError { line: 2, .. }));
    }
}
