//! Lexer for circuit text.

use logos::Logos;

/// Tokens of the circuit text format.
///
/// Line breaks are significant and produce [`Token::Newline`]; `#` comments
/// run to the end of the line and are skipped.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    #[token("\n")]
    Newline,

    // Literals
    #[regex(r"-?[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"-?\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"-?[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"-[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),

    /// Measurement record reference, e.g. `rec[-1]`.
    #[regex(r"rec\[-?[0-9]+\]", |lex| {
        let s = lex.slice();
        s[4..s.len() - 1].parse::<i64>().ok()
    })]
    Record(i64),

    /// One factor of a Pauli product, e.g. `X3`.
    #[regex(r"[XYZxyz][0-9]+", |lex| lex.slice().to_string(), priority = 10)]
    PauliTerm(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Punctuation
    #[token("*")]
    Star,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(",")]
    Comma,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Newline => write!(f, "end of line"),
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::Record(k) => write!(f, "rec[{k}]"),
            Token::PauliTerm(s) | Token::Identifier(s) => write!(f, "{s}"),
            Token::Star => write!(f, "*"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::Comma => write!(f, ","),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
        }
    }
}

/// A token with its line number (1-based).
#[derive(Debug, Clone)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Tokenize normalized circuit text.
pub fn tokenize(source: &str) -> Result<Vec<SpannedToken>, (usize, String)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    let mut line = 1;

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => {
                let at = line;
                if token == Token::Newline {
                    line += 1;
                }
                tokens.push(SpannedToken { token, line: at });
            }
            Err(()) => {
                let slice = lexer.slice();
                return Err((line, format!("Invalid token: '{slice}'")));
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    #[test]
    fn test_instruction_tokens() {
        assert_eq!(
            tokens("CX 0 1"),
            vec![
                Token::Identifier("CX".into()),
                Token::IntLiteral(0),
                Token::IntLiteral(1),
            ]
        );
    }

    #[test]
    fn test_args() {
        assert_eq!(
            tokens("QUBIT_COORDS(-1, 0.5) 3"),
            vec![
                Token::Identifier("QUBIT_COORDS".into()),
                Token::LParen,
                Token::FloatLiteral(-1.0),
                Token::Comma,
                Token::FloatLiteral(0.5),
                Token::RParen,
                Token::IntLiteral(3),
            ]
        );
        assert_eq!(tokens("1e-3"), vec![Token::FloatLiteral(0.001)]);
    }

    #[test]
    fn test_special_targets() {
        assert_eq!(
            tokens("MPP X0*Z12 rec[-2]"),
            vec![
                Token::Identifier("MPP".into()),
                Token::PauliTerm("X0".into()),
                Token::Star,
                Token::PauliTerm("Z12".into()),
                Token::Record(-2),
            ]
        );
        // Longer identifiers starting with a Pauli letter stay identifiers.
        assert_eq!(tokens("XCX"), vec![Token::Identifier("XCX".into())]);
    }

    #[test]
    fn test_comments_and_lines() {
        let spanned = tokenize("H 0 # hadamard\n\nM 0").unwrap();
        let lines: Vec<_> = spanned.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 1, 1, 2, 3, 3]);
    }

    #[test]
    fn test_invalid_token() {
        let (line, message) = tokenize("H 0\nH @").unwrap_err();
        assert_eq!(line, 2);
        assert!(message.contains('@'));
    }
}
