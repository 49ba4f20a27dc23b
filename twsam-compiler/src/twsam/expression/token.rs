//! Expression tokens
//!
//! Defined with the logos derive macro. Alternate spellings are folded into their
//! canonical token here (`&&` is `and`, `||` is `or`, `!` is `not`), and the `$` marker
//! is stripped from identifiers, so the parser only ever sees the canonical forms.

use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum ExprToken {
    #[token("or")]
    #[token("||")]
    Or,
    #[token("and")]
    #[token("&&")]
    And,
    #[token("not")]
    #[token("!")]
    Not,
    #[token("is")]
    Is,
    #[token("true")]
    True,
    #[token("false")]
    False,

    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<>")]
    LessGreater,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Assign,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,

    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().to_owned())]
    Number(String),

    #[regex(r"\$?[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().trim_start_matches('$').to_owned())]
    Name(String),

    /// Synthesized after the last real token.
    End,
}

impl ExprToken {
    /// The operator text as written in canonical form
    pub fn as_str(&self) -> &str {
        match self {
            ExprToken::Or => "or",
            ExprToken::And => "and",
            ExprToken::Not => "not",
            ExprToken::Is => "is",
            ExprToken::True => "true",
            ExprToken::False => "false",
            ExprToken::EqEq => "==",
            ExprToken::BangEq => "!=",
            ExprToken::LessGreater => "<>",
            ExprToken::LessEq => "<=",
            ExprToken::GreaterEq => ">=",
            ExprToken::Less => "<",
            ExprToken::Greater => ">",
            ExprToken::Assign => "=",
            ExprToken::Plus => "+",
            ExprToken::Minus => "-",
            ExprToken::Star => "*",
            ExprToken::Slash => "/",
            ExprToken::Percent => "%",
            ExprToken::LParen => "(",
            ExprToken::RParen => ")",
            ExprToken::Comma => ",",
            ExprToken::Number(text) | ExprToken::Name(text) => text,
            ExprToken::End => "(end)",
        }
    }
}

impl fmt::Display for ExprToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lex an expression into tokens terminated by [`ExprToken::End`].
///
/// Returns the offending slice when a character sequence matches no token.
pub fn lex(source: &str) -> Result<Vec<(ExprToken, Range<usize>)>, String> {
    let mut lexer = ExprToken::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => return Err(lexer.slice().to_owned()),
        }
    }
    tokens.push((ExprToken::End, source.len()..source.len()));
    Ok(tokens)
}
