//! Operator-precedence parser for macro expressions.
//!
//! Top-down operator precedence parsing: every token kind has a null denotation (used
//! when the token starts an expression) and a left denotation (used when it continues
//! one). The handlers and binding powers are fixed `match` tables; nothing about the
//! grammar changes at runtime.
//!
//! Binding powers (low to high):
//!   `or`           30, right
//!   `and`          40, right
//!   `not`          50, prefix
//!   `is == != <> < <= > >=`  60, left
//!   `+ -`          110, left
//!   `* / %`        120, left
//!   unary `+ -`    130, prefix
//!   `(` call/group 150

use super::ast::{BinaryOp, Expr, Literal, UnaryOp};
use super::error::{ExpressionError, Result};
use super::token::{self, ExprToken};
use std::ops::Range;

const BP_OR: u8 = 30;
const BP_AND: u8 = 40;
const BP_NOT: u8 = 50;
const BP_COMPARE: u8 = 60;
const BP_ADD: u8 = 110;
const BP_MUL: u8 = 120;
const BP_UNARY: u8 = 130;
const BP_CALL: u8 = 150;

/// Deepest expression tree the parser builds. Every operator and every group counts
/// as one level, so the lowering never recurses deeper than this.
pub const MAX_DEPTH: usize = 256;

/// How strongly a token binds to the expression on its left.
fn left_binding_power(token: &ExprToken) -> u8 {
    match token {
        ExprToken::Or => BP_OR,
        ExprToken::And => BP_AND,
        ExprToken::Is
        | ExprToken::EqEq
        | ExprToken::BangEq
        | ExprToken::LessGreater
        | ExprToken::Less
        | ExprToken::LessEq
        | ExprToken::Greater
        | ExprToken::GreaterEq => BP_COMPARE,
        ExprToken::Plus | ExprToken::Minus => BP_ADD,
        ExprToken::Star | ExprToken::Slash | ExprToken::Percent => BP_MUL,
        ExprToken::LParen => BP_CALL,
        _ => 0,
    }
}

/// Binary operators with their right binding power (`bp - 1` for right associativity).
fn infix(token: &ExprToken) -> Option<(BinaryOp, u8)> {
    let entry = match token {
        ExprToken::Or => (BinaryOp::Or, BP_OR - 1),
        ExprToken::And => (BinaryOp::And, BP_AND - 1),
        ExprToken::Is => (BinaryOp::Is, BP_COMPARE),
        ExprToken::EqEq => (BinaryOp::Eq, BP_COMPARE),
        ExprToken::BangEq => (BinaryOp::NotEq, BP_COMPARE),
        ExprToken::LessGreater => (BinaryOp::Differ, BP_COMPARE),
        ExprToken::Less => (BinaryOp::Less, BP_COMPARE),
        ExprToken::LessEq => (BinaryOp::LessEq, BP_COMPARE),
        ExprToken::Greater => (BinaryOp::Greater, BP_COMPARE),
        ExprToken::GreaterEq => (BinaryOp::GreaterEq, BP_COMPARE),
        ExprToken::Plus => (BinaryOp::Add, BP_ADD),
        ExprToken::Minus => (BinaryOp::Sub, BP_ADD),
        ExprToken::Star => (BinaryOp::Mul, BP_MUL),
        ExprToken::Slash => (BinaryOp::Div, BP_MUL),
        ExprToken::Percent => (BinaryOp::Mod, BP_MUL),
        _ => return None,
    };
    Some(entry)
}

/// Parser state: the token buffer and a cursor into it.
pub struct ExprParser {
    tokens: Vec<(ExprToken, Range<usize>)>,
    pos: usize,
    depth: usize,
}

impl ExprParser {
    pub fn new(source: &str) -> Result<Self> {
        let tokens = token::lex(source).map_err(ExpressionError::UnknownOperator)?;
        Ok(ExprParser {
            tokens,
            pos: 0,
            depth: 0,
        })
    }

    fn peek(&self) -> &ExprToken {
        self.tokens
            .get(self.pos)
            .map_or(&ExprToken::End, |(token, _)| token)
    }

    fn advance(&mut self) -> ExprToken {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, wanted: ExprToken, expected: &'static str) -> Result<()> {
        let token = self.advance();
        if token == wanted {
            Ok(())
        } else if token == ExprToken::End {
            Err(ExpressionError::UnexpectedEnd)
        } else {
            Err(ExpressionError::UnexpectedToken {
                expected,
                found: token.to_string(),
            })
        }
    }

    /// Parse a whole expression, requiring every token to be consumed.
    pub fn parse_all(&mut self) -> Result<Expr> {
        if self.tokens.len() <= 1 {
            return Err(ExpressionError::Empty);
        }
        let expr = self.parse(0)?;
        match self.peek() {
            ExprToken::End => Ok(expr),
            ExprToken::Assign => Err(ExpressionError::UnknownOperator("=".to_string())),
            other => Err(ExpressionError::UnexpectedToken {
                expected: "end of expression",
                found: other.to_string(),
            }),
        }
    }

    /// Parse while the next token binds tighter than `rbp`.
    pub fn parse(&mut self, rbp: u8) -> Result<Expr> {
        let depth = self.depth;
        self.descend()?;
        let token = self.advance();
        let mut left = self.nud(token)?;
        while rbp < left_binding_power(self.peek()) {
            // a chain of operators nests its left operand one level further each time
            self.descend()?;
            let token = self.advance();
            left = self.led(token, left)?;
        }
        self.depth = depth;
        Ok(left)
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(ExpressionError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn nud(&mut self, token: ExprToken) -> Result<Expr> {
        match token {
            ExprToken::Number(text) => Ok(Expr::Literal(Literal::Number(text))),
            ExprToken::True => Ok(Expr::Literal(Literal::Bool(true))),
            ExprToken::False => Ok(Expr::Literal(Literal::Bool(false))),
            ExprToken::Name(name) => Ok(Expr::Name(name)),
            ExprToken::Not => Ok(Expr::unary(UnaryOp::Not, self.parse(BP_NOT)?)),
            ExprToken::Minus => Ok(Expr::unary(UnaryOp::Neg, self.parse(BP_UNARY)?)),
            ExprToken::Plus => Ok(Expr::unary(UnaryOp::Plus, self.parse(BP_UNARY)?)),
            ExprToken::LParen => {
                let inner = self.parse(0)?;
                self.expect(ExprToken::RParen, "')'")?;
                Ok(inner)
            }
            ExprToken::End => Err(ExpressionError::UnexpectedEnd),
            other => Err(ExpressionError::UnexpectedToken {
                expected: "an operand",
                found: other.to_string(),
            }),
        }
    }

    fn led(&mut self, token: ExprToken, left: Expr) -> Result<Expr> {
        if token == ExprToken::LParen {
            return self.call(left);
        }
        match infix(&token) {
            Some((op, rbp)) => Ok(Expr::binary(op, left, self.parse(rbp)?)),
            None => Err(ExpressionError::UnknownOperator(token.to_string())),
        }
    }

    fn call(&mut self, callee: Expr) -> Result<Expr> {
        let Expr::Name(name) = callee else {
            return Err(ExpressionError::NotCallable(callee.to_string()));
        };
        let mut args = Vec::new();
        if *self.peek() != ExprToken::RParen {
            loop {
                args.push(self.parse(0)?);
                if *self.peek() != ExprToken::Comma {
                    break;
                }
                self.advance();
            }
        }
        self.expect(ExprToken::RParen, "')'")?;
        Ok(Expr::Call(name, args))
    }
}

/// Parse an expression string into a tree.
pub fn parse_expression(source: &str) -> Result<Expr> {
    ExprParser::new(source)?.parse_all()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(source: &str) -> String {
        parse_expression(source).unwrap().to_string()
    }

    #[test]
    fn test_and_binds_tighter_than_or() {
        assert_eq!(
            tree("a or b and c"),
            "(or (name a) (and (name b) (name c)))"
        );
    }

    #[test]
    fn test_or_is_right_associative() {
        assert_eq!(tree("a or b or c"), "(or (name a) (or (name b) (name c)))");
    }

    #[test]
    fn test_subtraction_is_left_associative() {
        assert_eq!(
            tree("10 - 4 - 3"),
            "(- (- (literal 10) (literal 4)) (literal 3))"
        );
    }

    #[test]
    fn test_not_covers_comparison() {
        assert_eq!(tree("not $a == 1"), "(not (== (name a) (literal 1)))");
    }

    #[test]
    fn test_unary_minus_binds_tighter_than_mul() {
        assert_eq!(tree("-a * 2"), "(* (- (name a)) (literal 2))");
    }

    #[test]
    fn test_grouping() {
        assert_eq!(
            tree("(1 + 2) * 3"),
            "(* (+ (literal 1) (literal 2)) (literal 3))"
        );
    }

    #[test]
    fn test_call_arguments() {
        assert_eq!(
            tree("random(1, $max + 1)"),
            "(call random (literal 1) (+ (name max) (literal 1)))"
        );
        assert_eq!(tree("random()"), "(call random)");
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_expression("   "), Err(ExpressionError::Empty));
        assert_eq!(parse_expression("1 +"), Err(ExpressionError::UnexpectedEnd));
        assert_eq!(
            parse_expression("a = 1"),
            Err(ExpressionError::UnknownOperator("=".to_string()))
        );
        assert_eq!(
            parse_expression("(1 + 2"),
            Err(ExpressionError::UnexpectedEnd)
        );
        assert_eq!(
            parse_expression("1 2"),
            Err(ExpressionError::UnexpectedToken {
                expected: "end of expression",
                found: "2".to_string(),
            })
        );
        assert!(matches!(
            parse_expression("(1)(2)"),
            Err(ExpressionError::NotCallable(_))
        ));
    }

    #[test]
    fn test_nesting_limit() {
        let nested = |levels: usize| format!("{}1{}", "(".repeat(levels), ")".repeat(levels));
        assert!(parse_expression(&nested(MAX_DEPTH - 1)).is_ok());
        assert_eq!(
            parse_expression(&nested(5000)),
            Err(ExpressionError::TooDeep(MAX_DEPTH))
        );
        assert_eq!(
            parse_expression(&vec!["1"; 5000].join(" + ")),
            Err(ExpressionError::TooDeep(MAX_DEPTH))
        );
        assert_eq!(
            parse_expression(&"-".repeat(5000)),
            Err(ExpressionError::TooDeep(MAX_DEPTH))
        );
    }
}
