//! Lowering of expression trees to SAM text.
//!
//! Lowering happens once, when the macro carrying the expression is parsed. Variable
//! reads stay symbolic ([`Fragment::Read`]) because registers are only known at code
//! generation time; [`CompiledExpression::render`] resolves them through a locator.

use super::ast::{BinaryOp, Expr, Literal, UnaryOp};
use super::error::{ExpressionError, Result};
use serde::Serialize;

/// Piece of emitted code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fragment {
    Code(String),
    Read(String),
}

/// An expression that has been parsed and lowered, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledExpression {
    source: String,
    fragments: Vec<Fragment>,
}

impl CompiledExpression {
    pub fn new(source: impl Into<String>, expr: &Expr) -> Result<Self> {
        let mut emitter = Emitter::default();
        emitter.node(expr)?;
        Ok(CompiledExpression {
            source: source.into(),
            fragments: emitter.fragments,
        })
    }

    /// The expression text as written in the macro
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Names of the variables read, in evaluation order (with repeats).
    pub fn reads(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().filter_map(|fragment| match fragment {
            Fragment::Read(name) => Some(name.as_str()),
            Fragment::Code(_) => None,
        })
    }

    /// Render to SAM text. A locator result made only of digits is pushed as an
    /// immediate number; anything else is read as a register.
    pub fn render<F>(&self, mut locator: F) -> String
    where
        F: FnMut(&str) -> String,
    {
        let mut out = String::new();
        for fragment in &self.fragments {
            match fragment {
                Fragment::Code(code) => out.push_str(code),
                Fragment::Read(name) => {
                    let location = locator(name);
                    let immediate =
                        !location.is_empty() && location.chars().all(|c| c.is_ascii_digit());
                    out.push_str(&location);
                    out.push(if immediate { ' ' } else { ':' });
                }
            }
        }
        out
    }
}

fn binary_glyph(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Or => "+0>",
        BinaryOp::And => "*0>",
        BinaryOp::Is | BinaryOp::Eq => "=",
        BinaryOp::NotEq | BinaryOp::Differ => "=0=",
        BinaryOp::LessEq => ">0=",
        BinaryOp::GreaterEq => "<0=",
        BinaryOp::Mod => "\\",
        other => other.as_str(),
    }
}

#[derive(Default)]
struct Emitter {
    fragments: Vec<Fragment>,
}

impl Emitter {
    fn code(&mut self, text: &str) {
        if let Some(Fragment::Code(last)) = self.fragments.last_mut() {
            last.push_str(text);
        } else {
            self.fragments.push(Fragment::Code(text.to_string()));
        }
    }

    fn node(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Literal(Literal::Bool(value)) => self.code(if *value { "1 " } else { "0 " }),
            Expr::Literal(Literal::Number(text)) => {
                self.code(text);
                self.code(" ");
            }
            Expr::Name(name) => self.fragments.push(Fragment::Read(name.clone())),
            Expr::Unary(UnaryOp::Neg, operand) => {
                self.code("0 ");
                self.node(operand)?;
                self.code("-");
            }
            Expr::Unary(UnaryOp::Plus, operand) => self.node(operand)?,
            Expr::Unary(UnaryOp::Not, operand) => {
                self.node(operand)?;
                self.code("0=");
            }
            Expr::Binary(op, left, right) => {
                self.node(left)?;
                self.node(right)?;
                self.code(binary_glyph(*op));
            }
            Expr::Call(name, args) => self.call(name, args)?,
        }
        Ok(())
    }

    fn call(&mut self, name: &str, args: &[Expr]) -> Result<()> {
        if name != "random" {
            return Err(ExpressionError::UnknownFunction(name.to_string()));
        }
        match args {
            // r n\  ->  random mod n
            [limit] => {
                self.code("r");
                self.node(limit)?;
                self.code("\\");
            }
            // r hi lo -1+\ lo +  ->  lo + random mod (hi - lo + 1)
            [low, high] => {
                self.code("r");
                self.node(high)?;
                self.node(low)?;
                self.code("-1+\\");
                self.node(low)?;
                self.code("+");
            }
            _ => {
                return Err(ExpressionError::Arity {
                    function: name.to_string(),
                    expected: "1 or 2",
                    found: args.len(),
                })
            }
        }
        Ok(())
    }
}
