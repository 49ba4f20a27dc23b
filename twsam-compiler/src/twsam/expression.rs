//! Expression compiler
//!
//!     Macro arguments (`<<set>>`, `<<if>>`, `<<print>>`, link on-click actions) are
//!     written in a small expression language: numbers, booleans, variables, the
//!     arithmetic, comparison and boolean operators, and `random`. This module is a
//!     self-contained compiler for it:
//!         1. [token] lexes with logos, folding alternate spellings.
//!         2. [parser] builds an [Expr](ast::Expr) with operator-precedence parsing.
//!         3. [emit] lowers the tree to SAM fragments.
//!
//!     Compilation is stateless; the same text always compiles to the same fragments.

pub mod ast;
pub mod emit;
pub mod error;
pub mod parser;
pub mod token;

pub use ast::Expr;
pub use emit::{CompiledExpression, Fragment};
pub use error::ExpressionError;
pub use parser::parse_expression;

/// Parse and lower an expression.
pub fn compile_expression(source: &str) -> error::Result<CompiledExpression> {
    let expr = parse_expression(source)?;
    CompiledExpression::new(source.trim(), &expr)
}

/// Compile an expression straight to SAM text, resolving variables with `var_locator`.
pub fn to_sam<F>(source: &str, var_locator: F) -> error::Result<String>
where
    F: FnMut(&str) -> String,
{
    Ok(compile_expression(source)?.render(var_locator))
}
