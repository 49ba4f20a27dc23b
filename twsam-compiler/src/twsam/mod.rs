//! Main module for twsam library functionality

pub mod codegen;
pub mod diagnostics;
pub mod error;
pub mod expression;
pub mod indexing;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod source;
pub mod testing;
