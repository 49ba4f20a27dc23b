use thiserror::Error;

/// Errors raised while parsing or lowering an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionError {
    #[error("unknown operator ({0:?})")]
    UnknownOperator(String),

    #[error("unknown function ({0:?})")]
    UnknownFunction(String),

    #[error("syntax error: expected {expected}, found {found:?}")]
    UnexpectedToken { expected: &'static str, found: String },

    #[error("syntax error: unexpected end of expression")]
    UnexpectedEnd,

    #[error("function {function:?} takes {expected} arguments, {found} given")]
    Arity {
        function: String,
        expected: &'static str,
        found: usize,
    },

    #[error("only named functions can be called, found {0}")]
    NotCallable(String),

    #[error("empty expression")]
    Empty,

    #[error("expression nested more than {0} levels deep")]
    TooDeep(usize),
}

pub type Result<T> = std::result::Result<T, ExpressionError>;
