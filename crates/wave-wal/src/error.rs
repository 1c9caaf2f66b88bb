//! Error types for WAL evaluation

use thiserror::Error;

/// Result type alias for WAL operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while reading or evaluating a WAL expression
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Malformed s-expression text
    #[error("syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    /// Symbol that is neither bound, builtin nor a signal
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),

    /// Call to a function that does not exist
    #[error("undefined function: {0}")]
    UndefinedFunction(String),

    /// Head of a call is not a symbol
    #[error("cannot call {0}: not a function")]
    NotCallable(String),

    /// Wrong number of arguments
    #[error("{function}: expected {expected} arguments, got {got}")]
    Arity {
        function: String,
        expected: String,
        got: usize,
    },

    /// Argument of the wrong type
    #[error("{function}: {message}")]
    Type { function: String, message: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow in {0}")]
    Overflow(String),

    /// Expression tree deeper than the evaluator will recurse
    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    /// Time step outside the trace
    #[error("time step {index} is out of range (trace has {len} time steps)")]
    IndexOutOfRange { index: i64, len: usize },
}

impl Error {
    pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn type_error(function: &str, message: impl Into<String>) -> Self {
        Self::Type {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn arity(function: &str, expected: &str, got: usize) -> Self {
        Self::Arity {
            function: function.to_string(),
            expected: expected.to_string(),
            got,
        }
    }
}
