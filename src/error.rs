// ABOUTME: Error types for read and evaluation failures in the interpreter

use crate::printer;
use crate::value::Value;
use thiserror::Error;

// ===== Arity constant strings (eliminates allocations in error paths) =====
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_THREE: &str = "3";
pub const ARITY_ZERO_OR_ONE: &str = "0-1";
pub const ARITY_TWO_OR_THREE: &str = "2-3";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

#[derive(Error, Debug, Clone)]
pub enum EvalError {
    /// Tokenization or structure failure in the reader
    #[error("{0}")]
    Parse(String),

    /// The reader saw nothing but whitespace and comments; the REPL skips
    /// this silently
    #[error("<empty input>")]
    EmptyInput,

    #[error("'{0}' not found")]
    UnboundSymbol(String),

    /// A built-in or special form received an argument of a disallowed
    /// variant
    #[error("{function}: expected {expected}, got {actual}")]
    TypeMismatch {
        function: String,
        expected: String,
        actual: String,
    },

    /// Wrong number of arguments; `expected` is free text ("2", "at least 1")
    #[error("{function}: expected {expected} argument{}, got {actual}", if *.expected == "1" { "" } else { "s" })]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("nth: index {index} out of range")]
    IndexOutOfRange { index: i64 },

    #[error("integer division by zero")]
    DivByZero,

    #[error("attempt to call non-function")]
    NotCallable,

    #[error("send on closed channel")]
    ChannelClosed,

    /// Raised by `throw`; `catch` binds the payload itself, every other kind
    /// binds its display string
    #[error("{}", printer::pr_str(.0, true))]
    Raised(Value),

    /// Host-operation failure surfaced by a built-in (slurp, readline,
    /// system, ...)
    #[error("{function}: {message}")]
    Runtime { function: String, message: String },
}

impl EvalError {
    /// Create a type mismatch error with the offending value's type name
    pub fn type_error(function: &str, expected: &str, actual: &Value) -> Self {
        EvalError::TypeMismatch {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.type_name().to_string(),
        }
    }

    /// Create an arity error with expected and actual counts
    pub fn arity_error(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        EvalError::Arity {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// Create a runtime error with function context
    pub fn runtime_error(function: &str, message: impl Into<String>) -> Self {
        EvalError::Runtime {
            function: function.to_string(),
            message: message.into(),
        }
    }
}
