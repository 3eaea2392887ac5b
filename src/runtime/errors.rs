//! Dispatch failures
//!
//! Every failure is synchronous and fatal to the call that raised it. The
//! runtime never retries or recovers; errors raised inside an override come
//! back to the caller unmodified.

use crate::runtime::value::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum DispatchError {
    /// An operand was `null` or `undefined`
    #[error("Item cannot be null (operator '{operator}')")]
    NullOperand { operator: &'static str },

    /// The operand is not a primitive and carries no usable override
    #[error("No such operator '{operator}' exists for type")]
    UnsupportedOperator { operator: &'static str },

    /// A unary operation reached through the binary entry point, or the reverse
    #[error("Operator '{operator}' takes {expected} operand(s), got {got}")]
    ArityMismatch {
        operator: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Cannot capture property access on {found}")]
    InvalidProxyTarget { found: &'static str },

    #[error("{0} is not a function")]
    NotCallable(String),

    #[error("{0} is not a constructor")]
    NotConstructible(String),

    /// A value thrown by host code, typically an override
    #[error("Uncaught {0}")]
    Thrown(Value),
}

impl DispatchError {
    /// Shorthand for throwing a string message
    pub fn thrown(message: impl AsRef<str>) -> Self {
        DispatchError::Thrown(Value::string(message))
    }
}
