//! Evaluation errors
//!
//! [`EvalError`] covers everything that can go wrong while running a unit
//! (as opposed to parse errors). Every error is fatal: evaluation stops and
//! the error is returned from [`Interpreter::run`](super::Interpreter::run).

use crate::parser::ast::SourceLocation;
use crate::runtime::errors::DispatchError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EvalError {
    /// Failure raised by the dispatch runtime or a host function
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("{name} is not defined at line {}, column {}", location.line, location.column)]
    UndefinedVariable {
        name: String,
        location: SourceLocation,
    },

    #[error("{callee} is not a function at line {}, column {}", location.line, location.column)]
    NotCallable {
        callee: String,
        location: SourceLocation,
    },

    #[error("Assignment to constant variable '{name}' at line {}, column {}", location.line, location.column)]
    ConstAssignment {
        name: String,
        location: SourceLocation,
    },

    #[error("Identifier '{name}' has already been declared at line {}, column {}", location.line, location.column)]
    Redeclaration {
        name: String,
        location: SourceLocation,
    },

    #[error("Invalid assignment target at line {}, column {}", location.line, location.column)]
    InvalidAssignmentTarget { location: SourceLocation },

    #[error("Unsupported {feature} at line {}, column {}", location.line, location.column)]
    Unsupported {
        feature: &'static str,
        location: SourceLocation,
    },

    #[error("Cannot find module '{name}' at line {}, column {}", location.line, location.column)]
    UnknownModule {
        name: String,
        location: SourceLocation,
    },

    #[error("Maximum call depth of {limit} exceeded at line {}, column {}", location.line, location.column)]
    CallDepthExceeded {
        limit: usize,
        location: SourceLocation,
    },

    #[error("Illegal {statement} statement at line {}, column {}", location.line, location.column)]
    IllegalJump {
        statement: &'static str,
        location: SourceLocation,
    },
}

impl EvalError {
    /// Location of the failing construct, if known
    pub fn location(&self) -> Option<SourceLocation> {
        match self {
            EvalError::Dispatch(_) => None,
            EvalError::UndefinedVariable { location, .. }
            | EvalError::NotCallable { location, .. }
            | EvalError::ConstAssignment { location, .. }
            | EvalError::Redeclaration { location, .. }
            | EvalError::InvalidAssignmentTarget { location }
            | EvalError::Unsupported { location, .. }
            | EvalError::UnknownModule { location, .. }
            | EvalError::CallDepthExceeded { location, .. }
            | EvalError::IllegalJump { location, .. } => Some(*location),
        }
    }
}
