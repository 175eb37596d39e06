//! Runtime error taxonomy
//!
//! Every error aborts the top-level run in progress (the main body or a single
//! resume). Errors are surfaced as a (category, message) pair; formatting the
//! category for users is left to the outer layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Unknown variable, function, coroutine or instance
    NameError,
    /// Name already defined in the same scope or table
    DuplicateNameError,
    TypeError,
    DivisionByZero,
    ArityError,
    /// Function with a declared return type finished without returning a value
    MissingReturnError,
    /// break/continue/yield outside its legal construct
    ControlFlowError,
    /// Resume on a Completed (or currently running) instance
    IllegalStateError,
    /// Nested calls exceeded `runtime.max_call_depth`
    RecursionLimit,
    /// The output sink rejected a `print`
    OutputError,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::NameError => "NameError",
            ErrorKind::DuplicateNameError => "DuplicateNameError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::DivisionByZero => "DivisionByZero",
            ErrorKind::ArityError => "ArityError",
            ErrorKind::MissingReturnError => "MissingReturnError",
            ErrorKind::ControlFlowError => "ControlFlowError",
            ErrorKind::IllegalStateError => "IllegalStateError",
            ErrorKind::RecursionLimit => "RecursionLimit",
            ErrorKind::OutputError => "OutputError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn name(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NameError, message)
    }

    pub fn duplicate(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateNameError, message)
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    pub fn control_flow(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ControlFlowError, message)
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::IllegalStateError, message)
    }
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;
