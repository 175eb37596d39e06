//! Standard library function implementations
//!
//! The language ships a single built-in, `print`. Its output is routed
//! through a [`Printer`] so embedders and tests can capture it.

pub mod print;

pub use print::{BufferPrinter, Printer, StdoutPrinter};

use super::errors::{ErrorKind, RuntimeError, RuntimeResult};
use super::types::Val;
use serde::{Deserialize, Serialize};

/* ===================== Standard Library Function Types ===================== */

/// Standard library function identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StdlibFunc {
    Print,
}

impl StdlibFunc {
    /// Resolve a built-in by the name used at call sites
    pub fn lookup(name: &str) -> Option<Self> {
        match name {
            "print" => Some(StdlibFunc::Print),
            _ => None,
        }
    }
}

/* ===================== Stdlib Dispatcher ===================== */

/// Call a standard library function with already-evaluated arguments
///
/// Returns `None` for built-ins that produce no value.
pub fn call_stdlib_func(
    func: StdlibFunc,
    args: &[Val],
    printer: &mut dyn Printer,
) -> RuntimeResult<Option<Val>> {
    match func {
        StdlibFunc::Print => {
            print::print(args, printer).map_err(|e| {
                RuntimeError::new(ErrorKind::OutputError, format!("print failed: {}", e))
            })?;
            Ok(None)
        }
    }
}
