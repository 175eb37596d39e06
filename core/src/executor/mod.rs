//! # Executor - Resumable Stack-Driven Interpreter
//!
//! Runs programs made of functions, coroutines and a main body.
//!
//! ## Core Principles
//!
//! 1. **Stack-driven execution**: All state of a body lives in `frames: Vec<Frame>`
//! 2. **Statement-level execution**: Composite frames carry a phase tracking micro-steps
//! 3. **Centralized control flow**: `Control` drives break/continue/return/yield
//! 4. **Suspendable coroutines**: A yield stops the loop with the frames intact,
//!    so the instance picks up exactly where it left off
//!
//! Function calls are not suspendable: each call runs its own VM to completion.

pub mod coroutine;
pub mod decls;
pub mod env;
pub mod errors;
pub mod exec_loop;
pub mod expressions;
pub mod functions;
pub mod runtime;
pub mod stack;
pub mod statements;
pub mod stdlib;
pub mod trace;
pub mod types;
pub mod vm;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use coroutine::{CoroutineInstance, CoroutineState, ResumeOutcome};
pub use errors::{ErrorKind, RuntimeError, RuntimeResult};
pub use exec_loop::{run_until_done, step};
pub use runtime::{Interpreter, InterpreterBuilder, Runtime};
pub use stdlib::{BufferPrinter, Printer, StdoutPrinter};
pub use trace::{ProcessAction, ProcessEvent, ProcessTrace};
pub use types::{Block, CoroutineDecl, Expr, FunctionDecl, Program, Stmt, Val};
pub use vm::{Step, VM};
