//! Type definitions for the executor
//!
//! This module contains all the core types used by the executor:
//! - AST nodes (Program, Stmt, Expr)
//! - Runtime values (Val, TypeName)
//! - Control flow (Control, Frame, FrameKind)
//! - Execution phases for composite statements

pub mod ast;
pub mod control;
pub mod phase;
pub mod values;

// Re-export all types for convenient access
pub use ast::{
    BinaryOp, Block, CoroutineDecl, DocComment, Expr, FunctionDecl, Param, Program, Stmt,
    UnaryOp, PROCESS_MARKER,
};
pub use control::{Control, Frame, FrameKind, FrameNode};
pub use phase::*;
pub use values::{TypeName, Val};
