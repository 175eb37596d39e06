//! Control flow and execution frame types

use super::ast::{Block, Stmt};
use super::phase::{BlockPhase, IfPhase, WhilePhase};
use super::values::Val;
use serde::{Deserialize, Serialize};

/* ===================== Control Flow ===================== */

/// Control flow state
///
/// This represents active control flow (return, break, continue, yield).
/// When control is Break/Continue/Return, the VM unwinds the stack to find
/// the appropriate handler. For Yield, the VM stops execution with its frames
/// intact and can be resumed later.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Control {
    #[default]
    None,
    Break,
    Continue,
    /// `None` is the void marker of a bare `return;`
    Return(Option<Val>),
    Yield,
}

/* ===================== Frames ===================== */

/// Frame kind - the type and state of a statement being executed
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum FrameKind {
    Block { phase: BlockPhase, idx: usize },
    If { phase: IfPhase, branch_then: bool },
    While { phase: WhilePhase, iteration: usize },
    VarDecl,
    Assign,
    Expr,
    Return,
    Break,
    Continue,
    Yield,
    Create,
    Resume,
}

/// The AST node a frame executes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum FrameNode {
    Block(Block),
    Stmt(Stmt),
}

/// Execution frame - one per active statement or block
///
/// The frame stack replaces the system call stack, making execution
/// suspendable at any statement boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// The kind and state of this frame
    #[serde(flatten)]
    pub kind: FrameKind,

    /// Scope depth of the environment when this frame was pushed.
    /// Popping the frame truncates the environment back to this depth.
    pub scope_base: usize,

    pub node: FrameNode,
}
