//! Virtual Machine state
//!
//! The VM holds all execution state for one body (the main program, one call,
//! or one coroutine instance):
//! - frames: Stack of active statements and blocks
//! - env: Scope chain in effect at the top frame
//! - control: Current control flow state (return, break, yield, etc.)

use super::env::Env;
use super::types::{
    Block, BlockPhase, Control, Frame, FrameKind, FrameNode, IfPhase, Stmt, WhilePhase,
};
use serde::{Deserialize, Serialize};

/// Which kind of body a VM runs. Decides where `yield` is legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Main,
    Function,
    Coroutine,
}

/* ===================== VM ===================== */

/// Virtual Machine state
///
/// This contains everything needed to execute (and serialize/resume) a body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VM {
    /// Stack of execution frames
    pub frames: Vec<Frame>,

    /// Scope chain
    pub env: Env,

    /// Current control flow state
    pub control: Control,

    pub body: BodyKind,
}

impl VM {
    /// Create a new VM for a body
    ///
    /// The body runs directly in the base scope of `env` (which holds the
    /// parameters for a call), so no extra scope is opened for it.
    pub fn new(body: Block, env: Env, kind: BodyKind) -> Self {
        let mut vm = VM {
            frames: vec![],
            env,
            control: Control::None,
            body: kind,
        };

        let base = vm.env.depth();
        vm.frames.push(Frame {
            kind: FrameKind::Block {
                phase: BlockPhase::Next,
                idx: 0,
            },
            scope_base: base,
            node: FrameNode::Block(body),
        });

        vm
    }

    /// Clear a pending yield so execution can continue after it
    ///
    /// Returns false if the VM was not suspended.
    pub fn resume(&mut self) -> bool {
        if self.control != Control::Yield {
            return false;
        }
        self.control = Control::None;
        true
    }

    pub fn is_suspended(&self) -> bool {
        self.control == Control::Yield
    }
}

/* ===================== Frame Management ===================== */

/// Push a new frame for a statement onto the stack
///
/// This determines the initial phase based on the statement type.
pub fn push_stmt(vm: &mut VM, stmt: &Stmt) {
    let kind = match stmt {
        Stmt::VarDecl { .. } => FrameKind::VarDecl,
        Stmt::Assign { .. } => FrameKind::Assign,
        Stmt::Expr { .. } => FrameKind::Expr,
        Stmt::If { .. } => FrameKind::If {
            phase: IfPhase::EvalCond,
            branch_then: false,
        },
        Stmt::While { .. } => FrameKind::While {
            phase: WhilePhase::Check,
            iteration: 0,
        },
        Stmt::Return { .. } => FrameKind::Return,
        Stmt::Break => FrameKind::Break,
        Stmt::Continue => FrameKind::Continue,
        Stmt::Yield => FrameKind::Yield,
        Stmt::CreateCoroutine { .. } => FrameKind::Create,
        Stmt::Resume { .. } => FrameKind::Resume,
    };

    let base = vm.env.depth();
    vm.frames.push(Frame {
        kind,
        scope_base: base,
        node: FrameNode::Stmt(stmt.clone()),
    });
}

/// Push a nested block that opens its own scope
pub fn push_block(vm: &mut VM, block: &Block) {
    let base = vm.env.depth();
    vm.frames.push(Frame {
        kind: FrameKind::Block {
            phase: BlockPhase::Enter,
            idx: 0,
        },
        scope_base: base,
        node: FrameNode::Block(block.clone()),
    });
}

/* ===================== Step Result ===================== */

/// Result of executing one step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Continue to next step
    Continue,
    /// Execution finished or suspended; inspect `vm.control`
    Done,
}
