//! Core execution loop
//!
//! This module contains the step() function - the heart of the interpreter.
//! It processes one frame at a time, advancing execution phases and managing the frame stack.
//!
//! ## Function Organization
//! Functions are ordered by importance/call hierarchy:
//! 1. run_until_done() - Top-level driver (calls step repeatedly)
//! 2. step() - Main execution loop (dispatches to statement handlers)
//! 3. unwind() - Pops frames for break/continue/return

use super::errors::{RuntimeError, RuntimeResult};
use super::runtime::Runtime;
use super::statements::{
    execute_assign, execute_block, execute_break, execute_continue, execute_create, execute_expr,
    execute_if, execute_resume, execute_return, execute_var_decl, execute_while, execute_yield,
};
use super::types::{Control, Frame, FrameKind, FrameNode, Stmt, WhilePhase};
use super::vm::{Step, VM};
use tracing::trace;

/* ===================== Public API ===================== */

/// Run the VM until it completes or suspends
///
/// After an `Ok` return, inspect `vm.control`:
/// - `Control::Yield`: suspended, call `vm.resume()` and run again
/// - `Control::Return(_)`: the body executed a return
/// - `Control::None`: the body fell off its end
pub fn run_until_done(vm: &mut VM, rt: &mut Runtime) -> RuntimeResult<()> {
    loop {
        match step(vm, rt)? {
            Step::Continue => continue,
            Step::Done => return Ok(()),
        }
    }
}

/// Execute one step of the VM
///
/// This is the core interpreter loop. It:
/// 1. Stops at a pending yield
/// 2. Unwinds if break/continue/return is active
/// 3. Gets the top frame and dispatches on its kind and phase
pub fn step(vm: &mut VM, rt: &mut Runtime) -> RuntimeResult<Step> {
    match vm.control {
        Control::None => {}
        Control::Yield => return Ok(Step::Done),
        _ => return unwind(vm),
    }

    // Get top frame (if any)
    let Some(ix) = vm.frames.len().checked_sub(1) else {
        // No frames left - execution complete
        return Ok(Step::Done);
    };

    // Clone frame data we need (to avoid borrow checker issues)
    let (kind, node) = {
        let f = &vm.frames[ix];
        (f.kind.clone(), f.node.clone())
    };
    trace!(depth = ix, kind = ?kind, "step");

    match (kind, node) {
        (FrameKind::Block { phase, idx }, FrameNode::Block(body)) => {
            Ok(execute_block(vm, ix, phase, idx, &body))
        }

        (
            FrameKind::If { phase, branch_then },
            FrameNode::Stmt(Stmt::If {
                cond,
                then_b,
                else_b,
            }),
        ) => execute_if(vm, rt, ix, phase, branch_then, &cond, &then_b, else_b.as_ref()),

        (FrameKind::While { phase, iteration }, FrameNode::Stmt(Stmt::While { cond, body })) => {
            execute_while(vm, rt, ix, phase, iteration, &cond, &body)
        }

        (FrameKind::VarDecl, FrameNode::Stmt(Stmt::VarDecl { name, ty, init, doc })) => {
            execute_var_decl(vm, rt, &name, ty, init.as_ref(), doc.as_ref())
        }

        (FrameKind::Assign, FrameNode::Stmt(Stmt::Assign { name, value })) => {
            execute_assign(vm, rt, &name, &value)
        }

        (FrameKind::Expr, FrameNode::Stmt(Stmt::Expr { call })) => execute_expr(vm, rt, &call),

        (FrameKind::Return, FrameNode::Stmt(Stmt::Return { value })) => {
            execute_return(vm, rt, value.as_ref())
        }

        (FrameKind::Break, FrameNode::Stmt(Stmt::Break)) => Ok(execute_break(vm)),

        (FrameKind::Continue, FrameNode::Stmt(Stmt::Continue)) => Ok(execute_continue(vm)),

        (FrameKind::Yield, FrameNode::Stmt(Stmt::Yield)) => execute_yield(vm),

        (FrameKind::Create, FrameNode::Stmt(Stmt::CreateCoroutine { name, coroutine })) => {
            execute_create(vm, rt, &name, &coroutine)
        }

        (FrameKind::Resume, FrameNode::Stmt(Stmt::Resume { name })) => {
            execute_resume(vm, rt, &name)
        }

        // Only reachable with a hand-edited snapshot
        (kind, _) => Err(RuntimeError::control_flow(format!(
            "frame {:?} does not match its node",
            kind
        ))),
    }
}

/* ===================== Control Flow ===================== */

/// Unwind the stack when control flow is active
///
/// Pops frames, releasing each frame's scopes, until a While frame handles a
/// break/continue. A return unwinds every frame of this VM; the call or resume
/// that owns the VM then interprets it. A break/continue with no enclosing
/// loop in this VM is an error.
fn unwind(vm: &mut VM) -> RuntimeResult<Step> {
    while let Some(frame) = vm.frames.pop() {
        vm.env.truncate(frame.scope_base);

        if let FrameKind::While { iteration, .. } = frame.kind {
            match vm.control {
                Control::Break => {
                    vm.control = Control::None;
                    return Ok(Step::Continue);
                }
                Control::Continue => {
                    vm.control = Control::None;
                    vm.frames.push(Frame {
                        kind: FrameKind::While {
                            phase: WhilePhase::Check,
                            iteration: iteration + 1,
                        },
                        ..frame
                    });
                    return Ok(Step::Continue);
                }
                _ => {}
            }
        }
    }

    match vm.control {
        Control::Break => Err(RuntimeError::control_flow(
            "break used outside of a while loop",
        )),
        Control::Continue => Err(RuntimeError::control_flow(
            "continue used outside of a while loop",
        )),
        Control::Return(_) | Control::None | Control::Yield => Ok(Step::Done),
    }
}
