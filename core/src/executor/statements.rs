//! Statement execution handlers
//!
//! Each statement type has its own handler function that processes
//! the statement based on its current execution phase. Handlers for simple
//! statements run to completion in one step and pop their frame; composite
//! handlers update their frame and push children.

use super::errors::{RuntimeError, RuntimeResult};
use super::expressions::{eval_condition, eval_expr, eval_for_effect};
use super::runtime::Runtime;
use super::trace::ProcessAction;
use super::types::{
    Block, BlockPhase, Control, DocComment, Expr, FrameKind, IfPhase, TypeName, WhilePhase,
};
use super::vm::{push_block, push_stmt, BodyKind, Step, VM};

/* ===================== Composite Statements ===================== */

/// Execute Block
///
/// Statements run strictly in order. A statement that raises control flow
/// leaves the remaining statements unexecuted: the next step unwinds instead
/// of coming back here.
pub fn execute_block(vm: &mut VM, ix: usize, phase: BlockPhase, idx: usize, body: &Block) -> Step {
    match phase {
        BlockPhase::Enter => {
            vm.env.push_scope();
            vm.frames[ix].kind = FrameKind::Block {
                phase: BlockPhase::Next,
                idx,
            };
            Step::Continue
        }
        BlockPhase::Next => {
            // Check if we've finished all statements in the block
            if idx >= body.len() {
                let base = vm.frames[ix].scope_base;
                vm.env.truncate(base);
                vm.frames.pop();
                return Step::Continue;
            }

            // Point our frame at the next statement before descending
            vm.frames[ix].kind = FrameKind::Block {
                phase: BlockPhase::Next,
                idx: idx + 1,
            };
            push_stmt(vm, &body[idx]);

            Step::Continue
        }
    }
}

/// Execute If statement
#[allow(clippy::too_many_arguments)]
pub fn execute_if(
    vm: &mut VM,
    rt: &mut Runtime,
    ix: usize,
    phase: IfPhase,
    branch_then: bool,
    cond: &Expr,
    then_b: &Block,
    else_b: Option<&Block>,
) -> RuntimeResult<Step> {
    match phase {
        IfPhase::EvalCond => {
            let taken = eval_condition(cond, &vm.env, rt, "if")?;
            vm.frames[ix].kind = FrameKind::If {
                phase: IfPhase::Dispatch,
                branch_then: taken,
            };
            Ok(Step::Continue)
        }
        IfPhase::Dispatch => {
            // The branch replaces the If frame; its signal propagates unchanged
            vm.frames.pop();
            if branch_then {
                push_block(vm, then_b);
            } else if let Some(else_b) = else_b {
                push_block(vm, else_b);
            }
            Ok(Step::Continue)
        }
    }
}

/// Execute While statement
///
/// Break and continue are handled by the unwinder, which stops at this frame.
pub fn execute_while(
    vm: &mut VM,
    rt: &mut Runtime,
    ix: usize,
    phase: WhilePhase,
    iteration: usize,
    cond: &Expr,
    body: &Block,
) -> RuntimeResult<Step> {
    match phase {
        WhilePhase::Check => {
            if eval_condition(cond, &vm.env, rt, "while")? {
                vm.frames[ix].kind = FrameKind::While {
                    phase: WhilePhase::RunBody,
                    iteration,
                };
            } else {
                let base = vm.frames[ix].scope_base;
                vm.env.truncate(base);
                vm.frames.pop();
            }
            Ok(Step::Continue)
        }
        WhilePhase::RunBody => {
            vm.frames[ix].kind = FrameKind::While {
                phase: WhilePhase::PostBody,
                iteration,
            };
            push_block(vm, body);
            Ok(Step::Continue)
        }
        WhilePhase::PostBody => {
            vm.frames[ix].kind = FrameKind::While {
                phase: WhilePhase::Check,
                iteration: iteration + 1,
            };
            Ok(Step::Continue)
        }
    }
}

/* ===================== Simple Statements ===================== */

pub fn execute_var_decl(
    vm: &mut VM,
    rt: &mut Runtime,
    name: &str,
    ty: TypeName,
    init: Option<&Expr>,
    doc: Option<&DocComment>,
) -> RuntimeResult<Step> {
    let value = match init {
        Some(expr) => Some(eval_expr(expr, &vm.env, rt)?),
        None => None,
    };
    vm.env.define(name, ty, value)?;

    if let Some(note) = doc.and_then(DocComment::process_note) {
        rt.record_process(ProcessAction::Declare, name, note, None);
    }

    vm.frames.pop();
    Ok(Step::Continue)
}

pub fn execute_assign(
    vm: &mut VM,
    rt: &mut Runtime,
    name: &str,
    value: &Expr,
) -> RuntimeResult<Step> {
    let v = eval_expr(value, &vm.env, rt)?;
    vm.env.assign(name, v)?;
    vm.frames.pop();
    Ok(Step::Continue)
}

pub fn execute_expr(vm: &mut VM, rt: &mut Runtime, expr: &Expr) -> RuntimeResult<Step> {
    eval_for_effect(expr, &vm.env, rt)?;
    vm.frames.pop();
    Ok(Step::Continue)
}

pub fn execute_return(vm: &mut VM, rt: &mut Runtime, value: Option<&Expr>) -> RuntimeResult<Step> {
    let val = match value {
        Some(expr) => Some(eval_expr(expr, &vm.env, rt)?),
        None => None,
    };
    vm.control = Control::Return(val);
    vm.frames.pop();
    Ok(Step::Continue)
}

pub fn execute_break(vm: &mut VM) -> Step {
    vm.control = Control::Break;
    vm.frames.pop();
    Step::Continue
}

pub fn execute_continue(vm: &mut VM) -> Step {
    vm.control = Control::Continue;
    vm.frames.pop();
    Step::Continue
}

/// Execute Yield
///
/// Pops only the yield frame: the enclosing block frames stay on the stack
/// pointing at the next statement, which is where a resume picks up.
pub fn execute_yield(vm: &mut VM) -> RuntimeResult<Step> {
    if vm.body != BodyKind::Coroutine {
        return Err(RuntimeError::control_flow(
            "yield used outside of a coroutine body",
        ));
    }
    vm.frames.pop();
    vm.control = Control::Yield;
    Ok(Step::Done)
}

pub fn execute_create(
    vm: &mut VM,
    rt: &mut Runtime,
    name: &str,
    coroutine: &str,
) -> RuntimeResult<Step> {
    rt.create_coroutine(name, coroutine)?;
    vm.frames.pop();
    Ok(Step::Continue)
}

/// Execute Resume
///
/// Blocks this VM until the instance yields or completes.
pub fn execute_resume(vm: &mut VM, rt: &mut Runtime, name: &str) -> RuntimeResult<Step> {
    rt.resume_coroutine(name)?;
    vm.frames.pop();
    Ok(Step::Continue)
}
