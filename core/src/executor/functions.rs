//! User-defined function calls
//!
//! A call runs the function body in a fresh VM whose only scope holds the
//! parameters, so the body never sees the caller's locals. The call runs to
//! completion before the calling expression continues.

use super::env::Env;
use super::errors::{ErrorKind, RuntimeError, RuntimeResult};
use super::exec_loop::run_until_done;
use super::runtime::Runtime;
use super::stack::ensure_sufficient_stack;
use super::trace::ProcessAction;
use super::types::{Control, FunctionDecl, Val};
use super::vm::{BodyKind, VM};
use tracing::trace;

/// Call a user-defined function with already-evaluated arguments
pub fn call_function(
    decl: &FunctionDecl,
    args: Vec<Val>,
    rt: &mut Runtime,
) -> RuntimeResult<Option<Val>> {
    if args.len() != decl.params.len() {
        return Err(RuntimeError::new(
            ErrorKind::ArityError,
            format!(
                "function '{}' expects {} argument(s), got {}",
                decl.name,
                decl.params.len(),
                args.len()
            ),
        ));
    }

    let mut env = Env::new();
    for (param, arg) in decl.params.iter().zip(args) {
        if !arg.is_a(param.ty) {
            return Err(RuntimeError::type_error(format!(
                "argument '{}' of '{}' expects {}, got {}",
                param.name,
                decl.name,
                param.ty,
                arg.type_name()
            )));
        }
        env.define(&param.name, param.ty, Some(arg))?;
    }

    rt.enter_call(&decl.name)?;
    trace!(function = %decl.name, depth = rt.call_depth(), "call");

    if let Some(note) = decl.doc.as_ref().and_then(|d| d.process_note()) {
        rt.record_process(ProcessAction::Call, &decl.name, note, None);
    }

    let mut vm = VM::new(decl.body.clone(), env, BodyKind::Function);
    let result = ensure_sufficient_stack(|| run_until_done(&mut vm, rt));
    rt.exit_call();
    result?;

    let returned = match vm.control {
        Control::Return(v) => v,
        _ => None,
    };

    match (decl.return_type, returned) {
        (Some(ty), Some(v)) if v.is_a(ty) => Ok(Some(v)),
        (Some(ty), Some(v)) => Err(RuntimeError::type_error(format!(
            "function '{}' must return {}, got {}",
            decl.name,
            ty,
            v.type_name()
        ))),
        (Some(ty), None) => Err(RuntimeError::new(
            ErrorKind::MissingReturnError,
            format!(
                "function '{}' declares return type {} but finished without a value",
                decl.name, ty
            ),
        )),
        (None, v) => Ok(v),
    }
}
