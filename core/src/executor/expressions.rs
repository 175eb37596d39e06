//! Expression evaluation
//!
//! Evaluates expressions to values. Evaluation never suspends: calls run their
//! callee to completion before returning.

use super::decls::Callee;
use super::env::Env;
use super::errors::{ErrorKind, RuntimeError, RuntimeResult};
use super::functions::call_function;
use super::runtime::Runtime;
use super::stdlib::call_stdlib_func;
use super::types::{BinaryOp, Expr, UnaryOp, Val};

/// Evaluate an expression to a value
pub fn eval_expr(expr: &Expr, env: &Env, rt: &mut Runtime) -> RuntimeResult<Val> {
    match expr {
        Expr::Lit { v } => Ok(v.clone()),

        Expr::Var { name } => env.lookup(name).cloned(),

        Expr::Unary { op, operand } => {
            let v = eval_expr(operand, env, rt)?;
            eval_unary(*op, v)
        }

        // Short-circuit: the right operand only runs when it decides the result
        Expr::Binary {
            op: op @ (BinaryOp::And | BinaryOp::Or),
            left,
            right,
        } => {
            let l = expect_bool(*op, eval_expr(left, env, rt)?)?;
            match (op, l) {
                (BinaryOp::And, false) => Ok(Val::Bool(false)),
                (BinaryOp::Or, true) => Ok(Val::Bool(true)),
                _ => {
                    let r = expect_bool(*op, eval_expr(right, env, rt)?)?;
                    Ok(Val::Bool(r))
                }
            }
        }

        Expr::Binary { op, left, right } => {
            let l = eval_expr(left, env, rt)?;
            let r = eval_expr(right, env, rt)?;
            eval_binary(*op, l, r)
        }

        Expr::Call { name, args } => eval_call(name, args, env, rt)?.ok_or_else(|| {
            RuntimeError::type_error(format!("'{}' does not produce a value", name))
        }),
    }
}

/// Evaluate an expression statement, discarding its result
pub fn eval_for_effect(expr: &Expr, env: &Env, rt: &mut Runtime) -> RuntimeResult<()> {
    match expr {
        Expr::Call { name, args } => eval_call(name, args, env, rt).map(|_| ()),
        other => eval_expr(other, env, rt).map(|_| ()),
    }
}

/// Evaluate the condition of an if/while, which must be a Bool
pub fn eval_condition(
    expr: &Expr,
    env: &Env,
    rt: &mut Runtime,
    construct: &str,
) -> RuntimeResult<bool> {
    match eval_expr(expr, env, rt)? {
        Val::Bool(b) => Ok(b),
        other => Err(RuntimeError::type_error(format!(
            "{} condition must be bool, got {}",
            construct,
            other.type_name()
        ))),
    }
}

/// Evaluate a call
///
/// The callee is resolved before any argument is evaluated; arguments are
/// then evaluated left to right. Returns `None` for callees without a value.
pub fn eval_call(
    name: &str,
    args: &[Expr],
    env: &Env,
    rt: &mut Runtime,
) -> RuntimeResult<Option<Val>> {
    let callee = rt.decls().callee(name)?;

    let mut values = Vec::with_capacity(args.len());
    for arg in args {
        values.push(eval_expr(arg, env, rt)?);
    }

    match callee {
        Callee::Builtin(func) => call_stdlib_func(func, &values, rt.printer()),
        Callee::Function(decl) => call_function(&decl, values, rt),
    }
}

/* ===================== Operators ===================== */

pub fn eval_unary(op: UnaryOp, v: Val) -> RuntimeResult<Val> {
    match (op, v) {
        (UnaryOp::Not, Val::Bool(b)) => Ok(Val::Bool(!b)),
        (UnaryOp::Neg, Val::Int(i)) => Ok(Val::Int(i.wrapping_neg())),
        (UnaryOp::Neg, Val::Float(x)) => Ok(Val::Float(-x)),
        (UnaryOp::Plus, v @ (Val::Int(_) | Val::Float(_))) => Ok(v),
        (op, v) => Err(RuntimeError::type_error(format!(
            "operator '{}' cannot be applied to {}",
            op.symbol(),
            v.type_name()
        ))),
    }
}

/// Apply a strict (non short-circuit) binary operator
pub fn eval_binary(op: BinaryOp, l: Val, r: Val) -> RuntimeResult<Val> {
    match op {
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => arithmetic(op, l, r),
        BinaryOp::Eq | BinaryOp::Ne => equality(op, l, r),
        BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => ordering(op, l, r),
        BinaryOp::And | BinaryOp::Or | BinaryOp::Xor => {
            let l = expect_bool(op, l)?;
            let r = expect_bool(op, r)?;
            Ok(Val::Bool(match op {
                BinaryOp::And => l && r,
                BinaryOp::Or => l || r,
                _ => l != r,
            }))
        }
    }
}

fn arithmetic(op: BinaryOp, l: Val, r: Val) -> RuntimeResult<Val> {
    match (l, r) {
        (Val::Int(a), Val::Int(b)) => {
            let v = match op {
                BinaryOp::Add => a.wrapping_add(b),
                BinaryOp::Sub => a.wrapping_sub(b),
                BinaryOp::Mul => a.wrapping_mul(b),
                _ => {
                    if b == 0 {
                        return Err(RuntimeError::new(
                            ErrorKind::DivisionByZero,
                            format!("integer division of {} by zero", a),
                        ));
                    }
                    // Truncates toward zero
                    a.wrapping_div(b)
                }
            };
            Ok(Val::Int(v))
        }
        (Val::Float(a), Val::Float(b)) => {
            let v = match op {
                BinaryOp::Add => a + b,
                BinaryOp::Sub => a - b,
                BinaryOp::Mul => a * b,
                _ => a / b,
            };
            Ok(Val::Float(v))
        }
        (l, r) => Err(mismatch(op, &l, &r)),
    }
}

fn equality(op: BinaryOp, l: Val, r: Val) -> RuntimeResult<Val> {
    if l.type_name() != r.type_name() {
        return Err(mismatch(op, &l, &r));
    }
    let eq = l == r;
    Ok(Val::Bool(if op == BinaryOp::Eq { eq } else { !eq }))
}

fn ordering(op: BinaryOp, l: Val, r: Val) -> RuntimeResult<Val> {
    let result = match (&l, &r) {
        (Val::Int(a), Val::Int(b)) => compare(op, a, b),
        (Val::Float(a), Val::Float(b)) => compare(op, a, b),
        _ => return Err(mismatch(op, &l, &r)),
    };
    Ok(Val::Bool(result))
}

fn compare<T: PartialOrd>(op: BinaryOp, a: T, b: T) -> bool {
    match op {
        BinaryOp::Lt => a < b,
        BinaryOp::Le => a <= b,
        BinaryOp::Gt => a > b,
        _ => a >= b,
    }
}

fn expect_bool(op: BinaryOp, v: Val) -> RuntimeResult<bool> {
    match v {
        Val::Bool(b) => Ok(b),
        other => Err(RuntimeError::type_error(format!(
            "operator '{}' expects bool operands, got {}",
            op.symbol(),
            other.type_name()
        ))),
    }
}

fn mismatch(op: BinaryOp, l: &Val, r: &Val) -> RuntimeError {
    RuntimeError::type_error(format!(
        "operator '{}' cannot be applied to {} and {}",
        op.symbol(),
        l.type_name(),
        r.type_name()
    ))
}
