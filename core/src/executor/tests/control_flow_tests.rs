//! Tests for if/while/break/continue/return

use super::helpers::*;
use crate::executor::types::{BinaryOp, FunctionDecl, Stmt, TypeName};
use crate::executor::ErrorKind;

use BinaryOp::*;
use TypeName::Int;

/// Sum 1..n; with m == 1 return early once i passes 10
fn test_return_fn() -> FunctionDecl {
    function(
        "test_return",
        &[("n", Int), ("m", Int)],
        Some(Int),
        vec![
            decl("sum", Int, int(0)),
            decl("i", Int, int(1)),
            while_(
                bin(Le, var("i"), var("n")),
                vec![
                    if_(
                        bin(And, bin(Eq, var("m"), int(1)), bin(Gt, var("i"), int(10))),
                        vec![ret(var("sum"))],
                        None,
                    ),
                    assign("sum", bin(Add, var("sum"), var("i"))),
                    assign("i", bin(Add, var("i"), int(1))),
                ],
            ),
            ret(var("sum")),
        ],
    )
}

/// Same loop, but break out instead of returning
fn test_break_fn() -> FunctionDecl {
    function(
        "test_break",
        &[("n", Int), ("m", Int)],
        Some(Int),
        vec![
            decl("sum", Int, int(0)),
            decl("i", Int, int(1)),
            while_(
                bin(Le, var("i"), var("n")),
                vec![
                    if_(
                        bin(And, bin(Eq, var("m"), int(1)), bin(Gt, var("i"), int(10))),
                        vec![Stmt::Break],
                        None,
                    ),
                    assign("sum", bin(Add, var("sum"), var("i"))),
                    assign("i", bin(Add, var("i"), int(1))),
                ],
            ),
            ret(var("sum")),
        ],
    )
}

/// Accumulate i twice per iteration; with m == 1 continue before the second
fn test_continue_fn() -> FunctionDecl {
    function(
        "test_continue",
        &[("n", Int), ("m", Int)],
        Some(Int),
        vec![
            decl("sum", Int, int(0)),
            decl("i", Int, int(0)),
            while_(
                bin(Lt, var("i"), var("n")),
                vec![
                    assign("i", bin(Add, var("i"), int(1))),
                    assign("sum", bin(Add, var("sum"), var("i"))),
                    if_(bin(Eq, var("m"), int(1)), vec![Stmt::Continue], None),
                    assign("sum", bin(Add, var("sum"), var("i"))),
                ],
            ),
            ret(var("sum")),
        ],
    )
}

fn run_calls(calls: &[(&str, i64, i64)]) -> Vec<String> {
    let main = calls
        .iter()
        .map(|(name, n, m)| print(vec![call(name, vec![int(*n), int(*m)])]))
        .collect();
    let (result, lines) = run_program(program(
        vec![test_return_fn(), test_break_fn(), test_continue_fn()],
        vec![],
        main,
    ));
    result.unwrap();
    lines
}

#[test]
fn test_return_exits_loop() {
    let lines = run_calls(&[("test_return", 15, 0), ("test_return", 15, 1)]);
    assert_eq!(lines, vec!["120", "55"]);
}

#[test]
fn test_break_keeps_partial_sum() {
    let lines = run_calls(&[("test_break", 15, 0), ("test_break", 15, 1)]);
    assert_eq!(lines, vec!["120", "55"]);
}

#[test]
fn test_continue_skips_rest_of_body() {
    let lines = run_calls(&[("test_continue", 15, 0), ("test_continue", 15, 1)]);
    assert_eq!(lines, vec!["240", "120"]);
}

#[test]
fn test_if_else() {
    let (result, lines) = run_program(main_only(vec![
        decl("x", Int, int(3)),
        if_(
            bin(Gt, var("x"), int(5)),
            vec![print(vec![string("big")])],
            Some(vec![print(vec![string("small")])]),
        ),
        if_(bin(Lt, var("x"), int(5)), vec![print(vec![string("under")])], None),
        if_(bin(Gt, var("x"), int(5)), vec![print(vec![string("never")])], None),
    ]));

    result.unwrap();
    assert_eq!(lines, vec!["small", "under"]);
}

#[test]
fn test_break_only_exits_innermost_loop() {
    // outer runs 3 times; inner breaks on its first pass each time
    let (result, lines) = run_program(main_only(vec![
        decl("i", Int, int(0)),
        while_(
            bin(Lt, var("i"), int(3)),
            vec![
                assign("i", bin(Add, var("i"), int(1))),
                while_(boolean(true), vec![print(vec![var("i")]), Stmt::Break]),
            ],
        ),
        print(vec![string("done")]),
    ]));

    result.unwrap();
    assert_eq!(lines, vec!["1", "2", "3", "done"]);
}

#[test]
fn test_return_in_main_ends_run() {
    let (result, lines) = run_program(main_only(vec![
        print(vec![string("before")]),
        while_(boolean(true), vec![ret_void()]),
        print(vec![string("after")]),
    ]));

    result.unwrap();
    assert_eq!(lines, vec!["before"]);
}

#[test]
fn test_non_bool_condition_is_type_error() {
    let (result, _) = run_program(main_only(vec![while_(int(1), vec![])]));
    assert_eq!(result.unwrap_err().kind, ErrorKind::TypeError);

    let (result, _) = run_program(main_only(vec![if_(string("yes"), vec![], None)]));
    assert_eq!(result.unwrap_err().kind, ErrorKind::TypeError);
}

#[test]
fn test_break_outside_loop() {
    let (result, lines) = run_program(main_only(vec![
        print(vec![string("start")]),
        if_(boolean(true), vec![Stmt::Break], None),
        print(vec![string("unreachable")]),
    ]));

    let err = result.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ControlFlowError);
    assert_eq!(lines, vec!["start"]);
}

#[test]
fn test_continue_cannot_escape_function() {
    // The loop belongs to main; the function body has none of its own
    let escape = function("escape", &[], None, vec![Stmt::Continue]);
    let (result, _) = run_program(program(
        vec![escape],
        vec![],
        vec![while_(boolean(true), vec![call_stmt("escape", vec![]), Stmt::Break])],
    ));

    assert_eq!(result.unwrap_err().kind, ErrorKind::ControlFlowError);
}

#[test]
fn test_yield_outside_coroutine() {
    let (result, _) = run_program(main_only(vec![Stmt::Yield]));
    assert_eq!(result.unwrap_err().kind, ErrorKind::ControlFlowError);

    let f = function("f", &[], None, vec![Stmt::Yield]);
    let (result, _) = run_program(program(vec![f], vec![], vec![call_stmt("f", vec![])]));
    assert_eq!(result.unwrap_err().kind, ErrorKind::ControlFlowError);
}
