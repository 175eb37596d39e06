//! Test helpers for executor tests
//!
//! Small builders for syntax trees plus drivers that run a program with its
//! output captured.

use crate::config::Config;
use crate::executor::types::{
    BinaryOp, Block, CoroutineDecl, DocComment, Expr, FunctionDecl, Param, Program, Stmt,
    TypeName, UnaryOp,
};
use crate::executor::{BufferPrinter, Interpreter, RuntimeResult};

/* ===================== Expressions ===================== */

pub fn int(v: i64) -> Expr {
    Expr::lit(v)
}

pub fn float(v: f64) -> Expr {
    Expr::lit(v)
}

pub fn boolean(v: bool) -> Expr {
    Expr::lit(v)
}

pub fn string(v: &str) -> Expr {
    Expr::lit(v)
}

pub fn var(name: &str) -> Expr {
    Expr::var(name)
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::binary(op, left, right)
}

pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::unary(op, operand)
}

pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::call(name, args)
}

/* ===================== Statements ===================== */

pub fn decl(name: &str, ty: TypeName, init: Expr) -> Stmt {
    Stmt::VarDecl {
        name: name.to_string(),
        ty,
        init: Some(init),
        doc: None,
    }
}

pub fn decl_uninit(name: &str, ty: TypeName) -> Stmt {
    Stmt::VarDecl {
        name: name.to_string(),
        ty,
        init: None,
        doc: None,
    }
}

pub fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        name: name.to_string(),
        value,
    }
}

pub fn print(args: Vec<Expr>) -> Stmt {
    Stmt::Expr {
        call: call("print", args),
    }
}

pub fn call_stmt(name: &str, args: Vec<Expr>) -> Stmt {
    Stmt::Expr {
        call: call(name, args),
    }
}

pub fn if_(cond: Expr, then_b: Vec<Stmt>, else_b: Option<Vec<Stmt>>) -> Stmt {
    Stmt::If {
        cond,
        then_b: Block::new(then_b),
        else_b: else_b.map(Block::new),
    }
}

pub fn while_(cond: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While {
        cond,
        body: Block::new(body),
    }
}

pub fn ret(value: Expr) -> Stmt {
    Stmt::Return { value: Some(value) }
}

pub fn ret_void() -> Stmt {
    Stmt::Return { value: None }
}

pub fn create(name: &str, coroutine: &str) -> Stmt {
    Stmt::CreateCoroutine {
        name: name.to_string(),
        coroutine: coroutine.to_string(),
    }
}

pub fn resume(name: &str) -> Stmt {
    Stmt::Resume {
        name: name.to_string(),
    }
}

/* ===================== Declarations ===================== */

pub fn function(
    name: &str,
    params: &[(&str, TypeName)],
    return_type: Option<TypeName>,
    body: Vec<Stmt>,
) -> FunctionDecl {
    FunctionDecl {
        name: name.to_string(),
        params: params
            .iter()
            .map(|(name, ty)| Param {
                name: name.to_string(),
                ty: *ty,
            })
            .collect(),
        return_type,
        body: Block::new(body),
        doc: None,
    }
}

pub fn coroutine(name: &str, body: Vec<Stmt>) -> CoroutineDecl {
    CoroutineDecl {
        name: name.to_string(),
        body: Block::new(body),
        doc: None,
    }
}

pub fn doc(lines: &[&str]) -> Option<DocComment> {
    Some(DocComment::new(lines.iter().copied()))
}

pub fn program(
    functions: Vec<FunctionDecl>,
    coroutines: Vec<CoroutineDecl>,
    main: Vec<Stmt>,
) -> Program {
    Program {
        functions,
        coroutines,
        main: Block::new(main),
    }
}

pub fn main_only(main: Vec<Stmt>) -> Program {
    program(vec![], vec![], main)
}

/* ===================== Drivers ===================== */

/// Build an interpreter that prints into a buffer
///
/// The program round-trips through JSON first, the way a parser hands it over.
pub fn build(program: Program) -> (Interpreter, BufferPrinter) {
    build_with_config(program, Config::default())
}

pub fn build_with_config(program: Program, config: Config) -> (Interpreter, BufferPrinter) {
    let json = serde_json::to_string(&program).expect("Program serialization failed");
    let program: Program = serde_json::from_str(&json).expect("Program deserialization failed");

    let printer = BufferPrinter::new();
    let interpreter = Interpreter::builder(program)
        .printer(printer.clone())
        .config(config)
        .build()
        .expect("Declaration table failed to build");
    (interpreter, printer)
}

/// Run the main body, returning its result and everything printed
pub fn run_program(program: Program) -> (RuntimeResult<()>, Vec<String>) {
    let (mut interpreter, printer) = build(program);
    let result = interpreter.run_main();
    (result, printer.lines())
}

/// Run a program decoded from JSON
pub fn run_json(source: &str) -> (RuntimeResult<()>, Vec<String>) {
    let program: Program = serde_json::from_str(source).expect("Program JSON is invalid");
    run_program(program)
}
