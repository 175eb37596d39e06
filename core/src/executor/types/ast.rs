//! Abstract Syntax Tree node types
//!
//! The tree is produced by the parser and consumed as-is by the executor.
//! Every node is serde-serializable so that programs (and suspended VMs, which
//! hold clones of the nodes they are executing) can round-trip through JSON.

use super::values::{TypeName, Val};
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use std::sync::Arc;

/// Marker that tags a doc comment as a process note for the diagram generator
pub const PROCESS_MARKER: &str = "@process";

/* ===================== Program ===================== */

/// A parsed program: declarations plus the main statement sequence
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub coroutines: Vec<CoroutineDecl>,
    #[serde(default)]
    pub main: Block,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub return_type: Option<TypeName>,
    pub body: Block,
    #[serde(default)]
    pub doc: Option<DocComment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeName,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoroutineDecl {
    pub name: String,
    pub body: Block,
    #[serde(default)]
    pub doc: Option<DocComment>,
}

/* ===================== Doc comments ===================== */

/// Comment lines immediately preceding a declaration
///
/// Inert for the executor except for the process marker: when the first
/// token of the first line is `@process`, the comment carries a note that is
/// reported through the process trace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocComment {
    pub lines: Vec<String>,
}

impl DocComment {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_process(&self) -> bool {
        self.lines
            .first()
            .and_then(|line| line.split_whitespace().next())
            == Some(PROCESS_MARKER)
    }

    /// Note text of a process comment, `None` for ordinary comments
    pub fn process_note(&self) -> Option<String> {
        if !self.is_process() {
            return None;
        }
        let (first, rest) = self.lines.split_first()?;
        let head = first.trim_start()[PROCESS_MARKER.len()..].trim();

        let mut note = head.to_string();
        for line in rest {
            note.push('\n');
            note.push_str(line);
        }
        Some(note)
    }
}

/* ===================== Statements ===================== */

/// Ordered statement sequence
///
/// Shared behind an `Arc` so frames can hold on to the block they are
/// executing without deep-copying it on every loop iteration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block(Arc<[Stmt]>);

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block(Arc::from(stmts))
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::new(Vec::new())
    }
}

impl Deref for Block {
    type Target = [Stmt];

    fn deref(&self) -> &[Stmt] {
        &self.0
    }
}

impl From<Vec<Stmt>> for Block {
    fn from(stmts: Vec<Stmt>) -> Self {
        Block::new(stmts)
    }
}

/// Statement AST node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Stmt {
    VarDecl {
        name: String,
        #[serde(rename = "type")]
        ty: TypeName,
        #[serde(default)]
        init: Option<Expr>,
        #[serde(default)]
        doc: Option<DocComment>,
    },
    Assign {
        name: String,
        value: Expr,
    },
    Expr {
        call: Expr,
    },
    If {
        cond: Expr,
        then_b: Block,
        #[serde(default)]
        else_b: Option<Block>,
    },
    While {
        cond: Expr,
        body: Block,
    },
    Return {
        #[serde(default)]
        value: Option<Expr>,
    },
    Break,
    Continue,
    Yield,
    CreateCoroutine {
        name: String,
        coroutine: String,
    },
    Resume {
        name: String,
    },
}

/* ===================== Expressions ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
    Xor,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Xor => "xor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::Not => "not",
        }
    }
}

/// Expression AST node
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Expr {
    Lit {
        v: Val,
    },
    Var {
        name: String,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        name: String,
        #[serde(default)]
        args: Vec<Expr>,
    },
}

impl Expr {
    pub fn lit(v: impl Into<Val>) -> Self {
        Expr::Lit { v: v.into() }
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var { name: name.into() }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            name: name.into(),
            args,
        }
    }
}
