//! Runtime value types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared type of a variable, parameter or return slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Int,
    Float,
    Bool,
    String,
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::Bool => "bool",
            TypeName::String => "string",
        };
        f.write_str(name)
    }
}

/// Runtime value type
///
/// There is no implicit promotion between `Int` and `Float`: every operator
/// that mixes the two kinds fails with a type error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t", content = "v")]
pub enum Val {
    Int(i64),
    Float(f64),
    Str(String),
    Bool(bool),
}

impl Val {
    /// The declared type this value satisfies
    pub fn type_name(&self) -> TypeName {
        match self {
            Val::Int(_) => TypeName::Int,
            Val::Float(_) => TypeName::Float,
            Val::Str(_) => TypeName::String,
            Val::Bool(_) => TypeName::Bool,
        }
    }

    pub fn is_a(&self, ty: TypeName) -> bool {
        self.type_name() == ty
    }
}

/// Textual form used by `print`
impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Int(i) => write!(f, "{}", i),
            Val::Float(x) => write!(f, "{}", x),
            Val::Str(s) => f.write_str(s),
            Val::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Val {
    fn from(v: i64) -> Self {
        Val::Int(v)
    }
}

impl From<f64> for Val {
    fn from(v: f64) -> Self {
        Val::Float(v)
    }
}

impl From<bool> for Val {
    fn from(v: bool) -> Self {
        Val::Bool(v)
    }
}

impl From<&str> for Val {
    fn from(v: &str) -> Self {
        Val::Str(v.to_string())
    }
}
