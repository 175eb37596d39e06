//! Global declaration table
//!
//! Built once when a program is loaded and never mutated afterwards. The table
//! is shared by reference between the main VM, every call and every coroutine
//! instance.

use super::errors::{RuntimeError, RuntimeResult};
use super::stdlib::StdlibFunc;
use super::types::{CoroutineDecl, FunctionDecl};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// What a call-site name resolves to
#[derive(Debug, Clone)]
pub enum Callee {
    Builtin(StdlibFunc),
    Function(Arc<FunctionDecl>),
}

#[derive(Debug, Default)]
pub struct Declarations {
    functions: HashMap<String, Arc<FunctionDecl>>,
    coroutines: HashMap<String, Arc<CoroutineDecl>>,
}

impl Declarations {
    /// Build the table, rejecting duplicate names
    ///
    /// Functions and coroutines share one namespace, and neither may reuse the
    /// name of a built-in.
    pub fn build(
        functions: Vec<FunctionDecl>,
        coroutines: Vec<CoroutineDecl>,
    ) -> RuntimeResult<Self> {
        let mut table = Declarations::default();

        for decl in functions {
            table.check_free(&decl.name)?;
            let mut seen = HashSet::new();
            for param in &decl.params {
                if !seen.insert(param.name.as_str()) {
                    return Err(RuntimeError::duplicate(format!(
                        "parameter '{}' appears twice in function '{}'",
                        param.name, decl.name
                    )));
                }
            }
            table.functions.insert(decl.name.clone(), Arc::new(decl));
        }

        for decl in coroutines {
            table.check_free(&decl.name)?;
            table.coroutines.insert(decl.name.clone(), Arc::new(decl));
        }

        Ok(table)
    }

    fn check_free(&self, name: &str) -> RuntimeResult<()> {
        if StdlibFunc::lookup(name).is_some() {
            return Err(RuntimeError::duplicate(format!(
                "'{}' is a built-in and cannot be redeclared",
                name
            )));
        }
        if self.functions.contains_key(name) || self.coroutines.contains_key(name) {
            return Err(RuntimeError::duplicate(format!(
                "'{}' is declared more than once",
                name
            )));
        }
        Ok(())
    }

    pub fn function(&self, name: &str) -> Option<&Arc<FunctionDecl>> {
        self.functions.get(name)
    }

    pub fn coroutine(&self, name: &str) -> Option<&Arc<CoroutineDecl>> {
        self.coroutines.get(name)
    }

    /// Resolve a call-site name
    ///
    /// Coroutines are not callable: they are only instantiated through
    /// `CreateCoroutine`.
    pub fn callee(&self, name: &str) -> RuntimeResult<Callee> {
        if let Some(func) = StdlibFunc::lookup(name) {
            return Ok(Callee::Builtin(func));
        }
        if let Some(decl) = self.functions.get(name) {
            return Ok(Callee::Function(Arc::clone(decl)));
        }
        if self.coroutines.contains_key(name) {
            return Err(RuntimeError::type_error(format!(
                "coroutine '{}' cannot be called; create an instance and resume it",
                name
            )));
        }
        Err(RuntimeError::name(format!("undefined function '{}'", name)))
    }
}
