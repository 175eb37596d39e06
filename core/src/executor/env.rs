//! Scope chain for variable bindings
//!
//! One scope is pushed per executed block and one per call. Scopes are plain
//! data so a suspended VM carries its live environment with it.

use super::errors::{RuntimeError, RuntimeResult};
use super::types::{TypeName, Val};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A typed variable slot. `value` is `None` until the variable is first
/// initialized or assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub ty: TypeName,
    pub value: Option<Val>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Env {
    scopes: Vec<HashMap<String, Binding>>,
}

impl Env {
    /// Environment with a single, empty base scope
    pub fn new() -> Self {
        Self {
            scopes: vec![HashMap::new()],
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Drop every scope above `depth`
    pub fn truncate(&mut self, depth: usize) {
        self.scopes.truncate(depth);
    }

    /// Install a binding in the innermost scope
    ///
    /// Shadowing a binding from an outer scope is allowed; redefining a name
    /// in the same scope is not.
    pub fn define(&mut self, name: &str, ty: TypeName, value: Option<Val>) -> RuntimeResult<()> {
        if let Some(v) = &value {
            check_type(name, ty, v)?;
        }
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| RuntimeError::name(format!("no scope to define '{}' in", name)))?;
        if scope.contains_key(name) {
            return Err(RuntimeError::duplicate(format!(
                "variable '{}' is already defined in this scope",
                name
            )));
        }
        scope.insert(name.to_string(), Binding { ty, value });
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> RuntimeResult<&Val> {
        let binding = self
            .binding(name)
            .ok_or_else(|| RuntimeError::name(format!("undefined variable '{}'", name)))?;
        binding.value.as_ref().ok_or_else(|| {
            RuntimeError::name(format!("variable '{}' used before initialization", name))
        })
    }

    /// Mutate the nearest enclosing binding of `name`
    pub fn assign(&mut self, name: &str, value: Val) -> RuntimeResult<()> {
        let binding = self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
            .ok_or_else(|| {
                RuntimeError::name(format!("cannot assign to undefined variable '{}'", name))
            })?;
        check_type(name, binding.ty, &value)?;
        binding.value = Some(value);
        Ok(())
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::new()
    }
}

fn check_type(name: &str, ty: TypeName, value: &Val) -> RuntimeResult<()> {
    if value.is_a(ty) {
        Ok(())
    } else {
        Err(RuntimeError::type_error(format!(
            "cannot store {} value in '{}' of type {}",
            value.type_name(),
            name,
            ty
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_outward() {
        let mut env = Env::new();
        env.define("x", TypeName::Int, Some(Val::Int(1))).unwrap();
        env.push_scope();
        env.push_scope();

        assert_eq!(env.lookup("x").unwrap(), &Val::Int(1));
    }

    #[test]
    fn test_shadowing_and_pop() {
        let mut env = Env::new();
        env.define("x", TypeName::Int, Some(Val::Int(1))).unwrap();
        env.push_scope();
        env.define("x", TypeName::String, Some(Val::from("inner"))).unwrap();
        assert_eq!(env.lookup("x").unwrap(), &Val::from("inner"));

        env.pop_scope();
        assert_eq!(env.lookup("x").unwrap(), &Val::Int(1));
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut env = Env::new();
        env.define("x", TypeName::Int, Some(Val::Int(1))).unwrap();
        let err = env.define("x", TypeName::Int, Some(Val::Int(2))).unwrap_err();
        assert_eq!(err.kind, super::super::errors::ErrorKind::DuplicateNameError);
    }

    #[test]
    fn test_assign_updates_outer_binding() {
        let mut env = Env::new();
        env.define("x", TypeName::Int, Some(Val::Int(1))).unwrap();
        env.push_scope();
        env.assign("x", Val::Int(5)).unwrap();
        env.truncate(1);

        assert_eq!(env.lookup("x").unwrap(), &Val::Int(5));
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_uninitialized_then_assigned() {
        let mut env = Env::new();
        env.define("x", TypeName::Float, None).unwrap();
        assert!(env.lookup("x").unwrap_err().message.contains("before initialization"));

        env.assign("x", Val::Float(2.5)).unwrap();
        assert_eq!(env.lookup("x").unwrap(), &Val::Float(2.5));
    }

    #[test]
    fn test_assign_type_mismatch() {
        let mut env = Env::new();
        env.define("x", TypeName::Int, Some(Val::Int(1))).unwrap();
        let err = env.assign("x", Val::Float(1.0)).unwrap_err();
        assert_eq!(err.kind, super::super::errors::ErrorKind::TypeError);
    }
}
