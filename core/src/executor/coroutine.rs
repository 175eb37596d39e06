//! Coroutine instances
//!
//! An instance owns a suspended VM for one coroutine body. Resuming it runs
//! the VM until the next yield or until the body ends. Instances are keyed by
//! the name they were created under.

use super::env::Env;
use super::errors::{RuntimeError, RuntimeResult};
use super::exec_loop::run_until_done;
use super::runtime::Runtime;
use super::stack::ensure_sufficient_stack;
use super::types::CoroutineDecl;
use super::vm::{BodyKind, VM};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoroutineState {
    /// Created, never resumed
    Fresh,
    /// Stopped at a yield
    Suspended,
    /// Currently executing a resume
    Running,
    /// Body finished (or failed); cannot be resumed again
    Completed,
}

impl fmt::Display for CoroutineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CoroutineState::Fresh => "fresh",
            CoroutineState::Suspended => "suspended",
            CoroutineState::Running => "running",
            CoroutineState::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// What a single resume ended with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    Suspended,
    Completed,
}

/* ===================== Instance ===================== */

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoroutineInstance {
    pub id: Uuid,
    /// Name of the coroutine declaration this instance runs
    pub coroutine: String,
    pub state: CoroutineState,
    /// Execution state; dropped once the instance completes
    pub vm: Option<VM>,
    pub resumes: usize,
}

impl CoroutineInstance {
    /// Create an instance positioned before the first statement of the body
    ///
    /// The body runs in a fresh environment: it sees neither main's locals
    /// nor other instances'.
    pub fn create(decl: &CoroutineDecl) -> Self {
        let vm = VM::new(decl.body.clone(), Env::new(), BodyKind::Coroutine);
        Self {
            id: Uuid::new_v4(),
            coroutine: decl.name.clone(),
            state: CoroutineState::Fresh,
            vm: Some(vm),
            resumes: 0,
        }
    }

    pub fn is_resumable(&self) -> bool {
        matches!(
            self.state,
            CoroutineState::Fresh | CoroutineState::Suspended
        )
    }

    /// Run until the next yield or the end of the body
    ///
    /// An error raised inside the body leaves the instance Completed.
    pub fn resume(&mut self, rt: &mut Runtime) -> RuntimeResult<ResumeOutcome> {
        if !self.is_resumable() {
            return Err(RuntimeError::illegal_state(format!(
                "coroutine instance of '{}' is {} and cannot be resumed",
                self.coroutine, self.state
            )));
        }
        let Some(vm) = self.vm.as_mut() else {
            return Err(RuntimeError::illegal_state(format!(
                "coroutine instance of '{}' has no execution state",
                self.coroutine
            )));
        };

        vm.resume();
        self.state = CoroutineState::Running;
        self.resumes += 1;
        debug!(id = %self.id, coroutine = %self.coroutine, resumes = self.resumes, "resume");

        if let Err(e) = ensure_sufficient_stack(|| run_until_done(vm, rt)) {
            self.state = CoroutineState::Completed;
            self.vm = None;
            return Err(e);
        }

        if vm.is_suspended() {
            self.state = CoroutineState::Suspended;
            Ok(ResumeOutcome::Suspended)
        } else {
            self.state = CoroutineState::Completed;
            self.vm = None;
            Ok(ResumeOutcome::Completed)
        }
    }
}

/* ===================== Instance Table ===================== */

#[derive(Debug)]
enum Slot {
    Parked(Box<CoroutineInstance>),
    /// Checked out for a resume; the instance lives on the resumer's stack
    Running { coroutine: String },
}

/// Instances keyed by the name given at creation
#[derive(Debug, Default)]
pub struct CoroutineTable {
    slots: HashMap<String, Slot>,
}

impl CoroutineTable {
    /// Register an instance under `name`
    ///
    /// A Completed instance is replaced; any other live instance under the
    /// same name is a duplicate.
    pub fn insert(&mut self, name: &str, instance: CoroutineInstance) -> RuntimeResult<()> {
        match self.slots.entry(name.to_string()) {
            Entry::Occupied(mut e) => match e.get() {
                Slot::Parked(existing) if existing.state == CoroutineState::Completed => {
                    e.insert(Slot::Parked(Box::new(instance)));
                    Ok(())
                }
                _ => Err(RuntimeError::duplicate(format!(
                    "coroutine instance '{}' already exists",
                    name
                ))),
            },
            Entry::Vacant(e) => {
                e.insert(Slot::Parked(Box::new(instance)));
                Ok(())
            }
        }
    }

    /// Take an instance out of the table for a resume
    pub fn checkout(&mut self, name: &str) -> RuntimeResult<CoroutineInstance> {
        match self.slots.remove(name) {
            None => Err(RuntimeError::name(format!(
                "undefined coroutine instance '{}'",
                name
            ))),
            Some(Slot::Running { coroutine }) => {
                let err = RuntimeError::illegal_state(format!(
                    "coroutine instance '{}' of '{}' is already running",
                    name, coroutine
                ));
                self.slots.insert(name.to_string(), Slot::Running { coroutine });
                Err(err)
            }
            Some(Slot::Parked(instance)) => {
                self.slots.insert(
                    name.to_string(),
                    Slot::Running {
                        coroutine: instance.coroutine.clone(),
                    },
                );
                Ok(*instance)
            }
        }
    }

    /// Return an instance after a resume
    pub fn checkin(&mut self, name: &str, instance: CoroutineInstance) {
        self.slots
            .insert(name.to_string(), Slot::Parked(Box::new(instance)));
    }

    pub fn state(&self, name: &str) -> Option<CoroutineState> {
        self.slots.get(name).map(|slot| match slot {
            Slot::Parked(instance) => instance.state,
            Slot::Running { .. } => CoroutineState::Running,
        })
    }

    /// Inspect a parked instance
    pub fn get(&self, name: &str) -> Option<&CoroutineInstance> {
        match self.slots.get(name)? {
            Slot::Parked(instance) => Some(instance),
            Slot::Running { .. } => None,
        }
    }
}
