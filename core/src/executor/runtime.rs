//! Interpreter runtime and driver API
//!
//! [`Runtime`] is the state shared by every VM of one program: the declaration
//! table, the coroutine instances, the output sink and the process trace.
//! [`Interpreter`] wraps it with the main body and exposes the operations a
//! host calls directly.

use super::coroutine::{CoroutineInstance, CoroutineState, CoroutineTable, ResumeOutcome};
use super::decls::Declarations;
use super::env::Env;
use super::errors::{ErrorKind, RuntimeError, RuntimeResult};
use super::exec_loop::run_until_done;
use super::stdlib::{Printer, StdoutPrinter};
use super::trace::{ProcessAction, ProcessTrace};
use super::types::{Block, Program};
use super::vm::{BodyKind, VM};
use crate::config::Config;
use std::sync::Arc;
use tracing::debug;

/* ===================== Runtime ===================== */

pub struct Runtime {
    decls: Arc<Declarations>,
    coroutines: CoroutineTable,
    printer: Box<dyn Printer>,
    trace: ProcessTrace,
    max_call_depth: usize,
    call_depth: usize,
}

impl Runtime {
    pub fn new(decls: Declarations, printer: Box<dyn Printer>, config: &Config) -> Self {
        Self {
            decls: Arc::new(decls),
            coroutines: CoroutineTable::default(),
            printer,
            trace: ProcessTrace::new(config.runtime.trace_process),
            max_call_depth: config.runtime.max_call_depth,
            call_depth: 0,
        }
    }

    pub fn decls(&self) -> &Declarations {
        &self.decls
    }

    pub fn printer(&mut self) -> &mut dyn Printer {
        self.printer.as_mut()
    }

    pub fn trace(&self) -> &ProcessTrace {
        &self.trace
    }

    pub fn coroutines(&self) -> &CoroutineTable {
        &self.coroutines
    }

    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub fn record_process(
        &mut self,
        action: ProcessAction,
        name: &str,
        note: String,
        instance: Option<&str>,
    ) {
        self.trace.record(action, name, note, instance);
    }

    /// Enter a function call, enforcing the nesting limit
    pub fn enter_call(&mut self, function: &str) -> RuntimeResult<()> {
        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::new(
                ErrorKind::RecursionLimit,
                format!(
                    "call to '{}' exceeds the maximum call depth of {}",
                    function, self.max_call_depth
                ),
            ));
        }
        self.call_depth += 1;
        Ok(())
    }

    pub fn exit_call(&mut self) {
        self.call_depth = self.call_depth.saturating_sub(1);
    }

    /// Create (or recreate) an instance of `coroutine` under `name`
    pub fn create_coroutine(&mut self, name: &str, coroutine: &str) -> RuntimeResult<()> {
        let decl = self
            .decls
            .coroutine(coroutine)
            .cloned()
            .ok_or_else(|| RuntimeError::name(format!("undefined coroutine '{}'", coroutine)))?;

        let instance = CoroutineInstance::create(&decl);
        let id = instance.id;
        self.coroutines.insert(name, instance)?;
        debug!(instance = name, coroutine, %id, "coroutine created");

        if let Some(note) = decl.doc.as_ref().and_then(|d| d.process_note()) {
            self.record_process(ProcessAction::Create, &decl.name, note, Some(name));
        }
        Ok(())
    }

    /// Put a previously snapshotted instance back under `name`
    ///
    /// The instance must belong to a coroutine declared in this program. The
    /// same duplicate rules as [`Runtime::create_coroutine`] apply.
    pub fn restore_coroutine(
        &mut self,
        name: &str,
        instance: CoroutineInstance,
    ) -> RuntimeResult<()> {
        if self.decls.coroutine(&instance.coroutine).is_none() {
            return Err(RuntimeError::name(format!(
                "undefined coroutine '{}'",
                instance.coroutine
            )));
        }
        if instance.state == CoroutineState::Running {
            return Err(RuntimeError::illegal_state(format!(
                "coroutine instance '{}' was captured while running",
                name
            )));
        }

        let id = instance.id;
        let state = instance.state;
        self.coroutines.insert(name, instance)?;
        debug!(instance = name, %id, %state, "coroutine restored");
        Ok(())
    }

    /// Resume the instance `name` until it yields or completes
    pub fn resume_coroutine(&mut self, name: &str) -> RuntimeResult<ResumeOutcome> {
        let mut instance = self.coroutines.checkout(name)?;

        if instance.is_resumable() {
            let note = self
                .decls
                .coroutine(&instance.coroutine)
                .and_then(|d| d.doc.as_ref())
                .and_then(|d| d.process_note());
            if let Some(note) = note {
                self.record_process(ProcessAction::Resume, &instance.coroutine, note, Some(name));
            }
        }

        let outcome = instance.resume(self);
        debug!(instance = name, state = %instance.state, "coroutine resume finished");
        self.coroutines.checkin(name, instance);
        outcome
    }
}

/* ===================== Interpreter ===================== */

/// A loaded program ready to run
pub struct Interpreter {
    runtime: Runtime,
    main: Block,
}

/// Builder for constructing an [`Interpreter`]
pub struct InterpreterBuilder {
    program: Program,
    printer: Option<Box<dyn Printer>>,
    config: Option<Config>,
}

impl InterpreterBuilder {
    pub fn new(program: Program) -> Self {
        Self {
            program,
            printer: None,
            config: None,
        }
    }

    /// Set the output sink for `print` (defaults to stdout)
    pub fn printer(mut self, printer: impl Printer + 'static) -> Self {
        self.printer = Some(Box::new(printer));
        self
    }

    /// Set runtime configuration (defaults to [`Config::default`])
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the declaration table and the runtime
    pub fn build(self) -> RuntimeResult<Interpreter> {
        let Program {
            functions,
            coroutines,
            main,
        } = self.program;
        let decls = Declarations::build(functions, coroutines)?;
        let config = self.config.unwrap_or_default();
        let printer: Box<dyn Printer> = match self.printer {
            Some(printer) => printer,
            None => Box::new(StdoutPrinter),
        };

        Ok(Interpreter {
            runtime: Runtime::new(decls, printer, &config),
            main,
        })
    }
}

impl Interpreter {
    pub fn builder(program: Program) -> InterpreterBuilder {
        InterpreterBuilder::new(program)
    }

    /// Load a program with default configuration and stdout output
    pub fn new(program: Program) -> RuntimeResult<Self> {
        InterpreterBuilder::new(program).build()
    }

    /// Execute the main body to completion
    ///
    /// A `return` in main ends the run early.
    pub fn run_main(&mut self) -> RuntimeResult<()> {
        debug!(statements = self.main.len(), "running main");
        let mut vm = VM::new(self.main.clone(), Env::new(), BodyKind::Main);
        let result = run_until_done(&mut vm, &mut self.runtime);
        debug!(ok = result.is_ok(), "main finished");
        result
    }

    pub fn create_coroutine(&mut self, name: &str, coroutine: &str) -> RuntimeResult<()> {
        self.runtime.create_coroutine(name, coroutine)
    }

    pub fn resume(&mut self, name: &str) -> RuntimeResult<ResumeOutcome> {
        self.runtime.resume_coroutine(name)
    }

    /// Reinstall an instance taken from [`Interpreter::coroutine`], e.g. after
    /// a JSON round trip
    pub fn restore_coroutine(
        &mut self,
        name: &str,
        instance: CoroutineInstance,
    ) -> RuntimeResult<()> {
        self.runtime.restore_coroutine(name, instance)
    }

    pub fn coroutine_state(&self, name: &str) -> Option<CoroutineState> {
        self.runtime.coroutines().state(name)
    }

    pub fn coroutine(&self, name: &str) -> Option<&CoroutineInstance> {
        self.runtime.coroutines().get(name)
    }

    pub fn trace(&self) -> &ProcessTrace {
        self.runtime.trace()
    }

    pub fn declarations(&self) -> &Declarations {
        self.runtime.decls()
    }
}
