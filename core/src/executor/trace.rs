//! Process-marker event stream
//!
//! Declarations whose doc comment starts with `@process` are reported here in
//! the order they actually execute. Building a diagram from the stream is the
//! consumer's job.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessAction {
    /// A marked function was called
    Call,
    /// An instance of a marked coroutine was created
    Create,
    /// An instance of a marked coroutine was resumed
    Resume,
    /// A marked variable declaration executed
    Declare,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessEvent {
    pub seq: usize,
    pub action: ProcessAction,
    /// Declaration name (function, coroutine or variable)
    pub name: String,
    pub note: String,
    /// Instance name for coroutine events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessTrace {
    enabled: bool,
    events: Vec<ProcessEvent>,
}

impl ProcessTrace {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            events: Vec::new(),
        }
    }

    pub fn record(
        &mut self,
        action: ProcessAction,
        name: &str,
        note: String,
        instance: Option<&str>,
    ) {
        if !self.enabled {
            return;
        }
        let seq = self.events.len();
        self.events.push(ProcessEvent {
            seq,
            action,
            name: name.to_string(),
            note,
            instance: instance.map(str::to_string),
        });
    }

    pub fn events(&self) -> &[ProcessEvent] {
        &self.events
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.events)
    }
}

impl Default for ProcessTrace {
    fn default() -> Self {
        Self::new(true)
    }
}
