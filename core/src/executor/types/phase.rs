//! Execution phase enums for composite statements
//!
//! Each composite statement has its own Phase enum that tracks which execution
//! step it's currently at. Phases are part of a VM snapshot.

use serde::{Deserialize, Serialize};

/// Execution phase for Block frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockPhase {
    /// Open the block's scope
    Enter = 0,
    /// Run the statement at `idx`, or close the block when past the end
    Next = 1,
}

/// Execution phase for If frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(u8)]
pub enum IfPhase {
    /// Evaluate the condition
    EvalCond = 0,
    /// Replace this frame with the chosen branch
    Dispatch = 1,
}

/// Execution phase for While frames
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[repr(u8)]
pub enum WhilePhase {
    /// Evaluate the condition
    Check = 0,
    /// Push the body for the current iteration
    RunBody = 1,
    /// The body finished normally
    PostBody = 2,
}
