//! Tests for the executor
//!
//! Organized by feature area

mod control_flow_tests;
mod helpers;
