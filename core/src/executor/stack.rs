//! Stack growth for nested calls and resumes
//!
//! Each user function call and each coroutine resume runs a nested
//! `run_until_done`, so interpreter depth maps onto native stack depth.

/// Minimum stack space to keep available before entering a nested body
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Run `f`, switching to a fresh stack segment when the current one is low
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}
