pub mod cli;
pub mod config;
pub mod executor;

// Re-export main types
pub use config::Config;
pub use executor::{
    ErrorKind, Interpreter, InterpreterBuilder, Program, ResumeOutcome, RuntimeError,
};
