use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::executor::{Interpreter, Program, RuntimeError};

#[derive(Parser)]
#[command(name = "green")]
#[command(about = "Green - run programs with typed variables and coroutines", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the main body of a program given as JSON
    Run {
        /// Program file (JSON encoded syntax tree)
        file: PathBuf,

        /// Write the @process event stream to this file as JSON
        #[arg(long)]
        trace: Option<PathBuf>,

        /// Override runtime.max_call_depth
        #[arg(long)]
        max_call_depth: Option<usize>,
    },

    /// Decode a program and report its declarations without running it
    Check {
        /// Program file (JSON encoded syntax tree)
        file: PathBuf,
    },
}

/// Load configuration for a parsed command line
pub fn load_config(cli: &Cli) -> Result<Config> {
    let max_call_depth = match &cli.command {
        Commands::Run { max_call_depth, .. } => *max_call_depth,
        Commands::Check { .. } => None,
    };
    let config = Config::builder()
        .config_path(cli.config.clone())
        .max_call_depth(max_call_depth)
        .build()
        .context("Failed to load configuration")?;
    Ok(config)
}

/// Run the CLI with already-loaded configuration
pub fn run_cli_with_config(cli: Cli, config: Config) -> Result<()> {
    match cli.command {
        Commands::Run { file, trace, .. } => {
            let program = read_program(&file)?;
            let mut interpreter = Interpreter::builder(program).config(config).build()?;

            // Write the trace even when the run fails: it shows how far it got
            let outcome = interpreter.run_main();
            if let Some(path) = trace {
                let json = interpreter
                    .trace()
                    .to_json()
                    .context("Failed to encode process trace")?;
                fs::write(&path, json)
                    .with_context(|| format!("Failed to write trace to {}", path.display()))?;
            }
            outcome?;
        }

        Commands::Check { file } => {
            let program = read_program(&file)?;
            let functions = program.functions.len();
            let coroutines = program.coroutines.len();
            let statements = program.main.len();
            // Building the interpreter validates the declaration table
            Interpreter::builder(program).config(config).build()?;
            println!(
                "{}: {} function(s), {} coroutine(s), {} statement(s) in main",
                file.display(),
                functions,
                coroutines,
                statements
            );
        }
    }

    Ok(())
}

fn read_program(path: &Path) -> Result<Program> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let program = serde_json::from_str(&source)
        .with_context(|| format!("Failed to decode program {}", path.display()))?;
    Ok(program)
}

/// Render an error for the terminal
///
/// Runtime errors are reported as `error[<category>]: <message>`.
pub fn render_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<RuntimeError>() {
        Some(e) => format!("error[{}]: {}", e.kind, e.message),
        None => format!("error: {:#}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::ErrorKind;

    #[test]
    fn test_parse_run_command() {
        let cli = Cli::parse_from(["green", "run", "prog.json", "--trace", "out.json"]);
        match cli.command {
            Commands::Run { file, trace, max_call_depth } => {
                assert_eq!(file, PathBuf::from("prog.json"));
                assert_eq!(trace, Some(PathBuf::from("out.json")));
                assert_eq!(max_call_depth, None);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_global_config_flag() {
        let cli = Cli::parse_from(["green", "check", "prog.json", "--config", "g.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("g.toml")));
    }

    #[test]
    fn test_render_runtime_error() {
        let err = anyhow::Error::new(RuntimeError::new(
            ErrorKind::DivisionByZero,
            "integer division of 1 by zero",
        ));
        assert_eq!(
            render_error(&err),
            "error[DivisionByZero]: integer division of 1 by zero"
        );
    }

    #[test]
    fn test_render_other_error() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(render_error(&err), "error: boom");
    }
}
