/// Green CLI
///
/// Runs JSON encoded Green programs from the command line.
use clap::Parser;
use green_core::cli::{self, Cli};
use tracing_subscriber::EnvFilter;

fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match cli::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", cli::render_error(&e));
            std::process::exit(1);
        }
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run_cli_with_config(cli, config) {
        eprintln!("{}", cli::render_error(&e));
        std::process::exit(1);
    }
}
