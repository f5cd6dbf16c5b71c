use clap::Parser;
use dirzip::commands::{self, Cli};
use dirzip::{Error, sysexits};
use env_logger::Env;
use std::process;

/// Entry point for the dirzip CLI application.
/// Parses command-line arguments, sets up logging and runs the archiver.
fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();

    if let Err(e) = commands::run(cli) {
        eprintln!("Error: {e}");
        eprintln!("\nZip creation failed!");
        let code = e
            .downcast_ref::<Error>()
            .map_or(sysexits::EX_FAILURE, sysexits::exit_code);
        process::exit(code);
    }
}
