//! Entry point for the `squash` CLI.
//!
//! Parses arguments, installs logging, dispatches to the command handler,
//! and maps errors to exit codes.

use squash::cli::Cli;
use squash::{commands, exit_codes, logging};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    logging::init(cli.verbose);

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::from(err.exit_code() as u8)
        }
    }
}
