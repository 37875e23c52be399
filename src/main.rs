use std::process::ExitCode;

use clap::Parser;
use locexpand::cli::{Arguments, ExitStatus};

fn main() -> ExitCode {
    let args = Arguments::parse();

    match locexpand::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitStatus::from_error(&err).into()
        }
    }
}
