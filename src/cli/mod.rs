use std::path::Path;

use anyhow::Result;

mod args;
mod commands;
mod confirm;
mod exit_status;
pub mod report;

pub use args::{Arguments, Command, RunArgs};
pub use exit_status::ExitStatus;

pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    match args.command {
        Some(Command::Init) => commands::init::init(Path::new(".")),
        None => commands::extract::extract(&args.run),
    }
}
