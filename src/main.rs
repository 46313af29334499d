//! Bulk encrypt/decrypt workflow for ansible-vault inventory files.
use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::process::exit;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod discovery;
mod inspect;
mod vault;
mod workflow;

use cli::{Command, RootArgs};
use workflow::{Mode, RunConfig};

fn main() {
    init_tracing();

    let args = match RootArgs::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // Help and version requests are successful exits; everything else
            // is an invalid invocation and maps to the documented exit status 1.
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            exit(code);
        }
    };

    match run(args) {
        Ok(true) => exit(0),
        Ok(false) => exit(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            exit(1);
        }
    }
}

fn run(args: RootArgs) -> Result<bool> {
    match args.command {
        Command::Encrypt(run_args) => {
            let config = RunConfig::from_args(Mode::Encrypt, run_args);
            Ok(workflow::run(&config)?.success())
        }
        Command::Decrypt(run_args) => {
            let config = RunConfig::from_args(Mode::Decrypt, run_args);
            Ok(workflow::run(&config)?.success())
        }
        Command::Status(status_args) => {
            workflow::status(&status_args)?;
            Ok(true)
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
