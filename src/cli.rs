//! CLI argument parsing for the vault file workflow.
//!
//! The CLI is intentionally thin: mode selection and flags only, so the same
//! workflow functions can be driven from tests without going through argv.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint for the bulk encryption workflow.
#[derive(Parser, Debug)]
#[command(
    name = "vault-files",
    version,
    about = "Bulk encrypt/decrypt sensitive inventory files with ansible-vault",
    after_help = "Commands:\n  encrypt   Encrypt every plaintext sensitive file in place\n  decrypt   Decrypt every vault-encrypted sensitive file in place\n  status    Report the encryption state of every candidate file\n\nExamples:\n  vault-files encrypt\n  vault-files decrypt --dry-run\n  vault-files encrypt --verbose --root /srv/provisioning\n  vault-files status --json",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level workflow commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encrypt every plaintext sensitive file in place
    Encrypt(RunArgs),
    /// Decrypt every vault-encrypted sensitive file in place
    Decrypt(RunArgs),
    /// Report the encryption state of every candidate file
    Status(StatusArgs),
}

/// Shared inputs for the encrypt and decrypt runs.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Preview the transitions without modifying any file
    #[arg(long, short = 'n')]
    pub dry_run: bool,

    /// Also report files that are absent or already in the target state
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Working tree the fixed inventory layout is resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}

/// Status command inputs.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Emit a machine-readable JSON report
    #[arg(long)]
    pub json: bool,

    /// Working tree the fixed inventory layout is resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,
}
