//! Batch encrypt/decrypt workflow over the discovered candidate set.
//!
//! The orchestration is deliberately sequential and deterministic: discover
//! once, then attempt each candidate exactly once in discovery order. A
//! failing file is counted and reported but never aborts the batch, so one
//! bad file cannot block the rest.
use crate::cli::{RunArgs, StatusArgs};
use crate::discovery;
use crate::inspect::{self, EncryptionState};
use crate::vault::{AnsibleVault, VaultTool};
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Transition direction for a batch run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

impl Mode {
    fn verb(self) -> &'static str {
        match self {
            Mode::Encrypt => "encrypt",
            Mode::Decrypt => "decrypt",
        }
    }

    fn past_tense(self) -> &'static str {
        match self {
            Mode::Encrypt => "encrypted",
            Mode::Decrypt => "decrypted",
        }
    }
}

/// Immutable configuration for one batch run, built once from CLI input.
pub struct RunConfig {
    pub mode: Mode,
    pub dry_run: bool,
    pub verbose: bool,
    pub root: PathBuf,
}

impl RunConfig {
    pub fn from_args(mode: Mode, args: RunArgs) -> Self {
        Self {
            mode,
            dry_run: args.dry_run,
            verbose: args.verbose,
            root: args.root,
        }
    }
}

/// Per-file outcome of one transition attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Changed,
    Skipped,
    Absent,
    Failed,
}

/// Accumulated accounting for one batch run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunResult {
    pub files_processed: usize,
    pub files_changed: usize,
    pub errors: usize,
}

impl RunResult {
    fn record(&mut self, outcome: Outcome) {
        self.files_processed += 1;
        match outcome {
            Outcome::Changed => self.files_changed += 1,
            Outcome::Failed => self.errors += 1,
            Outcome::Skipped | Outcome::Absent => {}
        }
    }

    pub fn success(&self) -> bool {
        self.errors == 0
    }
}

/// Run the batch workflow against the real external tool.
///
/// The tool is resolved before discovery so a missing dependency fails the
/// run before any file is touched.
pub fn run(config: &RunConfig) -> Result<RunResult> {
    let tool = AnsibleVault::resolve()?;
    run_with_tool(&tool, config)
}

pub fn run_with_tool(tool: &dyn VaultTool, config: &RunConfig) -> Result<RunResult> {
    let candidates = discovery::discover(&config.root)?;
    if candidates.is_empty() {
        println!(
            "nothing to process: no sensitive files found under {}",
            config.root.display()
        );
        return Ok(RunResult::default());
    }

    if config.dry_run {
        println!("dry run: no files will be modified");
    }
    let mut result = RunResult::default();
    for path in &candidates {
        let outcome = transform(tool, path, config);
        tracing::debug!(path = %path.display(), ?outcome, "processed candidate");
        result.record(outcome);
    }

    print_summary(config, &result);
    Ok(result)
}

/// Apply one transition attempt to `path` under the configured mode.
///
/// Policy order: absent files are tolerated, files already in the target
/// state are skipped without invoking the tool (the tool itself misbehaves
/// when asked to re-encrypt or re-decrypt), dry runs report the flip without
/// touching the file, and only then does the external tool run.
fn transform(tool: &dyn VaultTool, path: &Path, config: &RunConfig) -> Outcome {
    let shown = display_path(path, &config.root);
    if !path.is_file() {
        if config.verbose {
            println!("  absent      {shown}");
        }
        return Outcome::Absent;
    }

    let encrypted = match inspect::is_encrypted(path) {
        Ok(encrypted) => encrypted,
        Err(err) => {
            eprintln!("  failed      {shown}: {err:#}");
            return Outcome::Failed;
        }
    };
    let already_satisfied = encrypted == (config.mode == Mode::Encrypt);
    if already_satisfied {
        if config.verbose {
            println!("  unchanged   {shown} (already {})", config.mode.past_tense());
        }
        return Outcome::Skipped;
    }

    if config.dry_run {
        println!("  would {} {shown}", config.mode.verb());
        return Outcome::Changed;
    }

    let attempt = match config.mode {
        Mode::Encrypt => tool.encrypt(path),
        Mode::Decrypt => tool.decrypt(path),
    };
    match attempt {
        Ok(()) => {
            println!("  {:<11} {shown}", config.mode.past_tense());
            Outcome::Changed
        }
        Err(err) => {
            eprintln!("  failed      {shown}: {err:#}");
            Outcome::Failed
        }
    }
}

fn print_summary(config: &RunConfig, result: &RunResult) {
    let changed_phrase = if config.dry_run {
        format!("{} would be {}", result.files_changed, config.mode.past_tense())
    } else {
        format!("{} {}", result.files_changed, config.mode.past_tense())
    };
    println!(
        "{} files processed, {changed_phrase}, {} errors",
        result.files_processed, result.errors
    );
    if config.mode == Mode::Decrypt && !config.dry_run && result.files_changed > 0 {
        eprintln!(
            "warning: decrypted files now hold plaintext secrets on disk; re-encrypt before committing"
        );
    }
}

/// Per-file entry in the status report.
#[derive(Debug, Serialize)]
pub struct FileStatus {
    pub path: String,
    pub state: EncryptionState,
}

/// Read-only snapshot of every candidate file's encryption state.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub root: String,
    pub files: Vec<FileStatus>,
    pub encrypted: usize,
    pub plaintext: usize,
    pub absent: usize,
}

pub fn status(args: &StatusArgs) -> Result<()> {
    let report = status_report(&args.root)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if report.files.is_empty() {
        println!("no sensitive files found under {}", report.root);
        return Ok(());
    }
    for file in &report.files {
        println!("  {:<11} {}", state_label(file.state), file.path);
    }
    println!(
        "{} encrypted, {} plaintext, {} absent",
        report.encrypted, report.plaintext, report.absent
    );
    Ok(())
}

pub fn status_report(root: &Path) -> Result<StatusReport> {
    let candidates = discovery::discover(root)?;
    let mut files = Vec::with_capacity(candidates.len());
    let (mut encrypted, mut plaintext, mut absent) = (0, 0, 0);
    for path in &candidates {
        let state = inspect::classify(path)?;
        match state {
            EncryptionState::Encrypted => encrypted += 1,
            EncryptionState::Plaintext => plaintext += 1,
            EncryptionState::Absent => absent += 1,
        }
        files.push(FileStatus {
            path: display_path(path, root),
            state,
        });
    }
    Ok(StatusReport {
        root: root.display().to_string(),
        files,
        encrypted,
        plaintext,
        absent,
    })
}

fn state_label(state: EncryptionState) -> &'static str {
    match state {
        EncryptionState::Encrypted => "encrypted",
        EncryptionState::Plaintext => "plaintext",
        EncryptionState::Absent => "absent",
    }
}

fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
