//! External vault tool plumbing.
//!
//! The workflow never rewrites file contents itself; every mutation is
//! delegated to the external tool, one synchronous in-place invocation per
//! file. The tool is modeled as a capability trait so the executor can be
//! tested against an in-memory fake.
use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Environment override for the vault command line, shell-quoted.
pub const TOOL_ENV: &str = "VAULT_FILES_TOOL";

/// Default external tool resolved on PATH.
pub const DEFAULT_TOOL: &str = "ansible-vault";

/// In-place encrypt/decrypt operations on a single file.
///
/// Both operations either succeed silently or fail with a diagnostic; there
/// are no partial-success states.
pub trait VaultTool {
    fn encrypt(&self, path: &Path) -> Result<()>;
    fn decrypt(&self, path: &Path) -> Result<()>;
}

/// The `ansible-vault` CLI (or its configured override) invoked per file.
pub struct AnsibleVault {
    argv: Vec<String>,
}

impl AnsibleVault {
    /// Resolve the external tool before any file is touched.
    ///
    /// A non-empty `VAULT_FILES_TOOL` replaces the default command line and
    /// is parsed shell-style; either way the program must resolve on PATH,
    /// so a missing dependency fails the run up front instead of failing
    /// once per file.
    pub fn resolve() -> Result<Self> {
        let argv = match std::env::var(TOOL_ENV) {
            Ok(raw) if !raw.trim().is_empty() => {
                shell_words::split(&raw).with_context(|| format!("parse {TOOL_ENV}: {raw}"))?
            }
            _ => vec![DEFAULT_TOOL.to_string()],
        };
        let program = argv
            .first()
            .ok_or_else(|| anyhow!("{TOOL_ENV} parsed to an empty command"))?;
        let resolved = which::which(program).map_err(|err| {
            anyhow!(
                "vault tool `{program}` not found ({err}); install {DEFAULT_TOOL} or set {TOOL_ENV}"
            )
        })?;
        tracing::debug!(tool = %resolved.display(), "resolved vault tool");
        Ok(Self { argv })
    }

    fn run_op(&self, op: &str, path: &Path) -> Result<()> {
        let output = Command::new(&self.argv[0])
            .args(&self.argv[1..])
            .arg(op)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .output()
            .with_context(|| format!("spawn {}", self.argv[0]))?;
        tracing::debug!(
            op,
            path = %path.display(),
            status = ?output.status.code(),
            "vault tool invocation complete"
        );
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr
                .lines()
                .find(|line| !line.trim().is_empty())
                .unwrap_or("no diagnostic output")
                .trim()
                .to_string();
            return Err(anyhow!(
                "{} {op} exited with {}: {detail}",
                self.argv[0],
                output.status
            ));
        }
        Ok(())
    }
}

impl VaultTool for AnsibleVault {
    fn encrypt(&self, path: &Path) -> Result<()> {
        self.run_op("encrypt", path)
    }

    fn decrypt(&self, path: &Path) -> Result<()> {
        self.run_op("decrypt", path)
    }
}
