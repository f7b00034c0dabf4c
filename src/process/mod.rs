//! Engine invocation: syntax checking and captured runs.

use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

use anyhow::{bail, Context, Result};

/// Captured output of one engine invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

impl RunOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }
}

/// Validate a script with the engine's check mode (`slim -c <path>`).
/// A non-zero exit surfaces the engine's own diagnostics verbatim.
pub fn check_script(engine: &str, path: &Path) -> Result<()> {
    let output = Command::new(engine)
        .arg("-c")
        .arg(path)
        .output()
        .with_context(|| format!("invoke '{}'", engine))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("SLiM model check failed:\n{}", stderr.trim());
    }
    Ok(())
}

/// Run the engine once with `args`, capturing both streams.
///
/// Failing to launch the engine at all is always an error. A non-zero exit
/// becomes an error carrying the engine's stderr only under `check`;
/// otherwise the output is returned as-is. No retries at this layer:
/// callers decide what a failure means.
pub fn execute(engine: &str, args: &[OsString], check: bool) -> Result<RunOutput> {
    let output = Command::new(engine)
        .args(args)
        .output()
        .with_context(|| format!("invoke '{}'", engine))?;

    let result = RunOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status,
    };
    if check && !result.success() {
        bail!("SLiM run failed:\n{}", result.stderr.trim());
    }
    Ok(result)
}
