//! Model lifecycle: a validated script file and seeded, parameterized runs.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::{Builder, NamedTempFile};

use crate::config::Config;
use crate::params::ParamFile;
use crate::process::{self, RunOutput};
use crate::seed::{self, OsRandom, SeedSource};
use crate::value::Constants;

/// Per-run options.
///
/// `seed: None` draws a fresh one; `check` turns a non-zero engine exit
/// into an error. The defaults are a seeded, checked run with no constants.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub seed: Option<i64>,
    pub constants: Constants,
    pub check: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self { seed: None, constants: Constants::new(), check: true }
    }
}

/// A validated SLiM script staged in an exclusively-owned temp file.
///
/// Construction writes the source into a fresh file and runs the engine's
/// syntax check against it, so a handle that exists is always runnable.
/// Dropping the handle removes the file; [`close`](Model::close) does the
/// same eagerly and logs if the file would not go away.
#[derive(Debug)]
pub struct Model {
    engine: String,
    file: NamedTempFile,
    source: String,
    last_seed: Option<i64>,
    last_result: Option<RunOutput>,
}

impl Model {
    /// Stage `code` into a temp file and validate it with the engine.
    pub fn from_code(cfg: &Config, code: &str) -> Result<Self> {
        Self::new(cfg, code.to_string())
    }

    /// Read a script from `path` and stage a private copy of it.
    pub fn from_file(cfg: &Config, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let code = fs::read_to_string(path)
            .with_context(|| format!("read model source '{}'", path.display()))?;
        Self::new(cfg, code)
    }

    fn new(cfg: &Config, source: String) -> Result<Self> {
        let mut file = Builder::new()
            .suffix(".slim")
            .tempfile()
            .context("create model file")?;
        file.write_all(source.as_bytes()).context("write model file")?;
        file.flush().context("flush model file")?;

        let engine = cfg.slim_binary();
        process::check_script(&engine, file.path())?;

        Ok(Self { engine, file, source, last_seed: None, last_result: None })
    }

    /// The stored script text, for display front-ends.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Path of the staged script file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Seed used by the most recent run.
    pub fn last_seed(&self) -> Option<i64> {
        self.last_seed
    }

    /// Output of the most recent successful invocation.
    pub fn last_result(&self) -> Option<&RunOutput> {
        self.last_result.as_ref()
    }

    /// Run the model, drawing a missing seed from OS entropy.
    pub fn run(&mut self, opts: RunOptions) -> Result<RunOutput> {
        self.run_with_rng(opts, &mut OsRandom)
    }

    /// Run the model with an explicit seed source, for callers that need
    /// reproducible seed draws.
    pub fn run_with_rng(
        &mut self,
        opts: RunOptions,
        rng: &mut dyn SeedSource,
    ) -> Result<RunOutput> {
        let seed = seed::resolve(opts.seed, rng)?;
        self.last_seed = Some(seed);

        // Argument order is fixed: the engine consumes `-d` defines left to
        // right, and the dictionary load must precede every lookup.
        let mut args: Vec<OsString> = vec!["-s".into(), seed.to_string().into()];

        let staged = if opts.constants.is_empty() {
            None
        } else {
            Some(ParamFile::stage(&opts.constants)?)
        };
        if let Some(staged) = &staged {
            for define in staged.defines() {
                args.push("-d".into());
                args.push(define.as_str().into());
            }
        }
        args.push(self.file.path().as_os_str().to_os_string());

        // The payload file goes away whether the run worked or not, and
        // before the run's own error (if any) propagates.
        let result = process::execute(&self.engine, &args, opts.check);
        if let Some(staged) = staged {
            staged.remove();
        }

        let output = result?;
        self.last_result = Some(output.clone());
        Ok(output)
    }

    /// Remove the staged script file now instead of at drop time.
    pub fn close(self) {
        let path = self.file.path().to_path_buf();
        if let Err(err) = self.file.close() {
            log::warn!("could not delete model file {}: {}", path.display(), err);
        }
    }
}
