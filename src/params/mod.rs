//! Constant staging: one JSON payload file plus the `-d` defines that
//! unpack it inside the engine.

use std::io::Write;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tempfile::NamedTempFile;

use crate::value::{Constants, Value};

/// Reserved Eidos identifier bound to the parsed payload dictionary.
/// Constants may not use it as a key.
pub const PARAMS_DICT_NAME: &str = "SLIM_WRAP_PARAMS";

/// Staged constants for one run.
///
/// Owns the payload temp file for its lifetime; the defines hold the file's
/// path, so the file must outlive the engine invocation. Call [`remove`]
/// once the engine has exited. A `ParamFile` abandoned on an error path
/// still deletes its file on drop.
///
/// [`remove`]: ParamFile::remove
#[derive(Debug)]
pub struct ParamFile {
    file: NamedTempFile,
    defines: Vec<String>,
}

impl ParamFile {
    /// Write the flattened payload and derive the define expressions.
    ///
    /// The payload maps each key to its value with matrices flattened
    /// row-major to 1-D. The first define loads the payload into
    /// [`PARAMS_DICT_NAME`]; each following define binds one key by
    /// dictionary lookup, rebuilding matrices with their original shape.
    pub fn stage(constants: &Constants) -> Result<Self> {
        if constants.contains_key(PARAMS_DICT_NAME) {
            bail!(
                "constant name '{}' is reserved for the parameter dictionary",
                PARAMS_DICT_NAME
            );
        }

        // Build the full payload before touching the filesystem, so a bad
        // value never leaves a file behind.
        let mut payload = serde_json::Map::new();
        for (key, value) in constants {
            let flat = flat_json(value).with_context(|| format!("constant '{}'", key))?;
            payload.insert(key.clone(), flat);
        }

        let mut file = NamedTempFile::new().context("create parameter file")?;
        serde_json::to_writer(&mut file, &serde_json::Value::Object(payload))
            .context("write parameter file")?;
        file.flush().context("flush parameter file")?;

        let mut defines = Vec::with_capacity(constants.len() + 1);
        defines.push(format!(
            "{} = Dictionary(readFile('{}'));",
            PARAMS_DICT_NAME,
            file.path().display()
        ));
        for (key, value) in constants {
            defines.push(match value {
                Value::Matrix(m) => format!(
                    "{}=matrix({}.getValue('{}'), nrow={}, ncol={}, byrow=T);",
                    key,
                    PARAMS_DICT_NAME,
                    key,
                    m.nrow(),
                    m.ncol()
                ),
                _ => format!("{}={}.getValue('{}');", key, PARAMS_DICT_NAME, key),
            });
        }

        Ok(Self { file, defines })
    }

    /// Define expressions in engine argument order: dictionary load first,
    /// then one binding per key.
    pub fn defines(&self) -> &[String] {
        &self.defines
    }

    /// Path of the payload file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the payload file. Failure only leaves residue behind, so it
    /// is logged as a warning rather than returned.
    pub fn remove(self) {
        let path = self.file.path().to_path_buf();
        if let Err(err) = self.file.close() {
            log::warn!("could not delete parameter file {}: {}", path.display(), err);
        }
    }
}

// Payload form of a value: scalars as-is, vectors as JSON arrays, matrices
// as their row-major data.
fn flat_json(value: &Value) -> Result<serde_json::Value> {
    let json = match value {
        Value::Str(s) => serde_json::Value::from(s.as_str()),
        Value::Bool(b) => (*b).into(),
        Value::Int(n) => (*n).into(),
        Value::Float(x) => serde_json::Number::from_f64(*x)
            .map(serde_json::Value::Number)
            .with_context(|| format!("float {} cannot be represented in JSON", x))?,
        Value::Vector(v) => serde_json::to_value(v).context("serialize vector")?,
        Value::Matrix(m) => serde_json::to_value(m.data()).context("serialize matrix data")?,
    };
    Ok(json)
}
