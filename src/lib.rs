//! Drive the SLiM population-genetics simulator as a subprocess.
//!
//! A [`Model`] owns a validated copy of an Eidos script. [`Model::run`]
//! resolves a seed, stages typed constants through a JSON side-channel
//! file plus `-d` defines on the engine's command line, and returns the
//! captured output.
//!
//! ```no_run
//! use slimwrap::{Config, Model, RunOptions};
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = Config::load();
//! let mut model = Model::from_file(&cfg, "model.slim")?;
//! let out = model.run(RunOptions { seed: Some(42), ..Default::default() })?;
//! println!("{}", out.stdout);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod model;
pub mod params;
pub mod process;
pub mod seed;
pub mod value;

pub use config::Config;
pub use model::{Model, RunOptions};
pub use params::{ParamFile, PARAMS_DICT_NAME};
pub use process::RunOutput;
pub use seed::{OsRandom, SeedSource, SEED_MAX, SEED_MIN};
pub use value::{constants_from_json, encode, Constants, Matrix, Value, Vector};
