//! Seed resolution for engine runs.

use anyhow::{anyhow, Result};

/// Lowest seed the generator will draw.
pub const SEED_MIN: i64 = 1;

/// Highest seed the generator will draw. The engine's documented seed range
/// is still unconfirmed upstream; adjust these bounds once it is. Explicit
/// seeds bypass them.
pub const SEED_MAX: i64 = u32::MAX as i64;

/// Source of entropy for drawing seeds. Production callers use
/// [`OsRandom`]; tests substitute a fixed sequence to make runs
/// reproducible end to end.
pub trait SeedSource {
    fn next_u64(&mut self) -> Result<u64>;
}

/// OS entropy via `getrandom`.
pub struct OsRandom;

impl SeedSource for OsRandom {
    fn next_u64(&mut self) -> Result<u64> {
        let mut buf = [0u8; 8];
        getrandom::getrandom(&mut buf).map_err(|err| anyhow!("read OS entropy: {}", err))?;
        Ok(u64::from_le_bytes(buf))
    }
}

/// Pass an explicit seed through unchanged, or draw one from `rng`
/// uniformly in `[SEED_MIN, SEED_MAX]`.
pub fn resolve(seed: Option<i64>, rng: &mut dyn SeedSource) -> Result<i64> {
    match seed {
        Some(s) => Ok(s),
        None => {
            let span = (SEED_MAX - SEED_MIN + 1) as u64;
            let drawn = rng.next_u64()? % span;
            Ok(SEED_MIN + drawn as i64)
        }
    }
}
