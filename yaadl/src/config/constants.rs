//! Central place for configuration constants.
//!
//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `YAADL_GRADCHECK_STEP`).
pub(crate) const ENV_PREFIX: &str = "YAADL_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_STEP: &str = "GRADCHECK_STEP";
pub(crate) const ENV_TOLERANCE: &str = "GRADCHECK_TOLERANCE";
pub(crate) const ENV_SAMPLES: &str = "GRADCHECK_SAMPLES";
pub(crate) const ENV_SEED: &str = "GRADCHECK_SEED";
pub(crate) const ENV_LOWER: &str = "GRADCHECK_LOWER";
pub(crate) const ENV_UPPER: &str = "GRADCHECK_UPPER";

// --- Default values ---

pub(crate) const DEFAULT_STEP: f64 = 1e-6;
pub(crate) const DEFAULT_TOLERANCE: f64 = 1e-4;
pub(crate) const DEFAULT_SAMPLES: usize = 8;
pub(crate) const DEFAULT_SEED: u64 = 42;
pub(crate) const DEFAULT_LOWER: f64 = -0.9;
pub(crate) const DEFAULT_UPPER: f64 = 0.9;
