//! Build [`GradCheckConfig`] from environment variables.
//!
//! Uses [`env_string`] and [`env_parsed`] to read env vars with a single place for key names
//! (the `constants` submodule) and typed errors ([`ConfigError`]).

use super::constants::{
    ENV_LOWER, ENV_PREFIX, ENV_SAMPLES, ENV_SEED, ENV_STEP, ENV_TOLERANCE, ENV_UPPER,
};
use super::ConfigError;
use super::GradCheckConfig;

/// Returns the full environment variable key for a suffix (e.g. `GRADCHECK_STEP` →
/// `YAADL_GRADCHECK_STEP`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string.
///
/// Returns `Some(value)` if set and valid UTF-8, `None` if unset, and
/// `Err(ConfigError::EnvVar)` if set but not Unicode.
pub(super) fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads an environment variable and parses it into `T`.
///
/// Returns `Ok(Some(value))` if set and parse succeeds, `Ok(None)` if unset, and
/// `Err(ConfigError::Parse)` if set but parsing fails.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    match s.trim().parse() {
        Ok(t) => Ok(Some(t)),
        Err(e) => Err(ConfigError::Parse {
            key: key.to_string(),
            value: s,
            message: e.to_string(),
        }),
    }
}

/// Builds [`GradCheckConfig`] from environment variables, falling back to
/// [`GradCheckConfig::default`] for unset values, then validates it.
///
/// Returns [`ConfigError`] if any *set* variable fails to parse or the result is invalid.
pub fn from_env() -> Result<GradCheckConfig, ConfigError> {
    let default = GradCheckConfig::default();

    let config = GradCheckConfig {
        step: env_parsed::<f64>(&env_key(ENV_STEP))?.unwrap_or(default.step),
        tolerance: env_parsed::<f64>(&env_key(ENV_TOLERANCE))?.unwrap_or(default.tolerance),
        samples: env_parsed::<usize>(&env_key(ENV_SAMPLES))?.unwrap_or(default.samples),
        seed: env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed),
        lower: env_parsed::<f64>(&env_key(ENV_LOWER))?.unwrap_or(default.lower),
        upper: env_parsed::<f64>(&env_key(ENV_UPPER))?.unwrap_or(default.upper),
    };
    config.validate()?;
    Ok(config)
}
