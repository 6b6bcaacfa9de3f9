//! Configuration for finite-difference gradient checking.
//!
//! Load from environment via [`from_env`] and validate with [`GradCheckConfig::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use constants::{
    DEFAULT_LOWER, DEFAULT_SAMPLES, DEFAULT_SEED, DEFAULT_STEP, DEFAULT_TOLERANCE, DEFAULT_UPPER,
};

pub use builder::{env_key, env_parsed, from_env};
pub use error::ConfigError;

/// Settings shared by [`crate::gradcheck`].
///
/// Use [`from_env`] to build from environment variables and [`GradCheckConfig::validate`]
/// before use.
#[derive(Clone, Debug, PartialEq)]
pub struct GradCheckConfig {
    /// Half-width `h` of the central difference `(f(x+h) - f(x-h)) / 2h`.
    pub step: f64,
    /// Largest accepted absolute difference between analytic and numeric partials.
    pub tolerance: f64,
    /// Number of random points drawn by [`crate::gradcheck::sample_points`].
    pub samples: usize,
    /// Seed for the sampling RNG (reproducibility).
    pub seed: u64,
    /// Inclusive lower bound of every sampled coordinate.
    pub lower: f64,
    /// Exclusive upper bound of every sampled coordinate.
    pub upper: f64,
}

impl Default for GradCheckConfig {
    /// Returns default configuration (suitable for tests and fallbacks).
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            tolerance: DEFAULT_TOLERANCE,
            samples: DEFAULT_SAMPLES,
            seed: DEFAULT_SEED,
            lower: DEFAULT_LOWER,
            upper: DEFAULT_UPPER,
        }
    }
}

impl GradCheckConfig {
    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    ///
    /// Ensures: positive finite `step`, non-negative `tolerance`, `samples > 0`, and a
    /// finite, non-empty sampling interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(ConfigError::Validation(format!(
                "step must be positive and finite (got {})",
                self.step
            )));
        }
        if !(self.tolerance >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "tolerance must be non-negative (got {})",
                self.tolerance
            )));
        }
        if self.samples == 0 {
            return Err(ConfigError::Validation(
                "samples must be greater than 0".to_string(),
            ));
        }
        if !(self.lower.is_finite() && self.upper.is_finite()) {
            return Err(ConfigError::Validation(
                "sampling bounds must be finite".to_string(),
            ));
        }
        if self.lower >= self.upper {
            return Err(ConfigError::Validation(format!(
                "lower ({}) must be less than upper ({})",
                self.lower, self.upper
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::constants::{ENV_SAMPLES, ENV_SEED, ENV_STEP, ENV_TOLERANCE};
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = GradCheckConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.step, 1e-6);
        assert_eq!(cfg.samples, 8);
    }

    #[test]
    fn validate_rejects_non_positive_step() {
        for step in [0.0, -1e-6, f64::NAN, f64::INFINITY] {
            let cfg = GradCheckConfig {
                step,
                ..GradCheckConfig::default()
            };
            assert!(cfg.validate().is_err(), "step {step} accepted");
        }
    }

    #[test]
    fn validate_rejects_negative_tolerance() {
        let cfg = GradCheckConfig {
            tolerance: -1.0,
            ..GradCheckConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_samples() {
        let cfg = GradCheckConfig {
            samples: 0,
            ..GradCheckConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_interval() {
        let cfg = GradCheckConfig {
            lower: 1.0,
            upper: 1.0,
            ..GradCheckConfig::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = GradCheckConfig {
            lower: f64::NEG_INFINITY,
            ..GradCheckConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    /// Lock so env tests don't run in parallel and pollute each other.
    static CONFIG_ENV_LOCK: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

    #[test]
    fn from_env_falls_back_to_defaults() {
        let _g = CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap();
        std::env::remove_var(env_key(ENV_STEP));
        std::env::remove_var(env_key(ENV_SEED));
        let cfg = from_env().unwrap();
        assert_eq!(cfg.step, GradCheckConfig::default().step);
        assert_eq!(cfg.seed, GradCheckConfig::default().seed);
    }

    #[test]
    fn from_env_overrides_with_env_vars() {
        let _g = CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap();
        let key_samples = env_key(ENV_SAMPLES);
        let key_tolerance = env_key(ENV_TOLERANCE);
        std::env::set_var(&key_samples, "3");
        std::env::set_var(&key_tolerance, " 1e-3 ");
        let cfg = from_env();
        std::env::remove_var(&key_samples);
        std::env::remove_var(&key_tolerance);
        let cfg = cfg.unwrap();
        assert_eq!(cfg.samples, 3);
        assert_eq!(cfg.tolerance, 1e-3);
    }

    #[test]
    fn from_env_returns_error_on_invalid_parse() {
        let _g = CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap();
        let key = env_key(ENV_SEED);
        std::env::set_var(&key, "not_a_number");
        let res = from_env();
        std::env::remove_var(key);
        assert!(matches!(res, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn from_env_validates_result() {
        let _g = CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap();
        let key = env_key(ENV_SAMPLES);
        std::env::set_var(&key, "0");
        let res = from_env();
        std::env::remove_var(key);
        assert!(matches!(res, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn env_string_and_env_parsed_treat_unset_as_none() {
        let _g = CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap();
        let key = env_key(ENV_STEP);
        std::env::remove_var(&key);
        assert_eq!(builder::env_string(&key), Ok(None));
        assert_eq!(env_parsed::<f64>(&key), Ok(None));
        std::env::set_var(&key, "2e-6");
        let raw = builder::env_string(&key);
        let parsed = env_parsed::<f64>(&key);
        std::env::remove_var(&key);
        assert_eq!(raw, Ok(Some("2e-6".to_string())));
        assert_eq!(parsed, Ok(Some(2e-6)));
    }

    #[test]
    fn env_key_uses_prefix() {
        assert_eq!(env_key(ENV_STEP), "YAADL_GRADCHECK_STEP");
    }

    #[test]
    fn config_error_display_and_message() {
        let e = ConfigError::Validation("samples must be greater than 0".to_string());
        assert!(e.to_string().contains("config validation"));
        assert_eq!(e.message(), "samples must be greater than 0");

        let e = ConfigError::Parse {
            key: "YAADL_GRADCHECK_SEED".to_string(),
            value: "x".to_string(),
            message: "invalid digit found in string".to_string(),
        };
        assert!(e.to_string().contains("YAADL_GRADCHECK_SEED"));
        assert_eq!(e.message(), "invalid digit found in string");
    }
}
