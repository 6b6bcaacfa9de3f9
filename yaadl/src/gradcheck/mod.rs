//! Finite-difference gradient checking.
//!
//! An expression is any function from a slice of input [`Var`]s to an output [`Var`] on the
//! same graph. Every evaluation builds a fresh [`Graph`], so checks never disturb a caller's
//! graph and can be repeated freely.
//!
//! ```
//! use yaadl::config::GradCheckConfig;
//! use yaadl::gradcheck::check_gradient;
//!
//! let report = check_gradient(
//!     |v| Ok(v[0].sin()? * v[1]),
//!     &[0.3, 2.0],
//!     &GradCheckConfig::default(),
//! )?;
//! assert!(report.passed());
//! # Ok::<(), yaadl::AutodiffError>(())
//! ```

use log::debug;
use rand::{prelude::*, rngs::StdRng};
use rand_distr::Uniform;

use crate::autograd::{AutodiffError, Graph, NoopHook, Var};
use crate::config::{ConfigError, GradCheckConfig};

/// Outcome of comparing analytic and numeric partial derivatives at one point.
#[derive(Clone, Debug, PartialEq)]
pub struct GradCheckReport {
    /// Point the expression was evaluated at.
    pub point: Vec<f64>,
    /// Forward value at `point`.
    pub value: f64,
    /// Partials from one backward sweep.
    pub analytic: Vec<f64>,
    /// Partials from central differences.
    pub numeric: Vec<f64>,
    /// `max_i |analytic[i] - numeric[i]|`.
    pub max_abs_error: f64,
    /// Tolerance the report is judged against.
    pub tolerance: f64,
}

impl GradCheckReport {
    /// `true` if every partial agrees within the tolerance.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.max_abs_error <= self.tolerance
    }
}

fn evaluate<F>(f: &F, point: &[f64]) -> Result<f64, AutodiffError>
where
    F: for<'g> Fn(&[Var<'g>]) -> Result<Var<'g>, AutodiffError>,
{
    let graph = Graph::new();
    let inputs: Vec<Var<'_>> = point.iter().map(|&x| graph.var(x)).collect();
    Ok(f(&inputs)?.value())
}

/// Central-difference estimate `(f(x + h) - f(x - h)) / 2h` of every partial of `f` at `point`.
///
/// Fails if `f` leaves its domain at one of the shifted points.
pub fn numeric_gradient<F>(f: F, point: &[f64], step: f64) -> Result<Vec<f64>, AutodiffError>
where
    F: for<'g> Fn(&[Var<'g>]) -> Result<Var<'g>, AutodiffError>,
{
    let mut shifted = point.to_vec();
    let mut partials = Vec::with_capacity(point.len());
    for i in 0..point.len() {
        shifted[i] = point[i] + step;
        let ahead = evaluate(&f, &shifted)?;
        shifted[i] = point[i] - step;
        let behind = evaluate(&f, &shifted)?;
        shifted[i] = point[i];
        partials.push((ahead - behind) / (2.0 * step));
    }
    Ok(partials)
}

/// Forward value and every partial of `f` at `point`, from one backward sweep.
pub fn analytic_gradient<F>(f: F, point: &[f64]) -> Result<(f64, Vec<f64>), AutodiffError>
where
    F: for<'g> Fn(&[Var<'g>]) -> Result<Var<'g>, AutodiffError>,
{
    let graph = Graph::new();
    let inputs: Vec<Var<'_>> = point.iter().map(|&x| graph.var(x)).collect();
    let output = f(&inputs)?;
    output.backward_with(&mut NoopHook);
    Ok((output.value(), inputs.iter().map(Var::grad).collect()))
}

/// Compares [`analytic_gradient`] against [`numeric_gradient`] at `point`, using the step and
/// tolerance of `config`.
pub fn check_gradient<F>(
    f: F,
    point: &[f64],
    config: &GradCheckConfig,
) -> Result<GradCheckReport, AutodiffError>
where
    F: for<'g> Fn(&[Var<'g>]) -> Result<Var<'g>, AutodiffError>,
{
    let (value, analytic) = analytic_gradient(&f, point)?;
    let numeric = numeric_gradient(&f, point, config.step)?;
    let max_abs_error = analytic
        .iter()
        .zip(&numeric)
        .map(|(a, n)| (a - n).abs())
        .fold(0.0, f64::max);
    debug!("gradcheck at {point:?}: max abs error {max_abs_error:e}");
    Ok(GradCheckReport {
        point: point.to_vec(),
        value,
        analytic,
        numeric,
        max_abs_error,
        tolerance: config.tolerance,
    })
}

/// `config.samples` reproducible points of `arity` coordinates, each drawn uniformly from
/// `[config.lower, config.upper)` with an RNG seeded from `config.seed`.
pub fn sample_points(config: &GradCheckConfig, arity: usize) -> Result<Vec<Vec<f64>>, ConfigError> {
    config.validate()?;
    let uniform = Uniform::new(config.lower, config.upper)
        .map_err(|e| ConfigError::Validation(format!("sampling interval: {e}")))?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    Ok((0..config.samples)
        .map(|_| (0..arity).map(|_| uniform.sample(&mut rng)).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_gradient_of_product() {
        let partials = numeric_gradient(|v| Ok(v[0] * v[1]), &[3.0, -2.0], 1e-6).unwrap();
        assert!((partials[0] + 2.0).abs() < 1e-6);
        assert!((partials[1] - 3.0).abs() < 1e-6);
    }

    #[test]
    fn analytic_gradient_reports_value() {
        let (value, grads) = analytic_gradient(|v| v[0].pow(3.0), &[2.0]).unwrap();
        assert_eq!(value, 8.0);
        assert_eq!(grads, vec![12.0]);
    }

    #[test]
    fn check_gradient_passes_for_correct_rules() {
        let config = GradCheckConfig::default();
        let report = check_gradient(|v| Ok(v[0].exp()? * v[1].cos()?), &[0.4, 1.1], &config)
            .unwrap();
        assert!(report.passed(), "{report:?}");
        assert_eq!(report.point, vec![0.4, 1.1]);
        assert_eq!(report.analytic.len(), 2);
    }

    #[test]
    fn check_gradient_fails_with_zero_tolerance_for_curved_functions() {
        let config = GradCheckConfig {
            tolerance: 0.0,
            step: 1e-2,
            ..GradCheckConfig::default()
        };
        let report = check_gradient(|v| v[0].pow(3.0), &[1.0], &config).unwrap();
        assert!(report.max_abs_error > 0.0);
        assert!(!report.passed());
    }

    #[test]
    fn check_gradient_propagates_domain_errors() {
        let config = GradCheckConfig::default();
        let err = check_gradient(|v| v[0].ln(), &[-1.0], &config).unwrap_err();
        assert_eq!(err.op(), "log");
    }

    #[test]
    fn sample_points_is_reproducible_and_bounded() {
        let config = GradCheckConfig::default();
        let a = sample_points(&config, 3).unwrap();
        let b = sample_points(&config, 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), config.samples);
        for point in &a {
            assert_eq!(point.len(), 3);
            assert!(point
                .iter()
                .all(|&x| x >= config.lower && x < config.upper));
        }
    }

    #[test]
    fn sample_points_depends_on_seed() {
        let a = sample_points(&GradCheckConfig::default(), 2).unwrap();
        let b = sample_points(
            &GradCheckConfig {
                seed: 7,
                ..GradCheckConfig::default()
            },
            2,
        )
        .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn sample_points_rejects_invalid_config() {
        let config = GradCheckConfig {
            lower: 1.0,
            upper: -1.0,
            ..GradCheckConfig::default()
        };
        assert!(matches!(
            sample_points(&config, 1),
            Err(ConfigError::Validation(_))
        ));
    }
}
