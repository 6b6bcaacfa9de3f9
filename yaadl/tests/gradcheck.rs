//! Every primitive's backward rule against central finite differences.

use rstest::rstest;
use yaadl::config::GradCheckConfig;
use yaadl::gradcheck::{check_gradient, sample_points};
use yaadl::{AutodiffError, Var};

type Expr = for<'g> fn(&[Var<'g>]) -> Result<Var<'g>, AutodiffError>;

fn add<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    Ok(v[0] + v[1])
}

fn sub<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    Ok(v[0] - v[1])
}

fn mul<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    Ok(v[0] * v[1])
}

fn div<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0] / v[1]
}

fn neg<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    Ok(-v[0])
}

fn cube<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].pow(3.0)
}

fn fractional_power<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].pow(1.5)
}

fn cube_root<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].root(3.0)
}

fn log_base_two<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].log_base(2.0)
}

fn ln<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].ln()
}

fn exp<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].exp()
}

fn abs<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].abs()
}

fn sin<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].sin()
}

fn cos<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].cos()
}

fn tan<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].tan()
}

fn asin<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].asin()
}

fn acos<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].acos()
}

fn atan<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].atan()
}

fn sinh<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].sinh()
}

fn cosh<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].cosh()
}

fn tanh<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].tanh()
}

fn asinh<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].asinh()
}

fn acosh<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].acosh()
}

fn atanh<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].atanh()
}

fn erf<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].erf()
}

fn erfc<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].erfc()
}

fn erfinv<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].erfinv()
}

fn erfcinv<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    v[0].erfcinv()
}

fn config() -> GradCheckConfig {
    GradCheckConfig::default()
}

#[rstest]
#[case::add(add as Expr, &[1.5, -0.7])]
#[case::sub(sub as Expr, &[1.5, -0.7])]
#[case::mul(mul as Expr, &[1.5, -0.7])]
#[case::div(div as Expr, &[1.5, -0.7])]
#[case::div_small(div as Expr, &[-0.2, 3.0])]
#[case::neg(neg as Expr, &[0.4])]
#[case::cube_positive(cube as Expr, &[1.3])]
#[case::cube_negative(cube as Expr, &[-0.8])]
#[case::fractional_power(fractional_power as Expr, &[2.2])]
#[case::cube_root(cube_root as Expr, &[5.0])]
#[case::log_base_two(log_base_two as Expr, &[3.5])]
#[case::ln(ln as Expr, &[0.6])]
#[case::ln_large(ln as Expr, &[12.0])]
#[case::exp(exp as Expr, &[-1.2])]
#[case::abs_positive(abs as Expr, &[0.9])]
#[case::abs_negative(abs as Expr, &[-0.9])]
#[case::sin(sin as Expr, &[0.3])]
#[case::sin_far(sin as Expr, &[4.0])]
#[case::cos(cos as Expr, &[0.3])]
#[case::cos_far(cos as Expr, &[-2.5])]
#[case::tan(tan as Expr, &[0.3])]
#[case::asin(asin as Expr, &[0.3])]
#[case::asin_negative(asin as Expr, &[-0.6])]
#[case::acos(acos as Expr, &[0.3])]
#[case::atan(atan as Expr, &[2.0])]
#[case::sinh(sinh as Expr, &[0.3])]
#[case::cosh(cosh as Expr, &[-1.1])]
#[case::tanh(tanh as Expr, &[0.3])]
#[case::asinh(asinh as Expr, &[-1.7])]
#[case::acosh(acosh as Expr, &[1.8])]
#[case::atanh(atanh as Expr, &[0.3])]
#[case::erf(erf as Expr, &[0.3])]
#[case::erf_tail(erf as Expr, &[-1.4])]
#[case::erfc(erfc as Expr, &[0.3])]
#[case::erfinv(erfinv as Expr, &[0.3])]
#[case::erfinv_negative(erfinv as Expr, &[-0.5])]
#[case::erfcinv(erfcinv as Expr, &[0.3])]
#[case::erfcinv_upper(erfcinv as Expr, &[1.6])]
fn primitive_matches_finite_differences(#[case] f: Expr, #[case] point: &[f64]) {
    let report = check_gradient(f, point, &config()).unwrap();
    assert!(report.passed(), "{report:?}");
}

fn composite<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    let (x, y) = (v[0], v[1]);
    let shifted = y + 2.0;
    Ok((x.sin()? * shifted / x.exp()?)? + x * x * y - y.tanh()?.pow(2.0)?)
}

fn shared_chain<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    let x = v[0];
    let h = x.cos()? * x;
    Ok(h * h + h.atan()?)
}

#[rstest]
fn composites_match_on_sampled_points(#[values(composite as Expr, shared_chain as Expr)] f: Expr) {
    let config = config();
    for point in sample_points(&config, 2).unwrap() {
        let report = check_gradient(f, &point, &config).unwrap();
        assert!(report.passed(), "{report:?}");
    }
}

#[rstest]
#[case::log_of_zero(ln as Expr, &[0.0])]
#[case::asin_above_one(asin as Expr, &[1.2])]
#[case::acos_below_minus_one(acos as Expr, &[-1.2])]
#[case::acosh_below_one(acosh as Expr, &[0.5])]
#[case::asin_at_one(asin as Expr, &[1.0])]
#[case::acos_at_minus_one(acos as Expr, &[-1.0])]
#[case::acosh_at_one(acosh as Expr, &[1.0])]
#[case::erfcinv_at_two(erfcinv as Expr, &[2.0])]
fn domain_errors_surface_through_gradcheck(#[case] f: Expr, #[case] point: &[f64]) {
    let err = check_gradient(f, point, &config()).unwrap_err();
    assert!(matches!(err, AutodiffError::Domain { .. }), "{err}");
}
