//! End-to-end expressions with known values and gradients.

use approx::assert_abs_diff_eq;
use yaadl::functions::{erf, erfc, erfcinv, erfinv, exp, log, root, sin};
use yaadl::{AutodiffError, Graph};

#[test]
fn quotient_of_products() -> Result<(), AutodiffError> {
    let g = Graph::new();
    let (x, y, z) = (g.var(5.0), g.var(-1.0), g.var(7.0));
    let f = ((x * y - z) / (y * z))?;
    f.backward();
    assert_abs_diff_eq!(f.value(), 1.71429, epsilon = 1e-5);
    assert_abs_diff_eq!(x.grad(), 0.142857, epsilon = 1e-6);
    assert_abs_diff_eq!(y.grad(), 1.0, epsilon = 1e-6);
    assert_abs_diff_eq!(z.grad(), -0.102041, epsilon = 1e-6);
    Ok(())
}

#[test]
fn log_plus_product_minus_sine() -> Result<(), AutodiffError> {
    let g = Graph::new();
    let (x1, x2) = (g.var(2.0), g.var(5.0));
    let f = log(x1)? + x1 * x2 - sin(x2)?;
    f.backward();
    assert_abs_diff_eq!(f.value(), 11.652, epsilon = 1e-3);
    assert_abs_diff_eq!(x1.grad(), 5.5, epsilon = 1e-9);
    assert_abs_diff_eq!(x2.grad(), 1.716, epsilon = 1e-3);
    Ok(())
}

#[test]
fn exponential_over_logarithm() -> Result<(), AutodiffError> {
    let g = Graph::new();
    let (x, y) = (g.var(1.1), g.var(1.3));
    let f = ((exp(x * y)? - x) / log(y)?)?;
    f.backward();
    assert_abs_diff_eq!(x.grad(), 16.8937, epsilon = 1e-4);
    assert_abs_diff_eq!(y.grad(), -16.8846, epsilon = 1e-4);
    Ok(())
}

#[test]
fn cube_minus_square_root() -> Result<(), AutodiffError> {
    let g = Graph::new();
    let (x, y) = (g.var(8.0), g.var(2.0));
    let f = (x + y).pow(3.0)? - root(x - y, 2.0)?;
    f.backward();
    assert_abs_diff_eq!(x.grad(), 299.796, epsilon = 1e-3);
    assert_abs_diff_eq!(y.grad(), 300.204, epsilon = 1e-3);
    Ok(())
}

#[test]
fn error_function_family() -> Result<(), AutodiffError> {
    let g = Graph::new();
    let x = g.var(0.1);
    let f = ((erf(x)? - erfc(x)? * erfinv(x)?) / erfcinv(x)?)?;
    f.backward();
    assert_abs_diff_eq!(x.grad(), 0.449368, epsilon = 1e-5);
    Ok(())
}

#[test]
fn gradients_double_after_second_sweep() -> Result<(), AutodiffError> {
    let g = Graph::new();
    let (x1, x2) = (g.var(2.0), g.var(5.0));
    let f = log(x1)? + x1 * x2 - sin(x2)?;
    f.backward();
    let once = [x1.grad(), x2.grad(), f.grad()];
    let value = f.value();
    f.backward();
    assert_eq!([x1.grad(), x2.grad(), f.grad()], once.map(|v| 2.0 * v));
    assert_eq!(f.value(), value);

    g.zero_grad();
    f.backward();
    assert_eq!([x1.grad(), x2.grad(), f.grad()], once);
    Ok(())
}

#[test]
fn failed_operation_leaves_gradients_untouched() -> Result<(), AutodiffError> {
    let g = Graph::new();
    let x = g.var(0.5);
    let f = x * x;
    f.backward();
    let nodes = g.len();

    for bad in [g.var(0.0), g.var(-2.0)] {
        assert!(matches!(bad.ln(), Err(AutodiffError::Domain { op: "log", .. })));
    }
    let outside = g.var(1.5);
    assert!(outside.asin().is_err());
    assert!(outside.acos().is_err());

    assert_eq!(g.len(), nodes + 3);
    assert_eq!(x.grad(), 1.0);
    assert_eq!(f.grad(), 1.0);
    Ok(())
}
