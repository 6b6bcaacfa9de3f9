//! # yaadl demo
//!
//! Runs the reference expressions through the reverse-mode engine and prints every value and
//! gradient, then cross-checks one of them against finite differences and forward-mode duals.
//!
//! ```text
//! cargo run -- [graph.dot]
//! ```
//!
//! With a path argument the graph of the last expression is written there in DOT format.
//! Set `RUST_LOG=trace` to see each node the backward sweep visits; `YAADL_GRADCHECK_*`
//! variables tune the finite-difference check.

use std::error::Error;

use log::info;
use yaadl::config;
use yaadl::dual::{derivative, Dual};
use yaadl::functions::{erf, erfc, erfcinv, erfinv, exp, log, root, sin};
use yaadl::gradcheck::{check_gradient, sample_points};
use yaadl::viz::ToDot;
use yaadl::{AutodiffError, Graph, Var};

fn report(title: &str, output: &Var<'_>, inputs: &[(&str, Var<'_>)]) {
    println!("{title}");
    println!("  f = {:.6}", output.value());
    for (name, var) in inputs {
        println!("  df/d{name} = {:.6}", var.grad());
    }
}

fn scenarios(dot_path: Option<&str>) -> Result<(), Box<dyn Error>> {
    let g = Graph::new();
    let (x, y, z) = (g.named("x", 5.0), g.named("y", -1.0), g.named("z", 7.0));
    let f = ((x * y - z) / (y * z))?;
    f.backward();
    report("((x*y) - z) / (y*z)", &f, &[("x", x), ("y", y), ("z", z)]);

    let g = Graph::new();
    let (x1, x2) = (g.named("x1", 2.0), g.named("x2", 5.0));
    let f = log(x1)? + x1 * x2 - sin(x2)?;
    f.backward();
    report("log(x1) + x1*x2 - sin(x2)", &f, &[("x1", x1), ("x2", x2)]);

    let g = Graph::new();
    let (x, y) = (g.named("x", 1.1), g.named("y", 1.3));
    let f = ((exp(x * y)? - x) / log(y)?)?;
    f.backward();
    report("(exp(x*y) - x) / log(y)", &f, &[("x", x), ("y", y)]);

    let g = Graph::new();
    let (x, y) = (g.named("x", 8.0), g.named("y", 2.0));
    let f = (x + y).pow(3.0)? - root(x - y, 2.0)?;
    f.backward();
    report("(x + y)**3 - root(x - y, 2)", &f, &[("x", x), ("y", y)]);

    let g = Graph::new();
    let x = g.named("x", 0.1);
    let f = ((erf(x)? - erfc(x)? * erfinv(x)?) / erfcinv(x)?)?;
    f.backward();
    report("(erf(x) - erfc(x)*erfinv(x)) / erfcinv(x)", &f, &[("x", x)]);

    if let Some(path) = dot_path {
        std::fs::write(path, f.to_dot())?;
        info!("wrote graph of {} nodes to {path}", g.len());
    }
    Ok(())
}

fn log_product_sine<'g>(v: &[Var<'g>]) -> Result<Var<'g>, AutodiffError> {
    Ok(log(v[0])? + v[0] * v[1] - sin(v[1])?)
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let dot_path = std::env::args().nth(1);
    scenarios(dot_path.as_deref())?;

    // Finite-difference check on shifted sample points (log needs a positive operand).
    let config = config::from_env()?;
    let mut passed = 0;
    let points = sample_points(&config, 2)?;
    for point in &points {
        let shifted = [point[0] + 2.0, point[1]];
        let report = check_gradient(log_product_sine, &shifted, &config)?;
        if report.passed() {
            passed += 1;
        } else {
            println!("gradcheck mismatch: {report:?}");
        }
    }
    println!(
        "gradcheck: {passed}/{} points within {:e}",
        points.len(),
        config.tolerance
    );

    // Forward mode agrees with the reverse sweep on d/dx1 of the second expression.
    let (value, slope) = derivative(
        |x1| x1.ln() + x1 * Dual::constant(5.0) - Dual::constant(5.0).sin(),
        2.0,
    );
    println!("dual: f = {}", Dual::new(value, slope));
    Ok(())
}
