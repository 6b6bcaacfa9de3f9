//! Primitive operations: forward evaluation, domain checks, and local derivative rules.
//!
//! Every node records one [`Op`]. The reverse sweep dispatches on it to push the node's
//! gradient into its parents, so the set of differentiable operations is closed and
//! exhaustively matched here.

use std::f64::consts::FRAC_2_SQRT_PI;
use std::fmt;

use statrs::function::erf;

use super::graph::NodeId;
use crate::autograd::AutodiffError;

/// Single-argument primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum UnaryFn {
    Ln,
    Exp,
    Abs,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Asinh,
    Acosh,
    Atanh,
    Erf,
    Erfc,
    ErfInv,
    ErfcInv,
}

impl UnaryFn {
    /// Operator label recorded on the result node.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            UnaryFn::Ln => "log",
            UnaryFn::Exp => "exp",
            UnaryFn::Abs => "abs",
            UnaryFn::Sin => "sin",
            UnaryFn::Cos => "cos",
            UnaryFn::Tan => "tan",
            UnaryFn::Asin => "arcsin",
            UnaryFn::Acos => "arccos",
            UnaryFn::Atan => "arctan",
            UnaryFn::Sinh => "sinh",
            UnaryFn::Cosh => "cosh",
            UnaryFn::Tanh => "tanh",
            UnaryFn::Asinh => "arcsinh",
            UnaryFn::Acosh => "arccosh",
            UnaryFn::Atanh => "arctanh",
            UnaryFn::Erf => "erf",
            UnaryFn::Erfc => "erfc",
            UnaryFn::ErfInv => "erfinv",
            UnaryFn::ErfcInv => "erfcinv",
        }
    }

    /// Whether `x` lies in the domain where both the function and its derivative are defined.
    fn accepts(self, x: f64) -> bool {
        match self {
            UnaryFn::Ln => x > 0.0,
            UnaryFn::Abs => x != 0.0,
            // the derivatives divide by sqrt(1 - x^2) and sqrt(x^2 - 1)
            UnaryFn::Asin | UnaryFn::Acos | UnaryFn::Atanh | UnaryFn::ErfInv => {
                x > -1.0 && x < 1.0
            }
            UnaryFn::Acosh => x > 1.0,
            UnaryFn::ErfcInv => x > 0.0 && x < 2.0,
            _ => true,
        }
    }

    /// Forward value, or [`AutodiffError::Domain`] when `x` is outside the domain.
    pub(crate) fn eval(self, x: f64) -> Result<f64, AutodiffError> {
        if !self.accepts(x) {
            return Err(AutodiffError::domain(self.name(), x));
        }
        let y = self.apply(x);
        if y.is_nan() {
            return Err(AutodiffError::domain(self.name(), x));
        }
        Ok(y)
    }

    /// Plain scalar evaluation without domain checks.
    pub(crate) fn apply(self, x: f64) -> f64 {
        match self {
            UnaryFn::Ln => x.ln(),
            UnaryFn::Exp => x.exp(),
            UnaryFn::Abs => x.abs(),
            UnaryFn::Sin => x.sin(),
            UnaryFn::Cos => x.cos(),
            UnaryFn::Tan => x.tan(),
            UnaryFn::Asin => x.asin(),
            UnaryFn::Acos => x.acos(),
            UnaryFn::Atan => x.atan(),
            UnaryFn::Sinh => x.sinh(),
            UnaryFn::Cosh => x.cosh(),
            UnaryFn::Tanh => x.tanh(),
            UnaryFn::Asinh => x.asinh(),
            UnaryFn::Acosh => x.acosh(),
            UnaryFn::Atanh => x.atanh(),
            UnaryFn::Erf => erf::erf(x),
            UnaryFn::Erfc => erf::erfc(x),
            UnaryFn::ErfInv => erf::erf_inv(x),
            UnaryFn::ErfcInv => erf::erfc_inv(x),
        }
    }

    /// dy/dx at operand `x`, where `y` is the already computed forward value.
    pub(crate) fn derivative(self, x: f64, y: f64) -> f64 {
        match self {
            UnaryFn::Ln => 1.0 / x,
            UnaryFn::Exp => y,
            UnaryFn::Abs => y / x,
            UnaryFn::Sin => x.cos(),
            UnaryFn::Cos => -x.sin(),
            UnaryFn::Tan => 1.0 / x.cos().powi(2),
            UnaryFn::Asin => 1.0 / (1.0 - x * x).sqrt(),
            UnaryFn::Acos => -1.0 / (1.0 - x * x).sqrt(),
            UnaryFn::Atan => 1.0 / (1.0 + x * x),
            UnaryFn::Sinh => x.cosh(),
            UnaryFn::Cosh => x.sinh(),
            UnaryFn::Tanh => 1.0 / x.cosh().powi(2),
            UnaryFn::Asinh => 1.0 / (1.0 + x * x).sqrt(),
            UnaryFn::Acosh => 1.0 / ((1.0 + x).sqrt() * (x - 1.0).sqrt()),
            UnaryFn::Atanh => 1.0 / (1.0 - x * x),
            UnaryFn::Erf => FRAC_2_SQRT_PI * (-x * x).exp(),
            UnaryFn::Erfc => -FRAC_2_SQRT_PI * (-x * x).exp(),
            // d/dx erfinv(x) = 1 / erf'(erfinv(x))
            UnaryFn::ErfInv => (y * y).exp() / FRAC_2_SQRT_PI,
            UnaryFn::ErfcInv => -(y * y).exp() / FRAC_2_SQRT_PI,
        }
    }
}

impl fmt::Display for UnaryFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a node was produced. Leaves carry [`Op::Leaf`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Op {
    Leaf,
    Add(NodeId, NodeId),
    Sub(NodeId, NodeId),
    Mul(NodeId, NodeId),
    Pow { base: NodeId, exponent: f64 },
    Root { base: NodeId, degree: f64 },
    LogBase { arg: NodeId, base: f64 },
    Unary { func: UnaryFn, arg: NodeId },
}

impl Op {
    /// Human-readable operator tag; empty for leaves.
    pub(crate) fn label(&self) -> String {
        match self {
            Op::Leaf => String::new(),
            Op::Add(..) => "+".to_string(),
            Op::Sub(..) => "-".to_string(),
            Op::Mul(..) => "*".to_string(),
            Op::Pow { exponent, .. } => format!("**{exponent}"),
            Op::Root { degree, .. } => format!("root{degree}"),
            Op::LogBase { base, .. } => format!("log{base}"),
            Op::Unary { func, .. } => func.name().to_string(),
        }
    }

    /// Direct inputs, deduplicated (`x * x` has a single parent).
    pub(crate) fn parents(&self) -> impl Iterator<Item = NodeId> {
        let pair = match *self {
            Op::Leaf => [None, None],
            Op::Add(a, b) | Op::Sub(a, b) | Op::Mul(a, b) => [Some(a), (a != b).then_some(b)],
            Op::Pow { base, .. } | Op::Root { base, .. } => [Some(base), None],
            Op::LogBase { arg, .. } | Op::Unary { arg, .. } => [Some(arg), None],
        };
        pair.into_iter().flatten()
    }

    /// Local partial derivatives `(parent, d out / d parent)` for every operand slot.
    ///
    /// Operand slots are not deduplicated: `x * x` yields two entries for `x`, which is what
    /// makes a doubly used node receive both contributions.
    pub(crate) fn local_gradients(
        &self,
        out: f64,
        value_of: impl Fn(NodeId) -> f64,
    ) -> [Option<(NodeId, f64)>; 2] {
        match *self {
            Op::Leaf => [None, None],
            Op::Add(a, b) => [Some((a, 1.0)), Some((b, 1.0))],
            Op::Sub(a, b) => [Some((a, 1.0)), Some((b, -1.0))],
            Op::Mul(a, b) => [Some((a, value_of(b))), Some((b, value_of(a)))],
            Op::Pow { base, exponent } => {
                [Some((base, power_derivative(value_of(base), exponent))), None]
            }
            Op::Root { base, degree } => {
                [Some((base, power_derivative(value_of(base), degree.recip()))), None]
            }
            Op::LogBase { arg, base } => [Some((arg, 1.0 / (value_of(arg) * base.ln()))), None],
            Op::Unary { func, arg } => [Some((arg, func.derivative(value_of(arg), out))), None],
        }
    }
}

/// `d/dx x^p = p * x^(p-1)`; a zero exponent has a zero derivative everywhere.
fn power_derivative(x: f64, p: f64) -> f64 {
    if p == 0.0 {
        0.0
    } else {
        p * x.powf(p - 1.0)
    }
}

/// Forward value of `x^p` with the checks shared by `pow` and `root`.
pub(crate) fn power(op: &'static str, x: f64, p: f64) -> Result<f64, AutodiffError> {
    if !p.is_finite() {
        return Err(AutodiffError::invalid(op, p, "exponent must be finite"));
    }
    if x < 0.0 && p.fract() != 0.0 {
        return Err(AutodiffError::domain(op, x));
    }
    // 0^p with p < 1 either blows up or has a singular derivative.
    if x == 0.0 && p < 1.0 && p != 0.0 {
        return Err(AutodiffError::domain(op, x));
    }
    let y = x.powf(p);
    if y.is_nan() {
        return Err(AutodiffError::domain(op, x));
    }
    Ok(y)
}

/// Forward value of `x^(1/n)`.
pub(crate) fn root(x: f64, degree: f64) -> Result<f64, AutodiffError> {
    if !degree.is_finite() || degree == 0.0 {
        return Err(AutodiffError::invalid(
            "root",
            degree,
            "degree must be finite and non-zero",
        ));
    }
    power("root", x, degree.recip())
}

/// Forward value of `log_b(x)`.
pub(crate) fn log_base(x: f64, base: f64) -> Result<f64, AutodiffError> {
    if !base.is_finite() || base <= 0.0 || base == 1.0 {
        return Err(AutodiffError::invalid(
            "log_base",
            base,
            "base must be finite, positive and not 1",
        ));
    }
    if x <= 0.0 || x.is_nan() {
        return Err(AutodiffError::domain("log_base", x));
    }
    Ok(x.ln() / base.ln())
}
