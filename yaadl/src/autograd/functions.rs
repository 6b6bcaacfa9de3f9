//! Free-function spellings of the primitives, so expressions read like ordinary math:
//! `sin(x)` instead of `x.sin()`.
//!
//! Every function is generic over [`Elementary`] and therefore works on `f64`, [`Var`] and
//! `&Var` alike.
//!
//! ```
//! use yaadl::functions::{exp, ln};
//! use yaadl::Graph;
//!
//! let g = Graph::new();
//! let (x, y) = (g.var(1.1), g.var(1.3));
//! let f = ((exp(x * y)? - x) / ln(y)?)?;
//! f.backward();
//! assert!((x.grad() - 16.8937).abs() < 1e-4);
//!
//! // the same spelling on plain floats
//! assert!((exp(0.0_f64) - 1.0).abs() < 1e-12);
//! # Ok::<(), yaadl::AutodiffError>(())
//! ```
//!
//! [`Var`]: crate::autograd::Var

use super::Elementary;

macro_rules! free_unary {
    ($($(#[$doc:meta])* $name:ident;)*) => {
        $(
            $(#[$doc])*
            #[must_use]
            pub fn $name<T: Elementary>(x: T) -> T::Output {
                x.$name()
            }
        )*
    };
}

free_unary! {
    /// Natural logarithm.
    ln;
    /// Exponential.
    exp;
    /// Absolute value.
    abs;
    /// Sine.
    sin;
    /// Cosine.
    cos;
    /// Tangent.
    tan;
    /// Inverse sine.
    asin;
    /// Inverse cosine.
    acos;
    /// Inverse tangent.
    atan;
    /// Hyperbolic sine.
    sinh;
    /// Hyperbolic cosine.
    cosh;
    /// Hyperbolic tangent.
    tanh;
    /// Inverse hyperbolic sine.
    asinh;
    /// Inverse hyperbolic cosine.
    acosh;
    /// Inverse hyperbolic tangent.
    atanh;
    /// Error function.
    erf;
    /// Complementary error function.
    erfc;
    /// Inverse error function.
    erfinv;
    /// Inverse complementary error function.
    erfcinv;
}

/// Natural logarithm; same as [`ln`].
#[must_use]
pub fn log<T: Elementary>(x: T) -> T::Output {
    x.ln()
}

/// `x^exponent`.
#[must_use]
pub fn pow<T: Elementary>(x: T, exponent: f64) -> T::Output {
    x.pow(exponent)
}

/// `x^(1/degree)`.
#[must_use]
pub fn root<T: Elementary>(x: T, degree: f64) -> T::Output {
    x.root(degree)
}

/// Square root.
#[must_use]
pub fn sqrt<T: Elementary>(x: T) -> T::Output {
    x.root(2.0)
}

/// Logarithm of `x` in `base`.
#[must_use]
pub fn log_base<T: Elementary>(x: T, base: f64) -> T::Output {
    x.log_base(base)
}
