//! Forward-mode differentiation with dual numbers.
//!
//! A [`Dual`] carries a value and its derivative along one direction. Seeding the input of
//! interest with [`Dual::variable`] and every other input with [`Dual::constant`] yields the
//! partial derivative in the dual part of the result. No graph is recorded, so this is the
//! cheap option for functions of one input.
//!
//! Unlike [`crate::Var`], duals follow IEEE semantics: leaving a domain produces NaN or an
//! infinity instead of an error.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// `real + dual·ε` with `ε² = 0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dual {
    /// Value.
    pub real: f64,
    /// Derivative along the seeded direction.
    pub dual: f64,
}

impl Dual {
    /// Dual number with explicit parts.
    #[must_use]
    pub const fn new(real: f64, dual: f64) -> Self {
        Dual { real, dual }
    }

    /// A quantity that does not vary with the seeded input.
    #[must_use]
    pub const fn constant(real: f64) -> Self {
        Dual { real, dual: 0.0 }
    }

    /// The seeded input itself (`d x / d x = 1`).
    #[must_use]
    pub const fn variable(real: f64) -> Self {
        Dual { real, dual: 1.0 }
    }

    #[must_use]
    pub fn pow(self, p: f64) -> Self {
        Dual::new(self.real.powf(p), p * self.dual * self.real.powf(p - 1.0))
    }

    /// `self^(1/p)`.
    #[must_use]
    pub fn root(self, p: f64) -> Self {
        let r = self.real.powf(p.recip());
        Dual::new(r, self.dual / (p * r.powf(p - 1.0)))
    }

    #[must_use]
    pub fn exp(self) -> Self {
        let e = self.real.exp();
        Dual::new(e, self.dual * e)
    }

    /// Natural logarithm.
    #[must_use]
    pub fn ln(self) -> Self {
        Dual::new(self.real.ln(), self.dual / self.real)
    }

    #[must_use]
    pub fn sin(self) -> Self {
        Dual::new(self.real.sin(), self.dual * self.real.cos())
    }

    #[must_use]
    pub fn cos(self) -> Self {
        Dual::new(self.real.cos(), -self.dual * self.real.sin())
    }

    #[must_use]
    pub fn tan(self) -> Self {
        Dual::new(self.real.tan(), self.dual / self.real.cos().powi(2))
    }

    #[must_use]
    pub fn sinh(self) -> Self {
        Dual::new(self.real.sinh(), self.dual * self.real.cosh())
    }

    #[must_use]
    pub fn cosh(self) -> Self {
        Dual::new(self.real.cosh(), self.dual * self.real.sinh())
    }

    #[must_use]
    pub fn tanh(self) -> Self {
        Dual::new(self.real.tanh(), self.dual / self.real.cosh().powi(2))
    }

    /// Absolute value. Both parts are negated when `real <= 0`, so the derivative at zero is
    /// taken from the left.
    #[must_use]
    pub fn abs(self) -> Self {
        if self.real > 0.0 {
            self
        } else {
            -self
        }
    }

    /// Rounds the real part up; the result is constant.
    #[must_use]
    pub fn ceil(self) -> Self {
        Dual::constant(self.real.ceil())
    }

    /// Rounds the real part down; the result is constant.
    #[must_use]
    pub fn floor(self) -> Self {
        Dual::constant(self.real.floor())
    }
}

/// Value and derivative of `f` at `x`.
///
/// ```
/// use yaadl::dual::derivative;
///
/// let (value, slope) = derivative(|x| x * x + 3.0 * x, 2.0);
/// assert_eq!((value, slope), (10.0, 7.0));
/// ```
pub fn derivative<F>(f: F, x: f64) -> (f64, f64)
where
    F: FnOnce(Dual) -> Dual,
{
    let y = f(Dual::variable(x));
    (y.real, y.dual)
}

impl From<f64> for Dual {
    fn from(real: f64) -> Self {
        Dual::constant(real)
    }
}

impl Add for Dual {
    type Output = Dual;

    fn add(self, rhs: Dual) -> Dual {
        Dual::new(self.real + rhs.real, self.dual + rhs.dual)
    }
}

impl Sub for Dual {
    type Output = Dual;

    fn sub(self, rhs: Dual) -> Dual {
        Dual::new(self.real - rhs.real, self.dual - rhs.dual)
    }
}

impl Mul for Dual {
    type Output = Dual;

    fn mul(self, rhs: Dual) -> Dual {
        Dual::new(
            self.real * rhs.real,
            self.dual * rhs.real + self.real * rhs.dual,
        )
    }
}

impl Div for Dual {
    type Output = Dual;

    fn div(self, rhs: Dual) -> Dual {
        Dual::new(
            self.real / rhs.real,
            (self.dual * rhs.real - self.real * rhs.dual) / (rhs.real * rhs.real),
        )
    }
}

impl Neg for Dual {
    type Output = Dual;

    fn neg(self) -> Dual {
        Dual::new(-self.real, -self.dual)
    }
}

macro_rules! scalar_ops {
    ($($trait:ident :: $method:ident),*) => {
        $(
            impl $trait<f64> for Dual {
                type Output = Dual;

                fn $method(self, rhs: f64) -> Dual {
                    $trait::$method(self, Dual::constant(rhs))
                }
            }

            impl $trait<Dual> for f64 {
                type Output = Dual;

                fn $method(self, rhs: Dual) -> Dual {
                    $trait::$method(Dual::constant(self), rhs)
                }
            }
        )*
    };
}

scalar_ops!(Add::add, Sub::sub, Mul::mul, Div::div);

// Ordering and equality look at the value only.
impl PartialEq for Dual {
    fn eq(&self, other: &Self) -> bool {
        self.real == other.real
    }
}

impl PartialOrd for Dual {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.real.partial_cmp(&other.real)
    }
}

impl fmt::Display for Dual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}ε", self.real, self.dual)
    }
}
