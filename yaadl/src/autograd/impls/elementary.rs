//! [`Elementary`] for `f64` (plain math) and for [`Var`] (recorded, fallible).

use super::op::UnaryFn;
use super::var::Var;
use crate::autograd::{AutodiffError, Elementary};

macro_rules! delegate_unary {
    (|$x:ident, $func:ident| $body:expr; $($method:ident => $variant:ident),* $(,)?) => {
        $(
            fn $method(self) -> Self::Output {
                let ($x, $func) = (self, UnaryFn::$variant);
                $body
            }
        )*
    };
}

impl Elementary for f64 {
    type Output = f64;

    fn pow(self, exponent: f64) -> f64 {
        self.powf(exponent)
    }

    fn root(self, degree: f64) -> f64 {
        self.powf(degree.recip())
    }

    fn log_base(self, base: f64) -> f64 {
        self.ln() / base.ln()
    }

    delegate_unary!(|x, func| func.apply(x);
        ln => Ln, exp => Exp, abs => Abs,
        sin => Sin, cos => Cos, tan => Tan, asin => Asin, acos => Acos, atan => Atan,
        sinh => Sinh, cosh => Cosh, tanh => Tanh, asinh => Asinh, acosh => Acosh, atanh => Atanh,
        erf => Erf, erfc => Erfc, erfinv => ErfInv, erfcinv => ErfcInv,
    );
}

impl<'g> Elementary for Var<'g> {
    type Output = Result<Var<'g>, AutodiffError>;

    fn pow(self, exponent: f64) -> Self::Output {
        Var::pow(self, exponent)
    }

    fn root(self, degree: f64) -> Self::Output {
        Var::root(self, degree)
    }

    fn log_base(self, base: f64) -> Self::Output {
        Var::log_base(self, base)
    }

    delegate_unary!(|x, func| x.apply_unary(func);
        ln => Ln, exp => Exp, abs => Abs,
        sin => Sin, cos => Cos, tan => Tan, asin => Asin, acos => Acos, atan => Atan,
        sinh => Sinh, cosh => Cosh, tanh => Tanh, asinh => Asinh, acosh => Acosh, atanh => Atanh,
        erf => Erf, erfc => Erfc, erfinv => ErfInv, erfcinv => ErfcInv,
    );
}

impl<'g> Elementary for &Var<'g> {
    type Output = Result<Var<'g>, AutodiffError>;

    fn pow(self, exponent: f64) -> Self::Output {
        Var::pow(*self, exponent)
    }

    fn root(self, degree: f64) -> Self::Output {
        Var::root(*self, degree)
    }

    fn log_base(self, base: f64) -> Self::Output {
        Var::log_base(*self, base)
    }

    delegate_unary!(|x, func| x.apply_unary(func);
        ln => Ln, exp => Exp, abs => Abs,
        sin => Sin, cos => Cos, tan => Tan, asin => Asin, acos => Acos, atan => Atan,
        sinh => Sinh, cosh => Cosh, tanh => Tanh, asinh => Asinh, acosh => Acosh, atanh => Atanh,
        erf => Erf, erfc => Erfc, erfinv => ErfInv, erfcinv => ErfcInv,
    );
}
