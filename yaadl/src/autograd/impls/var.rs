//! [`Var`]: the user-facing handle to a node, with arithmetic operators and primitive methods.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::ptr;

use super::graph::{Graph, NodeId, NodeView};
use super::op::{self, Op, UnaryFn};
use crate::autograd::{AutodiffError, BackwardHook};

/// Handle to a scalar node of a [`Graph`].
///
/// `Var` is `Copy`: it is an index plus a borrow of the graph, so expressions can reuse a
/// variable freely (`&x * &x`, `x * x`, `2.0 * x` all work). `+`, `-`, `*` and unary `-`
/// are total; `/` and every transcendental primitive return `Result` because they can leave
/// their domain.
///
/// # Panics
///
/// Binary operators panic when the operands come from two different graphs.
///
/// # Example
///
/// ```
/// use yaadl::Graph;
///
/// let g = Graph::new();
/// let x = g.var(2.0);
/// let y = g.var(5.0);
/// let f = x.ln()? + x * y - y.sin()?;
/// f.backward();
/// assert!((x.grad() - 5.5).abs() < 1e-9);
/// # Ok::<(), yaadl::AutodiffError>(())
/// ```
#[derive(Clone, Copy)]
pub struct Var<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> Var<'g> {
    pub(crate) fn from_parts(graph: &'g Graph, id: NodeId) -> Self {
        Var { graph, id }
    }

    /// Forward value. Fixed at construction.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.graph.value(self.id)
    }

    /// Gradient accumulated by backward sweeps so far.
    #[must_use]
    pub fn grad(&self) -> f64 {
        self.graph.grad(self.id)
    }

    /// Operator label of the primitive that produced this node; empty for leaves.
    #[must_use]
    pub fn label(&self) -> String {
        self.graph.op(self.id).label()
    }

    /// Identity of the node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display name: the name given to [`Graph::named`], else `v{index}`.
    #[must_use]
    pub fn name(&self) -> String {
        self.graph.name(self.id)
    }

    /// The graph this node lives in.
    #[must_use]
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Direct inputs, deduplicated.
    #[must_use]
    pub fn parents(&self) -> Vec<Var<'g>> {
        self.graph
            .op(self.id)
            .parents()
            .map(|id| Var::from_parts(self.graph, id))
            .collect()
    }

    /// `true` when the node has no parents.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self.graph.op(self.id), Op::Leaf)
    }

    /// Owned snapshot of this node.
    #[must_use]
    pub fn view(&self) -> NodeView {
        self.graph.snapshot(self.id)
    }

    /// A fresh leaf on the same graph, used to coerce literals.
    #[must_use]
    pub fn constant(&self, value: f64) -> Var<'g> {
        self.graph.var(value)
    }

    /// Resets this node's gradient to zero.
    pub fn zero_grad(&self) {
        self.graph.set_grad(self.id, 0.0);
    }

    /// Runs a backward sweep with this node as output; see [`Graph::backward_with`].
    pub fn backward(&self) {
        self.graph.backward(self.id);
    }

    /// Runs a backward sweep with this node as output, reporting visited nodes to `hook`.
    pub fn backward_with<H>(&self, hook: &mut H)
    where
        H: BackwardHook + ?Sized,
    {
        self.graph.backward_with(self.id, hook);
    }

    fn check_same_graph(&self, other: &Var<'g>) {
        assert!(
            ptr::eq(self.graph, other.graph),
            "operands {} and {} belong to different graphs",
            self.id,
            other.id
        );
    }

    pub(crate) fn apply_unary(self, func: UnaryFn) -> Result<Var<'g>, AutodiffError> {
        let value = func.eval(self.value())?;
        let id = self.graph.record(value, Op::Unary { func, arg: self.id });
        Ok(Var::from_parts(self.graph, id))
    }

    fn add_var(self, rhs: Var<'g>) -> Var<'g> {
        self.check_same_graph(&rhs);
        let value = self.value() + rhs.value();
        Var::from_parts(self.graph, self.graph.record(value, Op::Add(self.id, rhs.id)))
    }

    fn sub_var(self, rhs: Var<'g>) -> Var<'g> {
        self.check_same_graph(&rhs);
        let value = self.value() - rhs.value();
        Var::from_parts(self.graph, self.graph.record(value, Op::Sub(self.id, rhs.id)))
    }

    fn mul_var(self, rhs: Var<'g>) -> Var<'g> {
        self.check_same_graph(&rhs);
        let value = self.value() * rhs.value();
        Var::from_parts(self.graph, self.graph.record(value, Op::Mul(self.id, rhs.id)))
    }

    /// `self / rhs`, recorded as `self * rhs^-1`. A zero divisor is a domain error.
    fn div_var(self, rhs: Var<'g>) -> Result<Var<'g>, AutodiffError> {
        self.check_same_graph(&rhs);
        check_divisor(rhs.value())?;
        Ok(self.mul_var(rhs.pow(-1.0)?))
    }

    /// `self / rhs` for a literal divisor; nothing is recorded when the divisor is rejected.
    fn div_f64(self, rhs: f64) -> Result<Var<'g>, AutodiffError> {
        check_divisor(rhs)?;
        self.div_var(self.constant(rhs))
    }

    /// `lhs / self` for a literal dividend; nothing is recorded when `self` is rejected.
    fn rdiv_f64(self, lhs: f64) -> Result<Var<'g>, AutodiffError> {
        check_divisor(self.value())?;
        self.constant(lhs).div_var(self)
    }

    /// `self^exponent` for a constant exponent.
    ///
    /// # Errors
    ///
    /// - [`AutodiffError::InvalidOperand`] when `exponent` is not finite.
    /// - [`AutodiffError::Domain`] for a negative base with a fractional exponent, or a zero
    ///   base where the power or its derivative is singular.
    pub fn pow(self, exponent: f64) -> Result<Var<'g>, AutodiffError> {
        let value = op::power("pow", self.value(), exponent)?;
        let id = self.graph.record(
            value,
            Op::Pow {
                base: self.id,
                exponent,
            },
        );
        Ok(Var::from_parts(self.graph, id))
    }

    /// `self^(1/degree)`.
    ///
    /// # Errors
    ///
    /// [`AutodiffError::InvalidOperand`] for a zero or non-finite degree, otherwise the same
    /// domain rules as [`pow`](Var::pow).
    pub fn root(self, degree: f64) -> Result<Var<'g>, AutodiffError> {
        let value = op::root(self.value(), degree)?;
        let id = self.graph.record(
            value,
            Op::Root {
                base: self.id,
                degree,
            },
        );
        Ok(Var::from_parts(self.graph, id))
    }

    /// Square root, i.e. `root(2)`.
    ///
    /// # Errors
    ///
    /// See [`root`](Var::root).
    pub fn sqrt(self) -> Result<Var<'g>, AutodiffError> {
        self.root(2.0)
    }

    /// `log_base(self)`.
    ///
    /// # Errors
    ///
    /// [`AutodiffError::InvalidOperand`] for a base that is not finite, not positive, or one;
    /// [`AutodiffError::Domain`] when `self <= 0`.
    pub fn log_base(self, base: f64) -> Result<Var<'g>, AutodiffError> {
        let value = op::log_base(self.value(), base)?;
        let id = self.graph.record(value, Op::LogBase { arg: self.id, base });
        Ok(Var::from_parts(self.graph, id))
    }

    /// Natural logarithm. Fails with [`AutodiffError::Domain`] when `self <= 0`.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn ln(self) -> Result<Var<'g>, AutodiffError> {
        self.apply_unary(UnaryFn::Ln)
    }

    /// Alias of [`ln`](Var::ln).
    ///
    /// # Errors
    ///
    /// See [`ln`](Var::ln).
    pub fn log(self) -> Result<Var<'g>, AutodiffError> {
        self.ln()
    }

    /// `e^self`.
    ///
    /// # Errors
    ///
    /// Only for a NaN operand.
    pub fn exp(self) -> Result<Var<'g>, AutodiffError> {
        self.apply_unary(UnaryFn::Exp)
    }

    /// `|self|`. Fails at zero, where the derivative `|x|/x` is singular.
    ///
    /// # Errors
    ///
    /// [`AutodiffError::Domain`] when `self == 0`.
    pub fn abs(self) -> Result<Var<'g>, AutodiffError> {
        self.apply_unary(UnaryFn::Abs)
    }
}

/// Checks that `divisor^-1` can be recorded, before any node is pushed.
fn check_divisor(divisor: f64) -> Result<(), AutodiffError> {
    if divisor == 0.0 {
        return Err(AutodiffError::domain("div", divisor));
    }
    op::power("div", divisor, -1.0).map(|_| ())
}

macro_rules! unary_methods {
    ($($(#[$doc:meta])* $method:ident => $func:ident;)*) => {
        impl<'g> Var<'g> {
            $(
                $(#[$doc])*
                ///
                /// # Errors
                ///
                /// [`AutodiffError::Domain`] when the operand is outside the function's domain.
                pub fn $method(self) -> Result<Var<'g>, AutodiffError> {
                    self.apply_unary(UnaryFn::$func)
                }
            )*
        }
    };
}

unary_methods! {
    /// Sine.
    sin => Sin;
    /// Cosine.
    cos => Cos;
    /// Tangent.
    tan => Tan;
    /// Inverse sine, defined on `(-1, 1)`.
    asin => Asin;
    /// Inverse cosine, defined on `(-1, 1)`.
    acos => Acos;
    /// Inverse tangent.
    atan => Atan;
    /// Hyperbolic sine.
    sinh => Sinh;
    /// Hyperbolic cosine.
    cosh => Cosh;
    /// Hyperbolic tangent.
    tanh => Tanh;
    /// Inverse hyperbolic sine.
    asinh => Asinh;
    /// Inverse hyperbolic cosine, defined on `(1, inf)`.
    acosh => Acosh;
    /// Inverse hyperbolic tangent, defined on `(-1, 1)`.
    atanh => Atanh;
    /// Error function.
    erf => Erf;
    /// Complementary error function.
    erfc => Erfc;
    /// Inverse error function, defined on `(-1, 1)`.
    erfinv => ErfInv;
    /// Inverse complementary error function, defined on `(0, 2)`.
    erfcinv => ErfcInv;
}

impl fmt::Debug for Var<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("id", &self.id)
            .field("value", &self.value())
            .field("grad", &self.grad())
            .field("op", &self.label())
            .finish()
    }
}

impl fmt::Display for Var<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.view().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// std::ops: x + y, x - y, x * y, x / y, -x, with f64 literals on either side
// -----------------------------------------------------------------------------

/// Result of `/`, the only arithmetic operator that can fail.
type Quotient<'g> = Result<Var<'g>, AutodiffError>;

macro_rules! binary_op {
    ($trait:ident, $method:ident, $inner:ident, $out:ident) => {
        impl<'g> $trait<Var<'g>> for Var<'g> {
            type Output = $out<'g>;

            fn $method(self, rhs: Var<'g>) -> $out<'g> {
                self.$inner(rhs)
            }
        }

        impl<'a, 'g> $trait<&'a Var<'g>> for Var<'g> {
            type Output = $out<'g>;

            fn $method(self, rhs: &'a Var<'g>) -> $out<'g> {
                self.$inner(*rhs)
            }
        }

        impl<'a, 'g> $trait<Var<'g>> for &'a Var<'g> {
            type Output = $out<'g>;

            fn $method(self, rhs: Var<'g>) -> $out<'g> {
                (*self).$inner(rhs)
            }
        }

        impl<'a, 'b, 'g> $trait<&'b Var<'g>> for &'a Var<'g> {
            type Output = $out<'g>;

            fn $method(self, rhs: &'b Var<'g>) -> $out<'g> {
                (*self).$inner(*rhs)
            }
        }
    };
}

macro_rules! scalar_op {
    ($trait:ident, $method:ident, $inner:ident) => {
        impl<'g> $trait<f64> for Var<'g> {
            type Output = Var<'g>;

            fn $method(self, rhs: f64) -> Var<'g> {
                let rhs = self.constant(rhs);
                self.$inner(rhs)
            }
        }

        impl<'a, 'g> $trait<f64> for &'a Var<'g> {
            type Output = Var<'g>;

            fn $method(self, rhs: f64) -> Var<'g> {
                let rhs = self.constant(rhs);
                (*self).$inner(rhs)
            }
        }

        impl<'g> $trait<Var<'g>> for f64 {
            type Output = Var<'g>;

            fn $method(self, rhs: Var<'g>) -> Var<'g> {
                rhs.constant(self).$inner(rhs)
            }
        }

        impl<'a, 'g> $trait<&'a Var<'g>> for f64 {
            type Output = Var<'g>;

            fn $method(self, rhs: &'a Var<'g>) -> Var<'g> {
                rhs.constant(self).$inner(*rhs)
            }
        }
    };
}

binary_op!(Add, add, add_var, Var);
binary_op!(Sub, sub, sub_var, Var);
binary_op!(Mul, mul, mul_var, Var);
binary_op!(Div, div, div_var, Quotient);
scalar_op!(Add, add, add_var);
scalar_op!(Sub, sub, sub_var);
scalar_op!(Mul, mul, mul_var);

impl<'g> Div<f64> for Var<'g> {
    type Output = Quotient<'g>;

    fn div(self, rhs: f64) -> Quotient<'g> {
        self.div_f64(rhs)
    }
}

impl<'g> Div<f64> for &Var<'g> {
    type Output = Quotient<'g>;

    fn div(self, rhs: f64) -> Quotient<'g> {
        (*self).div_f64(rhs)
    }
}

impl<'g> Div<Var<'g>> for f64 {
    type Output = Quotient<'g>;

    fn div(self, rhs: Var<'g>) -> Quotient<'g> {
        rhs.rdiv_f64(self)
    }
}

impl<'g> Div<&Var<'g>> for f64 {
    type Output = Quotient<'g>;

    fn div(self, rhs: &Var<'g>) -> Quotient<'g> {
        rhs.rdiv_f64(self)
    }
}

impl<'g> Neg for Var<'g> {
    type Output = Var<'g>;

    /// Recorded as `self * -1`.
    fn neg(self) -> Var<'g> {
        let minus_one = self.constant(-1.0);
        self.mul_var(minus_one)
    }
}

impl<'g> Neg for &Var<'g> {
    type Output = Var<'g>;

    fn neg(self) -> Var<'g> {
        -*self
    }
}
