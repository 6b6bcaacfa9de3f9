//! Autograd: scalar reverse-mode automatic differentiation over a recorded graph.
//!
//! Expressions are built eagerly: every primitive on a [`Var`] computes its value at once and
//! records a node in the owning [`Graph`]. [`Var::backward`] then sorts the reachable nodes
//! topologically and pushes the output's gradient back to every input with the chain rule.
//!
//! Gradients accumulate across sweeps; call [`Graph::zero_grad`] (or [`Var::zero_grad`]
//! per node) before re-running a sweep if fresh derivatives are wanted.

mod error;
pub mod functions;
mod hook;
mod impls;

pub use error::AutodiffError;
pub use hook::{BackwardHook, LogHook, NoopHook};
pub use impls::graph::{Graph, NodeId, NodeView};
pub use impls::op::UnaryFn;
pub use impls::var::Var;

/// Elementary functions shared by plain `f64` and [`Var`].
///
/// Lets numeric code be written once and run either on floats (`Output = f64`) or on graph
/// nodes (`Output = Result<Var, AutodiffError>`). The free functions in [`functions`] are thin
/// wrappers over this trait.
pub trait Elementary: Sized {
    /// Result of every operation.
    type Output;

    /// `self^exponent`.
    #[must_use]
    fn pow(self, exponent: f64) -> Self::Output;

    /// `self^(1/degree)`.
    #[must_use]
    fn root(self, degree: f64) -> Self::Output;

    /// Logarithm in the given base.
    #[must_use]
    fn log_base(self, base: f64) -> Self::Output;

    /// Natural logarithm.
    #[must_use]
    fn ln(self) -> Self::Output;

    /// Returns `e^self`.
    #[must_use]
    fn exp(self) -> Self::Output;

    /// Returns `|self|`.
    #[must_use]
    fn abs(self) -> Self::Output;

    /// Returns `sin(self)`.
    #[must_use]
    fn sin(self) -> Self::Output;

    /// Returns `cos(self)`.
    #[must_use]
    fn cos(self) -> Self::Output;

    /// Returns `tan(self)`.
    #[must_use]
    fn tan(self) -> Self::Output;

    /// Returns the inverse sine of `self`.
    #[must_use]
    fn asin(self) -> Self::Output;

    /// Returns the inverse cosine of `self`.
    #[must_use]
    fn acos(self) -> Self::Output;

    /// Returns the inverse tangent of `self`.
    #[must_use]
    fn atan(self) -> Self::Output;

    /// Returns `sinh(self)`.
    #[must_use]
    fn sinh(self) -> Self::Output;

    /// Returns `cosh(self)`.
    #[must_use]
    fn cosh(self) -> Self::Output;

    /// Returns `tanh(self)`.
    #[must_use]
    fn tanh(self) -> Self::Output;

    /// Returns the inverse hyperbolic sine of `self`.
    #[must_use]
    fn asinh(self) -> Self::Output;

    /// Returns the inverse hyperbolic cosine of `self`.
    #[must_use]
    fn acosh(self) -> Self::Output;

    /// Returns the inverse hyperbolic tangent of `self`.
    #[must_use]
    fn atanh(self) -> Self::Output;

    /// Returns the error function of `self`.
    #[must_use]
    fn erf(self) -> Self::Output;

    /// Returns the complementary error function of `self`.
    #[must_use]
    fn erfc(self) -> Self::Output;

    /// Returns the inverse error function of `self`.
    #[must_use]
    fn erfinv(self) -> Self::Output;

    /// Returns the inverse complementary error function of `self`.
    #[must_use]
    fn erfcinv(self) -> Self::Output;
}
