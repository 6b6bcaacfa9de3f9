//! Errors produced while building an expression graph.
//!
//! All errors from the autograd module use [`AutodiffError`]. They are raised eagerly, at the
//! point where a primitive operation evaluates its forward value, so a failed operation never
//! leaves a node in the graph and never touches any gradient.

use thiserror::Error;

/// Errors produced by primitive operations on [`Var`](super::Var).
///
/// # Variants
///
/// - **Domain**: The operand lies outside the mathematical domain of the function (e.g. `ln(0)`,
///   `asin(1.5)`, a zero divisor, `|x|` at `x = 0` whose derivative is singular).
///   *When*: In the primitive constructor, before the result node is recorded.
///   *Recovery*: None inside the engine; abandon the expression and rebuild it with valid inputs.
///
/// - **InvalidOperand**: A scalar constant that parameterises the operation is unusable
///   (non-finite exponent, zero root degree, log base that is not positive or equals one).
///   *When*: In `pow`, `root` or `log_base`, before the operand value is looked at.
///   *Recovery*: Fix the constant at the call site.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutodiffError {
    /// The operand value is outside the function's domain.
    #[error("domain error: {op} is undefined at {value}")]
    Domain {
        /// Operation name (e.g. `"log"`, `"asin"`).
        op: &'static str,
        /// The offending operand value.
        value: f64,
    },

    /// A constant parameter of the operation is invalid.
    #[error("invalid operand for {op}: {value} ({reason})")]
    InvalidOperand {
        /// Operation name (e.g. `"pow"`, `"root"`).
        op: &'static str,
        /// The offending constant.
        value: f64,
        /// Why the constant was rejected.
        reason: &'static str,
    },
}

impl AutodiffError {
    pub(crate) fn domain(op: &'static str, value: f64) -> Self {
        AutodiffError::Domain { op, value }
    }

    pub(crate) fn invalid(op: &'static str, value: f64, reason: &'static str) -> Self {
        AutodiffError::InvalidOperand { op, value, reason }
    }

    /// Name of the operation that failed.
    #[must_use]
    pub fn op(&self) -> &'static str {
        match self {
            AutodiffError::Domain { op, .. } | AutodiffError::InvalidOperand { op, .. } => op,
        }
    }

    /// The operand or constant that caused the failure.
    #[must_use]
    pub fn value(&self) -> f64 {
        match self {
            AutodiffError::Domain { value, .. } | AutodiffError::InvalidOperand { value, .. } => {
                *value
            }
        }
    }
}
