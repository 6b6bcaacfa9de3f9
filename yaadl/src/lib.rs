//! # yaadl
//!
//! Yet another automatic differentiation library: scalar reverse-mode autodiff over an
//! arena-backed expression graph, plus forward-mode dual numbers, a finite-difference gradient
//! checker, and a DOT exporter for the recorded graph.

pub mod autograd;
pub mod config;
pub mod dual;
pub mod gradcheck;
pub mod viz;

pub use autograd::{
    functions, AutodiffError, BackwardHook, Elementary, Graph, LogHook, NodeId, NodeView,
    NoopHook, UnaryFn, Var,
};
pub use dual::Dual;
