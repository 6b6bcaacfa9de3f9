//! Implementations: the arena graph, the primitive-operation table, and the `Var` handle.

mod elementary;
pub mod graph;
pub mod op;
pub mod var;
