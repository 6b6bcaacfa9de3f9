//! Graphviz DOT export of a recorded expression.
//!
//! Every node reachable from the output becomes a `record` box showing its name, value and
//! gradient. A node produced by a primitive gets an extra ellipse carrying the operator label,
//! wired `parent -> operator -> node`. The export only reads the graph; render the text with
//! any Graphviz tool (`dot -Tsvg`).

use std::fmt::{self, Write};

use crate::autograd::{Graph, NodeId, NodeView, Var};

/// Renders a value as DOT text.
pub trait ToDot {
    fn to_dot(&self) -> String;
}

impl ToDot for Var<'_> {
    /// The sub-graph that produced this variable.
    fn to_dot(&self) -> String {
        to_dot(self.graph(), self.id())
    }
}

/// DOT text for every node reachable from `output`, in topological order.
///
/// # Panics
///
/// If `output` was not issued by `graph`.
#[must_use]
pub fn to_dot(graph: &Graph, output: NodeId) -> String {
    let mut dot = String::new();
    // fmt::Write for String never fails.
    let _ = write_dot(graph, output, &mut dot);
    dot
}

/// Streams the DOT text of [`to_dot`] into `out`.
///
/// # Panics
///
/// If `output` was not issued by `graph`.
pub fn write_dot<W: Write>(graph: &Graph, output: NodeId, out: &mut W) -> fmt::Result {
    let views: Vec<NodeView> = graph
        .topological_order(output)
        .into_iter()
        .filter_map(|id| graph.node(id))
        .collect();

    writeln!(out, "digraph {{")?;
    writeln!(out, "  rankdir=TB;")?;
    for view in &views {
        writeln!(
            out,
            "  {} [shape=record, label=\"{{ {} | value {:.4} | grad {:.4} }}\"];",
            view.id,
            escape(&view.name),
            view.value,
            view.gradient
        )?;
        if !view.label.is_empty() {
            writeln!(
                out,
                "  {}_op [label=\"{}\"];",
                view.id,
                escape(&view.label)
            )?;
            writeln!(out, "  {}_op -> {};", view.id, view.id)?;
        }
    }
    for view in &views {
        for parent in &view.parents {
            writeln!(out, "  {parent} -> {}_op;", view.id)?;
        }
    }
    writeln!(out, "}}")
}

/// Escapes characters that are special inside a quoted record label.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '"' | '\\' | '{' | '}' | '|' | '<' | '>') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
