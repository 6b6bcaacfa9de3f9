//! Arena-backed computation graph: node storage, topological ordering, and the reverse sweep.

use std::cell::RefCell;
use std::fmt;

use log::debug;

use super::op::Op;
use super::var::Var;
use crate::autograd::BackwardHook;

/// Stable index of a node inside its [`Graph`]; doubles as the node's identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        NodeId(index)
    }

    /// Position of the node in the arena (creation order).
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Internal node record. `value` and `op` are fixed at creation; only `grad` changes.
struct Node {
    value: f64,
    grad: f64,
    op: Op,
    name: Option<String>,
}

/// Owned snapshot of one node, handed to hooks and exporters.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeView {
    /// Identity of the node.
    pub id: NodeId,
    /// User-supplied name, or `v{index}`.
    pub name: String,
    /// Forward value.
    pub value: f64,
    /// Accumulated gradient at the time of the snapshot.
    pub gradient: f64,
    /// Operator label (`"+"`, `"**3"`, `"sin"`, ...); empty for leaves.
    pub label: String,
    /// Direct inputs, deduplicated.
    pub parents: Vec<NodeId>,
}

impl NodeView {
    fn capture(nodes: &[Node], id: NodeId) -> Self {
        let node = &nodes[id.0];
        NodeView {
            id,
            name: node.name.clone().unwrap_or_else(|| id.to_string()),
            value: node.value,
            gradient: node.grad,
            label: node.op.label(),
            parents: node.op.parents().collect(),
        }
    }

    /// `true` when the node has no parents.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.parents.is_empty()
    }
}

impl fmt::Display for NodeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Variable(data={}, grad={}, op={})",
            self.value, self.gradient, self.label
        )
    }
}

/// A dynamically recorded expression graph.
///
/// Nodes live in an append-only arena and refer to their parents by [`NodeId`], so the graph
/// is a DAG by construction and needs no reference counting. Build expressions through the
/// [`Var`] handles returned by [`Graph::var`]; every handle borrows the graph it came from.
///
/// The graph is single-threaded (`!Sync`). Backward sweeps over one graph are serialized by
/// the borrow checker and the interior `RefCell`.
#[derive(Default)]
pub struct Graph {
    nodes: RefCell<Vec<Node>>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a leaf node with the given value and zero gradient.
    pub fn var(&self, value: f64) -> Var<'_> {
        let id = self.push(value, Op::Leaf, None);
        Var::from_parts(self, id)
    }

    /// Records a leaf node carrying a display name (used by diagnostics and DOT export).
    pub fn named(&self, name: impl Into<String>, value: f64) -> Var<'_> {
        let id = self.push(value, Op::Leaf, Some(name.into()));
        Var::from_parts(self, id)
    }

    /// Number of nodes recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// `true` if no node has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.borrow().is_empty()
    }

    /// Snapshot of a node, or `None` if `id` was not issued by this graph.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<NodeView> {
        let nodes = self.nodes.borrow();
        (id.0 < nodes.len()).then(|| NodeView::capture(&nodes, id))
    }

    /// Resets every gradient in the graph to zero.
    pub fn zero_grad(&self) {
        for node in self.nodes.borrow_mut().iter_mut() {
            node.grad = 0.0;
        }
    }

    pub(crate) fn record(&self, value: f64, op: Op) -> NodeId {
        self.push(value, op, None)
    }

    fn push(&self, value: f64, op: Op, name: Option<String>) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node {
            value,
            grad: 0.0,
            op,
            name,
        });
        id
    }

    pub(crate) fn value(&self, id: NodeId) -> f64 {
        self.nodes.borrow()[id.0].value
    }

    pub(crate) fn grad(&self, id: NodeId) -> f64 {
        self.nodes.borrow()[id.0].grad
    }

    pub(crate) fn set_grad(&self, id: NodeId, grad: f64) {
        self.nodes.borrow_mut()[id.0].grad = grad;
    }

    pub(crate) fn op(&self, id: NodeId) -> Op {
        self.nodes.borrow()[id.0].op
    }

    pub(crate) fn snapshot(&self, id: NodeId) -> NodeView {
        NodeView::capture(&self.nodes.borrow(), id)
    }

    pub(crate) fn name(&self, id: NodeId) -> String {
        self.nodes.borrow()[id.0]
            .name
            .clone()
            .unwrap_or_else(|| id.to_string())
    }

    /// Every node reachable from `output`, each one after all of its parents.
    ///
    /// Depth-first post-order driven by an explicit stack, so arbitrarily deep expressions do
    /// not exhaust the call stack. `output` is always the last element.
    ///
    /// # Panics
    ///
    /// If `output` was not issued by this graph.
    #[must_use]
    pub fn topological_order(&self, output: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut visited = vec![false; nodes.len()];
        let mut order = Vec::new();
        let mut stack = vec![(output, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            if visited[id.0] {
                continue;
            }
            visited[id.0] = true;
            stack.push((id, true));
            for parent in nodes[id.0].op.parents() {
                if !visited[parent.0] {
                    stack.push((parent, false));
                }
            }
        }
        order
    }

    /// Reverse sweep from `output`, logging each node through [`LogHook`](crate::autograd::LogHook).
    ///
    /// # Panics
    ///
    /// If `output` was not issued by this graph.
    pub fn backward(&self, output: NodeId) {
        self.backward_with(output, &mut crate::autograd::LogHook);
    }

    /// Reverse sweep from `output`, reporting each visited node to `hook`.
    ///
    /// The output is seeded with `d output / d output = 1`, then nodes are visited in reverse
    /// topological order so that every node's gradient is complete before it is pushed into its
    /// parents. The contributions of this sweep are added on top of whatever the gradients
    /// already hold: two sweeps without [`zero_grad`](Graph::zero_grad) in between give twice
    /// the gradients of one.
    ///
    /// # Panics
    ///
    /// If `output` was not issued by this graph.
    pub fn backward_with<H>(&self, output: NodeId, hook: &mut H)
    where
        H: BackwardHook + ?Sized,
    {
        let order = self.topological_order(output);
        let enabled = hook.enabled();
        debug!("backward from {output}: {} reachable nodes", order.len());

        // Adjoints of this sweep only, indexed by node id.
        let mut adjoint = vec![0.0; self.len()];
        adjoint[output.0] = 1.0;

        for &id in order.iter().rev() {
            let snapshot = {
                let mut nodes = self.nodes.borrow_mut();
                let grad = adjoint[id.0];
                nodes[id.0].grad += grad;

                let node = &nodes[id.0];
                let slots = node.op.local_gradients(node.value, |p| nodes[p.0].value);
                for (parent, local) in slots.into_iter().flatten() {
                    adjoint[parent.0] += local * grad;
                }
                enabled.then(|| NodeView::capture(&nodes, id))
            };
            if let Some(view) = snapshot {
                hook.on_visit(&view);
            }
        }
        debug!("backward from {output} done");
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph").field("len", &self.len()).finish()
    }
}
