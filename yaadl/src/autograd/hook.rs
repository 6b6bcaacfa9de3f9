//! Observers for the backward sweep.
//!
//! A [`BackwardHook`] sees every node once, in the order the sweep visits it (output first,
//! leaves last), after the node's gradient has been fully accumulated for that sweep.

use log::{log_enabled, trace, Level};

use super::NodeView;

/// Receives a snapshot of each node visited by a backward sweep.
pub trait BackwardHook {
    /// Whether snapshots should be built at all. Returning `false` skips [`on_visit`](Self::on_visit).
    /// Asked once, before the sweep starts.
    fn enabled(&self) -> bool {
        true
    }

    /// Called once per visited node.
    fn on_visit(&mut self, node: &NodeView);
}

/// Emits each visited node at `trace` level through the `log` facade.
///
/// This is the hook used by [`Var::backward`](super::Var::backward).
#[derive(Clone, Copy, Debug, Default)]
pub struct LogHook;

impl BackwardHook for LogHook {
    fn enabled(&self) -> bool {
        log_enabled!(Level::Trace)
    }

    fn on_visit(&mut self, node: &NodeView) {
        trace!("{} {node}", node.name);
    }
}

/// Ignores every node.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHook;

impl BackwardHook for NoopHook {
    fn enabled(&self) -> bool {
        false
    }

    fn on_visit(&mut self, _node: &NodeView) {}
}

impl<F> BackwardHook for F
where
    F: FnMut(&NodeView),
{
    fn on_visit(&mut self, node: &NodeView) {
        self(node)
    }
}
