//! Console session state.
//!
//! [`ConsoleSession`] owns everything the console mutates: the form, the
//! invoker and the rendered roster. It is driven from one task. User actions
//! and completions arrive as [`Msg`]s, poll results as [`PollEvent`]s, and each
//! step returns render ops plus any effects the runtime must perform.

use std::sync::Arc;

use fakernet_types::{Catalogue, Effect, Msg};
use tracing::{debug, warn};

use crate::catalogue::CatalogueStore;
use crate::form::FormBuilder;
use crate::invoker::Invoker;
use crate::metrics::render_metrics;
use crate::poller::{PollEvent, PollTick};
use crate::roster::RosterReconciler;
use crate::view::{ElementId, RenderOp};

/// Output of one state transition.
#[derive(Debug, Default, PartialEq)]
pub struct Update {
    pub ops: Vec<RenderOp>,
    pub effects: Vec<Effect>,
}

impl Update {
    fn render(ops: Vec<RenderOp>) -> Self {
        Self { ops, effects: Vec::new() }
    }
}

/// Highest sequence number applied so far for one poller.
#[derive(Debug, Default, Clone, Copy)]
struct SeqGate {
    last_applied: u64,
}

impl SeqGate {
    /// Accept `seq` unless a later tick has already been applied.
    fn admit(&mut self, seq: u64) -> bool {
        if seq < self.last_applied {
            return false;
        }
        self.last_applied = seq;
        true
    }
}

#[derive(Debug)]
pub struct ConsoleSession {
    catalogue: CatalogueStore,
    form: FormBuilder,
    invoker: Invoker,
    roster: RosterReconciler,
    metrics_gate: SeqGate,
    roster_gate: SeqGate,
}

impl ConsoleSession {
    pub fn new(catalogue: CatalogueStore) -> Self {
        let form = FormBuilder::new(Arc::clone(catalogue.catalogue()));
        Self {
            catalogue,
            form,
            invoker: Invoker::default(),
            roster: RosterReconciler::new(),
            metrics_gate: SeqGate::default(),
            roster_gate: SeqGate::default(),
        }
    }

    pub fn catalogue(&self) -> &Catalogue {
        self.catalogue.catalogue()
    }

    pub fn form(&self) -> &FormBuilder {
        &self.form
    }

    pub fn is_busy(&self) -> bool {
        self.invoker.is_busy()
    }

    pub fn roster(&self) -> &RosterReconciler {
        &self.roster
    }

    /// Ops that bring a fresh surface to the initial state.
    pub fn initial_render(&self) -> Vec<RenderOp> {
        let mut ops = vec![self.catalogue.module_options()];
        for (target, enabled) in [(ElementId::FunctionSelect, false), (ElementId::SubmitButton, false)] {
            ops.push(RenderOp::SetEnabled { target, enabled });
        }
        for target in [ElementId::BusyIndicator, ElementId::ErrorPane] {
            ops.push(RenderOp::SetVisible { target, visible: false });
        }
        ops
    }

    /// Apply one message.
    pub fn update(&mut self, msg: Msg) -> Update {
        match msg {
            Msg::ModuleSelected(module) => match self.form.select_module(module.as_deref()) {
                Ok(ops) => Update::render(ops),
                Err(error) => {
                    warn!(%error, "ignoring module selection");
                    Update::default()
                }
            },
            Msg::FunctionSelected(function) => match self.form.select_function(function.as_deref()) {
                Ok(ops) => Update::render(ops),
                Err(error) => {
                    warn!(%error, "ignoring function selection");
                    Update::default()
                }
            },
            Msg::ParamEdited { name, value } => {
                if let Err(error) = self.form.set_value(&name, value) {
                    warn!(%error, "ignoring parameter edit");
                }
                Update::default()
            }
            Msg::Submit => match self.invoker.submit(&self.form) {
                Some((ops, invocation)) => Update {
                    ops,
                    effects: vec![Effect::Invoke(invocation)],
                },
                None => Update::default(),
            },
            Msg::InvocationFinished(outcome) => Update::render(self.invoker.complete(outcome)),
            Msg::MetricsReceived(snapshot) => Update::render(render_metrics(&snapshot)),
            Msg::RosterReceived(rows) => Update::render(self.roster.reconcile(&rows)),
        }
    }

    /// Apply one poll tick.
    ///
    /// Failed ticks are logged and leave the display untouched. A tick that
    /// completes after a later tick of the same poller was applied is stale
    /// and dropped.
    pub fn handle_poll(&mut self, event: PollEvent) -> Vec<RenderOp> {
        match event {
            PollEvent::Metrics(tick) => match admit("metrics", &mut self.metrics_gate, tick) {
                Some(snapshot) => self.update(Msg::MetricsReceived(snapshot)).ops,
                None => Vec::new(),
            },
            PollEvent::Roster(tick) => match admit("roster", &mut self.roster_gate, tick) {
                Some(rows) => self.update(Msg::RosterReceived(rows)).ops,
                None => Vec::new(),
            },
        }
    }
}

fn admit<T>(poller: &str, gate: &mut SeqGate, tick: PollTick<T>) -> Option<T> {
    let PollTick { seq, result } = tick;
    match result {
        Ok(value) if gate.admit(seq) => Some(value),
        Ok(_) => {
            debug!(poller, seq, last_applied = gate.last_applied, "dropping stale poll result");
            None
        }
        Err(error) => {
            warn!(poller, seq, %error, "poll failed; keeping previous display");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seq_gate_drops_older_ticks_only() {
        let mut gate = SeqGate::default();
        assert!(gate.admit(2));
        assert!(!gate.admit(1));
        assert!(gate.admit(2));
        assert!(gate.admit(5));
    }

    #[test]
    fn initial_render_disables_dependent_controls() {
        let session = ConsoleSession::new(CatalogueStore::new(Catalogue::default()));
        let ops = session.initial_render();
        assert!(ops.contains(&RenderOp::SetEnabled {
            target: ElementId::SubmitButton,
            enabled: false
        }));
        assert!(ops.contains(&RenderOp::SetVisible {
            target: ElementId::BusyIndicator,
            visible: false
        }));
    }
}
