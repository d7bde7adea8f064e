//! Shared data model for the FakerNet console.
//!
//! These types describe the HTTP contract consumed by the console (catalogue,
//! invocation envelopes, metrics, roster) and the messages/effects that flow
//! between the rendering front end and the engine.

pub mod catalogue;
pub mod envelope;
pub mod metrics;
pub mod roster;

pub use catalogue::{Catalogue, CatalogueError, DESCRIPTION_KEY, FunctionSpec, ModuleSpec, ParamSpec, SECRET_TAG};
pub use envelope::{Envelope, InvocationResult, ResultTable, display_cell};
pub use metrics::{SystemDataResponse, SystemMetricsSnapshot};
pub use roster::{RosterKey, RosterRow, RosterRowError, RosterSnapshot};

use indexmap::IndexMap;

/// A fully collected call: module, function and the form values as opaque strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub module: String,
    pub function: String,
    /// Parameter name to raw input value, in catalogue order.
    pub args: IndexMap<String, String>,
}

/// Final state of an invocation request as seen by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationOutcome {
    /// The server answered with a readable envelope.
    Completed(InvocationResult),
    /// No readable response (connect failure, timeout, unparseable body).
    TransportFailed(String),
}

/// Messages that can be sent to update the console state.
///
/// User actions and asynchronous completions are both delivered as messages
/// so that every state change happens on the single UI task.
#[derive(Debug, Clone)]
pub enum Msg {
    /// Module select changed; `None` is the unselected placeholder.
    ModuleSelected(Option<String>),
    /// Function select changed; `None` is the unselected placeholder.
    FunctionSelected(Option<String>),
    /// The value of a rendered parameter input changed.
    ParamEdited { name: String, value: String },
    /// Explicit user submission of the current form.
    Submit,
    /// The outstanding invocation finished.
    InvocationFinished(InvocationOutcome),
    /// A metrics poll tick delivered a snapshot.
    MetricsReceived(SystemMetricsSnapshot),
    /// A roster poll tick delivered the current rows.
    RosterReceived(Vec<RosterRow>),
}

/// Side effects requested by the engine and executed by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the given invocation against `api/v1/<module>/run/<function>`.
    Invoke(Invocation),
}
