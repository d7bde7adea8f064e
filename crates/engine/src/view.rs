//! Declarative render instructions.
//!
//! The engine never touches a display directly. Every state transition yields
//! a list of [`RenderOp`]s addressed to stable [`ElementId`]s, and a thin
//! adapter (the terminal UI, or a `Vec<RenderOp>` in tests) applies them.

use fakernet_types::{ParamSpec, ResultTable, RosterKey};

/// Prefix of the addressable id of a rendered parameter input.
pub const PARAM_ID_PREFIX: &str = "param-";

/// Deterministic id of the input rendered for `name`.
pub fn param_input_id(name: &str) -> String {
    format!("{PARAM_ID_PREFIX}{name}")
}

/// Addressable elements of the console surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    ModuleSelect,
    FunctionSelect,
    SubmitButton,
    /// Container of the rendered parameter inputs.
    ParamInputs,
    Description,
    ResultPane,
    ErrorPane,
    BusyIndicator,
    SystemName,
    CpuGauge,
    MemoryGauge,
    MemoryDetails,
    DiskGauge,
    DiskDetails,
}

/// Two-tier gauge styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GaugeStyle {
    #[default]
    Normal,
    Warning,
}

/// Widget variant for one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputKind {
    /// Plain text field; `hint` is the server's kind tag (`TEXT`, `IP`, ...).
    Text { hint: String },
    /// Masked text field.
    Secret,
    /// Select populated with the choices in server order.
    Choice(Vec<String>),
}

impl From<&ParamSpec> for InputKind {
    fn from(spec: &ParamSpec) -> Self {
        match spec {
            ParamSpec::Text { tag } => InputKind::Text { hint: tag.clone() },
            ParamSpec::Secret => InputKind::Secret,
            ParamSpec::Enumerated(choices) => InputKind::Choice(choices.clone()),
        }
    }
}

/// A labelled input appended to [`ElementId::ParamInputs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputWidget {
    /// `param-<name>`.
    pub id: String,
    /// Parameter name, also the label text.
    pub name: String,
    pub kind: InputKind,
}

impl InputWidget {
    pub fn new(name: &str, spec: &ParamSpec) -> Self {
        Self {
            id: param_input_id(name),
            name: name.to_string(),
            kind: InputKind::from(spec),
        }
    }
}

/// Content of the result pane after a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    /// The `result` payload pretty-printed with two-space indentation.
    pub pretty: String,
    /// Present when the payload carries `{columns, rows}` output.
    pub table: Option<ResultTable>,
}

/// One instruction for the rendering adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    /// Replace every option of a select; a placeholder, when given, comes first
    /// and stands for "unselected".
    ReplaceOptions {
        target: ElementId,
        placeholder: Option<String>,
        options: Vec<String>,
    },
    SetEnabled { target: ElementId, enabled: bool },
    SetVisible { target: ElementId, visible: bool },
    SetText { target: ElementId, text: String },
    /// Remove everything inside a container.
    ClearChildren(ElementId),
    AppendInput(InputWidget),
    /// `None` empties the result pane.
    SetResult(Option<ResultView>),
    SetGauge {
        target: ElementId,
        percent: f64,
        label: String,
        style: GaugeStyle,
    },
    /// Append a row to the roster table; the fifth cell is addressable by
    /// [`RosterKey::status_cell_id`].
    AppendRow { key: RosterKey, cells: Vec<String> },
    /// Rewrite only the status cell of an existing row.
    PatchStatus { key: RosterKey, status: String },
    RemoveRow { key: RosterKey },
}

/// Something that can apply render instructions.
pub trait RenderSurface {
    fn apply(&mut self, op: RenderOp);

    fn apply_all(&mut self, ops: impl IntoIterator<Item = RenderOp>)
    where
        Self: Sized,
    {
        for op in ops {
            self.apply(op);
        }
    }
}

/// Recording surface.
impl RenderSurface for Vec<RenderOp> {
    fn apply(&mut self, op: RenderOp) {
        self.push(op);
    }
}

/// Ops that empty the result and error panes and hide the error pane.
pub(crate) fn clear_outputs() -> Vec<RenderOp> {
    vec![
        RenderOp::SetResult(None),
        RenderOp::SetText {
            target: ElementId::ErrorPane,
            text: String::new(),
        },
        RenderOp::SetVisible {
            target: ElementId::ErrorPane,
            visible: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_kind_follows_param_spec() {
        let secret = InputWidget::new("secret", &ParamSpec::Secret);
        assert_eq!(secret.id, "param-secret");
        assert_eq!(secret.kind, InputKind::Secret);

        let choice = InputWidget::new("direction", &ParamSpec::Enumerated(vec!["fwd".into(), "rev".into()]));
        assert_eq!(choice.kind, InputKind::Choice(vec!["fwd".into(), "rev".into()]));
    }

    #[test]
    fn vec_surface_records_in_order() {
        let mut surface: Vec<RenderOp> = Vec::new();
        surface.apply_all(clear_outputs());
        assert_eq!(surface.len(), 3);
        assert_eq!(surface[0], RenderOp::SetResult(None));
    }
}
