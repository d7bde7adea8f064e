//! Retained widget state driven by engine render ops.
//!
//! [`ConsoleView`] is the terminal counterpart of the page the engine
//! addresses: each [`ElementId`] maps to a field here, and components draw
//! from these fields every frame.

use fakernet_engine::{ElementId, GaugeStyle, InputKind, InputWidget, RenderOp, RenderSurface, ResultView};
use fakernet_types::RosterKey;
use fakernet_types::roster::STATUS_FIELD;
use indexmap::IndexMap;
use tracing::trace;

use crate::ui::components::text_input::TextInputState;

/// A select control: optional placeholder followed by options.
#[derive(Debug, Clone, Default)]
pub struct SelectState {
    pub placeholder: Option<String>,
    pub options: Vec<String>,
    pub enabled: bool,
    /// Cursor over [`SelectState::entries`].
    pub highlighted: usize,
    /// Entry committed with Enter.
    pub committed: Option<usize>,
}

impl SelectState {
    /// Placeholder (if any) followed by every option.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.placeholder.as_deref().into_iter().chain(self.options.iter().map(String::as_str))
    }

    pub fn entry_count(&self) -> usize {
        self.options.len() + usize::from(self.placeholder.is_some())
    }

    /// Option behind an entry index; `None` for the placeholder.
    pub fn option_at(&self, entry: usize) -> Option<&str> {
        let offset = usize::from(self.placeholder.is_some());
        entry.checked_sub(offset).and_then(|index| self.options.get(index)).map(String::as_str)
    }

    pub fn move_highlight(&mut self, delta: isize) {
        let count = self.entry_count();
        if count == 0 {
            return;
        }
        self.highlighted = (self.highlighted as isize + delta).rem_euclid(count as isize) as usize;
    }

    fn replace(&mut self, placeholder: Option<String>, options: Vec<String>) {
        self.placeholder = placeholder;
        self.options = options;
        self.highlighted = 0;
        self.committed = None;
    }
}

/// One rendered parameter input and its current value.
#[derive(Debug, Clone)]
pub struct ParamInput {
    pub widget: InputWidget,
    pub text: TextInputState,
    pub choice: usize,
}

impl ParamInput {
    fn new(widget: InputWidget) -> Self {
        Self {
            widget,
            text: TextInputState::new(),
            choice: 0,
        }
    }

    /// The value a form submission would carry.
    pub fn value(&self) -> String {
        match &self.widget.kind {
            InputKind::Choice(choices) => choices.get(self.choice).cloned().unwrap_or_default(),
            InputKind::Text { .. } | InputKind::Secret => self.text.input().to_string(),
        }
    }

    /// Text shown on screen; secrets are masked.
    pub fn display(&self) -> String {
        match &self.widget.kind {
            InputKind::Secret => self.text.masked(),
            InputKind::Choice(_) => format!("< {} >", self.value()),
            InputKind::Text { .. } => self.text.input().to_string(),
        }
    }

    /// Step through the choices of an enumerated input; `false` for text inputs.
    pub fn cycle_choice(&mut self, delta: isize) -> bool {
        let InputKind::Choice(choices) = &self.widget.kind else {
            return false;
        };
        if choices.is_empty() {
            return false;
        }
        self.choice = (self.choice as isize + delta).rem_euclid(choices.len() as isize) as usize;
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaugeState {
    pub percent: f64,
    pub label: String,
    pub style: GaugeStyle,
}

#[derive(Debug, Default)]
pub struct ConsoleView {
    pub module_select: SelectState,
    pub function_select: SelectState,
    pub submit_enabled: bool,
    pub description: String,
    pub inputs: Vec<ParamInput>,
    pub result: Option<ResultView>,
    pub error_text: String,
    pub error_visible: bool,
    pub busy: bool,

    pub system_name: String,
    pub cpu: GaugeState,
    pub memory: GaugeState,
    pub memory_details: String,
    pub disk: GaugeState,
    pub disk_details: String,
    /// Roster rows in append order.
    pub roster: IndexMap<RosterKey, Vec<String>>,
}

impl ConsoleView {
    fn select_mut(&mut self, target: ElementId) -> Option<&mut SelectState> {
        match target {
            ElementId::ModuleSelect => Some(&mut self.module_select),
            ElementId::FunctionSelect => Some(&mut self.function_select),
            _ => None,
        }
    }

    fn gauge_mut(&mut self, target: ElementId) -> Option<&mut GaugeState> {
        match target {
            ElementId::CpuGauge => Some(&mut self.cpu),
            ElementId::MemoryGauge => Some(&mut self.memory),
            ElementId::DiskGauge => Some(&mut self.disk),
            _ => None,
        }
    }

    fn text_mut(&mut self, target: ElementId) -> Option<&mut String> {
        match target {
            ElementId::Description => Some(&mut self.description),
            ElementId::ErrorPane => Some(&mut self.error_text),
            ElementId::SystemName => Some(&mut self.system_name),
            ElementId::MemoryDetails => Some(&mut self.memory_details),
            ElementId::DiskDetails => Some(&mut self.disk_details),
            _ => None,
        }
    }
}

impl RenderSurface for ConsoleView {
    fn apply(&mut self, op: RenderOp) {
        match op {
            RenderOp::ReplaceOptions {
                target,
                placeholder,
                options,
            } => {
                if let Some(select) = self.select_mut(target) {
                    select.replace(placeholder, options);
                }
            }
            RenderOp::SetEnabled { target, enabled } => match target {
                ElementId::SubmitButton => self.submit_enabled = enabled,
                other => {
                    if let Some(select) = self.select_mut(other) {
                        select.enabled = enabled;
                    }
                }
            },
            RenderOp::SetVisible { target, visible } => match target {
                ElementId::ErrorPane => self.error_visible = visible,
                ElementId::BusyIndicator => self.busy = visible,
                other => trace!(?other, visible, "visibility not tracked"),
            },
            RenderOp::SetText { target, text } => {
                if let Some(slot) = self.text_mut(target) {
                    *slot = text;
                }
            }
            RenderOp::ClearChildren(target) => match target {
                ElementId::ParamInputs => self.inputs.clear(),
                other => {
                    if let Some(select) = self.select_mut(other) {
                        select.replace(None, Vec::new());
                    }
                }
            },
            RenderOp::AppendInput(widget) => self.inputs.push(ParamInput::new(widget)),
            RenderOp::SetResult(result) => self.result = result,
            RenderOp::SetGauge {
                target,
                percent,
                label,
                style,
            } => {
                if let Some(gauge) = self.gauge_mut(target) {
                    *gauge = GaugeState { percent, label, style };
                }
            }
            RenderOp::AppendRow { key, cells } => {
                self.roster.insert(key, cells);
            }
            RenderOp::PatchStatus { key, status } => {
                if let Some(cell) = self.roster.get_mut(&key).and_then(|cells| cells.get_mut(STATUS_FIELD)) {
                    *cell = status;
                }
            }
            RenderOp::RemoveRow { key } => {
                self.roster.shift_remove(&key);
            }
        }
    }
}
