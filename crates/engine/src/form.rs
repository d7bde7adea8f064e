//! Module/function selection and the parameter form.
//!
//! [`FormBuilder`] is a small state machine over two dependent selects. A
//! module must be chosen before the function select is enabled, and both must
//! be chosen before submission is enabled. Each transition returns the render
//! ops that bring the surface in line with the new state.
//!
//! Form values live here rather than in the widgets so that collection does
//! not depend on the display. Untouched text inputs collect as `""` and
//! untouched selects as their first choice, which is what a browser form
//! submits.

use std::sync::Arc;

use fakernet_types::{Catalogue, FunctionSpec, Invocation, ParamSpec};
use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::view::{ElementId, InputWidget, RenderOp, clear_outputs};

/// Placeholder option shown before a function is chosen.
pub const FUNCTION_PLACEHOLDER: &str = "Select Function";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("unknown module '{0}'")]
    UnknownModule(String),
    #[error("module '{module}' has no function '{function}'")]
    UnknownFunction { module: String, function: String },
    #[error("select a module before choosing a function")]
    NoModuleSelected,
    #[error("select a function before editing parameters")]
    NoFunctionSelected,
    #[error("{module}/{function} has no parameter '{param}'")]
    UnknownParam { module: String, function: String, param: String },
    #[error("'{value}' is not a valid choice for '{param}' (expected one of: {})", choices.join(", "))]
    InvalidChoice { param: String, value: String, choices: Vec<String> },
}

/// Selection state plus the current value of every rendered input.
#[derive(Debug, Clone)]
pub struct FormBuilder {
    catalogue: Arc<Catalogue>,
    module: Option<String>,
    function: Option<String>,
    values: IndexMap<String, String>,
}

impl FormBuilder {
    pub fn new(catalogue: Arc<Catalogue>) -> Self {
        Self {
            catalogue,
            module: None,
            function: None,
            values: IndexMap::new(),
        }
    }

    pub fn selected_module(&self) -> Option<&str> {
        self.module.as_deref()
    }

    pub fn selected_function(&self) -> Option<&str> {
        self.function.as_deref()
    }

    /// Both selects hold a value, so the form may be submitted.
    pub fn is_ready(&self) -> bool {
        self.module.is_some() && self.function.is_some()
    }

    /// Spec of the selected function, if any.
    pub fn function_spec(&self) -> Option<&FunctionSpec> {
        self.catalogue.function(self.module.as_deref()?, self.function.as_deref()?)
    }

    /// Current value of a rendered input.
    pub fn value(&self, param: &str) -> Option<&str> {
        self.values.get(param).map(String::as_str)
    }

    /// Transition the module select. `None` is the placeholder.
    pub fn select_module(&mut self, module: Option<&str>) -> Result<Vec<RenderOp>, FormError> {
        let Some(module) = module else {
            self.module = None;
            self.function = None;
            return Ok(vec![
                set_enabled(ElementId::FunctionSelect, false),
                set_enabled(ElementId::SubmitButton, false),
                set_text(ElementId::Description, ""),
            ]);
        };
        if self.catalogue.module(module).is_none() {
            return Err(FormError::UnknownModule(module.to_string()));
        }
        debug!(module, "module selected");

        self.module = Some(module.to_string());
        self.function = None;
        self.values.clear();

        let mut ops = clear_outputs();
        ops.push(RenderOp::ReplaceOptions {
            target: ElementId::FunctionSelect,
            placeholder: Some(FUNCTION_PLACEHOLDER.to_string()),
            options: self.catalogue.function_names(module).into_iter().map(str::to_string).collect(),
        });
        ops.push(RenderOp::ClearChildren(ElementId::ParamInputs));
        ops.push(set_text(ElementId::Description, ""));
        ops.push(set_enabled(ElementId::FunctionSelect, true));
        // The function select is back on its placeholder.
        ops.push(set_enabled(ElementId::SubmitButton, false));
        Ok(ops)
    }

    /// Transition the function select. `None` is the placeholder.
    pub fn select_function(&mut self, function: Option<&str>) -> Result<Vec<RenderOp>, FormError> {
        let Some(function) = function else {
            self.function = None;
            return Ok(vec![set_enabled(ElementId::SubmitButton, false)]);
        };
        let module = self.module.clone().ok_or(FormError::NoModuleSelected)?;
        let spec = self
            .catalogue
            .function(&module, function)
            .ok_or_else(|| FormError::UnknownFunction {
                module: module.clone(),
                function: function.to_string(),
            })?;
        debug!(module = %module, function, params = spec.param_count(), "function selected");

        let mut ops = clear_outputs();
        ops.push(RenderOp::ClearChildren(ElementId::ParamInputs));
        ops.push(set_enabled(ElementId::SubmitButton, true));
        ops.push(set_text(ElementId::Description, spec.description().unwrap_or_default()));

        let mut values = IndexMap::with_capacity(spec.param_count());
        for (name, param) in spec.params() {
            values.insert(name.to_string(), initial_value(param));
            ops.push(RenderOp::AppendInput(InputWidget::new(name, param)));
        }

        self.function = Some(function.to_string());
        self.values = values;
        Ok(ops)
    }

    /// Record a new value for a rendered input.
    ///
    /// Text and secret inputs accept anything; enumerated inputs only accept
    /// one of their choices.
    pub fn set_value(&mut self, param: &str, value: impl Into<String>) -> Result<(), FormError> {
        let value = value.into();
        let spec = self.function_spec().ok_or(FormError::NoFunctionSelected)?;
        let Some(param_spec) = spec.param(param) else {
            return Err(FormError::UnknownParam {
                module: self.module.clone().unwrap_or_default(),
                function: self.function.clone().unwrap_or_default(),
                param: param.to_string(),
            });
        };
        if let ParamSpec::Enumerated(choices) = param_spec
            && !choices.contains(&value)
        {
            return Err(FormError::InvalidChoice {
                param: param.to_string(),
                value,
                choices: choices.clone(),
            });
        }
        self.values.insert(param.to_string(), value);
        Ok(())
    }

    /// Collect every input as an opaque string, in catalogue order.
    ///
    /// Returns `None` unless both a module and a function are selected.
    pub fn collect(&self) -> Option<Invocation> {
        let module = self.module.clone()?;
        let function = self.function.clone()?;
        let spec = self.function_spec()?;
        let args = spec
            .params()
            .map(|(name, param)| {
                let value = self.values.get(name).cloned().unwrap_or_else(|| initial_value(param));
                (name.to_string(), value)
            })
            .collect();
        Some(Invocation { module, function, args })
    }

    /// Names of the secret parameters of the selected function.
    pub fn secret_params(&self) -> Vec<&str> {
        self.function_spec()
            .map(|spec| spec.params().filter(|(_, param)| param.is_secret()).map(|(name, _)| name).collect())
            .unwrap_or_default()
    }
}

fn initial_value(spec: &ParamSpec) -> String {
    match spec {
        ParamSpec::Enumerated(choices) => choices.first().cloned().unwrap_or_default(),
        ParamSpec::Text { .. } | ParamSpec::Secret => String::new(),
    }
}

fn set_enabled(target: ElementId, enabled: bool) -> RenderOp {
    RenderOp::SetEnabled { target, enabled }
}

fn set_text(target: ElementId, text: &str) -> RenderOp {
    RenderOp::SetText {
        target,
        text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::InputKind;

    fn form(json: &str) -> FormBuilder {
        FormBuilder::new(Arc::new(Catalogue::from_json_str(json).expect("catalogue")))
    }

    const DNS: &str = r#"{
        "dns": {
            "add_zone": {"_desc": "Add a zone", "zone": "TEXT", "direction": ["fwd", "rev"]},
            "list": {"_desc": "List zones"}
        },
        "mail": {"send": {"to": "TEXT"}}
    }"#;

    #[test]
    fn function_select_requires_module() {
        let mut form = form(DNS);
        assert_eq!(form.select_function(Some("list")), Err(FormError::NoModuleSelected));
        assert!(!form.is_ready());
    }

    #[test]
    fn enumerated_input_defaults_to_first_choice() {
        let mut form = form(DNS);
        form.select_module(Some("dns")).expect("module");
        let ops = form.select_function(Some("add_zone")).expect("function");
        let inputs: Vec<_> = ops
            .iter()
            .filter_map(|op| match op {
                RenderOp::AppendInput(widget) => Some(widget.kind.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(
            inputs,
            vec![
                InputKind::Text { hint: "TEXT".into() },
                InputKind::Choice(vec!["fwd".into(), "rev".into()])
            ]
        );
        let invocation = form.collect().expect("ready");
        assert_eq!(invocation.args.get("zone").map(String::as_str), Some(""));
        assert_eq!(invocation.args.get("direction").map(String::as_str), Some("fwd"));
    }

    #[test]
    fn invalid_choice_is_rejected() {
        let mut form = form(DNS);
        form.select_module(Some("dns")).expect("module");
        form.select_function(Some("add_zone")).expect("function");
        let err = form.set_value("direction", "sideways").expect_err("not a choice");
        assert!(err.to_string().contains("fwd, rev"), "{err}");
        form.set_value("direction", "rev").expect("valid choice");
        assert_eq!(form.value("direction"), Some("rev"));
    }

    #[test]
    fn unknown_param_is_rejected() {
        let mut form = form(DNS);
        form.select_module(Some("dns")).expect("module");
        form.select_function(Some("list")).expect("function");
        assert!(matches!(form.set_value("zone", "x"), Err(FormError::UnknownParam { .. })));
    }

    #[test]
    fn module_placeholder_disables_dependent_controls() {
        let mut form = form(DNS);
        form.select_module(Some("dns")).expect("module");
        form.select_function(Some("list")).expect("function");
        let ops = form.select_module(None).expect("placeholder");
        assert!(ops.contains(&set_enabled(ElementId::FunctionSelect, false)));
        assert!(ops.contains(&set_enabled(ElementId::SubmitButton, false)));
        assert!(form.collect().is_none());
    }

    #[test]
    fn missing_description_clears_previous_text() {
        let mut form = form(DNS);
        form.select_module(Some("mail")).expect("module");
        let ops = form.select_function(Some("send")).expect("function");
        assert!(ops.contains(&set_text(ElementId::Description, "")));
    }
}
