//! Server-declared catalogue of invocable module functions.
//!
//! The discovery endpoint answers with a three-level mapping
//! `module -> function -> parameter -> spec`. Every level keeps the order in
//! which the server emitted its keys (via `IndexMap`), because that order is
//! the on-screen order of selects and form inputs.
//!
//! Parameter spec values are decided once, at parse time, into [`ParamSpec`]:
//!
//! - the literal `"PASSWORD"` becomes [`ParamSpec::Secret`]
//! - an array of strings becomes [`ParamSpec::Enumerated`]
//! - any other string becomes [`ParamSpec::Text`], keeping the tag as a hint
//!
//! The reserved `_desc` key carries the function description and never
//! becomes a parameter.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Reserved parameter key holding a function's human-readable description.
pub const DESCRIPTION_KEY: &str = "_desc";

/// Kind tag that marks a masked (secret) text input.
pub const SECRET_TAG: &str = "PASSWORD";

/// Errors raised while decoding a catalogue payload.
#[derive(Debug, Error)]
pub enum CatalogueError {
    /// The payload was not valid JSON or did not have the nested map shape.
    #[error("malformed catalogue: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A parameter spec was neither a kind tag nor a list of choices.
    #[error("parameter '{param}' has an unsupported spec value: {found}")]
    InvalidParamSpec { param: String, found: String },
    /// The description entry was present but not a string.
    #[error("'_desc' must be a string, got {found}")]
    InvalidDescription { found: String },
}

/// Input widget variant for one function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamSpec {
    /// Plain text input. `tag` is the server's kind tag (`TEXT`, `INTEGER`, `IP`, ...).
    Text { tag: String },
    /// Password-masked text input.
    Secret,
    /// Select populated with the allowed values, in server order.
    Enumerated(Vec<String>),
}

impl ParamSpec {
    /// Short hint shown next to the input label.
    pub fn hint(&self) -> &str {
        match self {
            ParamSpec::Text { tag } => tag.as_str(),
            ParamSpec::Secret => SECRET_TAG,
            ParamSpec::Enumerated(_) => "CHOICE",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, ParamSpec::Secret)
    }

    fn from_value(param: &str, value: Value) -> Result<Self, CatalogueError> {
        match value {
            Value::String(tag) if tag == SECRET_TAG => Ok(ParamSpec::Secret),
            Value::String(tag) => Ok(ParamSpec::Text { tag }),
            Value::Array(items) => {
                let mut choices = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(choice) => choices.push(choice),
                        other => {
                            return Err(CatalogueError::InvalidParamSpec {
                                param: param.to_string(),
                                found: other.to_string(),
                            });
                        }
                    }
                }
                Ok(ParamSpec::Enumerated(choices))
            }
            other => Err(CatalogueError::InvalidParamSpec {
                param: param.to_string(),
                found: other.to_string(),
            }),
        }
    }
}

/// Parameters and description of a single callable function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IndexMap<String, Value>")]
pub struct FunctionSpec {
    description: Option<String>,
    params: IndexMap<String, ParamSpec>,
}

impl FunctionSpec {
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Parameters in catalogue order, description excluded.
    pub fn params(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.params.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn param(&self, name: &str) -> Option<&ParamSpec> {
        self.params.get(name)
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

impl TryFrom<IndexMap<String, Value>> for FunctionSpec {
    type Error = CatalogueError;

    fn try_from(raw: IndexMap<String, Value>) -> Result<Self, Self::Error> {
        let mut description = None;
        let mut params = IndexMap::with_capacity(raw.len());
        for (name, value) in raw {
            if name == DESCRIPTION_KEY {
                match value {
                    Value::String(text) => description = Some(text),
                    other => {
                        return Err(CatalogueError::InvalidDescription {
                            found: other.to_string(),
                        });
                    }
                }
                continue;
            }
            let spec = ParamSpec::from_value(&name, value)?;
            params.insert(name, spec);
        }
        Ok(Self { description, params })
    }
}

/// Functions exposed by one module, in catalogue order.
pub type ModuleSpec = IndexMap<String, FunctionSpec>;

/// Immutable, session-scoped map of modules to their functions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Catalogue {
    modules: IndexMap<String, ModuleSpec>,
}

impl Catalogue {
    /// Decode a bare catalogue object (the `result` of the discovery envelope).
    pub fn from_json_str(text: &str) -> Result<Self, CatalogueError> {
        // Deserializing straight into the IndexMaps keeps document order even
        // when an intermediate `Value` would not.
        let raw: IndexMap<String, IndexMap<String, IndexMap<String, Value>>> = serde_json::from_str(text)?;
        let mut modules = IndexMap::with_capacity(raw.len());
        for (module, functions) in raw {
            let mut spec = ModuleSpec::with_capacity(functions.len());
            for (function, params) in functions {
                spec.insert(function, FunctionSpec::try_from(params)?);
            }
            modules.insert(module, spec);
        }
        Ok(Self { modules })
    }

    pub fn module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    pub fn module(&self, module: &str) -> Option<&ModuleSpec> {
        self.modules.get(module)
    }

    pub fn function_names(&self, module: &str) -> Vec<&str> {
        self.modules
            .get(module)
            .map(|functions| functions.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn function(&self, module: &str, function: &str) -> Option<&FunctionSpec> {
        self.modules.get(module)?.get(function)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
