//! Response envelopes shared by every console endpoint.

use serde::Deserialize;
use serde_json::Value;

/// `{ ok, result?, error? }` wrapper used by the server.
///
/// `ok` is optional because some endpoints only populate `result`.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    pub ok: Option<bool>,
    pub result: Option<T>,
    pub error: Option<String>,
}

impl<T> Envelope<T> {
    /// `true` only when the server explicitly flagged a failure.
    pub fn reports_failure(&self) -> bool {
        self.ok == Some(false)
    }
}

/// Tagged outcome of a function invocation. Exactly one side is populated.
#[derive(Debug, Clone, PartialEq)]
pub enum InvocationResult {
    /// `ok: true`; carries the raw `result` payload (`null` when absent).
    Success(Value),
    /// `ok: false` (or missing); carries the server's error message verbatim.
    Failure(String),
}

impl InvocationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success(_))
    }
}

impl From<Envelope<Value>> for InvocationResult {
    fn from(envelope: Envelope<Value>) -> Self {
        if envelope.ok == Some(true) {
            InvocationResult::Success(envelope.result.unwrap_or(Value::Null))
        } else {
            InvocationResult::Failure(envelope.error.unwrap_or_else(|| "server reported a failure without a message".to_string()))
        }
    }
}

/// Tabular function output: `{ "columns": [...], "rows": [[...], ...] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ResultTable {
    /// Detect a table in a success payload, looking through the `output`
    /// wrapper the server adds around function results.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let candidate = payload.get("output").unwrap_or(payload);
        let columns = candidate.get("columns")?.as_array()?;
        let rows = candidate.get("rows")?.as_array()?;
        let columns = columns.iter().map(display_cell).collect();
        let rows = rows
            .iter()
            .map(|row| row.as_array().map(|cells| cells.iter().map(display_cell).collect()))
            .collect::<Option<Vec<Vec<String>>>>()?;
        Some(Self { columns, rows })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Render a JSON scalar the way a browser would stringify it into a cell.
///
/// Whole-number floats lose their fraction, so `1.0` and `1` print alike.
pub fn display_cell(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) if number.is_f64() => match number.as_f64() {
            Some(float) => float.to_string(),
            None => number.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ok_true_becomes_success_with_result() {
        let envelope: Envelope<Value> = serde_json::from_value(json!({"ok": true, "result": {"output": 3}})).expect("envelope");
        assert_eq!(InvocationResult::from(envelope), InvocationResult::Success(json!({"output": 3})));
    }

    #[test]
    fn ok_false_keeps_error_text_verbatim() {
        let envelope: Envelope<Value> = serde_json::from_value(json!({"ok": false, "error": "<b>Invalid module</b>"})).expect("envelope");
        assert!(envelope.reports_failure());
        assert_eq!(InvocationResult::from(envelope), InvocationResult::Failure("<b>Invalid module</b>".into()));
    }

    #[test]
    fn detects_table_inside_output_wrapper() {
        let payload = json!({"output": {"columns": ["ID", "fqdn"], "rows": [[1, "mail.test"], [2, null]]}});
        let table = ResultTable::from_payload(&payload).expect("table shape");
        assert_eq!(table.columns, vec!["ID", "fqdn"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "mail.test".into()], vec!["2".into(), "null".into()]]);
    }

    #[test]
    fn plain_output_is_not_a_table() {
        assert!(ResultTable::from_payload(&json!({"output": "done"})).is_none());
        assert!(ResultTable::from_payload(&json!({"output": {"rows": "x", "columns": []}})).is_none());
    }

    #[derive(Debug, Deserialize)]
    struct Host {
        name: String,
    }

    fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Envelope<T> {
        serde_json::from_value(value).expect("envelope")
    }

    #[test]
    fn envelope_decodes_payloads_without_default() {
        let envelope: Envelope<Host> = decode(json!({"result": {"name": "fn-host"}}));
        assert_eq!(envelope.result.map(|host| host.name).as_deref(), Some("fn-host"));
        assert_eq!(envelope.ok, None);

        let empty: Envelope<Host> = decode(json!({"ok": false}));
        assert!(empty.result.is_none());
        assert!(empty.reports_failure());
    }

    #[test]
    fn whole_floats_print_like_integers() {
        assert_eq!(display_cell(&json!(1.0)), "1");
        assert_eq!(display_cell(&json!(2.5)), "2.5");
        assert_eq!(display_cell(&json!(7)), "7");
        assert_eq!(display_cell(&json!(true)), "true");
    }
}
