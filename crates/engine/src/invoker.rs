//! Submission of the current form and routing of the response.

use std::time::Instant;

use fakernet_api::ConsoleApi;
use fakernet_types::{Invocation, InvocationOutcome, InvocationResult, ResultTable};
use fakernet_util::{escape_control_chars, redact_args};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::form::FormBuilder;
use crate::view::{ElementId, RenderOp, ResultView, clear_outputs};

/// Tracks the single outstanding invocation.
#[derive(Debug, Default)]
pub struct Invoker {
    busy: bool,
}

impl Invoker {
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Start an invocation of the form's current values.
    ///
    /// Nothing happens unless both selects hold a value, or while a previous
    /// invocation is still outstanding.
    pub fn submit(&mut self, form: &FormBuilder) -> Option<(Vec<RenderOp>, Invocation)> {
        if self.busy {
            debug!("submit ignored: invocation already in flight");
            return None;
        }
        let invocation = form.collect()?;
        info!(
            module = %invocation.module,
            function = %invocation.function,
            args = %redact_args(&invocation.args, form.secret_params()),
            "invoking module function"
        );
        self.busy = true;
        let mut ops = clear_outputs();
        ops.push(RenderOp::SetVisible {
            target: ElementId::BusyIndicator,
            visible: true,
        });
        Some((ops, invocation))
    }

    /// Hide the busy indicator and show exactly one of the result or error panes.
    pub fn complete(&mut self, outcome: InvocationOutcome) -> Vec<RenderOp> {
        self.busy = false;
        let mut ops = vec![RenderOp::SetVisible {
            target: ElementId::BusyIndicator,
            visible: false,
        }];
        match outcome {
            InvocationOutcome::Completed(InvocationResult::Success(payload)) => {
                ops.push(RenderOp::SetVisible {
                    target: ElementId::ErrorPane,
                    visible: false,
                });
                ops.push(RenderOp::SetResult(Some(result_view(&payload))));
            }
            InvocationOutcome::Completed(InvocationResult::Failure(message)) | InvocationOutcome::TransportFailed(message) => {
                ops.push(RenderOp::SetResult(None));
                ops.push(RenderOp::SetText {
                    target: ElementId::ErrorPane,
                    text: escape_control_chars(&message),
                });
                ops.push(RenderOp::SetVisible {
                    target: ElementId::ErrorPane,
                    visible: true,
                });
            }
        }
        ops
    }
}

/// Pretty JSON of the whole `result`, plus a table when the output is tabular.
pub fn result_view(payload: &Value) -> ResultView {
    let pretty = serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    ResultView {
        pretty: escape_control_chars(&pretty),
        table: ResultTable::from_payload(payload),
    }
}

/// Perform one invocation request and fold every failure into an outcome.
pub async fn execute(api: &dyn ConsoleApi, invocation: &Invocation) -> InvocationOutcome {
    let start = Instant::now();
    match api.invoke(invocation).await {
        Ok(result) => {
            debug!(
                module = %invocation.module,
                function = %invocation.function,
                ok = result.is_success(),
                duration_ms = start.elapsed().as_millis(),
                "invocation completed"
            );
            InvocationOutcome::Completed(result)
        }
        Err(error) => {
            warn!(
                module = %invocation.module,
                function = %invocation.function,
                error = %error,
                "invocation failed without a readable response"
            );
            InvocationOutcome::TransportFailed(error.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_text_is_escaped() {
        let mut invoker = Invoker::default();
        let ops = invoker.complete(InvocationOutcome::Completed(InvocationResult::Failure("boom\u{1b}[31m".into())));
        assert!(ops.contains(&RenderOp::SetText {
            target: ElementId::ErrorPane,
            text: "boom\\u{1b}[31m".into(),
        }));
    }

    #[test]
    fn transport_failure_clears_busy_state() {
        let mut invoker = Invoker { busy: true };
        let ops = invoker.complete(InvocationOutcome::TransportFailed("connection refused".into()));
        assert!(!invoker.is_busy());
        assert_eq!(
            ops[0],
            RenderOp::SetVisible {
                target: ElementId::BusyIndicator,
                visible: false
            }
        );
        assert!(ops.contains(&RenderOp::SetVisible {
            target: ElementId::ErrorPane,
            visible: true
        }));
    }

    #[test]
    fn tabular_output_is_detected() {
        let view = result_view(&json!({"output": {"columns": ["id", "ip"], "rows": [[1, "10.0.0.2"]]}}));
        let table = view.table.expect("table");
        assert_eq!(table.columns, vec!["id", "ip"]);
        assert_eq!(table.rows, vec![vec!["1".to_string(), "10.0.0.2".to_string()]]);
        assert!(view.pretty.starts_with("{\n  \"output\""), "{}", view.pretty);
    }
}
