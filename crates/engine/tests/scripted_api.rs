use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fakernet_api::{ApiError, ApiResult, ConsoleApi};
use fakernet_engine::{CatalogueStore, ConsolePollers, ConsoleSession, ElementId, PollEvent, RenderOp, execute};
use fakernet_types::{Catalogue, Effect, Invocation, InvocationOutcome, InvocationResult, Msg, RosterRow, SystemMetricsSnapshot};
use fakernet_util::ConsoleConfig;
use serde_json::json;
use tokio::sync::mpsc;

/// Serves canned responses and records invocations.
#[derive(Default)]
struct ScriptedApi {
    invocations: Mutex<Vec<Invocation>>,
    invoke_fails: bool,
}

#[async_trait]
impl ConsoleApi for ScriptedApi {
    async fn fetch_catalogue(&self) -> ApiResult<Catalogue> {
        Ok(Catalogue::from_json_str(r#"{"mail":{"send":{"_desc":"Send mail","to":"TEXT","secret":"PASSWORD"}}}"#).expect("catalogue"))
    }

    async fn invoke(&self, invocation: &Invocation) -> ApiResult<InvocationResult> {
        self.invocations.lock().expect("lock").push(invocation.clone());
        if self.invoke_fails {
            return Err(ApiError::Envelope {
                url: "api/v1/mail/run/send".into(),
                message: "connection reset".into(),
            });
        }
        Ok(InvocationResult::Success(json!({"output": "queued"})))
    }

    async fn fetch_system_data(&self) -> ApiResult<SystemMetricsSnapshot> {
        Ok(SystemMetricsSnapshot {
            system: "fn-host".into(),
            cpu_percent: 12.0,
            memory_used: 1,
            memory_total: 4,
            disk_used: 1,
            disk_total: 4,
        })
    }

    async fn fetch_roster(&self) -> ApiResult<Vec<RosterRow>> {
        let row = RosterRow::try_from(vec![json!("dns"), json!(1), json!("10.0.0.2"), json!("resolver"), json!("running")]).expect("row");
        Ok(vec![row])
    }

    async fn fetch_version(&self) -> ApiResult<String> {
        Ok("0.0.9".into())
    }
}

async fn ready_session(api: &ScriptedApi) -> ConsoleSession {
    let store = CatalogueStore::load(api).await.expect("catalogue loads");
    let mut session = ConsoleSession::new(store);
    session.update(Msg::ModuleSelected(Some("mail".into())));
    session.update(Msg::FunctionSelected(Some("send".into())));
    session
}

#[tokio::test]
async fn submit_effect_round_trips_through_the_api() {
    let api = ScriptedApi::default();
    let mut session = ready_session(&api).await;
    session.update(Msg::ParamEdited {
        name: "to".into(),
        value: "ops@fn.test".into(),
    });

    let update = session.update(Msg::Submit);
    assert!(update.ops.contains(&RenderOp::SetVisible {
        target: ElementId::BusyIndicator,
        visible: true
    }));
    let Some(Effect::Invoke(invocation)) = update.effects.into_iter().next() else {
        panic!("submit should request an invocation");
    };
    let outcome = execute(&api, &invocation).await;
    assert!(matches!(outcome, InvocationOutcome::Completed(InvocationResult::Success(_))));

    let ops = session.update(Msg::InvocationFinished(outcome)).ops;
    assert!(ops.iter().any(|op| matches!(op, RenderOp::SetResult(Some(view)) if view.pretty.contains("queued"))));

    let recorded = api.invocations.lock().expect("lock");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].args.get("secret").map(String::as_str), Some(""));
}

#[tokio::test]
async fn transport_failure_never_leaves_busy_state() {
    let api = ScriptedApi {
        invoke_fails: true,
        ..ScriptedApi::default()
    };
    let mut session = ready_session(&api).await;
    let Some(Effect::Invoke(invocation)) = session.update(Msg::Submit).effects.into_iter().next() else {
        panic!("submit should request an invocation");
    };
    let outcome = execute(&api, &invocation).await;
    assert!(matches!(outcome, InvocationOutcome::TransportFailed(ref message) if message.contains("connection reset")));
    session.update(Msg::InvocationFinished(outcome));
    assert!(!session.is_busy());
}

#[tokio::test(start_paused = true)]
async fn pollers_feed_the_session_until_shutdown() {
    let api: Arc<dyn ConsoleApi> = Arc::new(ScriptedApi::default());
    let config = ConsoleConfig::default();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let pollers = ConsolePollers::start(Arc::clone(&api), &config, sender);

    let mut session = ConsoleSession::new(CatalogueStore::new(Catalogue::default()));
    let mut metrics_ticks = 0;
    let mut roster_ticks = 0;
    // 3 s metrics and 7 s roster cadence over 7.5 s: ticks at 0/3/6 and 0/7.
    let deadline = tokio::time::Instant::now() + Duration::from_millis(7_500);
    while let Ok(Some(event)) = tokio::time::timeout_at(deadline, receiver.recv()).await {
        match &event {
            PollEvent::Metrics(_) => metrics_ticks += 1,
            PollEvent::Roster(_) => roster_ticks += 1,
        }
        session.handle_poll(event);
    }
    assert_eq!(metrics_ticks, 3);
    assert_eq!(roster_ticks, 2);
    assert_eq!(session.roster().len(), 1);

    pollers.shutdown().await.expect("pollers stop");
}
