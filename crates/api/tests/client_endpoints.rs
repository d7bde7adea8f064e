use std::collections::HashMap;
use std::net::SocketAddr;

use axum::extract::{Form, Path};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use fakernet_api::{ApiError, ConsoleApi, FakerNetClient};
use fakernet_types::{Invocation, InvocationResult, ParamSpec};
use fakernet_util::ConsoleConfig;
use indexmap::IndexMap;
use serde_json::json;

const CATALOGUE_BODY: &str = r#"{"ok":true,"result":{
    "simplemail":{"add_server":{"_desc":"Add a SimpleMail server","fqdn":"TEXT","mail_domain":"TEXT","ip_addr":"IP"},"list":{"_desc":"View all SimpleMail servers"}},
    "dns":{"add_zone":{"_desc":"Add a zone","zone":"TEXT","direction":["fwd","rev"]}}
}}"#;

async fn run_module(Path((module, function)): Path<(String, String)>, Form(fields): Form<HashMap<String, String>>) -> impl IntoResponse {
    if module == "broken" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"ok": false, "error": "Invalid module"})));
    }
    (
        StatusCode::OK,
        Json(json!({"ok": true, "result": {"output": {"module": module, "function": function, "fields": fields}}})),
    )
}

async fn spawn_server() -> SocketAddr {
    let router = Router::new()
        .route("/api/v1/_modules/list", get(|| async { ([("content-type", "application/json")], CATALOGUE_BODY) }))
        .route("/api/v1/{module}/run/{function}", post(run_module))
        .route(
            "/api/v1/_system_data",
            get(|| async {
                Json(json!({"ok": true, "result": {
                    "system": "fn-host - Linux 6.1", "cpu_percent": 61.5,
                    "memory_used": 1073741824u64, "memory_total": 2147483648u64,
                    "disk_used": 10, "disk_total": 100
                }}))
            }),
        )
        .route(
            "/api/v1/_servers/list_all",
            get(|| async {
                Json(json!({"ok": true, "result": {"servers": [
                    ["dns", 1, "10.0.0.2", "resolver", "running"],
                    ["bad"],
                    ["simplemail", 2, "10.0.0.3", "mail", "exited"]
                ]}}))
            }),
        )
        .route("/api/v1/_version", get(|| async { Json(json!({"ok": true, "result": {"version": "0.0.9"}})) }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let address = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    address
}

fn client_for(address: SocketAddr) -> FakerNetClient {
    let config = ConsoleConfig {
        base_url: format!("http://{address}"),
        ..ConsoleConfig::default()
    };
    FakerNetClient::from_config(&config).expect("client")
}

#[tokio::test]
async fn catalogue_keeps_server_order() {
    let client = client_for(spawn_server().await);
    let catalogue = client.fetch_catalogue().await.expect("catalogue");
    assert_eq!(catalogue.module_names().collect::<Vec<_>>(), vec!["simplemail", "dns"]);
    assert_eq!(catalogue.function_names("simplemail"), vec!["add_server", "list"]);
    let params: Vec<_> = catalogue
        .function("simplemail", "add_server")
        .expect("add_server")
        .params()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(params, vec!["fqdn", "mail_domain", "ip_addr"]);
    assert_eq!(
        catalogue.function("dns", "add_zone").and_then(|f| f.param("direction")),
        Some(&ParamSpec::Enumerated(vec!["fwd".into(), "rev".into()]))
    );
}

#[tokio::test]
async fn invoke_posts_form_fields_to_module_path() {
    let client = client_for(spawn_server().await);
    let mut args = IndexMap::new();
    args.insert("to".to_string(), "ops@fn.test".to_string());
    args.insert("secret".to_string(), "p&ss word".to_string());
    let invocation = Invocation {
        module: "mail".into(),
        function: "send".into(),
        args,
    };
    let result = client.invoke(&invocation).await.expect("invoke");
    let InvocationResult::Success(payload) = result else {
        panic!("expected success, got {result:?}");
    };
    assert_eq!(payload["output"]["module"], "mail");
    assert_eq!(payload["output"]["function"], "send");
    assert_eq!(payload["output"]["fields"], json!({"to": "ops@fn.test", "secret": "p&ss word"}));
}

#[tokio::test]
async fn invoke_reads_body_even_on_error_status() {
    let client = client_for(spawn_server().await);
    let invocation = Invocation {
        module: "broken".into(),
        function: "anything".into(),
        args: IndexMap::new(),
    };
    let result = client.invoke(&invocation).await.expect("readable body");
    assert_eq!(result, InvocationResult::Failure("Invalid module".into()));
}

#[tokio::test]
async fn system_data_unwraps_envelope() {
    let client = client_for(spawn_server().await);
    let snapshot = client.fetch_system_data().await.expect("metrics");
    assert_eq!(snapshot.system, "fn-host - Linux 6.1");
    assert_eq!(snapshot.memory_percent(), 50.0);
    assert_eq!(snapshot.disk_percent(), 10.0);
}

#[tokio::test]
async fn roster_drops_rows_without_identity() {
    let client = client_for(spawn_server().await);
    let rows = client.fetch_roster().await.expect("roster");
    let keys: Vec<_> = rows.iter().map(|row| row.key().to_string()).collect();
    assert_eq!(keys, vec!["dns-1", "simplemail-2"]);
    assert_eq!(rows[1].status(), "exited");
}

#[tokio::test]
async fn version_is_extracted_from_result() {
    let client = client_for(spawn_server().await);
    assert_eq!(client.fetch_version().await.expect("version"), "0.0.9");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let address = listener.local_addr().expect("addr");
    drop(listener);
    let client = client_for(address);
    let error = client.fetch_system_data().await.expect_err("nothing listens");
    assert!(matches!(error, ApiError::Transport { .. }), "{error}");
}

#[tokio::test]
async fn missing_endpoint_reports_status() {
    let config = ConsoleConfig {
        base_url: format!("http://{}/nested/", spawn_server().await),
        ..ConsoleConfig::default()
    };
    let nested = FakerNetClient::from_config(&config).expect("client");
    let error = nested.fetch_catalogue().await.expect_err("404 under nested base");
    assert!(matches!(error, ApiError::Status { status: 404, .. }), "{error}");
    assert!(error.to_string().contains("Not Found"), "{error}");
}
