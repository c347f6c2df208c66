//! Manager integration tests - local + remote registries, config
//! reconciliation, and remote execution against a mock tools endpoint.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use toolgate::manager::ToolManager;
use toolgate::registry::{
    InputSchema, ParamSpec, ParamType, SchemaProperty, StructuredSchema, ToolDefinition, ToolKind,
};
use toolgate::types::{Config, Error, RemoteApiConfig, ToolConfigFile};

/// Mutable document served by the mock /tools endpoint.
type ToolsDoc = Arc<Mutex<Value>>;

/// Helper: spin up a mock remote tool API on a random port.
///
/// `GET /tools` serves the current document; `POST /execute/ok` answers a
/// successful execution, `POST /execute/fail` a logical failure echoing the
/// request back.
async fn start_remote_api() -> (std::net::SocketAddr, ToolsDoc) {
    let doc: ToolsDoc = Arc::new(Mutex::new(json!({"tools": []})));

    let app = Router::new()
        .route(
            "/tools",
            get(|State(doc): State<ToolsDoc>| async move {
                Json(doc.lock().unwrap().clone())
            }),
        )
        .route(
            "/execute/ok",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "success": true,
                    "result": {"received": body},
                    "executedAt": "2026-01-01T00:00:00Z",
                }))
            }),
        )
        .route(
            "/execute/fail",
            post(|| async {
                Json(json!({
                    "success": false,
                    "error": "tax table unavailable",
                }))
            }),
        )
        .with_state(doc.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, doc)
}

fn remote_tool(name: &str, execute_path: &str, addr: std::net::SocketAddr) -> Value {
    json!({
        "name": name,
        "description": format!("{} (remote)", name),
        "inputSchema": {
            "type": "object",
            "properties": {
                "amount": {"type": "number", "description": "Amount"}
            },
            "required": ["amount"]
        },
        "executeUrl": format!("http://{}{}", addr, execute_path),
        "timeout": 2000
    })
}

fn echo_tool() -> ToolDefinition {
    ToolDefinition::new(
        "echo",
        "Echo a message back",
        InputSchema::object(
            [("msg", SchemaProperty::new("string", "Message to echo"))],
            &["msg"],
        ),
        std::sync::Arc::new(|params| {
            Box::pin(async move { Ok(json!({"echoed": params["msg"].clone()})) })
        }),
    )
    .with_structured_schema(StructuredSchema::new(vec![ParamSpec::required(
        "msg",
        ParamType::String,
    )]))
}

fn manager_config(dir: &TempDir, tools_url: Option<String>) -> Config {
    Config {
        remote: RemoteApiConfig {
            enabled: tools_url.is_some(),
            tools_url,
            timeout: Duration::from_millis(500),
            retry_attempts: 2,
            retry_delay: Duration::from_millis(10),
        },
        tool_config: ToolConfigFile {
            path: dir.path().join("tool-config.json"),
        },
        ..Default::default()
    }
}

#[tokio::test]
async fn test_end_to_end_local_echo() {
    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(vec![echo_tool()], manager_config(&dir, None));
    manager.initialize().await.unwrap();

    manager.set_tool_enabled("echo", true).await.unwrap();
    let result = manager.call_tool("echo", json!({"msg": "hi"})).await.unwrap();

    assert_eq!(result.tool, "echo");
    assert_eq!(result.result, json!({"echoed": "hi"}));
    chrono::DateTime::parse_from_rfc3339(&result.executed_at).unwrap();
}

#[tokio::test]
async fn test_remote_tools_loaded_and_executed() {
    let (addr, doc) = start_remote_api().await;
    *doc.lock().unwrap() = json!({
        "tools": [remote_tool("calculate_tax", "/execute/ok", addr)],
        "version": "1.0",
    });

    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(
        vec![echo_tool()],
        manager_config(&dir, Some(format!("http://{}/tools", addr))),
    );
    manager.initialize().await.unwrap();

    let stats = manager.get_tool_stats();
    assert_eq!(stats.local, 1);
    assert_eq!(stats.remote, 1);
    assert_eq!(stats.total, 2);
    assert!(stats.remote_api_enabled);

    manager.set_tool_enabled("calculate_tax", true).await.unwrap();
    let result = manager
        .call_tool("calculate_tax", json!({"amount": 100.0}))
        .await
        .unwrap();
    assert_eq!(result.tool, "calculate_tax");
    // The mock echoes the execution request back.
    assert_eq!(result.result["received"]["tool"], "calculate_tax");
    assert_eq!(result.result["received"]["parameters"]["amount"], 100.0);
}

#[tokio::test]
async fn test_remote_logical_failure_is_execution_error() {
    let (addr, doc) = start_remote_api().await;
    *doc.lock().unwrap() = json!({
        "tools": [remote_tool("calculate_tax", "/execute/fail", addr)],
    });

    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(
        vec![],
        manager_config(&dir, Some(format!("http://{}/tools", addr))),
    );
    manager.initialize().await.unwrap();
    manager.set_tool_enabled("calculate_tax", true).await.unwrap();

    let err = manager
        .call_tool("calculate_tax", json!({"amount": 5.0}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Execution(_)));
    assert!(err.to_string().contains("tax table unavailable"), "got: {}", err);
}

#[tokio::test]
async fn test_remote_overrides_local_with_same_name() {
    let (addr, doc) = start_remote_api().await;
    *doc.lock().unwrap() = json!({
        "tools": [remote_tool("echo", "/execute/ok", addr)],
    });

    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(
        vec![echo_tool()],
        manager_config(&dir, Some(format!("http://{}/tools", addr))),
    );
    manager.initialize().await.unwrap();
    manager.set_tool_enabled("echo", true).await.unwrap();

    let remote = manager.get_tools_by_type(ToolKind::Remote);
    assert_eq!(remote.len(), 1);
    assert_eq!(remote[0].name, "echo");

    // The merged listing reflects the remote definition, not the local one.
    let merged = manager.get_tools();
    let echo = merged.iter().find(|t| t.name == "echo").unwrap();
    assert_eq!(echo.description, "echo (remote)");
    assert!(echo.input_schema.required.contains(&"amount".to_string()));

    // Dispatch follows the override too: the remote delegate answers.
    let result = manager.call_tool("echo", json!({"amount": 1.0})).await.unwrap();
    assert_eq!(result.result["received"]["tool"], "echo");
}

#[tokio::test]
async fn test_refresh_with_unreachable_endpoint_is_idempotent() {
    // Bind then drop a listener so the port is known-closed.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(
        vec![echo_tool()],
        manager_config(&dir, Some(format!("http://{}/tools", addr))),
    );
    manager.initialize().await.unwrap();

    for _ in 0..2 {
        let outcome = manager.refresh_remote_tools().await;
        assert!(!outcome.success);
        assert_eq!(outcome.remote_tools, 0);
        assert_eq!(manager.get_tool_stats().remote, 0);
    }

    // Local tools keep working throughout.
    manager.set_tool_enabled("echo", true).await.unwrap();
    manager.call_tool("echo", json!({"msg": "still here"})).await.unwrap();
}

#[tokio::test]
async fn test_refresh_replaces_remote_set_and_reconciles_config() {
    let (addr, doc) = start_remote_api().await;
    *doc.lock().unwrap() = json!({
        "tools": [remote_tool("old_tool", "/execute/ok", addr)],
    });

    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(
        vec![],
        manager_config(&dir, Some(format!("http://{}/tools", addr))),
    );
    manager.initialize().await.unwrap();
    assert_eq!(manager.get_tool_stats().remote, 1);

    *doc.lock().unwrap() = json!({
        "tools": [remote_tool("new_tool", "/execute/ok", addr)],
    });
    let outcome = manager.refresh_remote_tools().await;
    assert!(outcome.success);
    assert_eq!(outcome.remote_tools, 1);

    // The old remote tool is fully gone: registry, dispatch, and config.
    let err = manager.call_tool("old_tool", json!({"amount": 1.0})).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let configs = manager.get_tool_configurations().await;
    let names: Vec<&str> = configs.iter().map(|c| c.tool_name.as_str()).collect();
    assert_eq!(names, vec!["new_tool"]);
}

#[tokio::test]
async fn test_stale_persisted_names_dropped_on_initialize() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("tool-config.json"),
        r#"[{"toolName": "ghost_tool", "enabled": true}, {"toolName": "echo", "enabled": true}]"#,
    )
    .unwrap();

    let manager = ToolManager::with_local_tools(vec![echo_tool()], manager_config(&dir, None));
    manager.initialize().await.unwrap();

    let configs = manager.get_tool_configurations().await;
    let names: Vec<&str> = configs.iter().map(|c| c.tool_name.as_str()).collect();
    assert_eq!(names, vec!["echo"]);

    // The surviving entry kept its hand-edited enabled flag.
    let result = manager.call_tool("echo", json!({"msg": "kept"})).await.unwrap();
    assert_eq!(result.result, json!({"echoed": "kept"}));
}

#[tokio::test]
async fn test_disabled_remote_tool_invisible_and_uncallable() {
    let (addr, doc) = start_remote_api().await;
    *doc.lock().unwrap() = json!({
        "tools": [remote_tool("calculate_tax", "/execute/ok", addr)],
    });

    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(
        vec![],
        manager_config(&dir, Some(format!("http://{}/tools", addr))),
    );
    manager.initialize().await.unwrap();

    // Newly arrived remote tools default to disabled (fail closed).
    let listed: Vec<String> = manager.get_tools().into_iter().map(|t| t.name).collect();
    assert!(!listed.contains(&"calculate_tax".to_string()));

    let err = manager
        .call_tool("calculate_tax", json!({"amount": 1.0}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Disabled(_)));
}

#[tokio::test]
async fn test_enabled_state_survives_restart() {
    let dir = TempDir::new().unwrap();

    let manager = ToolManager::with_local_tools(vec![echo_tool()], manager_config(&dir, None));
    manager.initialize().await.unwrap();
    manager.set_tool_enabled("echo", true).await.unwrap();
    drop(manager);

    let manager = ToolManager::with_local_tools(vec![echo_tool()], manager_config(&dir, None));
    manager.initialize().await.unwrap();
    assert_eq!(manager.get_tools().len(), 1);
    manager.call_tool("echo", json!({"msg": "back"})).await.unwrap();
}

#[tokio::test]
async fn test_validation_gate_on_remote_schema() {
    let (addr, doc) = start_remote_api().await;
    *doc.lock().unwrap() = json!({
        "tools": [remote_tool("calculate_tax", "/execute/ok", addr)],
    });

    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(
        vec![],
        manager_config(&dir, Some(format!("http://{}/tools", addr))),
    );
    manager.initialize().await.unwrap();
    manager.set_tool_enabled("calculate_tax", true).await.unwrap();

    let err = manager.call_tool("calculate_tax", json!({})).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(err.to_string().contains("amount"));

    let err = manager
        .call_tool("calculate_tax", json!({"amount": "lots"}))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn test_builtin_refresh_tool_callable() {
    let (addr, doc) = start_remote_api().await;
    *doc.lock().unwrap() = json!({"tools": []});

    let dir = TempDir::new().unwrap();
    let manager = ToolManager::with_local_tools(
        vec![],
        manager_config(&dir, Some(format!("http://{}/tools", addr))),
    );
    manager.initialize().await.unwrap();

    let listed: Vec<String> = manager.get_tools().into_iter().map(|t| t.name).collect();
    assert_eq!(listed, vec!["refresh_remote_tools"]);

    let result = manager
        .call_tool("refresh_remote_tools", json!({}))
        .await
        .unwrap();
    assert_eq!(result.result["success"], true);
    assert_eq!(result.result["remoteTools"], 0);
}
