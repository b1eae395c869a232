//! Integration tests for the context-tree HTTP surface
//!
//! Tests cover:
//! - Readiness probe
//! - Node listings and the command descriptor endpoint
//! - A full navigation walk across the tree
//! - Routing errors and malformed payloads on the wire

use crate::integration::test_utils::{nav_request, navigate, spawn_app};
use ranctl::proto::{CommandInfo, ContextKind, NavigationResponse};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_readiness_probe() {
    let base = spawn_app().await;
    let resp = reqwest::get(format!("{base}/api/context")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["message"], "Context API is ready");
}

#[tokio::test]
async fn test_list_nodes_by_type() {
    let base = spawn_app().await;

    let resp = reqwest::get(format!("{base}/api/context/node/ue"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["nodes"], serde_json::json!(["ue1", "ue2", "ue3"]));

    let resp = reqwest::get(format!("{base}/api/context/node/gnb"))
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["nodes"], serde_json::json!(["gnb1", "gnb2"]));

    let resp = reqwest::get(format!("{base}/api/context/node/smf"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "invalid object type");
}

#[tokio::test]
async fn test_node_commands_fall_back_to_catalog() {
    let base = spawn_app().await;

    // ue1 has never been selected; the catalog answers for its type.
    let resp = reqwest::get(format!("{base}/api/context/node/ue/ue1/commands"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let commands: Vec<CommandInfo> = resp.json().await.unwrap();
    let names: Vec<_> = commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["register", "deregister", "create-session"]);

    let resp = reqwest::get(format!("{base}/api/context/node/smf/x/commands"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Node context not found");
}

#[tokio::test]
async fn test_navigation_walk() {
    let base = spawn_app().await;

    let (status, resp) = navigate(
        &base,
        &nav_request("root", "connect", &["http://localhost:4000"]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.context.kind, ContextKind::Server);
    assert_eq!(
        resp.message,
        "Connected to server: http://localhost:4000, type help to see commands"
    );

    let (status, resp) = navigate(&base, &nav_request("server", "use", &["ue"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.prompt, "ue >>> ");
    assert_eq!(
        resp.message,
        "Available ue objects:\n  - ue1\n  - ue2\n  - ue3\n"
    );

    let (status, resp) = navigate(&base, &nav_request("ue", "select", &["ue1"])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.message, "Selected node: ue1");
    assert_eq!(resp.prompt, "ue1 >>> ");
    let names: Vec<_> = resp.commands.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["register", "deregister", "create-session"]);

    let mut back = nav_request("ue1", "back", &[]);
    back.node_type = "ue".to_string();
    let (status, resp) = navigate(&base, &back).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.message, "Back to ue context");

    let (status, resp) = navigate(&base, &nav_request("ue", "disconnect", &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.message, "Disconnected from server");
    assert_eq!(resp.context.kind, ContextKind::Root);
}

#[tokio::test]
async fn test_navigation_routing_errors() {
    let base = spawn_app().await;

    let cases: &[(&str, &str, &[&str], &str)] = &[
        ("root", "back", &[], "Already at root context"),
        (
            "server",
            "select",
            &["ue1"],
            "Can only select nodes from a context set",
        ),
        (
            "server",
            "use",
            &["smf"],
            "Invalid context type. Use 'emulator', 'ue', or 'gnb'",
        ),
        ("ghost", "back", &[], "Current context not found: ghost"),
        ("root", "teleport", &[], "Unknown navigation command: teleport"),
    ];
    for (current, command, args, want) in cases {
        let (status, resp) = navigate(&base, &nav_request(current, command, args)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{command} from {current}");
        assert_eq!(resp.error, *want);
        assert!(resp.message.is_empty());
    }
}

#[tokio::test]
async fn test_malformed_payload_is_rejected() {
    let base = spawn_app().await;
    let resp = reqwest::Client::new()
        .post(format!("{base}/api/context/navigate"))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: NavigationResponse = resp.json().await.unwrap();
    assert!(body.error.starts_with("Invalid request format:"));
}
