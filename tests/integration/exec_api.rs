//! Integration tests for the command execution endpoint
//!
//! Tests cover:
//! - Dispatch against each node type in the tree catalog
//! - Raw command lines versus structured command paths
//! - Help short-circuiting before the action runs
//! - Flag forms and routing errors on the wire

use crate::integration::test_utils::{exec, exec_request, spawn_app};
use reqwest::StatusCode;

#[tokio::test]
async fn test_register_with_flag() {
    let base = spawn_app().await;
    let (status, resp) = exec(
        &base,
        &exec_request("ue", "ue1", "register", &["--emergency"]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.response, "UE ue1 registered successfully");
    assert!(resp.error.is_empty());
}

#[tokio::test]
async fn test_raw_command_wins_over_command_path() {
    let base = spawn_app().await;
    let mut req = exec_request("emulator", "emulator", "list-gnb", &[]);
    req.raw_command = "list-ue".to_string();
    let (status, resp) = exec(&base, &req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.response, "ue1\nue2\nue3");
}

#[tokio::test]
async fn test_help_flag_short_circuits_the_action() {
    let base = spawn_app().await;

    let (status, resp) = exec(
        &base,
        &exec_request(
            "emulator",
            "emulator",
            "add-ue",
            &["imsi-208930000000099", "--help"],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(resp.response.starts_with("add-ue <supi>"));
    assert!(resp.response.contains("Options:\n   --register:"));

    // The UE was not added.
    let (_, resp) = exec(&base, &exec_request("emulator", "emulator", "list-ue", &[])).await;
    assert_eq!(resp.response, "ue1\nue2\nue3");
}

#[tokio::test]
async fn test_add_ue_extends_inventory() {
    let base = spawn_app().await;

    let (status, resp) = exec(
        &base,
        &exec_request("emulator", "emulator", "add-ue", &["imsi-208930000000099"]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        resp.response,
        "UE imsi-208930000000099 added successfully to emulator"
    );

    let (_, resp) = exec(&base, &exec_request("emulator", "emulator", "list-ue", &[])).await;
    assert_eq!(resp.response, "ue1\nue2\nue3\nimsi-208930000000099");
}

#[tokio::test]
async fn test_missing_positional_is_response_text() {
    let base = spawn_app().await;
    let (status, resp) = exec(&base, &exec_request("emulator", "emulator", "add-ue", &[])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp.response, "Error: SUPI is required");
    assert!(resp.error.is_empty());
}

#[tokio::test]
async fn test_routing_failures_are_wire_errors() {
    let base = spawn_app().await;

    let (status, resp) = exec(&base, &exec_request("smf", "smf1", "status", &[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error, "invalid node type");
    assert!(resp.response.is_empty());

    let (status, resp) = exec(&base, &exec_request("ue", "ue1", "warp", &[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error, "command not found: warp");

    let (status, resp) = exec(&base, &exec_request("ue", "ue1", "register", &["--bogus"])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error, "flag provided but not defined: --bogus");

    let (status, resp) = exec(
        &base,
        &exec_request("ue", "ue1", "deregister", &["--type=many"]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp.error, "invalid value \"many\" for flag --type");
}

#[tokio::test]
async fn test_flag_forms_on_the_wire() {
    let base = spawn_app().await;

    let (_, resp) = exec(&base, &exec_request("ue", "ue1", "deregister", &["--type=1"])).await;
    assert_eq!(resp.response, "UE ue1 deregistered successfully");

    let (_, resp) = exec(
        &base,
        &exec_request("ue", "ue1", "create-session", &["--slice", "urllc"]),
    )
    .await;
    assert_eq!(resp.response, "Session created successfully for UE ue1");

    let (_, resp) = exec(
        &base,
        &exec_request("gnb", "gnb1", "release-session", &["ue1", "--id", "2"]),
    )
    .await;
    assert_eq!(
        resp.response,
        "Session 2 for UE ue1 released successfully from gNB gnb1"
    );
}
