//! End-to-end tests driving the interactive client against real listeners
//!
//! Tests cover:
//! - A full connect / use / select / exec / back / disconnect walk
//! - Command binding from navigation responses and the commands endpoint
//! - The AMF direct-connect personality
//! - Connection failures leaving the session untouched

use ranctl::client::{Binding, HttpTransport, Session};
use ranctl::error::ClientError;
use ranctl::nodes::ApiSet;
use ranctl::proto::ContextKind;
use ranctl::server::{amf_router, router, AmfState, AppState};
use std::time::Duration;

const EXEC_TIMEOUT: Duration = Duration::from_secs(5);

/// Runs a router on its own thread so the synchronous client side can own
/// the calling thread. The server keeps running until the process exits.
fn spawn_server(app: axum::Router) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}

fn new_session() -> Session {
    Session::new(Box::new(HttpTransport::new().unwrap()))
}

#[test]
fn test_full_session_walk() {
    let base = spawn_server(router(AppState::new(ApiSet::stub(), EXEC_TIMEOUT)));
    let mut session = new_session();

    let message = session.connect(&base).unwrap();
    assert!(message.starts_with("Connected to server: http://127.0.0.1:"));
    assert_eq!(session.depth(), 2);

    let message = session.navigate("use", &["ue".to_string()]).unwrap();
    assert!(message.starts_with("Available ue objects:\n"));
    assert_eq!(session.prompt(), "ue >>> ");

    session.navigate("select", &["ue1".to_string()]).unwrap();
    assert_eq!(session.depth(), 4);
    assert!(matches!(
        session.binding("register"),
        Some(Binding::Remote { .. })
    ));

    let out = session
        .exec_remote("ue", "ue1", "register", &["--emergency".to_string()])
        .unwrap();
    assert_eq!(out, "UE ue1 registered successfully");

    let help = session
        .exec_remote("ue", "ue1", "register", &["--help".to_string()])
        .unwrap();
    assert!(help.starts_with("register [command [command options]]"));

    let err = session.exec_remote("ue", "ue1", "warp", &[]).unwrap_err();
    assert_eq!(err.to_string(), "server error: command not found: warp");

    session.navigate("back", &[]).unwrap();
    assert_eq!(session.depth(), 3);

    let message = session.navigate("disconnect", &[]).unwrap();
    assert_eq!(message, "Disconnected from server");
    assert_eq!(session.depth(), 1);
    assert!(session.server_url().is_none());
}

#[test]
fn test_use_emulator_binds_fetched_commands() {
    let base = spawn_server(router(AppState::new(ApiSet::stub(), EXEC_TIMEOUT)));
    let mut session = new_session();
    session.connect(&base).unwrap();

    let message = session.navigate("use", &["emulator".to_string()]).unwrap();
    assert_eq!(message, "Switched to emulator context");
    assert_eq!(session.prompt(), "emulator >>> ");
    // The navigation response carried no descriptors; these came from the
    // commands endpoint.
    assert!(matches!(
        session.binding("add-ue"),
        Some(Binding::Remote { .. })
    ));

    let out = session
        .exec_remote("emulator", "emulator", "list-gnb", &[])
        .unwrap();
    assert_eq!(out, "gnb1\ngnb2");
}

#[test]
fn test_amf_direct_connect() {
    let base = spawn_server(amf_router(AmfState::new(ApiSet::stub(), EXEC_TIMEOUT)));
    let mut session = new_session();

    // The AMF listener serves no /api/context route; any answer counts as
    // alive for the probe.
    let message = session.connect(&base).unwrap();
    assert!(message.starts_with("Connected to AMF: "));
    assert_eq!(session.current().kind, ContextKind::Amf);
    assert_eq!(session.prompt(), ">>> ");
    assert!(matches!(
        session.binding("list-ues"),
        Some(Binding::Remote { .. })
    ));
    assert!(session.binding("back").is_none());

    let out = session.exec_remote("amf", "amf", "list-ues", &[]).unwrap();
    assert!(out.starts_with("UE contexts:\n"));

    let message = session.navigate("disconnect", &[]).unwrap();
    assert_eq!(message, "Disconnect AMF successfully.");
    assert_eq!(session.depth(), 1);
}

#[test]
fn test_connect_refused_leaves_session_at_root() {
    let mut session = new_session();
    let err = session.connect("http://127.0.0.1:1").unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
    assert_eq!(session.depth(), 1);
    assert!(session.server_url().is_none());
}
