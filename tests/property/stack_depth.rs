//! Property-based tests for the client session stack
//!
//! Drives a session through random navigation sequences against an
//! in-process context tree and checks the stack accounting and command
//! table after every step.

use proptest::prelude::*;
use ranctl::catalog::Catalog;
use ranctl::client::{Session, Transport};
use ranctl::error::ClientError;
use ranctl::nodes::StubEmulator;
use ranctl::proto::{
    CommandInfo, CommandRequest, CommandResponse, NavigationRequest, NavigationResponse,
};
use ranctl::tree::ContextTree;
use std::sync::Arc;

/// Answers navigation straight from an in-process context tree, with the
/// catalog serving the command fetches a real server would.
struct LoopbackTransport {
    tree: Arc<ContextTree>,
}

impl Transport for LoopbackTransport {
    fn probe(&self, _base_url: &str) -> Result<(), ClientError> {
        Ok(())
    }

    fn navigate(
        &self,
        _base_url: &str,
        req: &NavigationRequest,
    ) -> Result<NavigationResponse, ClientError> {
        Ok(self
            .tree
            .navigate(req)
            .unwrap_or_else(|e| NavigationResponse::failure(e.to_string())))
    }

    fn exec(
        &self,
        _base_url: &str,
        _req: &CommandRequest,
    ) -> Result<CommandResponse, ClientError> {
        Ok(CommandResponse::ok(""))
    }

    fn fetch_commands(
        &self,
        _base_url: &str,
        node_type: &str,
        _node_name: &str,
    ) -> Vec<CommandInfo> {
        self.tree.commands_for_type(node_type)
    }
}

fn loopback_session() -> Session {
    let tree = Arc::new(ContextTree::new(
        Arc::new(Catalog::tree()),
        Arc::new(StubEmulator::new()),
    ));
    Session::new(Box::new(LoopbackTransport { tree }))
}

#[derive(Debug, Clone)]
enum Op {
    Use(String),
    Select(String),
    Back,
    Disconnect,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::sample::select(vec!["ue", "gnb", "emulator", "smf"])
            .prop_map(|t| Op::Use(t.to_string())),
        prop::sample::select(vec!["ue1", "ue2", "gnb1", "emulator", "nope"])
            .prop_map(|n| Op::Select(n.to_string())),
        Just(Op::Back),
        Just(Op::Disconnect),
    ]
}

fn apply(session: &mut Session, op: &Op) -> Result<String, ClientError> {
    match op {
        Op::Use(t) => session.navigate("use", &[t.clone()]),
        Op::Select(n) => session.navigate("select", &[n.clone()]),
        Op::Back => session.navigate("back", &[]),
        Op::Disconnect => session.navigate("disconnect", &[]),
    }
}

/// Test that any navigation sequence moves the stack depth by at most one
/// per step, never drops it below the root entry, and keeps the reported
/// connection state consistent with the outcome.
#[test]
fn test_stack_depth_invariants() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(op_strategy(), 0..40), |ops| {
            let mut session = loopback_session();
            session.connect("http://localhost:4000").unwrap();

            for op in &ops {
                let before = session.depth();
                let connected = session.server_url().is_some();
                let result = apply(&mut session, op);

                match (op, &result) {
                    (_, Err(ClientError::NotConnected)) => {
                        assert!(!connected);
                        assert_eq!(session.depth(), 1);
                    }
                    // A rejected transition leaves everything in place.
                    (_, Err(_)) => {
                        assert_eq!(session.depth(), before);
                        assert_eq!(session.server_url().is_some(), connected);
                    }
                    (Op::Back, Ok(_)) => assert_eq!(session.depth(), before - 1),
                    (Op::Disconnect, Ok(message)) => {
                        if message == "Already at root context" {
                            assert_eq!(before, 1);
                            assert_eq!(session.depth(), 1);
                            assert!(session.server_url().is_some());
                        } else {
                            assert_eq!(session.depth(), 1);
                            assert!(session.server_url().is_none());
                        }
                    }
                    (Op::Use(_), Ok(_)) | (Op::Select(_), Ok(_)) => {
                        assert_eq!(session.depth(), before + 1)
                    }
                }
                assert!(session.depth() >= 1);
            }
            Ok(())
        })
        .unwrap();
}

/// Test that the command table always tracks the current context: the
/// basics are ever-present, `connect` exists only at root, and `back`
/// exists only below it.
#[test]
fn test_binding_table_tracks_context() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(&prop::collection::vec(op_strategy(), 0..24), |ops| {
            let mut session = loopback_session();
            session.connect("http://localhost:4000").unwrap();

            for op in &ops {
                let _ = apply(&mut session, op);
                assert!(session.binding("help").is_some());
                assert!(session.binding("clear").is_some());
                assert!(session.binding("exit").is_some());
                assert_eq!(session.binding("connect").is_some(), session.depth() == 1);
                assert_eq!(session.binding("back").is_some(), session.depth() > 1);
            }
            Ok(())
        })
        .unwrap();
}
