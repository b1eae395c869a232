//! ranctl: Remote Control for a 5G RAN Emulator
//!
//! A context-navigation and command-dispatch control plane: the server side
//! exposes a tree of operational contexts (root, server, per-node-type sets,
//! individual nodes) with a command catalog per node type; the client side
//! mirrors the tree in a context stack and rebinds its interactive commands
//! on every transition.

pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod nodes;
pub mod proto;
pub mod server;
pub mod tree;
