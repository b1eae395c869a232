//! Integration tests for the RAN emulator control plane

mod client_server;
mod context_api;
mod exec_api;
mod test_utils;
