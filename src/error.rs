//! Error types for the control plane, split by surface.
//!
//! `ProtoError` values become the `error` field of a wire response, so their
//! display text is part of the protocol. Domain-level failures ("Failed to
//! register UE ue1") are not errors here; they travel as response text.

use std::path::PathBuf;
use thiserror::Error;

/// Routing and validation failures raised while resolving a navigation or
/// execution request. Every variant maps to an HTTP 400 with the display
/// text in the `error` field.
#[derive(Debug, Error, PartialEq)]
pub enum ProtoError {
    #[error("Invalid request format: {0}")]
    InvalidRequest(String),

    #[error("Current context not found: {0}")]
    ContextNotFound(String),

    #[error("{what} is required for {command} command")]
    MissingArgument {
        what: &'static str,
        command: &'static str,
    },

    #[error("Already at root context")]
    AlreadyAtRoot,

    #[error("Invalid context type. Use 'emulator', 'ue', or 'gnb'")]
    InvalidContextType,

    #[error("Can only select nodes from a context set")]
    SelectOutsideSet,

    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    #[error("Unknown navigation command: {0}")]
    UnknownNavigation(String),

    #[error("invalid node type")]
    InvalidNodeType,

    #[error("invalid object type")]
    InvalidObjectType,

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("flag provided but not defined: --{0}")]
    UnknownFlag(String),

    #[error("invalid value \"{value}\" for flag --{flag}")]
    InvalidFlag { flag: String, value: String },

    #[error("command produced no response")]
    NoResponse,
}

/// Failures on the operator-client side.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("not connected to a server")]
    NotConnected,

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Error text a server placed in a response `error` field.
    #[error("{0}")]
    Server(String),

    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Failures while binding or running the HTTP listeners.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Failures while loading configuration or initializing logging.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to initialize logging: {0}")]
    Logging(String),
}
