//! Wire records exchanged by the control-plane server and the operator client.
//!
//! Field names follow the JSON the navigation and execution endpoints use.
//! Empty strings and empty lists mean "not provided"; the `error` fields carry
//! routing problems only, never domain-level failure text.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Kind of a navigation context.
///
/// `Amf` is the direct-connect personality: it is reachable only through the
/// second listener and never appears in the context tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextKind {
    #[default]
    Root,
    Server,
    ContextSet,
    Node,
    Amf,
}

impl fmt::Display for ContextKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContextKind::Root => "root",
            ContextKind::Server => "server",
            ContextKind::ContextSet => "context_set",
            ContextKind::Node => "node",
            ContextKind::Amf => "amf",
        };
        f.write_str(s)
    }
}

/// Descriptive metadata for one invocable command. Immutable once built;
/// the server pairs it with an action internally, but no behavior travels
/// on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandInfo {
    pub name: String,
    pub usage: String,
    pub description: String,
    pub args_usage: String,
    pub flags: Vec<FlagInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subcommands: Vec<CommandInfo>,
}

impl CommandInfo {
    /// Flagless descriptor, for the built-in navigation commands.
    pub fn new(name: &str, usage: &str, description: &str, args_usage: &str) -> Self {
        Self {
            name: name.to_string(),
            usage: usage.to_string(),
            description: description.to_string(),
            args_usage: args_usage.to_string(),
            flags: Vec::new(),
            subcommands: Vec::new(),
        }
    }
}

/// Descriptor for one command flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlagInfo {
    pub name: String,
    pub usage: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_text: String,
    pub required: bool,
}

/// Request to run one command against one `(node_type, node_name)` pair.
///
/// Either `raw_command` carries the whole unparsed line, or `command_path`
/// names the command and `args`/`flags` carry the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommandRequest {
    pub node_type: String,
    pub node_name: String,
    pub command_path: String,
    pub raw_command: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, String>,
}

/// Result of a command execution: exactly one of `response` or `error` is
/// non-empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandResponse {
    pub response: String,
    pub error: String,
}

impl CommandResponse {
    pub fn ok(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            error: String::new(),
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            response: String::new(),
            error: error.into(),
        }
    }
}

/// Request to move between contexts.
///
/// `node_type` disambiguates identically-named contexts: a `node` context is
/// keyed by `type:name`, so the name alone is not unique.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NavigationRequest {
    pub current_context: String,
    pub command: String,
    pub args: Vec<String>,
    #[serde(rename = "serverURL")]
    pub server_url: String,
    pub node_type: String,
}

/// Result of a navigation: the new context with its prompt, a human message,
/// and the command list when the target is a node context.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationResponse {
    pub context: ClientContext,
    pub prompt: String,
    pub message: String,
    pub commands: Vec<CommandInfo>,
    pub error: String,
}

impl NavigationResponse {
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }
}

/// Snapshot of one context as the client stores it on its stack.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientContext {
    #[serde(rename = "type")]
    pub kind: ContextKind,
    pub name: String,
    #[serde(rename = "serverURL")]
    pub server_url: String,
    pub description: String,
    pub parent_path: String,
    pub children_paths: Vec<String>,
    pub node_type: String,
    pub commands: Vec<String>,
}
