//! Command execution engine: request parsing, flag classification, and the
//! single-use response rendezvous between the engine and a command action.

use crate::catalog::{help_text, Catalog, FlagValues};
use crate::error::ProtoError;
use crate::nodes::ApiSet;
use crate::proto::CommandRequest;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Parsed but untyped view of a command request: the command name, its
/// positional arguments in original order, and raw `--flag` strings.
#[derive(Debug, Clone, PartialEq)]
pub struct RawInvocation {
    pub command: String,
    pub args: Vec<String>,
    pub flags: BTreeMap<String, String>,
    pub help: bool,
}

/// Typed view handed to an action once the command is resolved.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Node the command is scoped to; empty outside node contexts. Actions
    /// use it for message formatting only.
    pub node_name: String,
    pub args: Vec<String>,
    pub flags: FlagValues,
}

/// Single-use reply channel handed to an action. Consuming `send` makes a
/// second write unrepresentable; dropping the slot without sending surfaces
/// as [`ProtoError::NoResponse`] at the engine.
pub struct ResponseSlot(oneshot::Sender<String>);

impl ResponseSlot {
    pub fn channel() -> (Self, oneshot::Receiver<String>) {
        let (sender, receiver) = oneshot::channel();
        (Self(sender), receiver)
    }

    pub fn send(self, response: impl Into<String>) {
        // The receiver only disappears once the engine times out; nothing
        // useful remains to do with the text then.
        let _ = self.0.send(response.into());
    }
}

/// Splits a request into command name, positionals, and raw flags.
///
/// A non-empty `raw_command` wins over `command_path` and is split on
/// whitespace. Tokens starting with `-` are flags: `--flag=value` splits on
/// the first `=`, a flag followed by a non-flag token takes that token as
/// value, and a flag followed by another flag (or nothing) is boolean true.
/// `--help`/`-h` is lifted out of the flag set.
pub fn parse_request(req: &CommandRequest) -> RawInvocation {
    let (command, tokens): (String, Vec<String>) = if req.raw_command.is_empty() {
        (req.command_path.clone(), req.args.clone())
    } else {
        let mut parts = req.raw_command.split_whitespace().map(str::to_string);
        let command = parts.next().unwrap_or_default();
        (command, parts.collect())
    };

    let mut flags = req.flags.clone();
    let mut args = Vec::new();
    let mut help = false;

    let mut iter = tokens.into_iter().peekable();
    while let Some(token) = iter.next() {
        let Some(stripped) = token.strip_prefix('-') else {
            args.push(token);
            continue;
        };
        let name = stripped.trim_start_matches('-');
        if name == "help" || name == "h" {
            help = true;
        } else if let Some((name, value)) = name.split_once('=') {
            flags.insert(name.to_string(), value.to_string());
        } else if iter.peek().map_or(false, |next| !next.starts_with('-')) {
            if let Some(value) = iter.next() {
                flags.insert(name.to_string(), value);
            }
        } else {
            flags.insert(name.to_string(), "true".to_string());
        }
    }

    RawInvocation {
        command,
        args,
        flags,
        help,
    }
}

/// Runs commands from one catalog against one API set.
pub struct Engine {
    catalog: Arc<Catalog>,
    apis: ApiSet,
    timeout: Duration,
}

impl Engine {
    pub fn new(catalog: Arc<Catalog>, apis: ApiSet, timeout: Duration) -> Self {
        Self {
            catalog,
            apis,
            timeout,
        }
    }

    /// Resolves and runs one request, returning the response text.
    ///
    /// `--help` anywhere in the request short-circuits before the action
    /// runs. The action itself executes on a blocking thread; a bounded wait
    /// on the reply keeps a stuck action from wedging the listener.
    pub async fn execute(&self, req: &CommandRequest) -> Result<String, ProtoError> {
        let raw = parse_request(req);
        debug!(node_type = %req.node_type, command = %raw.command, "executing command");

        if raw.help {
            return Ok(match self.catalog.find(&req.node_type, &raw.command) {
                Some(spec) => help_text(spec),
                None => "No help available for this command".to_string(),
            });
        }

        if !self.catalog.has_node_type(&req.node_type) {
            return Err(ProtoError::InvalidNodeType);
        }
        let spec = self
            .catalog
            .find(&req.node_type, &raw.command)
            .ok_or_else(|| ProtoError::CommandNotFound(raw.command.clone()))?;

        let flags = FlagValues::resolve(&spec.flags, &raw.flags)?;
        let invocation = Invocation {
            node_name: req.node_name.clone(),
            args: raw.args,
            flags,
        };

        let action = spec.action;
        let apis = self.apis.clone();
        let (slot, receiver) = ResponseSlot::channel();
        tokio::task::spawn_blocking(move || action(&apis, &invocation, slot));

        match tokio::time::timeout(self.timeout, receiver).await {
            Ok(Ok(response)) => Ok(response),
            Ok(Err(_)) | Err(_) => {
                warn!(command = %raw.command, "command action produced no response");
                Err(ProtoError::NoResponse)
            }
        }
    }
}

#[cfg(test)]
pub(crate) fn run_action(
    action: crate::catalog::Action,
    apis: &ApiSet,
    invocation: &Invocation,
) -> String {
    let (slot, mut receiver) = ResponseSlot::channel();
    action(apis, invocation, slot);
    receiver.try_recv().expect("action did not answer")
}
