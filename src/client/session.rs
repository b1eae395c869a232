//! Client-side navigation state.
//!
//! The session mirrors the server's context tree with a local stack: the
//! root entry is fixed, every successful navigation pushes or pops, and a
//! command table is rebuilt from the new top after each transition. Failed
//! calls never touch the stack.

use crate::client::transport::Transport;
use crate::error::ClientError;
use crate::proto::{
    ClientContext, CommandInfo, CommandRequest, ContextKind, NavigationRequest,
    NavigationResponse,
};
use std::collections::BTreeMap;

/// Commands the client answers without a server round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    Help,
    Clear,
    Exit,
    Connect,
    Back,
    Disconnect,
    Use,
    Select,
}

/// One entry in the command table of the current context.
#[derive(Debug, Clone)]
pub enum Binding {
    Local {
        command: LocalCommand,
        usage: String,
    },
    Remote {
        info: CommandInfo,
        node_type: String,
        node_name: String,
    },
}

const GENERAL_COMMANDS: &str = concat!(
    "General commands:\n",
    "  back                Go back to previous context\n",
    "  clear               Clear the screen\n",
    "  disconnect          Disconnect server\n",
    "  exit                Exit the client\n",
    "  help                Display this help\n",
);

/// Builds the command table for a context.
///
/// Each kind carries a fixed set of local commands. Server-sent descriptors
/// then overlay the table: a descriptor whose name matches a local command
/// only replaces its usage text, anything else binds as a remote command
/// against the context's node.
pub fn bindings_for(entry: &ClientContext, infos: &[CommandInfo]) -> BTreeMap<String, Binding> {
    let locals: &[(&str, LocalCommand, &str)] = match entry.kind {
        ContextKind::Root => &[
            ("help", LocalCommand::Help, "display help"),
            ("clear", LocalCommand::Clear, "clear the screen"),
            ("exit", LocalCommand::Exit, "exit the program"),
            (
                "connect",
                LocalCommand::Connect,
                "Connect to a server [connect http://localhost:4000]",
            ),
        ],
        ContextKind::Server => &[
            ("help", LocalCommand::Help, "display help"),
            ("clear", LocalCommand::Clear, "clear the screen"),
            ("exit", LocalCommand::Exit, "exit the program"),
            ("back", LocalCommand::Back, "Go back to previous context"),
            ("disconnect", LocalCommand::Disconnect, "Disconnect from server"),
            (
                "use",
                LocalCommand::Use,
                "Select a context to use [use emulator | ue | gnb]",
            ),
        ],
        ContextKind::ContextSet => &[
            ("help", LocalCommand::Help, "display help"),
            ("clear", LocalCommand::Clear, "clear the screen"),
            ("exit", LocalCommand::Exit, "exit the program"),
            ("back", LocalCommand::Back, "Go back to previous context"),
            ("disconnect", LocalCommand::Disconnect, "Disconnect from server"),
            (
                "select",
                LocalCommand::Select,
                "Select a node to interact with [select <node-name>]",
            ),
        ],
        ContextKind::Node => &[
            ("help", LocalCommand::Help, "display help"),
            ("clear", LocalCommand::Clear, "clear the screen"),
            ("exit", LocalCommand::Exit, "exit the program"),
            ("back", LocalCommand::Back, "Go back to previous context"),
            ("disconnect", LocalCommand::Disconnect, "Disconnect from server"),
        ],
        ContextKind::Amf => &[
            ("help", LocalCommand::Help, "display help"),
            ("clear", LocalCommand::Clear, "clear the screen"),
            ("exit", LocalCommand::Exit, "exit the program"),
            ("disconnect", LocalCommand::Disconnect, "Disconnect from server"),
        ],
    };

    let mut bindings = BTreeMap::new();
    for (name, command, usage) in locals {
        bindings.insert(
            (*name).to_string(),
            Binding::Local {
                command: *command,
                usage: (*usage).to_string(),
            },
        );
    }
    for info in infos {
        match bindings.entry(info.name.clone()) {
            std::collections::btree_map::Entry::Occupied(mut slot) => {
                if let Binding::Local { usage, .. } = slot.get_mut() {
                    *usage = info.usage.clone();
                }
            }
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(Binding::Remote {
                    info: info.clone(),
                    node_type: entry.node_type.clone(),
                    node_name: entry.name.clone(),
                });
            }
        }
    }
    bindings
}

/// The interactive session: connection state, context stack, and the
/// command table of the current context.
pub struct Session {
    transport: Box<dyn Transport>,
    root: ClientContext,
    /// Contexts above root, innermost last.
    stack: Vec<ClientContext>,
    server_url: Option<String>,
    bindings: BTreeMap<String, Binding>,
    prompt: String,
}

impl Session {
    pub fn new(transport: Box<dyn Transport>) -> Self {
        let root = root_context();
        let bindings = bindings_for(&root, &[]);
        Self {
            transport,
            root,
            stack: Vec::new(),
            server_url: None,
            bindings,
            prompt: ">>> ".to_string(),
        }
    }

    pub fn current(&self) -> &ClientContext {
        self.stack.last().unwrap_or(&self.root)
    }

    /// Stack depth counting the root entry.
    pub fn depth(&self) -> usize {
        self.stack.len() + 1
    }

    pub fn server_url(&self) -> Option<&str> {
        self.server_url.as_deref()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn bindings(&self) -> &BTreeMap<String, Binding> {
        &self.bindings
    }

    pub fn binding(&self, name: &str) -> Option<&Binding> {
        self.bindings.get(name)
    }

    /// Connects to a server and enters its context. On any failure the
    /// session is left exactly as it was.
    pub fn connect(&mut self, url: &str) -> Result<String, ClientError> {
        let url = normalize_url(url);
        self.transport.probe(&url)?;

        let current = self.current();
        let req = NavigationRequest {
            current_context: current.name.clone(),
            command: "connect".to_string(),
            args: vec![url.clone()],
            server_url: url.clone(),
            node_type: current.node_type.clone(),
        };
        let resp = self.transport.navigate(&url, &req)?;
        if !resp.error.is_empty() {
            return Err(ClientError::Server(resp.error));
        }
        self.server_url = Some(url);
        Ok(self.enter(resp))
    }

    /// Runs one navigation command against the server and applies the
    /// transition locally.
    pub fn navigate(&mut self, command: &str, args: &[String]) -> Result<String, ClientError> {
        let url = self.server_url.clone().ok_or(ClientError::NotConnected)?;
        let current = self.current();
        let req = NavigationRequest {
            current_context: current.name.clone(),
            command: command.to_string(),
            args: args.to_vec(),
            server_url: url.clone(),
            node_type: current.node_type.clone(),
        };
        let resp = self.transport.navigate(&url, &req)?;
        if !resp.error.is_empty() {
            return Err(ClientError::Server(resp.error));
        }

        match command {
            "back" | "disconnect" if self.stack.is_empty() => {
                Ok("Already at root context".to_string())
            }
            "back" => {
                self.stack.pop();
                self.rebind();
                self.prompt = if resp.prompt.is_empty() {
                    self.computed_prompt()
                } else {
                    resp.prompt
                };
                Ok(resp.message)
            }
            "disconnect" => {
                self.stack.clear();
                self.server_url = None;
                self.rebind();
                self.prompt = ">>> ".to_string();
                if resp.message.is_empty() {
                    Ok("Disconnected from server".to_string())
                } else {
                    Ok(resp.message)
                }
            }
            _ => Ok(self.enter(resp)),
        }
    }

    /// Runs a node command on the server. Argument and flag tokens travel
    /// in the order they were typed; a help flag anywhere turns the call
    /// into a help request.
    pub fn exec_remote(
        &self,
        node_type: &str,
        node_name: &str,
        command: &str,
        tokens: &[String],
    ) -> Result<String, ClientError> {
        let url = self.server_url.as_deref().ok_or(ClientError::NotConnected)?;
        let args = if tokens.iter().any(|t| t == "--help" || t == "-h") {
            vec!["--help".to_string()]
        } else {
            tokens.to_vec()
        };
        let req = CommandRequest {
            node_type: node_type.to_string(),
            node_name: node_name.to_string(),
            command_path: command.to_string(),
            raw_command: String::new(),
            args,
            flags: BTreeMap::new(),
        };
        let resp = self.transport.exec(url, &req)?;
        if !resp.error.is_empty() {
            return Err(ClientError::Server(format!("server error: {}", resp.error)));
        }
        Ok(resp.response)
    }

    /// Renders the help screen for the current context.
    pub fn help_text(&self) -> String {
        let current = self.current();
        let mut out = String::new();
        match current.kind {
            ContextKind::Root => {
                out.push_str("Commands:\n");
                out.push_str("  clear        clear the screen\n");
                out.push_str("  connect      Connect to a server [connect http://localhost:4000]\n");
                out.push_str("  exit         exit the program\n");
                out.push_str("  help         display help\n");
            }
            ContextKind::Server => {
                out.push_str("Commands:\n");
                out.push_str("  back                Go back to previous context\n");
                out.push_str("  clear               Clear the screen\n");
                out.push_str("  disconnect          Disconnect server\n");
                out.push_str("  exit                Exit the client\n");
                out.push_str("  help                Display help\n");
                out.push_str("  use                 Select a context to use [use emulator | ue | gnb]\n");
            }
            ContextKind::ContextSet => {
                out.push_str("Available commands :\n");
                out.push_str(
                    "  select              Select a node to interact with [select <node-name>]\n",
                );
                out.push('\n');
                out.push_str(GENERAL_COMMANDS);
            }
            ContextKind::Node => {
                out.push_str(&format!("Available commands for {} :\n", current.name));
                let mut any = false;
                for binding in self.bindings.values() {
                    if let Binding::Remote { info, .. } = binding {
                        out.push_str(&format!("  {:<16} {}\n", info.name, info.usage));
                        any = true;
                    }
                }
                if !any {
                    // No descriptors were available when the node was
                    // entered; fall back to the bare command names.
                    for name in &current.commands {
                        if !matches!(
                            name.as_str(),
                            "help" | "clear" | "exit" | "back" | "disconnect"
                        ) {
                            out.push_str(&format!("  {name:<16}\n"));
                        }
                    }
                }
                out.push('\n');
                out.push_str(GENERAL_COMMANDS);
            }
            ContextKind::Amf => {
                out.push_str("\nCommands:\n");
                for (name, binding) in &self.bindings {
                    let usage = match binding {
                        Binding::Local { usage, .. } => usage.as_str(),
                        Binding::Remote { info, .. } => info.usage.as_str(),
                    };
                    out.push_str(&format!("  {name:<20} {usage}\n"));
                }
            }
        }
        out
    }

    /// Detailed help for one bound command, `None` when nothing is bound
    /// under that name.
    pub fn long_help(&self, name: &str) -> Option<String> {
        match self.bindings.get(name)? {
            Binding::Local { usage, .. } => Some(usage.clone()),
            Binding::Remote { info, .. } => Some(render_long_help(info)),
        }
    }

    /// Enters the context a navigation response points at: patches in the
    /// server URL, fetches command descriptors for node contexts when the
    /// response carried none, and rebuilds the command table.
    fn enter(&mut self, resp: NavigationResponse) -> String {
        let NavigationResponse {
            context: mut entry,
            prompt,
            message,
            commands,
            ..
        } = resp;
        entry.server_url = self.server_url.clone().unwrap_or_default();

        let infos = if matches!(entry.kind, ContextKind::Node | ContextKind::Amf)
            && commands.is_empty()
        {
            self.transport
                .fetch_commands(&entry.server_url, &entry.node_type, &entry.name)
        } else {
            commands
        };
        self.bindings = bindings_for(&entry, &infos);
        self.stack.push(entry);
        self.prompt = if prompt.is_empty() {
            self.computed_prompt()
        } else {
            prompt
        };
        message
    }

    fn rebind(&mut self) {
        let bindings = bindings_for(self.current(), &[]);
        self.bindings = bindings;
    }

    fn computed_prompt(&self) -> String {
        let current = self.current();
        match current.kind {
            ContextKind::Root | ContextKind::Server => ">>> ".to_string(),
            _ => format!("{} >>> ", current.name),
        }
    }
}

fn root_context() -> ClientContext {
    ClientContext {
        kind: ContextKind::Root,
        name: "root".to_string(),
        commands: ["help", "clear", "exit", "connect"]
            .iter()
            .map(|c| (*c).to_string())
            .collect(),
        ..ClientContext::default()
    }
}

fn normalize_url(url: &str) -> String {
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("http://{url}")
    }
}

fn render_long_help(info: &CommandInfo) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&info.name);
    if info.args_usage.is_empty() {
        out.push_str(" [command [command options]]");
    } else {
        out.push(' ');
        out.push_str(&info.args_usage);
    }
    out.push('\n');
    for flag in &info.flags {
        out.push_str(&format!("   --{}:  {}", flag.name, flag.usage));
        if !flag.default_text.is_empty() {
            out.push_str(&format!(" (default: {})", flag.default_text));
        }
        out.push('\n');
    }
    out
}
