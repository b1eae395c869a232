//! Server-side context tree and the navigation state machine over it.
//!
//! Contexts live in a flat map keyed by name, with node contexts keyed as
//! `type:name` so identically-named nodes of different types stay distinct.
//! Node contexts are created on first selection and cached for the lifetime
//! of the tree.

use crate::catalog::Catalog;
use crate::error::ProtoError;
use crate::nodes::EmulatorApi;
use crate::proto::{
    ClientContext, CommandInfo, ContextKind, NavigationRequest, NavigationResponse,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// One context in the tree. Immutable after creation apart from the list of
/// child names, which grows as nodes are selected.
pub struct ContextNode {
    pub kind: ContextKind,
    pub name: String,
    pub description: String,
    /// Node type for context sets and nodes; empty for root and server.
    pub node_type: String,
    /// Map key of the parent context. Back-reference only; the tree map owns
    /// every context.
    pub parent: Option<String>,
    pub commands: Vec<CommandInfo>,
    children: RwLock<Vec<String>>,
}

impl ContextNode {
    pub fn children(&self) -> Vec<String> {
        self.children.read().clone()
    }

    fn add_child(&self, name: &str) {
        self.children.write().push(name.to_string());
    }

    pub fn command_names(&self) -> Vec<String> {
        self.commands.iter().map(|c| c.name.clone()).collect()
    }
}

/// The navigable context tree, shared across request handlers.
pub struct ContextTree {
    contexts: RwLock<HashMap<String, Arc<ContextNode>>>,
    catalog: Arc<Catalog>,
    emulator: Arc<dyn EmulatorApi>,
}

impl ContextTree {
    /// Builds the startup tree: root, server, one context set per node type,
    /// and the pre-created emulator node.
    pub fn new(catalog: Arc<Catalog>, emulator: Arc<dyn EmulatorApi>) -> Self {
        let mut contexts: HashMap<String, Arc<ContextNode>> = HashMap::new();

        contexts.insert(
            "root".to_string(),
            Arc::new(ContextNode {
                kind: ContextKind::Root,
                name: "root".to_string(),
                description: "Root context with basic commands".to_string(),
                node_type: String::new(),
                parent: None,
                commands: basic_commands(),
                children: RwLock::new(vec!["server".to_string()]),
            }),
        );
        contexts.insert(
            "server".to_string(),
            Arc::new(ContextNode {
                kind: ContextKind::Server,
                name: "server".to_string(),
                description: "Server connection context".to_string(),
                node_type: String::new(),
                parent: Some("root".to_string()),
                commands: server_commands(),
                children: RwLock::new(vec![
                    "ue".to_string(),
                    "gnb".to_string(),
                    "emulator".to_string(),
                ]),
            }),
        );
        for node_type in ["ue", "gnb", "emulator"] {
            contexts.insert(
                node_type.to_string(),
                Arc::new(ContextNode {
                    kind: ContextKind::ContextSet,
                    name: node_type.to_string(),
                    description: format!("{} context set", node_type.to_uppercase()),
                    node_type: node_type.to_string(),
                    parent: Some("server".to_string()),
                    commands: context_set_commands(),
                    children: RwLock::new(Vec::new()),
                }),
            );
        }
        contexts.insert(
            "emulator:emulator".to_string(),
            Arc::new(ContextNode {
                kind: ContextKind::Node,
                name: "emulator".to_string(),
                description: "Emulator control context".to_string(),
                node_type: "emulator".to_string(),
                parent: Some("emulator".to_string()),
                commands: catalog.infos_for("emulator"),
                children: RwLock::new(Vec::new()),
            }),
        );
        if let Some(set) = contexts.get("emulator") {
            set.add_child("emulator");
        }

        Self {
            contexts: RwLock::new(contexts),
            catalog,
            emulator,
        }
    }

    pub fn get(&self, key: &str) -> Option<Arc<ContextNode>> {
        self.contexts.read().get(key).cloned()
    }

    /// Resolves the context a request is speaking from. A node context is
    /// keyed `type:name`, so when the request carries a node type that
    /// differs from the context name the composite key is tried first.
    pub fn resolve(&self, current: &str, node_type: &str) -> Option<Arc<ContextNode>> {
        let contexts = self.contexts.read();
        if !node_type.is_empty() && !current.is_empty() && node_type != current {
            if let Some(ctx) = contexts.get(&format!("{node_type}:{current}")) {
                return Some(ctx.clone());
            }
        }
        contexts.get(current).cloned()
    }

    /// Returns the cached node context, creating it under its parent set on
    /// first use. `None` when the parent set does not exist. The same name
    /// always yields the same context instance afterwards.
    pub fn find_or_create_node(
        &self,
        node_type: &str,
        node_name: &str,
    ) -> Option<Arc<ContextNode>> {
        let key = format!("{node_type}:{node_name}");
        if let Some(ctx) = self.contexts.read().get(&key) {
            return Some(ctx.clone());
        }

        let mut contexts = self.contexts.write();
        // Re-check: another writer may have created it between the locks.
        if let Some(ctx) = contexts.get(&key) {
            return Some(ctx.clone());
        }
        let parent = contexts.get(node_type)?.clone();
        let node = Arc::new(ContextNode {
            kind: ContextKind::Node,
            name: node_name.to_string(),
            description: format!("{node_name} node of type {node_type}"),
            node_type: node_type.to_string(),
            parent: Some(node_type.to_string()),
            commands: self.catalog.infos_for(node_type),
            children: RwLock::new(Vec::new()),
        });
        contexts.insert(key, node.clone());
        parent.add_child(node_name);
        debug!(node_type, node_name, "created node context");
        Some(node)
    }

    /// Names of the selectable objects for a context set type.
    pub fn objects_of_type(&self, node_type: &str) -> Result<Vec<String>, ProtoError> {
        match node_type {
            "ue" => Ok(self.emulator.list_ues()),
            "gnb" => Ok(self.emulator.list_gnbs()),
            "emulator" => Ok(vec!["emulator".to_string()]),
            _ => Err(ProtoError::InvalidObjectType),
        }
    }

    /// Command descriptors for a node type, for the commands endpoint
    /// fallback when a node context has not been created yet.
    pub fn commands_for_type(&self, node_type: &str) -> Vec<CommandInfo> {
        self.catalog.infos_for(node_type)
    }

    /// Applies one navigation command and answers with the target context.
    ///
    /// Every error here is a routing problem; the tree is never modified on
    /// a failed transition.
    pub fn navigate(&self, req: &NavigationRequest) -> Result<NavigationResponse, ProtoError> {
        let current = self
            .resolve(&req.current_context, &req.node_type)
            .ok_or_else(|| ProtoError::ContextNotFound(req.current_context.clone()))?;
        debug!(from = %current.name, command = %req.command, "navigating");

        match req.command.as_str() {
            "connect" => {
                let url = req.args.first().ok_or(ProtoError::MissingArgument {
                    what: "URL",
                    command: "connect",
                })?;
                let server = self
                    .get("server")
                    .ok_or_else(|| ProtoError::ContextNotFound("server".to_string()))?;
                Ok(self.response(
                    &server,
                    format!("Connected to server: {url}, type help to see commands"),
                    Vec::new(),
                ))
            }
            "disconnect" => {
                let root = self
                    .get("root")
                    .ok_or_else(|| ProtoError::ContextNotFound("root".to_string()))?;
                Ok(self.response(&root, "Disconnected from server".to_string(), Vec::new()))
            }
            "back" => {
                let parent_key = current.parent.as_ref().ok_or(ProtoError::AlreadyAtRoot)?;
                let parent = self
                    .get(parent_key)
                    .ok_or_else(|| ProtoError::ContextNotFound(parent_key.clone()))?;
                let message = if parent.kind == ContextKind::Server {
                    "Back to server context".to_string()
                } else {
                    format!("Back to {} context", parent.name)
                };
                Ok(self.response(&parent, message, Vec::new()))
            }
            "use" => {
                let context_type = req.args.first().ok_or(ProtoError::MissingArgument {
                    what: "Context type",
                    command: "use",
                })?;
                let set = self
                    .get(context_type)
                    .filter(|ctx| ctx.kind == ContextKind::ContextSet)
                    .ok_or(ProtoError::InvalidContextType)?;
                if context_type == "emulator" {
                    // The emulator is a singleton; using it selects the node
                    // directly instead of stopping at the set.
                    let node = self
                        .find_or_create_node("emulator", "emulator")
                        .ok_or(ProtoError::InvalidContextType)?;
                    return Ok(self.response(
                        &node,
                        "Switched to emulator context".to_string(),
                        Vec::new(),
                    ));
                }
                let objects = self.objects_of_type(context_type)?;
                let mut message = format!("Available {context_type} objects:\n");
                for object in &objects {
                    message.push_str(&format!("  - {object}\n"));
                }
                Ok(self.response(&set, message, Vec::new()))
            }
            "select" => {
                let node_name = req.args.first().ok_or(ProtoError::MissingArgument {
                    what: "Node name",
                    command: "select",
                })?;
                if current.kind != ContextKind::ContextSet {
                    return Err(ProtoError::SelectOutsideSet);
                }
                let objects = self.objects_of_type(&current.node_type)?;
                if !objects.iter().any(|o| o == node_name) {
                    return Err(ProtoError::NodeNotFound(node_name.clone()));
                }
                let node = self
                    .find_or_create_node(&current.node_type, node_name)
                    .ok_or_else(|| ProtoError::NodeNotFound(node_name.clone()))?;
                Ok(self.response(
                    &node,
                    format!("Selected node: {node_name}"),
                    node.commands.clone(),
                ))
            }
            other => Err(ProtoError::UnknownNavigation(other.to_string())),
        }
    }

    /// Wire snapshot of a context.
    pub fn client_context(&self, node: &ContextNode) -> ClientContext {
        ClientContext {
            kind: node.kind,
            name: node.name.clone(),
            server_url: String::new(),
            description: node.description.clone(),
            parent_path: node.parent.clone().unwrap_or_default(),
            children_paths: node.children(),
            node_type: node.node_type.clone(),
            commands: node.command_names(),
        }
    }

    fn response(
        &self,
        node: &Arc<ContextNode>,
        message: String,
        commands: Vec<CommandInfo>,
    ) -> NavigationResponse {
        NavigationResponse {
            context: self.client_context(node),
            prompt: prompt_for(node),
            message,
            commands,
            error: String::new(),
        }
    }
}

/// Prompt string shown for a context: bare for root and server, prefixed
/// with the context name everywhere else.
pub fn prompt_for(node: &ContextNode) -> String {
    match node.kind {
        ContextKind::Root | ContextKind::Server => ">>> ".to_string(),
        _ => format!("{} >>> ", node.name),
    }
}

fn basic_commands() -> Vec<CommandInfo> {
    vec![
        CommandInfo::new(
            "help",
            "Display available commands",
            "Show a list of all available commands in the current context",
            "",
        ),
        CommandInfo::new("clear", "Clear the screen", "Clear the terminal screen", ""),
        CommandInfo::new("exit", "Exit the program", "Exit the client application", ""),
    ]
}

fn server_commands() -> Vec<CommandInfo> {
    let mut commands = basic_commands();
    commands.push(CommandInfo::new(
        "back",
        "Go back to previous context",
        "Navigate back to the parent context",
        "",
    ));
    commands.push(CommandInfo::new(
        "disconnect",
        "Disconnect from server",
        "Disconnect from the current server and return to root context",
        "",
    ));
    commands.push(CommandInfo::new(
        "use",
        "Select a context to use [use emulator | ue | gnb]",
        "Navigate to a specific context type",
        "<context-type>",
    ));
    commands
}

fn context_set_commands() -> Vec<CommandInfo> {
    let mut commands = basic_commands();
    commands.push(CommandInfo::new(
        "back",
        "Go back to previous context",
        "Navigate back to the parent context",
        "",
    ));
    commands.push(CommandInfo::new(
        "select",
        "Select a node to interact with [select <node-name>]",
        "Navigate to a specific node in this context set",
        "<node-name>",
    ));
    commands
}
