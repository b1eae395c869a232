//! Command catalogs: per-node-type tables pairing command metadata with the
//! action that runs it.
//!
//! Two catalogs exist, one for the context tree (emulator, ue, gnb) and one
//! for the AMF direct-connect personality. Actions answer through a
//! [`ResponseSlot`]; domain-level failures are response text, never errors.

use crate::error::ProtoError;
use crate::exec::{Invocation, ResponseSlot};
use crate::nodes::ApiSet;
use crate::proto::{CommandInfo, FlagInfo};
use std::collections::{BTreeMap, HashMap};

/// Flag value kind, carrying the default for non-bool kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagKind {
    Bool,
    Int { default: i64 },
    Str { default: &'static str },
}

/// Static flag declaration in a command table.
#[derive(Debug, Clone)]
pub struct FlagSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub kind: FlagKind,
}

impl FlagSpec {
    /// Text shown as the flag default: bools always render, ints only when
    /// non-zero, strings only when non-empty.
    fn default_text(&self) -> String {
        match &self.kind {
            FlagKind::Bool => "false".to_string(),
            FlagKind::Int { default } => {
                if *default != 0 {
                    default.to_string()
                } else {
                    String::new()
                }
            }
            FlagKind::Str { default } => (*default).to_string(),
        }
    }

    pub fn info(&self) -> FlagInfo {
        FlagInfo {
            name: self.name.to_string(),
            usage: self.usage.to_string(),
            default_text: self.default_text(),
            required: false,
        }
    }

    fn parse(&self, text: &str) -> Result<FlagValue, ProtoError> {
        let invalid = || ProtoError::InvalidFlag {
            flag: self.name.to_string(),
            value: text.to_string(),
        };
        match &self.kind {
            FlagKind::Bool => text.parse().map(FlagValue::Bool).map_err(|_| invalid()),
            FlagKind::Int { .. } => text.parse().map(FlagValue::Int).map_err(|_| invalid()),
            FlagKind::Str { .. } => Ok(FlagValue::Str(text.to_string())),
        }
    }

    fn default_value(&self) -> FlagValue {
        match &self.kind {
            FlagKind::Bool => FlagValue::Bool(false),
            FlagKind::Int { default } => FlagValue::Int(*default),
            FlagKind::Str { default } => FlagValue::Str((*default).to_string()),
        }
    }
}

fn bool_flag(name: &'static str, usage: &'static str) -> FlagSpec {
    FlagSpec {
        name,
        usage,
        kind: FlagKind::Bool,
    }
}

fn int_flag(name: &'static str, usage: &'static str, default: i64) -> FlagSpec {
    FlagSpec {
        name,
        usage,
        kind: FlagKind::Int { default },
    }
}

fn str_flag(name: &'static str, usage: &'static str, default: &'static str) -> FlagSpec {
    FlagSpec {
        name,
        usage,
        kind: FlagKind::Str { default },
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FlagValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

/// Typed flag values for one invocation. Every declared flag is present,
/// either parsed from the request or filled from its default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlagValues(BTreeMap<String, FlagValue>);

impl FlagValues {
    /// Validates raw `--flag` strings against the declarations. Undeclared
    /// flags and unparseable values are routing errors.
    pub fn resolve(
        specs: &[FlagSpec],
        raw: &BTreeMap<String, String>,
    ) -> Result<Self, ProtoError> {
        for name in raw.keys() {
            if !specs.iter().any(|spec| spec.name == name) {
                return Err(ProtoError::UnknownFlag(name.clone()));
            }
        }
        let mut values = BTreeMap::new();
        for spec in specs {
            let value = match raw.get(spec.name) {
                Some(text) => spec.parse(text)?,
                None => spec.default_value(),
            };
            values.insert(spec.name.to_string(), value);
        }
        Ok(Self(values))
    }

    pub fn bool_value(&self, name: &str) -> bool {
        match self.0.get(name) {
            Some(FlagValue::Bool(value)) => *value,
            _ => false,
        }
    }

    pub fn int_value(&self, name: &str) -> i64 {
        match self.0.get(name) {
            Some(FlagValue::Int(value)) => *value,
            _ => 0,
        }
    }

    pub fn str_value(&self, name: &str) -> &str {
        match self.0.get(name) {
            Some(FlagValue::Str(value)) => value,
            _ => "",
        }
    }
}

/// Side-effecting command body. Runs on a blocking thread and must answer
/// through the slot exactly once; dropping the slot surfaces as a
/// no-response error to the caller.
pub type Action = fn(&ApiSet, &Invocation, ResponseSlot);

/// One command in a catalog table.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub args_usage: &'static str,
    pub flags: Vec<FlagSpec>,
    pub action: Action,
}

impl CommandSpec {
    pub fn info(&self) -> CommandInfo {
        CommandInfo {
            name: self.name.to_string(),
            usage: self.usage.to_string(),
            description: self.description.to_string(),
            args_usage: self.args_usage.to_string(),
            flags: self.flags.iter().map(FlagSpec::info).collect(),
            subcommands: Vec::new(),
        }
    }
}

/// Command tables keyed by node type.
pub struct Catalog {
    tables: HashMap<&'static str, Vec<CommandSpec>>,
}

impl Catalog {
    /// Catalog served by the context tree: emulator, ue, and gnb commands.
    pub fn tree() -> Self {
        let mut tables = HashMap::new();
        tables.insert("emulator", emulator_commands());
        tables.insert("ue", ue_commands());
        tables.insert("gnb", gnb_commands());
        Self { tables }
    }

    /// Catalog served by the AMF direct-connect listener.
    pub fn amf() -> Self {
        let mut tables = HashMap::new();
        tables.insert("amf", amf_commands());
        Self { tables }
    }

    pub fn has_node_type(&self, node_type: &str) -> bool {
        self.tables.contains_key(node_type)
    }

    pub fn find(&self, node_type: &str, name: &str) -> Option<&CommandSpec> {
        self.tables
            .get(node_type)?
            .iter()
            .find(|spec| spec.name == name)
    }

    /// Wire-shaped descriptors for every command of a node type. Empty when
    /// the type is unknown.
    pub fn infos_for(&self, node_type: &str) -> Vec<CommandInfo> {
        self.tables
            .get(node_type)
            .map(|specs| specs.iter().map(CommandSpec::info).collect())
            .unwrap_or_default()
    }
}

/// Renders the teaching text for one command. Same layout the interactive
/// client prints for `--help`.
pub fn help_text(spec: &CommandSpec) -> String {
    let mut out = String::new();
    out.push_str(spec.name);
    if spec.args_usage.is_empty() {
        out.push_str(" [command [command options]]");
    } else {
        out.push(' ');
        out.push_str(spec.args_usage);
    }
    out.push_str("\n\n");
    if !spec.description.is_empty() {
        out.push_str(spec.description);
        out.push_str("\n\n");
    }
    if !spec.flags.is_empty() {
        out.push_str("Options:\n");
        for flag in &spec.flags {
            out.push_str(&format!("   --{}:  {}\n", flag.name, flag.usage));
        }
    }
    out
}

fn emulator_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "list-ue",
            usage: "List all UEs",
            description: "",
            args_usage: "",
            flags: vec![],
            action: emulator_list_ue,
        },
        CommandSpec {
            name: "list-gnb",
            usage: "List all GnBs",
            description: "",
            args_usage: "",
            flags: vec![],
            action: emulator_list_gnb,
        },
        CommandSpec {
            name: "add-ue",
            usage: "Add a new UE with SUPI",
            description: "Add a new UE to the emulator with the specified SUPI",
            args_usage: "<supi>",
            flags: vec![bool_flag("register", "Trigger registration after adding")],
            action: emulator_add_ue,
        },
    ]
}

fn ue_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "register",
            usage: "Register UE to the network",
            description: "Register the UE to the network with optional emergency services",
            args_usage: "",
            flags: vec![bool_flag("emergency", "Register for emergency services")],
            action: ue_register,
        },
        CommandSpec {
            name: "deregister",
            usage: "Deregister UE from the network",
            description: "Deregister the UE from the network with specified type",
            args_usage: "",
            flags: vec![int_flag("type", "Deregistration type (0-3)", 0)],
            action: ue_deregister,
        },
        CommandSpec {
            name: "create-session",
            usage: "Create a new session",
            description: "Create a new PDU session with specified parameters",
            args_usage: "",
            flags: vec![
                str_flag("slice", "Network slice", "default"),
                str_flag("dn", "Data Network name", "internet"),
                int_flag("type", "Session type (0-3)", 0),
            ],
            action: ue_create_session,
        },
    ]
}

fn gnb_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "release-ue",
            usage: "Release a UE from the gNB",
            description: "Release a UE connection from the gNB",
            args_usage: "<ue-id>",
            flags: vec![],
            action: gnb_release_ue,
        },
        CommandSpec {
            name: "release-session",
            usage: "Release a session",
            description: "Release a PDU session for the specified UE",
            args_usage: "<ue-id>",
            flags: vec![int_flag("id", "Session ID", 1)],
            action: gnb_release_session,
        },
    ]
}

fn amf_commands() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            name: "list-ues",
            usage: "List all UE contexts",
            description: "",
            args_usage: "",
            flags: vec![],
            action: amf_list_ues,
        },
        CommandSpec {
            name: "register-ue",
            usage: "Register a UE with IMSI",
            description: "Register a UE to the network with the specified IMSI",
            args_usage: "<imsi>",
            flags: vec![],
            action: amf_register_ue,
        },
        CommandSpec {
            name: "deregister-ue",
            usage: "Deregister a UE with IMSI",
            description: "Deregister a UE from the network with the specified IMSI",
            args_usage: "<imsi>",
            flags: vec![int_flag("cause", "Deregistration cause (0-255)", 0)],
            action: amf_deregister_ue,
        },
        CommandSpec {
            name: "status",
            usage: "Get AMF service status",
            description: "",
            args_usage: "",
            flags: vec![],
            action: amf_status,
        },
        CommandSpec {
            name: "config",
            usage: "Get AMF configuration",
            description: "",
            args_usage: "",
            flags: vec![],
            action: amf_config,
        },
        CommandSpec {
            name: "send-n1n2-message",
            usage: "Send N1/N2 message to a UE",
            description: "Send an N1/N2 message to a specific UE",
            args_usage: "<ue-id> <message-type> <content>",
            flags: vec![],
            action: amf_send_n1n2_message,
        },
        CommandSpec {
            name: "list-n1n2-subscriptions",
            usage: "List N1/N2 message subscriptions for a UE",
            description: "List all N1/N2 message subscriptions for a specific UE",
            args_usage: "<ue-id>",
            flags: vec![],
            action: amf_list_n1n2_subscriptions,
        },
        CommandSpec {
            name: "initiate-handover",
            usage: "Initiate handover for a UE",
            description: "Initiate handover procedure for a UE to a target gNB",
            args_usage: "<ue-id> <target-gnb>",
            flags: vec![],
            action: amf_initiate_handover,
        },
        CommandSpec {
            name: "handover-history",
            usage: "Show handover history for a UE",
            description: "Display handover history for a specific UE",
            args_usage: "<ue-id>",
            flags: vec![],
            action: amf_handover_history,
        },
        CommandSpec {
            name: "nf-subscriptions",
            usage: "List NF subscriptions",
            description: "",
            args_usage: "",
            flags: vec![],
            action: amf_nf_subscriptions,
        },
        CommandSpec {
            name: "sbi-endpoints",
            usage: "List SBI endpoints",
            description: "",
            args_usage: "",
            flags: vec![],
            action: amf_sbi_endpoints,
        },
    ]
}

fn emulator_list_ue(apis: &ApiSet, _inv: &Invocation, slot: ResponseSlot) {
    slot.send(apis.emulator.list_ues().join("\n"));
}

fn emulator_list_gnb(apis: &ApiSet, _inv: &Invocation, slot: ResponseSlot) {
    slot.send(apis.emulator.list_gnbs().join("\n"));
}

fn emulator_add_ue(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let Some(supi) = inv.args.first() else {
        slot.send("Error: SUPI is required");
        return;
    };
    let trigger_register = inv.flags.bool_value("register");
    if apis.emulator.add_ue(supi, trigger_register) {
        slot.send(format!("UE {supi} added successfully to emulator"));
    } else {
        slot.send(format!("Failed to add UE {supi} to emulator"));
    }
}

fn ue_register(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let ok = apis.ue.register(inv.flags.bool_value("emergency"));
    let node = &inv.node_name;
    slot.send(match (ok, node.is_empty()) {
        (true, true) => "UE registered successfully".to_string(),
        (true, false) => format!("UE {node} registered successfully"),
        (false, true) => "Failed to register UE".to_string(),
        (false, false) => format!("Failed to register UE {node}"),
    });
}

fn ue_deregister(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let ok = apis.ue.deregister(inv.flags.int_value("type") as u8);
    let node = &inv.node_name;
    slot.send(match (ok, node.is_empty()) {
        (true, true) => "UE deregistered successfully".to_string(),
        (true, false) => format!("UE {node} deregistered successfully"),
        (false, true) => "Failed to deregister UE".to_string(),
        (false, false) => format!("Failed to deregister UE {node}"),
    });
}

fn ue_create_session(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let ok = apis.ue.create_session(
        inv.flags.str_value("slice"),
        inv.flags.str_value("dn"),
        inv.flags.int_value("type") as u8,
    );
    let node = &inv.node_name;
    slot.send(match (ok, node.is_empty()) {
        (true, true) => "Session created successfully".to_string(),
        (true, false) => format!("Session created successfully for UE {node}"),
        (false, true) => "Failed to create session".to_string(),
        (false, false) => format!("Failed to create session for UE {node}"),
    });
}

fn gnb_release_ue(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let Some(ue_id) = inv.args.first() else {
        slot.send("Error: UE ID is required");
        return;
    };
    let ok = apis.gnb.release_ue(ue_id);
    let node = &inv.node_name;
    slot.send(match (ok, node.is_empty()) {
        (true, true) => format!("UE {ue_id} released successfully"),
        (true, false) => format!("UE {ue_id} released successfully from gNB {node}"),
        (false, true) => format!("Failed to release UE {ue_id}"),
        (false, false) => format!("Failed to release UE {ue_id} from gNB {node}"),
    });
}

fn gnb_release_session(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let Some(ue_id) = inv.args.first() else {
        slot.send("Error: UE ID is required");
        return;
    };
    let session_id = inv.flags.int_value("id") as u8;
    let ok = apis.gnb.release_session(ue_id, session_id);
    let node = &inv.node_name;
    slot.send(match (ok, node.is_empty()) {
        (true, true) => format!("Session {session_id} for UE {ue_id} released successfully"),
        (true, false) => {
            format!("Session {session_id} for UE {ue_id} released successfully from gNB {node}")
        }
        (false, true) => format!("Failed to release session {session_id} for UE {ue_id}"),
        (false, false) => {
            format!("Failed to release session {session_id} for UE {ue_id} from gNB {node}")
        }
    });
}

fn amf_list_ues(apis: &ApiSet, _inv: &Invocation, slot: ResponseSlot) {
    let contexts = apis.amf.list_ue_contexts();
    if contexts.is_empty() {
        slot.send("No UE contexts found");
    } else {
        slot.send(format!("UE contexts:\n{}", contexts.join("\n")));
    }
}

fn amf_register_ue(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let Some(imsi) = inv.args.first() else {
        slot.send("Error: IMSI is required");
        return;
    };
    if apis.amf.register_ue(imsi) {
        slot.send(format!("UE {imsi} registered successfully"));
    } else {
        slot.send(format!("Failed to register UE {imsi}"));
    }
}

fn amf_deregister_ue(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let Some(imsi) = inv.args.first() else {
        slot.send("Error: IMSI is required");
        return;
    };
    let cause = inv.flags.int_value("cause") as u8;
    if apis.amf.deregister_ue(imsi, cause) {
        slot.send(format!("UE {imsi} deregistered successfully"));
    } else {
        slot.send(format!("Failed to deregister UE {imsi}"));
    }
}

fn amf_status(apis: &ApiSet, _inv: &Invocation, slot: ResponseSlot) {
    let mut out = String::from("AMF Service Status:\n");
    for (key, value) in apis.amf.service_status() {
        out.push_str(&format!("  {key}: {value}\n"));
    }
    slot.send(out);
}

fn amf_config(apis: &ApiSet, _inv: &Invocation, slot: ResponseSlot) {
    let mut out = String::from("AMF Configuration:\n");
    for (key, value) in apis.amf.configuration() {
        out.push_str(&format!("  {key}: {value}\n"));
    }
    slot.send(out);
}

fn amf_send_n1n2_message(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    if inv.args.len() < 3 {
        slot.send("Error: UE ID, message type and content are required");
        return;
    }
    let (ue_id, message_type, content) = (&inv.args[0], &inv.args[1], &inv.args[2]);
    if apis.amf.send_n1n2_message(ue_id, message_type, content) {
        slot.send(format!("Message sent successfully to UE {ue_id}"));
    } else {
        slot.send(format!("Failed to send message to UE {ue_id}"));
    }
}

fn amf_list_n1n2_subscriptions(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let Some(ue_id) = inv.args.first() else {
        slot.send("Error: UE ID is required");
        return;
    };
    let subscriptions = apis.amf.list_n1n2_subscriptions(ue_id);
    if subscriptions.is_empty() {
        slot.send(format!("No N1/N2 subscriptions found for UE {ue_id}"));
    } else {
        slot.send(format!(
            "N1/N2 subscriptions for UE {ue_id}:\n{}",
            subscriptions.join("\n")
        ));
    }
}

fn amf_initiate_handover(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    if inv.args.len() < 2 {
        slot.send("Error: UE ID and target gNB are required");
        return;
    }
    let (ue_id, target_gnb) = (&inv.args[0], &inv.args[1]);
    if apis.amf.initiate_handover(ue_id, target_gnb) {
        slot.send(format!("Handover initiated for UE {ue_id} to gNB {target_gnb}"));
    } else {
        slot.send(format!("Failed to initiate handover for UE {ue_id}"));
    }
}

fn amf_handover_history(apis: &ApiSet, inv: &Invocation, slot: ResponseSlot) {
    let Some(ue_id) = inv.args.first() else {
        slot.send("Error: UE ID is required");
        return;
    };
    let history = apis.amf.handover_history(ue_id);
    if history.is_empty() {
        slot.send(format!("No handover history found for UE {ue_id}"));
        return;
    }
    let mut out = format!("Handover history for UE {ue_id}:\n");
    for (i, record) in history.iter().enumerate() {
        out.push_str(&format!(
            "{}. Time: {}, Source: {}, Target: {}, Status: {}\n",
            i + 1,
            record.time,
            record.source,
            record.target,
            record.status
        ));
    }
    slot.send(out);
}

fn amf_nf_subscriptions(apis: &ApiSet, _inv: &Invocation, slot: ResponseSlot) {
    let subscriptions = apis.amf.nf_subscriptions();
    if subscriptions.is_empty() {
        slot.send("No NF subscriptions found");
    } else {
        slot.send(format!("NF subscriptions:\n{}", subscriptions.join("\n")));
    }
}

fn amf_sbi_endpoints(apis: &ApiSet, _inv: &Invocation, slot: ResponseSlot) {
    let mut out = String::from("SBI Endpoints:\n");
    for (name, url) in apis.amf.sbi_endpoints() {
        out.push_str(&format!("  {name}: {url}\n"));
    }
    slot.send(out);
}
