//! Domain API seams for the emulated network elements.
//!
//! The command catalog calls through these traits and formats the results;
//! it never inspects emulator internals. The stub implementations answer
//! from seed data behind a lock so the control plane runs self-contained.

use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Emulator-wide operations: inventory listings and UE provisioning.
pub trait EmulatorApi: Send + Sync {
    fn list_ues(&self) -> Vec<String>;
    fn list_gnbs(&self) -> Vec<String>;
    /// Returns false when the UE could not be added.
    fn add_ue(&self, supi: &str, trigger_register: bool) -> bool;
}

/// Operations on a single UE. The node name travels in the invocation, not
/// here; implementations act on whichever UE the emulator has in scope.
pub trait UeApi: Send + Sync {
    fn register(&self, emergency: bool) -> bool;
    fn deregister(&self, dereg_type: u8) -> bool;
    fn create_session(&self, slice: &str, dn_name: &str, session_type: u8) -> bool;
}

/// Operations on a single gNB.
pub trait GnbApi: Send + Sync {
    fn release_ue(&self, ue_id: &str) -> bool;
    fn release_session(&self, ue_id: &str, session_id: u8) -> bool;
}

/// One handover the AMF has seen for a UE.
#[derive(Debug, Clone, PartialEq)]
pub struct HandoverRecord {
    pub time: String,
    pub source: String,
    pub target: String,
    pub status: String,
}

/// AMF service operations, reachable through the direct-connect listener.
///
/// Status, configuration, and SBI listings return ordered key/value pairs so
/// the rendered output is stable.
pub trait AmfApi: Send + Sync {
    fn list_ue_contexts(&self) -> Vec<String>;
    fn register_ue(&self, imsi: &str) -> bool;
    fn deregister_ue(&self, imsi: &str, cause: u8) -> bool;
    fn service_status(&self) -> Vec<(String, String)>;
    fn configuration(&self) -> Vec<(String, String)>;
    fn send_n1n2_message(&self, ue_id: &str, message_type: &str, content: &str) -> bool;
    fn list_n1n2_subscriptions(&self, ue_id: &str) -> Vec<String>;
    fn initiate_handover(&self, ue_id: &str, target_gnb: &str) -> bool;
    fn handover_history(&self, ue_id: &str) -> Vec<HandoverRecord>;
    fn nf_subscriptions(&self) -> Vec<String>;
    fn sbi_endpoints(&self) -> Vec<(String, String)>;
}

/// Shared handles to every domain API a command action can reach.
#[derive(Clone)]
pub struct ApiSet {
    pub emulator: Arc<dyn EmulatorApi>,
    pub ue: Arc<dyn UeApi>,
    pub gnb: Arc<dyn GnbApi>,
    pub amf: Arc<dyn AmfApi>,
}

impl ApiSet {
    /// Full stub wiring with the default seed inventory.
    pub fn stub() -> Self {
        Self {
            emulator: Arc::new(StubEmulator::new()),
            ue: Arc::new(StubUe),
            gnb: Arc::new(StubGnb),
            amf: Arc::new(StubAmf::new()),
        }
    }
}

/// In-memory emulator inventory.
pub struct StubEmulator {
    ues: RwLock<Vec<String>>,
    gnbs: Vec<String>,
}

impl StubEmulator {
    pub fn new() -> Self {
        Self {
            ues: RwLock::new(vec![
                "ue1".to_string(),
                "ue2".to_string(),
                "ue3".to_string(),
            ]),
            gnbs: vec!["gnb1".to_string(), "gnb2".to_string()],
        }
    }
}

impl Default for StubEmulator {
    fn default() -> Self {
        Self::new()
    }
}

impl EmulatorApi for StubEmulator {
    fn list_ues(&self) -> Vec<String> {
        self.ues.read().clone()
    }

    fn list_gnbs(&self) -> Vec<String> {
        self.gnbs.clone()
    }

    fn add_ue(&self, supi: &str, trigger_register: bool) -> bool {
        info!(supi, trigger_register, "emulator: add UE");
        let mut ues = self.ues.write();
        if !ues.iter().any(|u| u == supi) {
            ues.push(supi.to_string());
        }
        true
    }
}

/// Always-succeeding UE stub; the invocation log is the observable effect.
pub struct StubUe;

impl UeApi for StubUe {
    fn register(&self, emergency: bool) -> bool {
        info!(emergency, "ue: register");
        true
    }

    fn deregister(&self, dereg_type: u8) -> bool {
        info!(dereg_type, "ue: deregister");
        true
    }

    fn create_session(&self, slice: &str, dn_name: &str, session_type: u8) -> bool {
        info!(slice, dn_name, session_type, "ue: create session");
        true
    }
}

pub struct StubGnb;

impl GnbApi for StubGnb {
    fn release_ue(&self, ue_id: &str) -> bool {
        info!(ue_id, "gnb: release UE");
        true
    }

    fn release_session(&self, ue_id: &str, session_id: u8) -> bool {
        info!(ue_id, session_id, "gnb: release session");
        true
    }
}

/// In-memory AMF state: registered UE contexts and handover history.
pub struct StubAmf {
    ue_contexts: RwLock<Vec<String>>,
    handovers: RwLock<Vec<(String, HandoverRecord)>>,
}

impl StubAmf {
    pub fn new() -> Self {
        Self {
            ue_contexts: RwLock::new(vec![
                "imsi-123456789012345".to_string(),
                "imsi-234567890123456".to_string(),
                "imsi-345678901234567".to_string(),
            ]),
            handovers: RwLock::new(vec![(
                "imsi-123456789012345".to_string(),
                HandoverRecord {
                    time: "2025-01-15T09:30:00+00:00".to_string(),
                    source: "gnb1".to_string(),
                    target: "gnb2".to_string(),
                    status: "completed".to_string(),
                },
            )]),
        }
    }

    fn knows(&self, ue_id: &str) -> bool {
        self.ue_contexts.read().iter().any(|u| u == ue_id)
    }
}

impl Default for StubAmf {
    fn default() -> Self {
        Self::new()
    }
}

impl AmfApi for StubAmf {
    fn list_ue_contexts(&self) -> Vec<String> {
        self.ue_contexts.read().clone()
    }

    fn register_ue(&self, imsi: &str) -> bool {
        info!(imsi, "amf: register UE");
        let mut contexts = self.ue_contexts.write();
        if contexts.iter().any(|u| u == imsi) {
            return false;
        }
        contexts.push(imsi.to_string());
        true
    }

    fn deregister_ue(&self, imsi: &str, cause: u8) -> bool {
        info!(imsi, cause, "amf: deregister UE");
        let mut contexts = self.ue_contexts.write();
        let before = contexts.len();
        contexts.retain(|u| u != imsi);
        contexts.len() < before
    }

    fn service_status(&self) -> Vec<(String, String)> {
        vec![
            ("name".to_string(), "amf-1".to_string()),
            ("state".to_string(), "RUNNING".to_string()),
            (
                "ueContexts".to_string(),
                self.ue_contexts.read().len().to_string(),
            ),
        ]
    }

    fn configuration(&self) -> Vec<(String, String)> {
        vec![
            ("plmnId".to_string(), "MCC 208, MNC 93".to_string()),
            ("amfId".to_string(), "cafe00".to_string()),
            ("servedGuami".to_string(), "208-93-cafe00-0".to_string()),
            ("sbiScheme".to_string(), "http".to_string()),
        ]
    }

    fn send_n1n2_message(&self, ue_id: &str, message_type: &str, content: &str) -> bool {
        info!(ue_id, message_type, content, "amf: send N1/N2 message");
        self.knows(ue_id)
    }

    fn list_n1n2_subscriptions(&self, ue_id: &str) -> Vec<String> {
        if self.knows(ue_id) {
            vec![
                "n1n2-sub-001".to_string(),
                "n1n2-sub-002".to_string(),
            ]
        } else {
            Vec::new()
        }
    }

    fn initiate_handover(&self, ue_id: &str, target_gnb: &str) -> bool {
        info!(ue_id, target_gnb, "amf: initiate handover");
        if !self.knows(ue_id) {
            return false;
        }
        self.handovers.write().push((
            ue_id.to_string(),
            HandoverRecord {
                time: Utc::now().to_rfc3339(),
                source: "gnb1".to_string(),
                target: target_gnb.to_string(),
                status: "completed".to_string(),
            },
        ));
        true
    }

    fn handover_history(&self, ue_id: &str) -> Vec<HandoverRecord> {
        self.handovers
            .read()
            .iter()
            .filter(|(id, _)| id == ue_id)
            .map(|(_, record)| record.clone())
            .collect()
    }

    fn nf_subscriptions(&self) -> Vec<String> {
        vec![
            "nf-sub-smf-001".to_string(),
            "nf-sub-pcf-001".to_string(),
        ]
    }

    fn sbi_endpoints(&self) -> Vec<(String, String)> {
        vec![
            (
                "namf-comm".to_string(),
                "http://localhost:6000/namf-comm/v1".to_string(),
            ),
            (
                "namf-evts".to_string(),
                "http://localhost:6000/namf-evts/v1".to_string(),
            ),
        ]
    }
}
