use crate::bridge::{is_bridge_error, BridgeExecutor};
use crate::{ConnectionState, Target, TargetKind};
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static::lazy_static! {
    static ref ATTRIBUTE: Regex = Regex::new(r"^([a-z_]+):(\S+)$").unwrap();
}

const LIST_HEADER: &str = "List of devices attached";
const MODEL_PROPERTY: &str = "getprop ro.product.model";

/// One entry of the bridge device listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeDevice {
    pub serial: String,
    pub name: String,
    pub adb_status: ConnectionState,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transport_id: Option<String>,
}

impl BridgeDevice {
    fn set_state(&mut self, state: ConnectionState) {
        self.adb_status = state;
        self.details = state.details().to_string();
    }
}

impl From<&BridgeDevice> for Target {
    fn from(device: &BridgeDevice) -> Self {
        Target {
            id: device.serial.clone(),
            display_name: device.name.clone(),
            kind: TargetKind::BridgeDevice {
                connection_state: device.adb_status,
            },
        }
    }
}

pub struct DeviceDetector;

impl DeviceDetector {
    /// Enumerate bridge-attached devices. Never fails: an unavailable bridge
    /// yields an empty list.
    pub fn detect_all(bridge: &dyn BridgeExecutor, probe_capabilities: bool) -> Vec<BridgeDevice> {
        let output = bridge.devices();
        if is_bridge_error(&output) {
            tracing::warn!(diagnostic = %output, "Bridge device listing unavailable");
            return Vec::new();
        }

        let mut devices = Self::parse_device_list(&output);

        if probe_capabilities {
            for device in devices.iter_mut() {
                Self::probe_device(bridge, device);
            }
        }

        tracing::info!(count = devices.len(), "Bridge devices discovered");
        devices
    }

    /// Parse `devices -l` output. Lines before (and including) the header are
    /// ignored, as are daemon notices and blank lines.
    pub fn parse_device_list(output: &str) -> Vec<BridgeDevice> {
        let lines: Vec<&str> = output.lines().collect();
        let start = lines
            .iter()
            .position(|line| line.trim_start().starts_with(LIST_HEADER))
            .map(|idx| idx + 1)
            .unwrap_or(1);

        let mut devices: Vec<BridgeDevice> = Vec::new();
        for line in lines.iter().skip(start) {
            let line = line.trim();
            if line.is_empty() || line.starts_with('*') {
                continue;
            }

            if let Some(device) = Self::parse_device_line(line) {
                if devices.iter().any(|d| d.serial == device.serial) {
                    continue;
                }
                devices.push(device);
            }
        }

        devices
    }

    pub(crate) fn parse_device_line(line: &str) -> Option<BridgeDevice> {
        let mut tokens = line.split_whitespace();
        let serial = tokens.next()?.to_string();
        let status = tokens.next().unwrap_or("unknown");
        let state = ConnectionState::from_status_token(status);

        let model = Self::extract_attribute(line, "model");
        let name = model
            .as_deref()
            .map(|m| m.replace('_', " "))
            .unwrap_or_else(|| serial.clone());

        Some(BridgeDevice {
            name,
            adb_status: state,
            details: state.details().to_string(),
            product: Self::extract_attribute(line, "product"),
            device: Self::extract_attribute(line, "device"),
            transport_id: Self::extract_attribute(line, "transport_id"),
            model,
            serial,
        })
    }

    /// Extract a `key:value` attribute from a long-form device line
    pub(crate) fn extract_attribute(line: &str, key: &str) -> Option<String> {
        line.split_whitespace().skip(2).find_map(|token| {
            let caps = ATTRIBUTE.captures(token)?;
            if &caps[1] == key {
                Some(caps[2].to_string())
            } else {
                None
            }
        })
    }

    /// Ask an authorized device for its model. A device that lists as
    /// authorized but cannot answer is downgraded to `DebuggingOff`.
    fn probe_device(bridge: &dyn BridgeExecutor, device: &mut BridgeDevice) {
        if device.adb_status != ConnectionState::DebuggingOn {
            return;
        }

        let reply = bridge.shell(&device.serial, MODEL_PROPERTY);
        if is_bridge_error(&reply) || reply.trim().is_empty() {
            tracing::warn!(serial = %device.serial, reply = %reply, "Device shell probe failed");
            device.name = device.serial.clone();
            device.set_state(ConnectionState::DebuggingOff);
        } else {
            device.name = reply.trim().to_string();
        }
    }
}
