pub mod bridge;
pub mod discovery;
pub mod erase;
pub mod error;
pub mod server;
pub mod verification;
pub mod wipe_orchestrator;

// Re-export main wipe orchestrator for convenience
pub use wipe_orchestrator::{infer_target_kind, TargetRef, WipeOrchestrator};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WipeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path {0} does not exist.")]
    TargetNotFound(String),

    #[error("Bridge unavailable: {0}")]
    BridgeUnavailable(String),

    #[error("Operation timeout: {0}")]
    Timeout(String),

    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Invalid wipe level '{0}' (expected safe or full)")]
    InvalidLevel(String),

    #[error("Server error: {0}")]
    Server(String),
}

pub type WipeResultT<T> = Result<T, WipeError>;

/// Runtime configuration shared by discovery, the wipe engine and the transport.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WipeConfig {
    /// Device-bridge executable
    pub bridge_program: String,
    #[serde(with = "duration_millis")]
    pub command_timeout: Duration,
    /// Root cleared by a safe wipe of a host target
    pub temp_root: PathBuf,
    /// Storage root removed by a full wipe of a bridge device
    pub device_public_root: String,
    pub listing_policy: ListingPolicy,
    pub probe_capabilities: bool,
    pub host_name_env: String,
    /// Identifiers longer than this that are not existing paths are device serials
    pub device_length_threshold: usize,
}

impl Default for WipeConfig {
    fn default() -> Self {
        Self {
            bridge_program: "adb".to_string(),
            command_timeout: Duration::from_millis(10_000),
            temp_root: std::env::temp_dir(),
            device_public_root: "/sdcard".to_string(),
            listing_policy: ListingPolicy::Fallback,
            probe_capabilities: false,
            host_name_env: "COMPUTERNAME".to_string(),
            device_length_threshold: 5,
        }
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(d)?))
    }
}

/// How `GET /devices` combines bridge devices and local volumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingPolicy {
    /// Volumes are reported only when no bridge device is attached
    Fallback,
    /// Devices and volumes are always reported together
    Merge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipeLevel {
    Safe,
    Full,
}

impl std::str::FromStr for WipeLevel {
    type Err = WipeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "safe" => Ok(WipeLevel::Safe),
            "full" => Ok(WipeLevel::Full),
            _ => Err(WipeError::InvalidLevel(s.to_string())),
        }
    }
}

impl std::fmt::Display for WipeLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WipeLevel::Safe => write!(f, "safe"),
            WipeLevel::Full => write!(f, "full"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    DebuggingOn,  // authorized, shell available
    DebuggingOff, // visible, shell unusable
    Unauthorized, // awaiting on-device consent
    Offline,
    NotDetected,
}

impl ConnectionState {
    /// Map a bridge status token (second column of `devices -l`).
    pub fn from_status_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "device" => ConnectionState::DebuggingOn,
            "unauthorized" => ConnectionState::Unauthorized,
            "offline" => ConnectionState::Offline,
            _ => ConnectionState::NotDetected,
        }
    }

    pub fn details(&self) -> &'static str {
        match self {
            ConnectionState::DebuggingOn => "USB debugging enabled and authorized",
            ConnectionState::DebuggingOff => {
                "Device visible to the bridge but shell commands are unavailable"
            }
            ConnectionState::Unauthorized => {
                "USB debugging detected but not authorized. Allow access on the device."
            }
            ConnectionState::Offline => {
                "Device connected but bridge offline; reconnect or check the cable"
            }
            ConnectionState::NotDetected => "Device connected but USB debugging disabled",
        }
    }

    /// Whether a wipe issued to this device can reach its shell.
    pub fn can_wipe(&self) -> bool {
        matches!(self, ConnectionState::DebuggingOn)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetKind {
    BridgeDevice {
        connection_state: ConnectionState,
    },
    LocalVolume {
        mountpoint: String,
        filesystem_type: String,
    },
}

/// A discovered erasure candidate. Built fresh on every discovery call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: String,
    pub display_name: String,
    #[serde(flatten)]
    pub kind: TargetKind,
}

impl Target {
    pub fn is_bridge_device(&self) -> bool {
        matches!(self.kind, TargetKind::BridgeDevice { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WipeRequest {
    pub target_id: String,
    pub level: WipeLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipeStatus {
    Success,
    Error,
}

/// Outcome of one wipe request. `deleted_files` lists every removed item in
/// removal order and is never truncated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WipeResult {
    pub status: WipeStatus,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub files_deleted: usize,
    pub deleted_files: Vec<String>,
    pub skipped: usize,
    pub operation_id: uuid::Uuid,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub finished_at: chrono::DateTime<chrono::Utc>,
}

impl WipeResult {
    pub fn is_success(&self) -> bool {
        self.status == WipeStatus::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStatus {
    Ok,
}

/// Residual-content snapshot of a path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyResult {
    pub status: VerifyStatus,
    pub files_remaining: usize,
    pub remaining_files: Vec<String>,
}
