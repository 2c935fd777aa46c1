// Wipe Orchestrator - Routes a wipe request to the procedure for its target kind
//
// The target kind is inferred from the identifier alone: no prior discovery
// handle is needed. A bridge device gets a shell command; a host path gets a
// best-effort file purge.

use crate::bridge::{is_bridge_error, AdbBridge, BridgeExecutor};
use crate::error::FailureClass;
use crate::erase::{clear_files, purge_tree, FileOps, HostFs, PurgeSummary};
use crate::{WipeConfig, WipeError, WipeLevel, WipeRequest, WipeResult, WipeStatus};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Package data clear issued for a safe wipe of a bridge device
pub const DEVICE_SAFE_COMMAND: &str = "pm clear-all";

/// How a wipe identifier is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetRef {
    BridgeDevice(String),
    VolumePath(PathBuf),
}

/// Classify a raw identifier: anything that is not an existing path and is
/// longer than `threshold` characters is a device serial.
///
/// A serial that collides with a real path is treated as that path.
pub fn infer_target_kind(target_id: &str, threshold: usize) -> TargetRef {
    if !Path::new(target_id).exists() && target_id.chars().count() > threshold {
        TargetRef::BridgeDevice(target_id.to_string())
    } else {
        TargetRef::VolumePath(PathBuf::from(target_id))
    }
}

/// Executes safe and full wipes against devices and host paths
pub struct WipeOrchestrator {
    config: WipeConfig,
    bridge: Arc<dyn BridgeExecutor>,
    fs: Arc<dyn FileOps>,
}

impl WipeOrchestrator {
    pub fn new(config: WipeConfig) -> Self {
        let bridge = Arc::new(AdbBridge::from_config(&config));
        Self::with_parts(config, bridge, Arc::new(HostFs))
    }

    pub fn with_parts(
        config: WipeConfig,
        bridge: Arc<dyn BridgeExecutor>,
        fs: Arc<dyn FileOps>,
    ) -> Self {
        Self { config, bridge, fs }
    }

    /// Run one wipe to completion. Always returns a result; the only error
    /// status is a full wipe of a path that does not exist.
    pub fn execute(&self, request: &WipeRequest) -> WipeResult {
        let operation_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "wipe",
            %operation_id,
            target = %request.target_id,
            level = %request.level
        );
        let _guard = span.enter();

        let started_at = Utc::now();
        let target = infer_target_kind(&request.target_id, self.config.device_length_threshold);
        tracing::info!(?target, "Starting wipe");

        let outcome = match (&target, request.level) {
            (TargetRef::BridgeDevice(serial), WipeLevel::Safe) => self.safe_wipe_device(serial),
            (TargetRef::BridgeDevice(serial), WipeLevel::Full) => self.full_wipe_device(serial),
            (TargetRef::VolumePath(_), WipeLevel::Safe) => self.safe_wipe_host(&request.target_id),
            (TargetRef::VolumePath(path), WipeLevel::Full) => {
                self.full_wipe_path(&request.target_id, path)
            }
        };

        let finished_at = Utc::now();
        let elapsed = (finished_at - started_at).to_std().unwrap_or_default();

        match outcome.status {
            WipeStatus::Success => tracing::info!(
                deleted = outcome.deleted_files.len(),
                skipped = outcome.skipped,
                elapsed = %humantime::format_duration(elapsed),
                "Wipe finished"
            ),
            WipeStatus::Error => tracing::warn!(message = %outcome.message, "Wipe rejected"),
        }

        WipeResult {
            status: outcome.status,
            message: outcome.message,
            details: outcome.details,
            files_deleted: outcome.deleted_files.len(),
            deleted_files: outcome.deleted_files,
            skipped: outcome.skipped,
            operation_id,
            started_at,
            finished_at,
        }
    }

    pub fn safe_wipe(&self, target_id: &str) -> WipeResult {
        self.execute(&WipeRequest {
            target_id: target_id.to_string(),
            level: WipeLevel::Safe,
        })
    }

    pub fn full_wipe(&self, target_id: &str) -> WipeResult {
        self.execute(&WipeRequest {
            target_id: target_id.to_string(),
            level: WipeLevel::Full,
        })
    }

    fn safe_wipe_device(&self, serial: &str) -> Outcome {
        let output = self.run_device_command(serial, DEVICE_SAFE_COMMAND);
        Outcome::device(format!("Safe wipe (Android) completed on {}", serial), output)
    }

    fn full_wipe_device(&self, serial: &str) -> Outcome {
        let command = format!(
            "rm -rf {}/*",
            self.config.device_public_root.trim_end_matches('/')
        );
        let output = self.run_device_command(serial, &command);
        Outcome::device(
            format!("Full destructive wipe (Android) completed on {}", serial),
            output,
        )
    }

    fn run_device_command(&self, serial: &str, command: &str) -> String {
        tracing::info!(serial, command, "Issuing device wipe command");
        let output = self.bridge.shell(serial, command);
        if is_bridge_error(&output) {
            tracing::warn!(serial, diagnostic = %output, "Device wipe command did not run");
        }
        output
    }

    /// A safe wipe of a host target always clears the temp-files root,
    /// whatever path was named.
    fn safe_wipe_host(&self, target_id: &str) -> Outcome {
        let temp_root = &self.config.temp_root;
        tracing::info!(temp_root = %temp_root.display(), "Clearing temporary files");

        let summary = clear_files(temp_root, self.fs.as_ref());
        Outcome::purged(
            format!(
                "Safe wipe completed on {}: cleared {} files",
                target_id,
                summary.removed_count()
            ),
            summary,
        )
    }

    fn full_wipe_path(&self, target_id: &str, path: &Path) -> Outcome {
        if !path.exists() {
            return Outcome::not_found(target_id);
        }

        let summary = purge_tree(path, self.fs.as_ref());
        Outcome::purged(
            format!(
                "Full destructive wipe completed on {}: deleted {} items",
                target_id,
                summary.removed_count()
            ),
            summary,
        )
    }
}

struct Outcome {
    status: WipeStatus,
    message: String,
    details: Option<String>,
    deleted_files: Vec<String>,
    skipped: usize,
}

impl Outcome {
    fn device(message: String, output: String) -> Self {
        Self {
            status: WipeStatus::Success,
            message,
            details: Some(output),
            deleted_files: Vec::new(),
            skipped: 0,
        }
    }

    fn purged(message: String, summary: PurgeSummary) -> Self {
        if summary.skipped_count() > 0 {
            tracing::warn!(skipped = summary.skipped_count(), "Some items could not be removed");
        }
        Self {
            status: WipeStatus::Success,
            message,
            details: None,
            deleted_files: summary.deleted_paths(),
            skipped: summary.skipped_count(),
        }
    }

    fn not_found(target_id: &str) -> Self {
        let error = WipeError::TargetNotFound(target_id.to_string());
        tracing::debug!(class = %FailureClass::classify(&error), "Full wipe target missing");
        Self {
            status: WipeStatus::Error,
            message: error.to_string(),
            details: None,
            deleted_files: Vec::new(),
            skipped: 0,
        }
    }
}
