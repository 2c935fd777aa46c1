use crate::bridge::run_with_timeout;
use crate::{Target, TargetKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use sysinfo::Disks;

/// A mounted local partition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVolume {
    pub device: String,
    pub mountpoint: String,
    pub fstype: String,
    pub name: String,
    pub total_bytes: u64,
    pub available_bytes: u64,
    pub removable: bool,
}

impl From<&LocalVolume> for Target {
    fn from(volume: &LocalVolume) -> Self {
        Target {
            id: volume.mountpoint.clone(),
            display_name: volume.name.clone(),
            kind: TargetKind::LocalVolume {
                mountpoint: volume.mountpoint.clone(),
                filesystem_type: volume.fstype.clone(),
            },
        }
    }
}

pub struct VolumeDetector;

impl VolumeDetector {
    /// Enumerate mounted, non-pseudo partitions. One entry per mount point.
    pub fn detect_all(label_timeout: Duration) -> Vec<LocalVolume> {
        let disks = Disks::new_with_refreshed_list();
        let mut seen = HashSet::new();
        let mut volumes = Vec::new();

        for disk in disks.list() {
            let device = disk.name().to_string_lossy().to_string();
            let mountpoint = disk.mount_point().to_string_lossy().to_string();
            let fstype = disk.file_system().to_string_lossy().to_string();

            if Self::should_skip_volume(&fstype) || !seen.insert(mountpoint.clone()) {
                continue;
            }

            let name = Self::query_label(&device, &mountpoint, label_timeout)
                .unwrap_or_else(|| device.clone());

            volumes.push(LocalVolume {
                device,
                mountpoint,
                fstype,
                name,
                total_bytes: disk.total_space(),
                available_bytes: disk.available_space(),
                removable: disk.is_removable(),
            });
        }

        tracing::info!(count = volumes.len(), "Local volumes discovered");
        volumes
    }

    /// Pseudo and in-memory filesystems are never erasure targets
    pub(crate) fn should_skip_volume(fstype: &str) -> bool {
        let fstype = fstype.to_lowercase();
        matches!(
            fstype.as_str(),
            "tmpfs"
                | "devtmpfs"
                | "ramfs"
                | "proc"
                | "sysfs"
                | "overlay"
                | "squashfs"
                | "autofs"
                | "devpts"
                | "efivarfs"
                | "debugfs"
                | "tracefs"
                | "securityfs"
                | "pstore"
                | "fusectl"
                | "mqueue"
                | "hugetlbfs"
        ) || fstype.starts_with("cgroup")
    }

    /// Platform volume label lookup. `None` when the query fails or the volume
    /// has no label.
    #[cfg(target_os = "linux")]
    fn query_label(device: &str, _mountpoint: &str, timeout: Duration) -> Option<String> {
        let outcome = run_with_timeout("lsblk", &["-no", "LABEL", device], timeout).ok()?;
        if !outcome.success() {
            return None;
        }
        Self::parse_lsblk_label(&outcome.stdout)
    }

    #[cfg(target_os = "macos")]
    fn query_label(device: &str, _mountpoint: &str, timeout: Duration) -> Option<String> {
        let outcome = run_with_timeout("diskutil", &["info", device], timeout).ok()?;
        Self::extract_field(&outcome.stdout, "Volume Name:")
    }

    #[cfg(target_os = "windows")]
    fn query_label(_device: &str, mountpoint: &str, timeout: Duration) -> Option<String> {
        let drive = mountpoint.trim_end_matches('\\');
        let outcome = run_with_timeout("cmd", &["/C", "vol", drive], timeout).ok()?;
        Self::parse_vol_label(&outcome.stdout)
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    fn query_label(_device: &str, _mountpoint: &str, _timeout: Duration) -> Option<String> {
        None
    }

    pub(crate) fn parse_lsblk_label(output: &str) -> Option<String> {
        output
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }

    /// Extract field from `diskutil info` style output
    #[allow(dead_code)]
    pub(crate) fn extract_field(output: &str, field_name: &str) -> Option<String> {
        let value = output
            .lines()
            .find(|line| line.contains(field_name))?
            .split_once(':')?
            .1
            .trim()
            .to_string();

        if value.is_empty() || value.starts_with("Not applicable") {
            None
        } else {
            Some(value)
        }
    }

    /// Parse `vol` output: "Volume in drive C is Windows" / "... has no label."
    #[allow(dead_code)]
    pub(crate) fn parse_vol_label(output: &str) -> Option<String> {
        let line = output.lines().find(|l| l.contains("Volume in drive"))?;
        let (_, label) = line.split_once(" is ")?;
        let label = label.trim();
        if label.is_empty() {
            None
        } else {
            Some(label.to_string())
        }
    }
}
