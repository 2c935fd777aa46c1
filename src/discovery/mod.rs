// Target discovery
//
// - devices.rs: bridge device listing and connection-state classification
// - volumes.rs: mounted local volumes and their labels
//
// Discovery keeps no state between calls; every call builds a fresh snapshot.

pub mod devices;
pub mod volumes;


pub use devices::{BridgeDevice, DeviceDetector};
pub use volumes::{LocalVolume, VolumeDetector};

use crate::bridge::BridgeExecutor;
use crate::{ListingPolicy, Target, WipeConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use sysinfo::System;

const DEFAULT_HOST_NAME: &str = "My-PC";

/// Response body of a device listing.
///
/// `phones` is always present. Under the fallback policy `pc_name` and
/// `drives` appear only when no bridge device was found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceListing {
    pub phones: Vec<BridgeDevice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pc_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drives: Option<Vec<LocalVolume>>,
}

impl DeviceListing {
    /// Flatten into typed targets; ids are unique within the snapshot.
    pub fn targets(&self) -> Vec<Target> {
        let mut targets: Vec<Target> = self.phones.iter().map(Target::from).collect();
        for volume in self.drives.iter().flatten() {
            if targets.iter().all(|t| t.id != volume.mountpoint) {
                targets.push(Target::from(volume));
            }
        }
        targets
    }
}

pub struct TargetDiscovery {
    config: WipeConfig,
    bridge: Arc<dyn BridgeExecutor>,
}

impl TargetDiscovery {
    pub fn new(config: WipeConfig, bridge: Arc<dyn BridgeExecutor>) -> Self {
        Self { config, bridge }
    }

    pub fn list_devices(&self) -> Vec<BridgeDevice> {
        DeviceDetector::detect_all(self.bridge.as_ref(), self.config.probe_capabilities)
    }

    pub fn list_volumes(&self) -> Vec<LocalVolume> {
        VolumeDetector::detect_all(self.config.command_timeout)
    }

    /// Build the device listing according to the configured policy.
    pub fn listing(&self) -> DeviceListing {
        let phones = self.list_devices();
        Self::assemble(self.config.listing_policy, phones, || {
            (host_name(&self.config.host_name_env), self.list_volumes())
        })
    }

    /// Combine the two populations. Host volumes are only enumerated when the
    /// policy will report them.
    pub fn assemble<F>(policy: ListingPolicy, phones: Vec<BridgeDevice>, host: F) -> DeviceListing
    where
        F: FnOnce() -> (String, Vec<LocalVolume>),
    {
        let include_host = match policy {
            ListingPolicy::Merge => true,
            ListingPolicy::Fallback => phones.is_empty(),
        };

        if include_host {
            let (pc_name, drives) = host();
            DeviceListing {
                phones,
                pc_name: Some(pc_name),
                drives: Some(drives),
            }
        } else {
            DeviceListing {
                phones,
                pc_name: None,
                drives: None,
            }
        }
    }

    /// All targets visible right now, devices first.
    pub fn targets(&self) -> Vec<Target> {
        let phones = self.list_devices();
        Self::assemble(ListingPolicy::Merge, phones, || {
            (String::new(), self.list_volumes())
        })
        .targets()
    }
}

/// Host name reported with local volumes: the override variable when set,
/// otherwise the OS host name.
pub fn host_name(override_env: &str) -> String {
    std::env::var(override_env)
        .ok()
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .or_else(System::host_name)
        .unwrap_or_else(|| DEFAULT_HOST_NAME.to_string())
}
