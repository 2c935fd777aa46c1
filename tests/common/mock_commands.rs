/// Mock bridge infrastructure for testing
///
/// Provides a `BridgeExecutor` that answers from a registry of canned
/// outputs instead of spawning the real bridge tool, and records every
/// command it was asked to run.
use devwipe::bridge::{BridgeExecutor, BRIDGE_ERROR_PREFIX};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock bridge registry keyed by the space-joined argument list
pub struct MockBridge {
    responses: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockBridge {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a canned response for an exact command line
    pub fn register(&self, command_key: &str, output: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(command_key.to_string(), output.to_string());
    }

    /// Every command line run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl BridgeExecutor for MockBridge {
    fn run(&self, args: &[&str]) -> String {
        let key = args.join(" ");
        self.calls.lock().unwrap().push(key.clone());
        self.responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| format!("{}no mock registered for '{}'", BRIDGE_ERROR_PREFIX, key))
    }
}

/// Canned `adb devices -l` listings
pub struct MockAdbData;

#[allow(dead_code)]
impl MockAdbData {
    pub fn no_devices() -> String {
        "List of devices attached\n".to_string()
    }

    pub fn mixed_devices() -> String {
        "List of devices attached\n\
         R58M123ABC             device usb:1-1 product:beyond1qltesq model:SM_G973U device:beyond1q transport_id:1\n\
         emulator-5554          unauthorized transport_id:2\n\
         0123456789ABCDEF       offline transport_id:3\n"
            .to_string()
    }

    pub fn single_authorized(serial: &str, model: &str) -> String {
        format!(
            "List of devices attached\n{}    device usb:2-1 product:{} model:{} device:generic transport_id:7\n",
            serial,
            model.to_lowercase(),
            model
        )
    }
}
