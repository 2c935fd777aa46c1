// Device-bridge command execution
//
// - executor.rs: bounded subprocess runner and the bridge seam used by
//   discovery and the wipe engine

pub mod executor;

#[cfg(test)]
mod executor_tests;

pub use executor::{
    is_bridge_error, run_with_timeout, AdbBridge, BridgeExecutor, CommandOutcome,
    BRIDGE_ERROR_PREFIX,
};
