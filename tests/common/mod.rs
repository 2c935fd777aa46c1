/// Common test utilities and mock infrastructure
///
/// This module provides shared functionality for integration tests including:
/// - A scripted bridge standing in for the external device-bridge tool
/// - Scratch file-tree builders
pub mod mock_commands;
pub mod test_helpers;
