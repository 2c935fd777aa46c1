//! Failure classification for best-effort wipe operations
//!
//! Each individual deletion reports a `Result<Removed, SkipReason>`; the
//! reason is derived from the underlying I/O error so that skipped items can
//! be logged and counted without aborting the surrounding operation.
use crate::WipeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// Where a failure is contained and how it surfaces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FailureClass {
    /// Bridge tool missing, timed out or exited badly
    BridgeUnavailable,

    /// A single file or directory could not be removed
    ItemDeleteFailure,

    /// Full wipe requested on a path that does not exist
    TargetNotFound,

    /// An entry could not be read while walking a tree
    TraversalFailure,
}

impl FailureClass {
    pub fn description(&self) -> &'static str {
        match self {
            FailureClass::BridgeUnavailable => "Bridge command produced no usable output",
            FailureClass::ItemDeleteFailure => "Item left in place and excluded from results",
            FailureClass::TargetNotFound => "Wipe target does not exist",
            FailureClass::TraversalFailure => "Entry skipped while walking the tree",
        }
    }

    /// Only a missing full-wipe target is reported to the caller as an error.
    pub fn is_user_visible(&self) -> bool {
        matches!(self, FailureClass::TargetNotFound)
    }

    pub fn classify(error: &WipeError) -> Self {
        match error {
            WipeError::TargetNotFound(_) => FailureClass::TargetNotFound,
            WipeError::BridgeUnavailable(_) | WipeError::Timeout(_) => {
                FailureClass::BridgeUnavailable
            }
            WipeError::Io(_)
            | WipeError::InvalidTarget(_)
            | WipeError::InvalidLevel(_)
            | WipeError::Server(_) => {
                FailureClass::ItemDeleteFailure
            }
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureClass::BridgeUnavailable => write!(f, "BridgeUnavailable"),
            FailureClass::ItemDeleteFailure => write!(f, "ItemDeleteFailure"),
            FailureClass::TargetNotFound => write!(f, "TargetNotFound"),
            FailureClass::TraversalFailure => write!(f, "TraversalFailure"),
        }
    }
}

/// Why a single item was left behind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    PermissionDenied,
    /// Locked or held open by another process
    InUse,
    /// Removed by someone else between listing and deletion
    Vanished,
    Other(String),
}

impl SkipReason {
    pub fn from_io(err: &io::Error) -> Self {
        if let Some(code) = err.raw_os_error() {
            if is_in_use_code(code) {
                return SkipReason::InUse;
            }
        }

        match err.kind() {
            io::ErrorKind::PermissionDenied => SkipReason::PermissionDenied,
            io::ErrorKind::NotFound => SkipReason::Vanished,
            _ => SkipReason::Other(err.to_string()),
        }
    }

    pub fn class(&self) -> FailureClass {
        FailureClass::ItemDeleteFailure
    }
}

impl From<io::Error> for SkipReason {
    fn from(err: io::Error) -> Self {
        SkipReason::from_io(&err)
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::PermissionDenied => write!(f, "permission denied"),
            SkipReason::InUse => write!(f, "in use"),
            SkipReason::Vanished => write!(f, "vanished"),
            SkipReason::Other(msg) => write!(f, "{}", msg),
        }
    }
}

#[cfg(unix)]
fn is_in_use_code(code: i32) -> bool {
    // EBUSY, ETXTBSY
    code == 16 || code == 26
}

#[cfg(windows)]
fn is_in_use_code(code: i32) -> bool {
    // ERROR_SHARING_VIOLATION, ERROR_LOCK_VIOLATION
    code == 32 || code == 33
}

#[cfg(not(any(unix, windows)))]
fn is_in_use_code(_code: i32) -> bool {
    false
}
