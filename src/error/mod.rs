/// Failure taxonomy for discovery, wiping and verification
///
/// Failures are contained at the smallest scope that produced them:
///
/// ```text
/// ┌──────────────────────┬────────────────────────┬──────────────────────────┐
/// │ Class                │ Scope                  │ Surfaced as              │
/// ├──────────────────────┼────────────────────────┼──────────────────────────┤
/// │ BridgeUnavailable    │ one subprocess call    │ empty list / diagnostic  │
/// │ ItemDeleteFailure    │ one file or directory  │ skipped, not listed      │
/// │ TargetNotFound       │ one full wipe request  │ status = error           │
/// │ TraversalFailure     │ one directory entry    │ partial listing          │
/// └──────────────────────┴────────────────────────┴──────────────────────────┘
/// ```
///
/// Only `TargetNotFound` is ever visible to a caller as an error status.
pub mod classification;

pub use classification::{FailureClass, SkipReason};
