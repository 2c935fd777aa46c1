use crate::erase::audit_path;
use crate::error::FailureClass;
use crate::{VerifyResult, VerifyStatus};
use std::path::Path;
use walkdir::WalkDir;

/// Post-wipe residual-content scan.
///
/// Read-only: reports what is left under a path right now, not a difference
/// against an earlier wipe.
pub struct Verifier;

impl Verifier {
    /// Collect the full path of every non-directory entry under `path`.
    ///
    /// Unreadable entries are skipped and a missing path yields an empty
    /// result; the status is always `ok`.
    pub fn verify(path: impl AsRef<Path>) -> VerifyResult {
        let path = path.as_ref();
        let mut remaining_files = Vec::new();
        let mut traversal_errors = 0usize;

        for entry in WalkDir::new(path).min_depth(1) {
            match entry {
                Ok(entry) if !entry.file_type().is_dir() => {
                    remaining_files.push(audit_path(entry.path()));
                }
                Ok(_) => {}
                Err(e) => {
                    traversal_errors += 1;
                    tracing::debug!(
                        class = %FailureClass::TraversalFailure,
                        description = FailureClass::TraversalFailure.description(),
                        error = %e,
                        "Traversal error during verification"
                    );
                }
            }
        }

        tracing::info!(
            path = %path.display(),
            remaining = remaining_files.len(),
            traversal_errors,
            "Verification scan complete"
        );

        VerifyResult {
            status: VerifyStatus::Ok,
            files_remaining: remaining_files.len(),
            remaining_files,
        }
    }
}
