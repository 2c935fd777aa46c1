use super::audit_path::audit_path;
use super::fs_ops::FileOps;
use crate::error::{FailureClass, SkipReason};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    File,
    Directory,
}

/// An item that was actually removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removed {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Aggregated outcome of a best-effort deletion pass.
#[derive(Debug, Clone, Default)]
pub struct PurgeSummary {
    pub removed: Vec<Removed>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

impl PurgeSummary {
    pub fn record(&mut self, outcome: Result<Removed, (PathBuf, SkipReason)>) {
        match outcome {
            Ok(removed) => {
                tracing::debug!(path = %removed.path.display(), kind = ?removed.kind, "Removed");
                self.removed.push(removed);
            }
            Err((path, reason)) => {
                let class = reason.class();
                tracing::debug!(
                    path = %path.display(),
                    %class,
                    description = class.description(),
                    %reason,
                    "Skipped"
                );
                self.skipped.push((path, reason));
            }
        }
    }

    /// Removed paths in removal order.
    pub fn deleted_paths(&self) -> Vec<String> {
        self.removed
            .iter()
            .map(|r| audit_path(&r.path))
            .collect()
    }

    pub fn removed_count(&self) -> usize {
        self.removed.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn files_removed(&self) -> usize {
        self.removed
            .iter()
            .filter(|r| r.kind == EntryKind::File)
            .count()
    }
}

fn remove_entry(
    ops: &dyn FileOps,
    path: &Path,
    kind: EntryKind,
) -> Result<Removed, (PathBuf, SkipReason)> {
    let result = match kind {
        EntryKind::File => ops.remove_file(path),
        EntryKind::Directory => ops.remove_dir_all(path),
    };

    result
        .map(|()| Removed {
            path: path.to_path_buf(),
            kind,
        })
        .map_err(|e| (path.to_path_buf(), SkipReason::from_io(&e)))
}

/// Delete every file and directory below `root`, children before parents.
///
/// Regular files are made writable first. `root` itself is kept.
pub fn purge_tree(root: &Path, ops: &dyn FileOps) -> PurgeSummary {
    let mut summary = PurgeSummary::default();

    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(
                    class = %FailureClass::TraversalFailure,
                    description = FailureClass::TraversalFailure.description(),
                    error = %e,
                    "Traversal error during purge"
                );
                continue;
            }
        };

        let path = entry.path();
        let file_type = entry.file_type();

        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else {
            if file_type.is_file() {
                if let Err(e) = ops.make_writable(path) {
                    tracing::debug!(path = %path.display(), error = %e, "Could not make writable");
                }
            }
            EntryKind::File
        };

        summary.record(remove_entry(ops, path, kind));
    }

    summary
}

/// Delete every non-directory entry below `root`; directories stay.
pub fn clear_files(root: &Path, ops: &dyn FileOps) -> PurgeSummary {
    let mut summary = PurgeSummary::default();

    for entry in WalkDir::new(root).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(
                    class = %FailureClass::TraversalFailure,
                    description = FailureClass::TraversalFailure.description(),
                    error = %e,
                    "Traversal error during clear"
                );
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        summary.record(remove_entry(ops, entry.path(), EntryKind::File));
    }

    summary
}
