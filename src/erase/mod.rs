// Best-effort logical erasure of host file trees
//
// - audit_path.rs: lossless rendering of removed paths for results
// - fs_ops.rs: the filesystem seam (host implementation and the trait tests substitute)
// - purge.rs: per-item deletion with failure isolation and result aggregation
//
// Every deletion is attempted independently. A failure is recorded as a
// SkipReason and the walk continues; nothing is rolled back.

pub mod audit_path;
pub mod fs_ops;
pub mod purge;


pub use audit_path::audit_path;
pub use fs_ops::{FileOps, HostFs};
pub use purge::{clear_files, purge_tree, EntryKind, PurgeSummary, Removed};
