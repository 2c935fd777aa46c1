// Tests for the residual-content verifier

use super::Verifier;
use crate::VerifyStatus;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_verify_empty_directory() {
    let tmp = TempDir::new().unwrap();
    let result = Verifier::verify(tmp.path());
    assert_eq!(result.status, VerifyStatus::Ok);
    assert_eq!(result.files_remaining, 0);
    assert!(result.remaining_files.is_empty());
}

#[test]
fn test_verify_counts_files_not_directories() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("a/b/c")).unwrap();
    fs::write(tmp.path().join("root.txt"), b"1").unwrap();
    fs::write(tmp.path().join("a/b/leaf.txt"), b"2").unwrap();

    let result = Verifier::verify(tmp.path());
    assert_eq!(result.files_remaining, 2);
    assert_eq!(result.remaining_files.len(), result.files_remaining);
    assert!(result
        .remaining_files
        .iter()
        .any(|p| p.ends_with("leaf.txt")));
}

#[test]
fn test_verify_missing_path_is_ok_and_empty() {
    let tmp = TempDir::new().unwrap();
    let result = Verifier::verify(tmp.path().join("does-not-exist"));
    assert_eq!(result.status, VerifyStatus::Ok);
    assert_eq!(result.files_remaining, 0);
}

#[test]
fn test_verify_result_wire_format() {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("left.bin"), b"x").unwrap();

    let json = serde_json::to_value(Verifier::verify(tmp.path())).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["files_remaining"], 1);
    assert_eq!(json["remaining_files"].as_array().map(Vec::len), Some(1));
}

#[cfg(target_os = "linux")]
#[test]
fn test_verify_distinguishes_non_utf8_names() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join(OsStr::from_bytes(b"a\xff")), b"1").unwrap();
    fs::write(tmp.path().join(OsStr::from_bytes(b"a\xfe")), b"2").unwrap();

    let result = Verifier::verify(tmp.path());
    assert_eq!(result.files_remaining, 2);
    assert_ne!(result.remaining_files[0], result.remaining_files[1]);
}
