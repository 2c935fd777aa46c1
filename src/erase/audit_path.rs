use std::ffi::OsStr;
use std::path::Path;

/// Render a path for the audit lists without losing information.
///
/// UTF-8 names pass through unchanged. On Unix, bytes that are not valid
/// UTF-8 become `\xNN` and a literal backslash becomes `\\`, so two distinct
/// paths never render the same.
pub fn audit_path(path: &Path) -> String {
    encode_os_str(path.as_os_str())
}

#[cfg(unix)]
fn encode_os_str(raw: &OsStr) -> String {
    use std::os::unix::ffi::OsStrExt;

    let mut bytes = raw.as_bytes();
    let mut out = String::with_capacity(bytes.len());

    loop {
        match std::str::from_utf8(bytes) {
            Ok(text) => {
                push_escaped(&mut out, text);
                return out;
            }
            Err(e) => {
                let (head, tail) = bytes.split_at(e.valid_up_to());
                push_escaped(&mut out, std::str::from_utf8(head).unwrap_or_default());

                let bad_len = e.error_len().unwrap_or(tail.len());
                for byte in &tail[..bad_len] {
                    out.push_str(&format!("\\x{:02x}", byte));
                }
                bytes = &tail[bad_len..];
            }
        }
    }
}

#[cfg(unix)]
fn push_escaped(out: &mut String, text: &str) {
    for ch in text.chars() {
        if ch == '\\' {
            out.push_str("\\\\");
        } else {
            out.push(ch);
        }
    }
}

#[cfg(windows)]
fn encode_os_str(raw: &OsStr) -> String {
    use std::os::windows::ffi::OsStrExt;

    char::decode_utf16(raw.encode_wide())
        .map(|unit| match unit {
            Ok(ch) => ch.to_string(),
            Err(e) => format!("\\u{{{:04x}}}", e.unpaired_surrogate()),
        })
        .collect()
}

#[cfg(not(any(unix, windows)))]
fn encode_os_str(raw: &OsStr) -> String {
    raw.to_string_lossy().into_owned()
}
