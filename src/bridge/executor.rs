use crate::error::FailureClass;
use crate::{WipeError, WipeResultT};
use std::io::{ErrorKind, Read};
use std::process::{Command, Stdio};
use std::sync::{mpsc, Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

/// Prefix of every diagnostic returned in place of bridge output.
pub const BRIDGE_ERROR_PREFIX: &str = "ADB Error: ";

const POLL_INTERVAL: Duration = Duration::from_millis(20);
const PIPE_GRACE: Duration = Duration::from_millis(200);
const READ_CHUNK: usize = 4096;

/// Captured result of a subprocess that ran to completion.
#[derive(Debug, Clone, Default)]
pub struct CommandOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: Option<i32>,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Returns true when `output` is a diagnostic rather than tool output.
pub fn is_bridge_error(output: &str) -> bool {
    output.starts_with(BRIDGE_ERROR_PREFIX)
}

/// Run `program args...`, waiting at most `timeout` for it to exit.
///
/// Spawn failures surface as `BridgeUnavailable`; a process still running at
/// the deadline is killed and reported as `Timeout`. A non-zero exit is not an
/// error: the captured output is returned as-is.
pub fn run_with_timeout(program: &str, args: &[&str], timeout: Duration) -> WipeResultT<CommandOutcome> {
    tracing::debug!(program, ?args, timeout = %humantime::format_duration(timeout), "Running command");

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| WipeError::BridgeUnavailable(format!("failed to spawn {}: {}", program, e)))?;

    let stdout_pipe = PipeReader::spawn(child.stdout.take());
    let stderr_pipe = PipeReader::spawn(child.stderr.take());

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait()? {
            Some(status) => break status,
            None => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(WipeError::Timeout(format!(
                        "{} did not finish within {}",
                        program,
                        humantime::format_duration(timeout)
                    )));
                }
                thread::sleep(POLL_INTERVAL);
            }
        }
    };

    // A forked daemon may inherit the pipes and hold them open long after the
    // child exits. Keep whatever arrived within the grace period.
    let grace = deadline
        .saturating_duration_since(Instant::now())
        .min(PIPE_GRACE)
        .max(POLL_INTERVAL);

    Ok(CommandOutcome {
        stdout: stdout_pipe.collect(grace),
        stderr: stderr_pipe.collect(grace),
        exit_code: status.code(),
    })
}

/// Drains a child pipe on its own thread into a shared buffer.
struct PipeReader {
    buf: Arc<Mutex<Vec<u8>>>,
    done: mpsc::Receiver<()>,
}

impl PipeReader {
    fn spawn<R: Read + Send + 'static>(pipe: Option<R>) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let (tx, done) = mpsc::channel();

        let sink = Arc::clone(&buf);
        thread::spawn(move || {
            if let Some(mut pipe) = pipe {
                let mut chunk = [0u8; READ_CHUNK];
                loop {
                    match pipe.read(&mut chunk) {
                        Ok(0) => break,
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(_) => break,
                        Ok(n) => lock_buffer(&sink).extend_from_slice(&chunk[..n]),
                    }
                }
            }
            let _ = tx.send(());
        });

        Self { buf, done }
    }

    /// Wait up to `grace` for end of stream, then return what has been read.
    fn collect(self, grace: Duration) -> String {
        if self.done.recv_timeout(grace).is_err() {
            tracing::debug!("Pipe still held open after exit; returning partial output");
        }
        let text = String::from_utf8_lossy(&lock_buffer(&self.buf)).into_owned();
        text
    }
}

fn lock_buffer(buf: &Mutex<Vec<u8>>) -> MutexGuard<'_, Vec<u8>> {
    buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Access to an external device bridge.
///
/// Implementations never fail: problems come back as text starting with
/// [`BRIDGE_ERROR_PREFIX`], and callers inspect the output to tell.
pub trait BridgeExecutor: Send + Sync {
    /// Run a bridge command not scoped to a device and return trimmed stdout.
    fn run(&self, args: &[&str]) -> String;

    /// Bridge device listing with long-form attributes.
    fn devices(&self) -> String {
        self.run(&["devices", "-l"])
    }

    /// Run a shell command on one device.
    fn shell(&self, serial: &str, command: &str) -> String {
        let mut args = vec!["-s", serial, "shell"];
        args.extend(command.split_whitespace());
        self.run(&args)
    }
}

/// Subprocess-backed bridge (`adb` by default).
#[derive(Debug, Clone)]
pub struct AdbBridge {
    program: String,
    timeout: Duration,
}

impl AdbBridge {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn from_config(config: &crate::WipeConfig) -> Self {
        Self::new(config.bridge_program.clone(), config.command_timeout)
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl BridgeExecutor for AdbBridge {
    fn run(&self, args: &[&str]) -> String {
        match run_with_timeout(&self.program, args, self.timeout) {
            Ok(outcome) => {
                if !outcome.success() {
                    tracing::warn!(
                        program = %self.program,
                        exit_code = ?outcome.exit_code,
                        stderr = %outcome.stderr.trim(),
                        "Bridge command exited unsuccessfully"
                    );
                }
                outcome.stdout.trim().to_string()
            }
            Err(e) => {
                let class = FailureClass::classify(&e);
                tracing::warn!(
                    program = %self.program,
                    %class,
                    description = class.description(),
                    error = %e,
                    "Bridge command failed"
                );
                format!("{}{}", BRIDGE_ERROR_PREFIX, e)
            }
        }
    }
}
