// Tests for the bounded command runner and the subprocess bridge
//
// These use ordinary POSIX tools (sh, echo, sleep) in place of the bridge.

#[cfg(all(test, unix))]
mod executor_tests {
    use super::super::executor::*;
    use crate::WipeError;
    use std::time::{Duration, Instant};

    #[test]
    fn test_run_with_timeout_captures_stdout() {
        let outcome = run_with_timeout("sh", &["-c", "echo hello"], Duration::from_secs(5))
            .expect("sh should run");
        assert_eq!(outcome.stdout.trim(), "hello");
        assert!(outcome.success());
    }

    #[test]
    fn test_run_with_timeout_nonzero_exit_keeps_output() {
        let outcome = run_with_timeout(
            "sh",
            &["-c", "echo partial; echo oops 1>&2; exit 3"],
            Duration::from_secs(5),
        )
        .expect("sh should run");
        assert_eq!(outcome.stdout.trim(), "partial");
        assert_eq!(outcome.stderr.trim(), "oops");
        assert_eq!(outcome.exit_code, Some(3));
        assert!(!outcome.success());
    }

    #[test]
    fn test_run_with_timeout_keeps_output_when_pipe_held_open() {
        // The background sleep inherits stdout and keeps it open after sh exits
        let start = Instant::now();
        let outcome = run_with_timeout("sh", &["-c", "echo hi; sleep 3 &"], Duration::from_millis(1000))
            .expect("sh should run");
        assert_eq!(outcome.stdout.trim(), "hi");
        assert_eq!(outcome.exit_code, Some(0));
        assert!(start.elapsed() < Duration::from_millis(1000));
    }

    #[test]
    fn test_adb_bridge_returns_output_written_before_daemon_fork() {
        let bridge = AdbBridge::new("sh", Duration::from_millis(1000));
        let output = bridge.run(&["-c", "echo 'List of devices attached'; sleep 3 &"]);
        assert_eq!(output, "List of devices attached");
    }

    #[test]
    fn test_run_with_timeout_kills_slow_process() {
        let start = Instant::now();
        let result = run_with_timeout("sleep", &["5"], Duration::from_millis(200));
        assert!(matches!(result, Err(WipeError::Timeout(_))));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_run_with_timeout_missing_program() {
        let result = run_with_timeout(
            "definitely-not-a-real-bridge-tool",
            &["devices"],
            Duration::from_secs(1),
        );
        assert!(matches!(result, Err(WipeError::BridgeUnavailable(_))));
    }

    #[test]
    fn test_adb_bridge_trims_output() {
        let bridge = AdbBridge::new("sh", Duration::from_secs(5));
        let output = bridge.run(&["-c", "printf '  \\n spaced out \\n\\n'"]);
        assert_eq!(output, "spaced out");
        assert!(!is_bridge_error(&output));
    }

    #[test]
    fn test_adb_bridge_missing_tool_returns_diagnostic() {
        let bridge = AdbBridge::new("definitely-not-a-real-bridge-tool", Duration::from_secs(1));
        let output = bridge.devices();
        assert!(is_bridge_error(&output), "got: {}", output);
    }

    #[test]
    fn test_adb_bridge_timeout_returns_diagnostic() {
        let bridge = AdbBridge::new("sleep", Duration::from_millis(100));
        let output = bridge.run(&["5"]);
        assert!(output.starts_with(BRIDGE_ERROR_PREFIX));
        assert!(output.contains("did not finish"));
    }

    #[test]
    fn test_shell_scopes_command_to_serial() {
        let bridge = AdbBridge::new("echo", Duration::from_secs(5));
        let output = bridge.shell("R58M123ABC", "rm -rf /sdcard/*");
        assert_eq!(output, "-s R58M123ABC shell rm -rf /sdcard/*");
    }

    #[test]
    fn test_from_config_uses_configured_program_and_timeout() {
        let config = crate::WipeConfig {
            bridge_program: "my-adb".to_string(),
            command_timeout: Duration::from_millis(1234),
            ..Default::default()
        };
        let bridge = AdbBridge::from_config(&config);
        assert_eq!(bridge.program(), "my-adb");
        assert_eq!(bridge.timeout(), Duration::from_millis(1234));
    }
}
