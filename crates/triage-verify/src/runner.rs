//! Shell command execution with timeout.
//!
//! The runner never returns an error: spawn failures and timeouts are
//! reported as exit code [`FAILED_EXIT_CODE`] with an explanatory stderr.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::debug;

use crate::stage::StageConfig;

/// Exit code reported for commands that timed out or could not start.
pub const FAILED_EXIT_CODE: i32 = -1;

/// Captured outcome of one command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (0 = success).
    pub exit_code: i32,

    /// Captured stdout.
    pub stdout: String,

    /// Captured stderr, or the timeout/spawn error message.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,

    /// Whether the timeout fired.
    pub timed_out: bool,
}

impl CommandOutput {
    /// Whether the command exited with code 0.
    pub fn passed(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    fn failed(message: String, duration_ms: u64, timed_out: bool) -> Self {
        Self {
            exit_code: FAILED_EXIT_CODE,
            stdout: String::new(),
            stderr: message,
            duration_ms,
            timed_out,
        }
    }
}

/// Runs verification commands through the shell.
pub struct CommandRunner;

impl CommandRunner {
    /// Run `command` via `sh -c` in `cwd`, killing it after `timeout_secs`
    /// (0 = no timeout).
    pub async fn run(command: &str, timeout_secs: u64, cwd: &Path) -> CommandOutput {
        let start = Instant::now();
        debug!(command = %command, cwd = %cwd.display(), "running command");

        let child = match Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(cwd)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => return CommandOutput::failed(e.to_string(), elapsed_ms(start), false),
        };

        let waited = if timeout_secs > 0 {
            match tokio::time::timeout(Duration::from_secs(timeout_secs), child.wait_with_output())
                .await
            {
                Ok(waited) => waited,
                Err(_) => {
                    return CommandOutput::failed(
                        format!("Command timed out after {timeout_secs} seconds"),
                        elapsed_ms(start),
                        true,
                    )
                }
            }
        } else {
            child.wait_with_output().await
        };

        match waited {
            Ok(output) => CommandOutput {
                exit_code: output.status.code().unwrap_or(FAILED_EXIT_CODE),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                duration_ms: elapsed_ms(start),
                timed_out: false,
            },
            Err(e) => CommandOutput::failed(e.to_string(), elapsed_ms(start), false),
        }
    }

    /// Run a configured stage.
    pub async fn run_stage(config: &StageConfig, cwd: &Path) -> CommandOutput {
        Self::run(&config.command, config.timeout_secs, cwd).await
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    start.elapsed().as_millis() as u64
}
