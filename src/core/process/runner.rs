// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Process execution and the `CommandRunner` seam.
//!
//! ```text
//! CommandRunner::run(ProcessBuilder)
//!        |
//!        +--> SystemRunner  --> ProcessBuilder::run()
//!        +--> (tests)       --> canned ProcessOutput
//!
//! run()
//!   build_command()  args, cwd, env, piped stdio, kill_on_drop
//!   output() under timeout (expiry drops + kills the child)
//!   decode stdout/stderr  --> ProcessOutput { exit_code, stdout, stderr }
//!   validate exit_code (skip if ALLOW_FAILURE)
//! ```

use std::future::Future;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{Level, debug, enabled, error, trace, warn};

use super::builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::ProcessError;
use crate::utility::encoding::bytes_to_utf8;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

/// Capability to run an external command to completion.
///
/// The locator and the setup-script extractor only talk to the outside world
/// through this trait.
pub trait CommandRunner {
    /// Runs the command and returns its captured output.
    fn run(
        &self,
        command: ProcessBuilder,
    ) -> impl Future<Output = Result<ProcessOutput, ProcessError>> + Send;
}

/// Runs commands as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        command: ProcessBuilder,
    ) -> impl Future<Output = Result<ProcessOutput, ProcessError>> + Send {
        command.run()
    }
}

impl ProcessBuilder {
    /// Returns the display name for this process.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name_override().map_or_else(
            || {
                self.program().file_stem().map_or_else(
                    || "process".to_string(),
                    |s| s.to_string_lossy().into_owned(),
                )
            },
            String::from,
        )
    }

    /// Returns the full command line as a string (for logging).
    #[must_use]
    pub fn command_line(&self) -> String {
        use std::fmt::Write as _;

        let mut cmd = format!("{}", self.program().display());
        for arg in self.arguments() {
            if arg.contains(' ') {
                let _ = write!(cmd, " \"{arg}\"");
            } else {
                let _ = write!(cmd, " {arg}");
            }
        }
        cmd
    }

    /// Spawns and runs the process, waiting for completion.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Spawning the child process fails.
    /// - The timeout expires (the child is killed).
    /// - The process exits with a non-zero status (and `ALLOW_FAILURE` flag is not set).
    pub async fn run(self) -> Result<ProcessOutput, ProcessError> {
        let name = self.display_name();
        let cmd_line = self.command_line();

        if let Some(cwd) = self.working_dir() {
            debug!(cwd = %cwd.display(), "cd");
        }
        debug!(cmd = %cmd_line, "exec");

        let mut command = self.build_command();

        let raw = match self.timeout_duration() {
            Some(timeout) => match tokio::time::timeout(timeout, command.output()).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(process = %name, timeout = ?timeout, "Process timed out");
                    return Err(ProcessError::Timeout {
                        command: cmd_line,
                        timeout_secs: timeout.as_secs(),
                    });
                }
            },
            None => command.output().await,
        }
        .map_err(|source| ProcessError::SpawnFailed {
            command: cmd_line.clone(),
            source,
        })?;

        let (stdout_encoding, stderr_encoding) = self.encodings();
        let output = ProcessOutput::new(
            raw.status.code(),
            bytes_to_utf8(stdout_encoding, &raw.stdout),
            bytes_to_utf8(stderr_encoding, &raw.stderr),
        );

        if enabled!(Level::TRACE) {
            for line in output.stdout().lines() {
                trace!(process = %name, stream = "stdout", line = %line, "output");
            }
            for line in output.stderr().lines() {
                trace!(process = %name, stream = "stderr", line = %line, "output");
            }
        }

        if !self.process_flags().contains(ProcessFlags::ALLOW_FAILURE) && !output.success() {
            if !output.stderr().is_empty() {
                error!(process = %name, stderr = %output.stderr(), "process error output");
            }
            return Err(ProcessError::NonZeroExit {
                command: name,
                code: output.exit_code().unwrap_or(-1),
            });
        }

        trace!(process = %name, exit_code = ?output.exit_code(), "completed");
        Ok(output)
    }

    /// Builds the tokio Command from this builder's configuration.
    fn build_command(&self) -> Command {
        let mut command = Command::new(self.program());

        command.args(self.arguments());

        if let Some(cwd) = self.working_dir() {
            command.current_dir(cwd);
        }

        if let Some(env) = self.environment() {
            command.env_clear();
            for (key, value) in env.iter() {
                command.env(key, value);
            }
        }

        command.stdin(Stdio::null());
        command.stdout(Stdio::piped());
        command.stderr(Stdio::piped());

        // A timed-out child is dropped mid-wait; make sure it dies with the future.
        command.kill_on_drop(true);

        #[cfg(windows)]
        {
            command.creation_flags(CREATE_NO_WINDOW);
        }

        command
    }
}
