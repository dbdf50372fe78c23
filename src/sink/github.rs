// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! GitHub Actions environment files.
//!
//! ```text
//! set_variable("A", "1")         $GITHUB_ENV  += "A=1"
//! set_variable("A", "x\ny")      $GITHUB_ENV  += "A<<vsenv_EOF_0\nx\ny\nvsenv_EOF_0"
//! prepend_to_path("PATH", [a,b]) $GITHUB_PATH += "b", "a"
//! prepend_to_path("LIB", [a])    $GITHUB_ENV  += "LIB=a;<old>"
//! ```
//!
//! The runner prepends each `GITHUB_PATH` line as it reads it, so lines are
//! written last segment first.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{JobEnvironmentSink, prepend_segments, validate_name};
use crate::core::env::container::Env;
use crate::error::{SinkError, SinkResult};

/// Variable naming the file that collects exported variables.
pub const GITHUB_ENV: &str = "GITHUB_ENV";

/// Variable naming the file that collects `PATH` additions.
pub const GITHUB_PATH: &str = "GITHUB_PATH";

/// Sink appending to the GitHub Actions environment files.
#[derive(Debug, Clone)]
pub struct GithubSink {
    env_file: PathBuf,
    path_file: PathBuf,
    state: Env,
}

impl GithubSink {
    /// Creates a sink over explicit files, starting from `state`.
    pub fn new(env_file: impl Into<PathBuf>, path_file: impl Into<PathBuf>, state: Env) -> Self {
        Self {
            env_file: env_file.into(),
            path_file: path_file.into(),
            state,
        }
    }

    /// Creates a sink from the runner-provided `GITHUB_ENV` / `GITHUB_PATH`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::MissingEnvFile`] if either variable is unset.
    pub fn from_env() -> SinkResult<Self> {
        let state = Env::current();
        let env_file = state
            .get(GITHUB_ENV)
            .ok_or_else(|| SinkError::MissingEnvFile(GITHUB_ENV.to_string()))?
            .to_string();
        let path_file = state
            .get(GITHUB_PATH)
            .ok_or_else(|| SinkError::MissingEnvFile(GITHUB_PATH.to_string()))?
            .to_string();
        Ok(Self::new(env_file, path_file, state))
    }

    /// Returns true if the process runs inside a GitHub Actions job.
    #[must_use]
    pub fn available() -> bool {
        std::env::var_os(GITHUB_ENV).is_some()
    }

    /// Environment as later steps will see it.
    #[must_use]
    pub const fn state(&self) -> &Env {
        &self.state
    }

    fn append(path: &Path, text: &str) -> SinkResult<()> {
        let io_error = |source| SinkError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(io_error)?;
        file.write_all(text.as_bytes()).map_err(io_error)
    }
}

/// Renders one `GITHUB_ENV` entry, using a heredoc for multi-line values.
#[must_use]
pub fn env_file_entry(name: &str, value: &str) -> String {
    if !value.contains(['\n', '\r']) {
        return format!("{name}={value}\n");
    }

    let delimiter = (0u32..)
        .map(|n| format!("vsenv_EOF_{n}"))
        .find(|candidate| !value.contains(candidate.as_str()))
        .unwrap_or_default();
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

impl JobEnvironmentSink for GithubSink {
    fn current(&self, name: &str) -> Option<String> {
        self.state.get(name).map(ToString::to_string)
    }

    fn set_variable(&mut self, name: &str, value: &str) -> SinkResult<()> {
        validate_name(name)?;
        Self::append(&self.env_file, &env_file_entry(name, value))?;
        debug!(name = name, "exported");
        self.state.set(name, value);
        Ok(())
    }

    fn prepend_to_path(&mut self, name: &str, segments: &[String]) -> SinkResult<()> {
        validate_name(name)?;
        if segments.is_empty() {
            return Ok(());
        }

        let value = prepend_segments(segments, self.state.get(name));

        if name.eq_ignore_ascii_case("PATH") {
            let lines: String = segments
                .iter()
                .rev()
                .map(|segment| format!("{segment}\n"))
                .collect();
            Self::append(&self.path_file, &lines)?;
        } else {
            Self::append(&self.env_file, &env_file_entry(name, &value))?;
        }

        debug!(name = name, added = segments.len(), "prepended");
        self.state.set(name, value);
        Ok(())
    }
}
