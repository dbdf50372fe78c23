// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Destinations for the resolved environment.
//!
//! ```text
//! JobEnvironmentSink
//!   current(name)                  value as later build steps will see it
//!   set_variable(name, value)      overwrite
//!   prepend_to_path(name, segs)    put segs in front of a path list
//!        |
//!        +--> MemorySink   Env in memory (dry runs, tests)
//!        +--> GithubSink   $GITHUB_ENV / $GITHUB_PATH files
//!        +--> ShellSink    `export` / `$env:` lines on a writer
//! ```
//!
//! Sinks do not deduplicate; the applier only hands them missing segments.

pub mod github;
pub mod shell;


pub use github::GithubSink;
pub use shell::{ShellSink, ShellSyntax};

use crate::core::env::container::Env;
use crate::core::env::diff::PATH_LIST_SEPARATOR;
use crate::error::{SinkError, SinkResult};

/// Write access to the environment of the surrounding CI job.
pub trait JobEnvironmentSink {
    /// Current value of `name` as subsequent steps would observe it.
    fn current(&self, name: &str) -> Option<String>;

    /// Sets `name` to `value`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the name is invalid or the write fails.
    fn set_variable(&mut self, name: &str, value: &str) -> SinkResult<()>;

    /// Puts `segments` (in order) in front of the path list `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the name is invalid or the write fails.
    fn prepend_to_path(&mut self, name: &str, segments: &[String]) -> SinkResult<()>;
}

/// Sink that only records into an [`Env`].
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    env: Env,
}

impl MemorySink {
    #[must_use]
    pub fn new(env: Env) -> Self {
        Self { env }
    }

    #[must_use]
    pub const fn env(&self) -> &Env {
        &self.env
    }

    #[must_use]
    pub fn into_env(self) -> Env {
        self.env
    }
}

impl JobEnvironmentSink for MemorySink {
    fn current(&self, name: &str) -> Option<String> {
        self.env.get(name).map(ToString::to_string)
    }

    fn set_variable(&mut self, name: &str, value: &str) -> SinkResult<()> {
        validate_name(name)?;
        self.env.set(name, value);
        Ok(())
    }

    fn prepend_to_path(&mut self, name: &str, segments: &[String]) -> SinkResult<()> {
        validate_name(name)?;
        let value = prepend_segments(segments, self.env.get(name));
        self.env.set(name, value);
        Ok(())
    }
}

/// Rejects names no shell or env file can carry.
///
/// # Errors
///
/// Returns [`SinkError::InvalidName`] for empty names and for names
/// containing `=` or a whitespace/control character.
pub fn validate_name(name: &str) -> SinkResult<()> {
    let bad = name.is_empty()
        || name
            .chars()
            .any(|c| c == '=' || c.is_whitespace() || c.is_control());
    if bad {
        return Err(SinkError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// `segments` joined in front of `existing`.
#[must_use]
pub fn prepend_segments(segments: &[String], existing: Option<&str>) -> String {
    let mut parts: Vec<&str> = segments.iter().map(String::as_str).collect();
    if let Some(existing) = existing.filter(|v| !v.is_empty()) {
        parts.push(existing);
    }
    parts.join(&PATH_LIST_SEPARATOR.to_string())
}
