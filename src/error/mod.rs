// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!            VsenvError (~24 bytes)
//!                   |
//!     +--------+----+----+--------+------+
//!     |        |         |        |      |
//!     v        v         v        v      v
//!  Resolve   Sink     Config   Process  Io/Other
//!    Box      Box       Box      Box    Box<str>
//!
//! Sub-errors (unboxed internally):
//!   Resolve  UnsupportedArchitecture, LocatorFailed, NotFound,
//!            ScriptNotFound, ScriptFailed, NoToolsetFound,
//!            DependencyMissing, ScriptIo
//!   Sink     Io, MissingEnvFile, InvalidName
//!   Config   ParseError, MissingKey, InvalidValue
//!   Process  SpawnFailed, NonZeroExit, Timeout, OutputError
//! ```
//!
//! Every resolution failure is terminal: nothing retries, and the pipeline
//! stops before touching the job environment.

use std::path::PathBuf;
use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`VsenvError`].
pub type VsenvResult<T> = std::result::Result<T, VsenvError>;

/// Result type for the resolution stages.
pub type ResolveResult<T> = std::result::Result<T, ResolveError>;

/// Result type for job environment writes.
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum VsenvError {
    /// A toolchain resolution stage failed.
    #[error("resolve error: {0}")]
    Resolve(#[from] Box<ResolveError>),

    /// Writing to the job environment failed.
    #[error("sink error: {0}")]
    Sink(#[from] Box<SinkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),

    /// Generic error with message.
    #[error("{0}")]
    Other(Box<str>),
}

impl VsenvError {
    /// Returns the resolution error, if this is one.
    #[must_use]
    pub fn as_resolve(&self) -> Option<&ResolveError> {
        match self {
            Self::Resolve(err) => Some(err),
            _ => None,
        }
    }
}

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for VsenvError {
                fn from(err: $error) -> Self {
                    VsenvError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    ResolveError => Resolve,
    SinkError => Sink,
    ConfigError => Config,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Resolution Errors ---

/// Failures of the toolchain resolution pipeline.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The architecture token is not in the canonical table.
    #[error("unsupported architecture: '{token}'")]
    UnsupportedArchitecture { token: String },

    /// The discovery tool could not run, timed out or exited non-zero.
    #[error("locator '{tool}' failed{}: {stderr}", exit_suffix(.code))]
    LocatorFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The discovery tool ran fine but reported no matching installation.
    #[error("no Visual Studio installation matches {constraint}")]
    NotFound { constraint: String },

    /// The vendor setup script is missing at its expected location.
    #[error("setup script not found: {}", .path.display())]
    ScriptNotFound { path: PathBuf },

    /// The vendor setup script exited non-zero or timed out.
    #[error("setup script '{}' failed{}: {output}", .script.display(), exit_suffix(.code))]
    ScriptFailed {
        script: PathBuf,
        code: Option<i32>,
        output: String,
    },

    /// No toolset version directories below the compiler tools root.
    #[error("no MSVC toolset found in {}", .path.display())]
    NoToolsetFound { path: PathBuf },

    /// A required sibling tool or directory is absent.
    #[error("missing dependency {what}: {}", .path.display())]
    DependencyMissing { what: String, path: PathBuf },

    /// The disposable setup script could not be written.
    #[error("failed to materialize setup script in {}: {source}", .dir.display())]
    ScriptIo {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map_or_else(String::new, |code| format!(" with exit code {code}"))
}

// --- Sink Errors ---

/// Errors writing to a job environment sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Writing to an environment file failed.
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The CI runner did not provide the expected environment file.
    #[error("environment file variable '{0}' is not set")]
    MissingEnvFile(String),

    /// The variable name cannot be exported.
    #[error("invalid environment variable name: '{0}'")]
    InvalidName(String),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Missing required configuration key.
    #[error("missing required config key '{key}' in section '[{section}]'")]
    MissingKey { section: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Process exited with non-zero status.
    #[error("process '{command}' exited with code {code}")]
    NonZeroExit { command: String, code: i32 },

    /// Process timed out.
    #[error("process '{command}' timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Failed to read process output.
    #[error("failed to read output from process '{command}': {message}")]
    OutputError { command: String, message: String },
}
