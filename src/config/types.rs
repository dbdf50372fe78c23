// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! VsenvConfig
//!   locator      vswhere override, products, requires, version, timeout
//!   script       setup script path, timeout, output encoding, scratch dir
//!   env          path-like variable names
//!   postprocess  toolchain flavor, LLVM root
//!   logging      console/file levels, log file
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::core::env::diff::DEFAULT_PATH_VARIABLES;
use crate::core::vcvars::DEFAULT_SCRIPT_TIMEOUT;
use crate::core::vs::{DEFAULT_PRODUCTS, DEFAULT_REQUIRES, ToolchainConstraint};
use crate::error::ConfigError;
use crate::logging::LogLevel;
use crate::postprocess::{DEFAULT_LLVM_ROOT, Toolchain};
use crate::utility::encoding::Encoding;

/// Default wall-clock limit for vswhere.
pub const DEFAULT_LOCATOR_TIMEOUT_SECS: u64 = 60;

/// `[locator]`: how installations are discovered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocatorConfig {
    /// Explicit `vswhere.exe` path, tried before the standard locations.
    pub vswhere: Option<PathBuf>,
    /// vswhere `-products` pattern.
    pub products: String,
    /// vswhere `-requires` component ids.
    pub requires: Vec<String>,
    /// vswhere `-version` range.
    pub version: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            vswhere: None,
            products: DEFAULT_PRODUCTS.to_string(),
            requires: vec![DEFAULT_REQUIRES.to_string()],
            version: None,
            timeout_secs: DEFAULT_LOCATOR_TIMEOUT_SECS,
        }
    }
}

impl LocatorConfig {
    #[must_use]
    pub fn constraint(&self) -> ToolchainConstraint {
        ToolchainConstraint::builder()
            .with_products(self.products.clone())
            .with_requires(self.requires.clone())
            .maybe_with_version(self.version.clone())
            .build()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[script]`: how the setup script is run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScriptConfig {
    /// Script path relative to the installation root.
    pub relative_path: Option<PathBuf>,
    pub timeout_secs: u64,
    /// Encoding of `cmd.exe` output.
    pub encoding: Encoding,
    /// Directory for the disposable batch file.
    pub dir: Option<PathBuf>,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            relative_path: None,
            timeout_secs: DEFAULT_SCRIPT_TIMEOUT.as_secs(),
            encoding: Encoding::Utf8,
            dir: None,
        }
    }
}

impl ScriptConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `[env]`: diff behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvConfig {
    /// Variables treated as `;`-separated path lists.
    pub path_variables: Vec<String>,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            path_variables: DEFAULT_PATH_VARIABLES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

/// `[postprocess]`: toolchain adjustments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostprocessConfig {
    pub toolchain: Toolchain,
    pub llvm_root: PathBuf,
}

impl Default for PostprocessConfig {
    fn default() -> Self {
        Self {
            toolchain: Toolchain::default(),
            llvm_root: PathBuf::from(DEFAULT_LLVM_ROOT),
        }
    }
}

/// `[logging]`: defaults for the `--log-*` flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Console log level (0-6).
    pub level: LogLevel,
    /// File log level (0-6).
    pub file_level: LogLevel,
    /// Log file; no file logging when unset.
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            file_level: LogLevel::TRACE,
            file: None,
        }
    }
}

/// Rejects values serde accepts but the pipeline cannot use.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] naming the first offending key.
pub fn validate(
    locator: &LocatorConfig,
    script: &ScriptConfig,
    env: &EnvConfig,
) -> std::result::Result<(), ConfigError> {
    let invalid = |section: &str, key: &str, message: &str| ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    };

    if locator.timeout_secs == 0 {
        return Err(invalid("locator", "timeout_secs", "must be greater than 0"));
    }
    if locator.products.trim().is_empty() {
        return Err(invalid("locator", "products", "must not be empty"));
    }
    if script.timeout_secs == 0 {
        return Err(invalid("script", "timeout_secs", "must be greater than 0"));
    }
    if env.path_variables.iter().any(|name| name.trim().is_empty()) {
        return Err(invalid("env", "path_variables", "names must not be empty"));
    }
    Ok(())
}
