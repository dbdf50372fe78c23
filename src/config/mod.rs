// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for vsenv-rs.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. local vsenv.toml (cwd)
//! 3. --config
//! 4. VSENV_* env vars
//! 5. CLI overrides
//! ```
//!
//! # Environment Variable Mapping
//!
//! Sections and keys are separated by a double underscore, because keys
//! contain single ones.
//!
//! ```text
//! VSENV_LOCATOR__VERSION=[17.0,18.0)   → locator.version
//! VSENV_SCRIPT__TIMEOUT_SECS=900       → script.timeout_secs
//! VSENV_POSTPROCESS__TOOLCHAIN=none    → postprocess.toolchain
//! VSENV_ENV__PATH_VARIABLES=PATH,LIB   → env.path_variables (list)
//! ```

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::core::vcvars::ExtractOptions;
use crate::error::Result;
use crate::postprocess::PostprocessOptions;

use loader::ConfigLoader;
use types::{EnvConfig, LocatorConfig, LoggingConfig, PostprocessConfig, ScriptConfig};

/// Prefix of configuration environment variables.
pub const ENV_PREFIX: &str = "VSENV";

/// Config file picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "vsenv.toml";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VsenvConfig {
    /// Installation discovery.
    pub locator: LocatorConfig,
    /// Setup script execution.
    pub script: ScriptConfig,
    /// Environment diffing.
    pub env: EnvConfig,
    /// Toolchain adjustments.
    pub postprocess: PostprocessConfig,
    /// Log levels and file.
    pub logging: LoggingConfig,
}

impl VsenvConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vsenv_rs::config::VsenvConfig;
    ///
    /// let config = VsenvConfig::builder()
    ///     .add_toml_file_optional("vsenv.toml")
    ///     .with_env_prefix("VSENV")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file (simple API).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `VsenvConfig` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `VsenvConfig` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Validate value ranges serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::error::ConfigError) for the first invalid key.
    pub fn validate(&self) -> Result<()> {
        types::validate(&self.locator, &self.script, &self.env)?;
        Ok(())
    }

    /// Extraction options for the setup script stage.
    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        ExtractOptions::builder()
            .maybe_with_script(self.script.relative_path.clone())
            .with_timeout(self.script.timeout())
            .with_encoding(self.script.encoding)
            .maybe_with_script_dir(self.script.dir.clone())
            .with_path_variables(self.env.path_variables.clone())
            .build()
    }

    /// Options for the toolchain postprocessor.
    #[must_use]
    pub fn postprocess_options(&self) -> PostprocessOptions {
        PostprocessOptions::builder()
            .with_toolchain(self.postprocess.toolchain)
            .with_llvm_root(self.postprocess.llvm_root.clone())
            .build()
    }

    /// Format configuration options for display.
    ///
    /// Output is deterministically ordered using `BTreeMap`.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_locator_options(&mut options);
        self.format_script_options(&mut options);
        self.format_env_options(&mut options);
        self.format_postprocess_options(&mut options);
        self.format_logging_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_locator_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("locator.vswhere".into(), fmt_path(self.locator.vswhere.as_ref()));
        options.insert("locator.products".into(), self.locator.products.clone());
        options.insert("locator.requires".into(), self.locator.requires.join(", "));
        options.insert(
            "locator.version".into(),
            self.locator.version.clone().unwrap_or_default(),
        );
        options.insert(
            "locator.timeout_secs".into(),
            self.locator.timeout_secs.to_string(),
        );
    }

    fn format_script_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "script.relative_path".into(),
            fmt_path(self.script.relative_path.as_ref()),
        );
        options.insert(
            "script.timeout_secs".into(),
            self.script.timeout_secs.to_string(),
        );
        options.insert("script.encoding".into(), self.script.encoding.to_string());
        options.insert("script.dir".into(), fmt_path(self.script.dir.as_ref()));
    }

    fn format_env_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "env.path_variables".into(),
            self.env.path_variables.join(", "),
        );
    }

    fn format_postprocess_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "postprocess.toolchain".into(),
            self.postprocess.toolchain.to_string(),
        );
        options.insert(
            "postprocess.llvm_root".into(),
            self.postprocess.llvm_root.display().to_string(),
        );
    }

    fn format_logging_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "logging.level".into(),
            self.logging.level.as_u8().to_string(),
        );
        options.insert(
            "logging.file_level".into(),
            self.logging.file_level.as_u8().to_string(),
        );
        options.insert("logging.file".into(), fmt_path(self.logging.file.as_ref()));
    }
}

fn fmt_path(path: Option<&PathBuf>) -> String {
    path.map_or_else(String::new, |p| p.display().to_string())
}
