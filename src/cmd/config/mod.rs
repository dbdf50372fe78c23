// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config loading for the binary and the config-related commands.

use crate::cli::Command;
use crate::cli::global::GlobalOptions;
use crate::config::loader::ConfigLoader;
use crate::config::{ENV_PREFIX, LOCAL_CONFIG_FILE};
use crate::core::arch::ARCH_TABLE;
use crate::error::Result;
use crate::postprocess::Toolchain;

/// Values a command line sets on top of every config source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// `locator.version`
    pub vs_version: Option<String>,
    /// `postprocess.toolchain`
    pub toolchain: Option<Toolchain>,
}

impl ConfigOverrides {
    /// Overrides carried by `command`.
    ///
    /// An empty `--vs-version` counts as absent, which is how GitHub Actions
    /// passes an unset input.
    #[must_use]
    pub fn from_command(command: Option<&Command>) -> Self {
        let (version, toolchain) = match command {
            Some(Command::Apply(args)) => (args.version.vs_version.as_ref(), args.toolchain),
            Some(Command::Locate(args)) => (args.version.vs_version.as_ref(), None),
            Some(Command::Diff(args)) => (args.version.vs_version.as_ref(), None),
            _ => (None, None),
        };

        Self {
            vs_version: version
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            toolchain,
        }
    }

    /// Adds the overrides to `loader`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be stored as an override.
    pub fn apply(&self, loader: ConfigLoader) -> Result<ConfigLoader> {
        loader
            .set_maybe("locator.version", self.vs_version.clone())?
            .set_maybe(
                "postprocess.toolchain",
                self.toolchain.map(|t| t.to_string()),
            )
    }
}

/// Loader for the file and environment sources.
///
/// `vsenv.toml` in the working directory comes first so that `--config`
/// files override it.
#[must_use]
pub fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional(LOCAL_CONFIG_FILE);
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix(ENV_PREFIX)
}

/// Display current configuration options followed by the files they came from.
pub fn run_options_command(options: &[String], config_files: &[String]) {
    for line in options {
        println!("{line}");
    }

    println!();
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}

/// Lines of the architecture table, `token -> vcvarsall argument`.
#[must_use]
pub fn format_archs() -> Vec<String> {
    let width = ARCH_TABLE
        .iter()
        .map(|(token, _)| token.len())
        .max()
        .unwrap_or(0);

    ARCH_TABLE
        .iter()
        .map(|(token, arch)| {
            format!(
                "{token:<width$} -> {arch} (host {}, target {})",
                arch.host(),
                arch.target()
            )
        })
        .collect()
}

/// Print the accepted architecture names.
pub fn run_archs_command() {
    for line in format_archs() {
        println!("{line}");
    }
}
