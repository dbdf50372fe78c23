// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Visual Studio installation discovery via vswhere.
//!
//! ```text
//! ToolchainConstraint { products, requires, version }
//!        |  to_args()
//!        v
//! vswhere.exe -latest ... -property installationPath
//!        |
//!        +-- spawn error / timeout / exit != 0 --> LocatorFailed(stderr)
//!        +-- exit 0, blank stdout              --> NotFound
//!        +-- exit 0, path                      --> Installation
//!                                                  vcvarsall(), msvc_tools_root()
//!
//! find_installations(): vswhere -format json --> Vec<VsInstallation>, newest first
//! ```

use bon::Builder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, trace};

use crate::core::process::{CommandRunner, ProcessBuilder, ProcessFlags, ProcessOutput};
use crate::error::{ResolveError, ResolveResult};
use crate::utility::encoding::Encoding;

/// Standard vswhere.exe installation paths.
pub const VSWHERE_PATHS: &[&str] = &[
    r"C:\Program Files (x86)\Microsoft Visual Studio\Installer\vswhere.exe",
    r"C:\Program Files\Microsoft Visual Studio\Installer\vswhere.exe",
];

/// Product wildcard matching every Visual Studio edition and Build Tools.
pub const DEFAULT_PRODUCTS: &str = "*";

/// Component that carries the MSVC x86/x64 compilers.
pub const DEFAULT_REQUIRES: &str = "Microsoft.VisualStudio.Component.VC.Tools.x86.x64";

/// What counts as an acceptable installation.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct ToolchainConstraint {
    #[builder(setters(name = with_products), into, default = DEFAULT_PRODUCTS.to_string())]
    products: String,
    #[builder(setters(name = with_requires), default = vec![DEFAULT_REQUIRES.to_string()])]
    requires: Vec<String>,
    #[builder(setters(name = with_version), into)]
    version: Option<String>,
}

impl Default for ToolchainConstraint {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ToolchainConstraint {
    #[must_use]
    pub fn products(&self) -> &str {
        &self.products
    }

    #[must_use]
    pub fn requires(&self) -> &[String] {
        &self.requires
    }

    /// Version range in vswhere syntax, e.g. `[17.0,18.0)`.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Filter arguments shared by every vswhere query.
    fn filter_args(&self) -> Vec<String> {
        let mut args = vec!["-products".to_string(), self.products.clone()];
        if !self.requires.is_empty() {
            args.push("-requires".to_string());
            args.extend(self.requires.iter().cloned());
        }
        if let Some(version) = &self.version {
            args.push("-version".to_string());
            args.push(version.clone());
        }
        args
    }

    /// Arguments for a single-path `-latest` query.
    #[must_use]
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec!["-latest".to_string()];
        args.extend(self.filter_args());
        args.extend(
            ["-property", "installationPath", "-utf8"]
                .iter()
                .map(ToString::to_string),
        );
        args
    }
}

impl std::fmt::Display for ToolchainConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "products={} requires=[{}]",
            self.products,
            self.requires.join(", ")
        )?;
        if let Some(version) = &self.version {
            write!(f, " version={version}")?;
        }
        Ok(())
    }
}

/// A located installation root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    root: PathBuf,
}

impl Installation {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Default location of `vcvarsall.bat`.
    #[must_use]
    pub fn vcvarsall(&self) -> PathBuf {
        self.root
            .join("VC")
            .join("Auxiliary")
            .join("Build")
            .join("vcvarsall.bat")
    }

    /// Directory holding one subdirectory per MSVC toolset version.
    #[must_use]
    pub fn msvc_tools_root(&self) -> PathBuf {
        self.root.join("VC").join("Tools").join("MSVC")
    }

    /// Root of a specific toolset version.
    #[must_use]
    pub fn toolset_root(&self, version: &str) -> PathBuf {
        self.msvc_tools_root().join(version)
    }
}

/// Visual Studio installation information from vswhere JSON output.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VsInstallation {
    /// Unique instance identifier.
    pub instance_id: String,

    /// Installation root path.
    pub installation_path: PathBuf,

    /// Full version string (e.g., "17.14.36915.13").
    pub installation_version: String,

    /// Human-readable display name.
    pub display_name: String,

    /// Whether the installation is complete (no errors or reboot required).
    #[serde(default = "default_true")]
    pub is_complete: bool,

    /// Whether this is a prerelease version.
    #[serde(default)]
    pub is_prerelease: bool,
}

const fn default_true() -> bool {
    true
}

impl VsInstallation {
    /// Parse version into numeric components (major, minor, patch, build).
    ///
    /// Numeric comparison correctly handles "17.14" > "17.9", unlike string comparison.
    fn version_tuple(&self) -> (u32, u32, u32, u32) {
        let parts: Vec<u32> = self
            .installation_version
            .split('.')
            .filter_map(|s| s.parse().ok())
            .collect();

        (
            parts.first().copied().unwrap_or(0),
            parts.get(1).copied().unwrap_or(0),
            parts.get(2).copied().unwrap_or(0),
            parts.get(3).copied().unwrap_or(0),
        )
    }

    #[must_use]
    pub fn installation(&self) -> Installation {
        Installation::new(&self.installation_path)
    }
}

/// Finds the vswhere.exe executable path.
///
/// Checks the override path, then the standard Visual Studio Installer
/// directories, then `PATH`.
///
/// # Errors
///
/// Returns [`ResolveError::LocatorFailed`] if `vswhere.exe` cannot be found.
pub fn find_vswhere(override_path: Option<&Path>) -> ResolveResult<PathBuf> {
    if let Some(path) = override_path {
        if path.exists() {
            trace!(path = %path.display(), "Using config-provided vswhere");
            return Ok(path.to_path_buf());
        }
        debug!(
            path = %path.display(),
            "Config vswhere path not found, searching standard locations"
        );
    }

    for candidate in VSWHERE_PATHS {
        let path = PathBuf::from(candidate);
        if path.exists() {
            debug!(path = %path.display(), "Found vswhere");
            return Ok(path);
        }
    }

    ProcessBuilder::find("vswhere").ok_or_else(|| ResolveError::LocatorFailed {
        tool: "vswhere.exe".to_string(),
        code: None,
        stderr: "vswhere.exe not found in standard VS Installer directories or PATH".to_string(),
    })
}

/// Runs vswhere with `args` and turns every failure into `LocatorFailed`.
async fn run_vswhere<R: CommandRunner>(
    runner: &R,
    vswhere: &Path,
    args: Vec<String>,
    timeout: Duration,
) -> ResolveResult<ProcessOutput> {
    let tool = vswhere.display().to_string();
    let command = ProcessBuilder::new(vswhere)
        .args(args)
        .name("vswhere")
        .flag(ProcessFlags::ALLOW_FAILURE)
        .stdout_encoding(Encoding::Utf8)
        .timeout(timeout);

    let output = runner
        .run(command)
        .await
        .map_err(|e| ResolveError::LocatorFailed {
            tool: tool.clone(),
            code: None,
            stderr: e.to_string(),
        })?;

    if !output.success() {
        return Err(ResolveError::LocatorFailed {
            tool,
            code: output.exit_code(),
            stderr: output.stderr().trim().to_string(),
        });
    }

    Ok(output)
}

/// Locates the newest installation matching `constraint`.
///
/// Never falls back to guessed install locations.
///
/// # Errors
///
/// - [`ResolveError::LocatorFailed`] if vswhere cannot run, times out or exits non-zero.
/// - [`ResolveError::NotFound`] if vswhere succeeds with blank output.
pub async fn locate<R: CommandRunner>(
    runner: &R,
    vswhere: &Path,
    constraint: &ToolchainConstraint,
    timeout: Duration,
) -> ResolveResult<Installation> {
    debug!(constraint = %constraint, "Locating Visual Studio installation");

    let output = run_vswhere(runner, vswhere, constraint.to_args(), timeout).await?;

    let installation = parse_installation_path(output.stdout()).ok_or_else(|| {
        ResolveError::NotFound {
            constraint: constraint.to_string(),
        }
    })?;

    debug!(root = %installation.root().display(), "Found Visual Studio installation");
    Ok(installation)
}

/// Finds all installations matching `constraint`, newest first.
///
/// Incomplete installations and prereleases are dropped.
///
/// # Errors
///
/// Returns [`ResolveError::LocatorFailed`] if vswhere fails or prints
/// something that is not its JSON format.
pub async fn find_installations<R: CommandRunner>(
    runner: &R,
    vswhere: &Path,
    constraint: &ToolchainConstraint,
    timeout: Duration,
) -> ResolveResult<Vec<VsInstallation>> {
    let mut args = vec!["-format".to_string(), "json".to_string(), "-utf8".to_string()];
    args.extend(constraint.filter_args());

    let output = run_vswhere(runner, vswhere, args, timeout).await?;

    let mut installations =
        parse_vswhere_json(output.stdout()).map_err(|e| ResolveError::LocatorFailed {
            tool: vswhere.display().to_string(),
            code: output.exit_code(),
            stderr: format!("unreadable vswhere JSON output: {e}"),
        })?;

    installations.retain(|vs| vs.is_complete && !vs.is_prerelease);
    installations.sort_by_key(|vs| std::cmp::Reverse(vs.version_tuple()));

    debug!(
        count = installations.len(),
        "Found Visual Studio installations"
    );

    Ok(installations)
}

/// First non-blank line of vswhere's `-property` output.
fn parse_installation_path(stdout: &str) -> Option<Installation> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(Installation::new)
}

/// Parses vswhere JSON output into `VsInstallation` structs.
fn parse_vswhere_json(json: &str) -> serde_json::Result<Vec<VsInstallation>> {
    serde_json::from_str(json)
}
