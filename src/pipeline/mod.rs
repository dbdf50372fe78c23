// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end toolchain resolution.
//!
//! ```text
//! resolve(runner, request)
//!   normalize(arch)             UnsupportedArchitecture   (nothing spawned)
//!   find_vswhere(override)
//!   locate(constraint)          LocatorFailed | NotFound
//!   extract_diff(installation)  ScriptNotFound | ScriptFailed | ScriptIo
//!   plan(toolchain)             NoToolsetFound | DependencyMissing
//!        |
//!        v
//!   Resolution { installation, arch, diff, adjustments }
//!
//! run(runner, request, sink)
//!   resolve()?                  any error: sink untouched
//!   apply(diff, sink)
//!   adjustments.apply_to(sink)
//! ```

use bon::Builder;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use crate::apply::apply;
use crate::config::VsenvConfig;
use crate::config::types::DEFAULT_LOCATOR_TIMEOUT_SECS;
use crate::core::arch::{CanonicalArch, normalize};
use crate::core::env::diff::EnvironmentDiff;
use crate::core::process::CommandRunner;
use crate::core::vcvars::{ExtractOptions, extract_diff};
use crate::core::vs::{Installation, ToolchainConstraint, find_vswhere, locate};
use crate::error::{ResolveResult, SinkResult, VsenvResult};
use crate::postprocess::{Adjustments, PostprocessOptions, plan};
use crate::sink::JobEnvironmentSink;

/// Default limit for one vswhere call.
pub const DEFAULT_LOCATOR_TIMEOUT: Duration = Duration::from_secs(DEFAULT_LOCATOR_TIMEOUT_SECS);

/// Everything needed to resolve one toolchain.
#[derive(Debug, Clone, Builder)]
pub struct ResolveRequest {
    /// User-facing architecture token, e.g. `amd64` or `Win32`.
    #[builder(setters(name = with_arch), into)]
    arch: String,

    #[builder(setters(name = with_constraint), default)]
    constraint: ToolchainConstraint,

    /// Explicit `vswhere.exe`, tried before the standard locations.
    #[builder(setters(name = with_vswhere), into)]
    vswhere: Option<PathBuf>,

    #[builder(setters(name = with_locator_timeout), default = DEFAULT_LOCATOR_TIMEOUT)]
    locator_timeout: Duration,

    #[builder(setters(name = with_extract), default)]
    extract: ExtractOptions,

    #[builder(setters(name = with_postprocess), default)]
    postprocess: PostprocessOptions,
}

impl ResolveRequest {
    /// Request for `arch` using the settings of `config`.
    #[must_use]
    pub fn from_config(config: &VsenvConfig, arch: &str) -> Self {
        Self::builder()
            .with_arch(arch)
            .with_constraint(config.locator.constraint())
            .maybe_with_vswhere(config.locator.vswhere.clone())
            .with_locator_timeout(config.locator.timeout())
            .with_extract(config.extract_options())
            .with_postprocess(config.postprocess_options())
            .build()
    }

    #[must_use]
    pub fn arch(&self) -> &str {
        &self.arch
    }

    #[must_use]
    pub const fn constraint(&self) -> &ToolchainConstraint {
        &self.constraint
    }
}

/// Outcome of a successful resolution. Nothing has been written yet.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub installation: Installation,
    pub arch: CanonicalArch,
    pub diff: EnvironmentDiff,
    pub adjustments: Adjustments,
}

impl Resolution {
    /// Writes the diff, then the toolchain adjustments.
    ///
    /// # Errors
    ///
    /// Returns the first [`SinkError`](crate::error::SinkError) reported by the sink.
    pub fn apply_to<S: JobEnvironmentSink + ?Sized>(&self, sink: &mut S) -> SinkResult<()> {
        apply(&self.diff, sink)?;
        self.adjustments.apply_to(sink)
    }
}

/// Runs every resolution stage without touching any job environment.
///
/// # Errors
///
/// Returns the [`ResolveError`](crate::error::ResolveError) of the first
/// failing stage.
pub async fn resolve<R: CommandRunner>(
    runner: &R,
    request: &ResolveRequest,
) -> ResolveResult<Resolution> {
    let arch = normalize(&request.arch)?;
    let vswhere = find_vswhere(request.vswhere.as_deref())?;
    let installation = locate(runner, &vswhere, &request.constraint, request.locator_timeout).await?;
    let diff = extract_diff(runner, &installation, arch, &request.extract).await?;
    let adjustments = plan(&installation, arch, &request.postprocess)?;

    info!(
        arch = %arch,
        root = %installation.root().display(),
        variables = diff.len(),
        "Resolved toolchain environment"
    );

    Ok(Resolution {
        installation,
        arch,
        diff,
        adjustments,
    })
}

/// Resolves and, only if every stage succeeded, writes the result to `sink`.
///
/// # Errors
///
/// Returns resolution failures as [`crate::error::VsenvError::Resolve`] and
/// write failures as [`crate::error::VsenvError::Sink`].
pub async fn run<R, S>(runner: &R, request: &ResolveRequest, sink: &mut S) -> VsenvResult<Resolution>
where
    R: CommandRunner,
    S: JobEnvironmentSink + ?Sized,
{
    let resolution = resolve(runner, request).await?;
    resolution.apply_to(sink)?;
    Ok(resolution)
}

#[cfg(test)]
mod tests;
