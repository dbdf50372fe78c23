// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Commands that run the resolution pipeline.
//!
//! ```text
//! apply   resolve --> sink (github | shell | dry)
//! locate  vswhere --> installation root(s)
//! diff    resolve --> JSON on stdout
//! ```

use serde_json::{Value, json};
use tracing::info;

use crate::cli::resolve::{ApplyArgs, DiffArgs, LocateArgs, SinkKind};
use crate::config::VsenvConfig;
use crate::core::env::container::Env;
use crate::core::process::CommandRunner;
use crate::core::vs::{VsInstallation, find_installations, find_vswhere, locate};
use crate::error::Result;
use crate::pipeline::{ResolveRequest, Resolution, resolve, run};
use crate::sink::{GithubSink, MemorySink, ShellSink};

/// Sink used when `--sink` is not given.
#[must_use]
pub const fn default_sink(github_available: bool) -> SinkKind {
    if github_available {
        SinkKind::Github
    } else {
        SinkKind::Shell
    }
}

/// Run the apply command.
///
/// # Errors
///
/// Returns an error if resolution fails or the sink cannot be written. The
/// GitHub sink is checked before anything is resolved.
pub async fn run_apply_command<R: CommandRunner>(
    runner: &R,
    args: &ApplyArgs,
    config: &VsenvConfig,
) -> Result<()> {
    let request = ResolveRequest::from_config(config, &args.arch);
    let kind = args
        .sink
        .unwrap_or_else(|| default_sink(GithubSink::available()));

    info!(arch = %args.arch, sink = ?kind, toolchain = %config.postprocess.toolchain, "Applying toolchain environment");

    match kind {
        SinkKind::Github => {
            let mut sink = GithubSink::from_env()?;
            run(runner, &request, &mut sink).await?;
        }
        SinkKind::Shell => {
            let mut sink = ShellSink::new(std::io::stdout().lock(), args.shell, Env::current());
            run(runner, &request, &mut sink).await?;
        }
        SinkKind::Dry => {
            let before = Env::current();
            let mut sink = MemorySink::new(before.clone());
            run(runner, &request, &mut sink).await?;
            for line in changed_variables(&before, sink.env()) {
                info!("{line}");
            }
        }
    }

    Ok(())
}

/// `NAME=value` for every variable that differs between `before` and `after`.
#[must_use]
pub fn changed_variables(before: &Env, after: &Env) -> Vec<String> {
    after
        .iter()
        .filter(|(name, value)| before.get(name) != Some(*value))
        .map(|(name, value)| format!("{name}={value}"))
        .collect()
}

/// Run the locate command.
///
/// # Errors
///
/// Returns an error if vswhere cannot be found or run, or if no
/// installation matches.
pub async fn run_locate_command<R: CommandRunner>(
    runner: &R,
    args: &LocateArgs,
    config: &VsenvConfig,
) -> Result<()> {
    let vswhere = find_vswhere(config.locator.vswhere.as_deref())?;
    let constraint = config.locator.constraint();
    let timeout = config.locator.timeout();

    if args.all {
        let installations = find_installations(runner, &vswhere, &constraint, timeout).await?;
        if installations.is_empty() {
            println!("No installations found");
        }
        for line in format_installations(&installations) {
            println!("{line}");
        }
    } else {
        let installation = locate(runner, &vswhere, &constraint, timeout).await?;
        println!("{}", installation.root().display());
    }

    Ok(())
}

/// One `version  name  path` line per installation.
#[must_use]
pub fn format_installations(installations: &[VsInstallation]) -> Vec<String> {
    let version_width = installations
        .iter()
        .map(|vs| vs.installation_version.len())
        .max()
        .unwrap_or(0);
    let name_width = installations
        .iter()
        .map(|vs| vs.display_name.len())
        .max()
        .unwrap_or(0);

    installations
        .iter()
        .map(|vs| {
            format!(
                "{:<version_width$}  {:<name_width$}  {}",
                vs.installation_version,
                vs.display_name,
                vs.installation_path.display()
            )
        })
        .collect()
}

/// Run the diff command.
///
/// # Errors
///
/// Returns an error if resolution fails.
pub async fn run_diff_command<R: CommandRunner>(
    runner: &R,
    args: &DiffArgs,
    config: &VsenvConfig,
) -> Result<()> {
    let request = ResolveRequest::from_config(config, &args.arch);
    let resolution = resolve(runner, &request).await?;
    println!("{}", serde_json::to_string_pretty(&diff_report(&resolution))?);
    Ok(())
}

/// JSON document describing `resolution`.
#[must_use]
pub fn diff_report(resolution: &Resolution) -> Value {
    let adjustments = &resolution.adjustments;
    let variables: serde_json::Map<String, Value> = adjustments
        .variables
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();

    json!({
        "installation": resolution.installation.root().display().to_string(),
        "arch": resolution.arch.to_string(),
        "set": resolution.diff.set,
        "prepended": resolution.diff.prepended,
        "toolchain": {
            "toolset": adjustments.toolset,
            "path_front": adjustments.path_front,
            "lib_back": adjustments.lib_back,
            "variables": variables,
        },
    })
}

#[cfg(test)]
mod tests;
