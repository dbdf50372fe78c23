// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment capture from `vcvarsall.bat`.
//!
//! ```text
//! extract_diff(runner, installation, arch, options)
//!   vcvarsall.bat exists?            no --> ScriptNotFound
//!   baseline = options.baseline | Env::current()
//!   write disposable .bat (TempPath, deleted on drop)
//!       chcp 65001 >nul              (utf8 only)
//!       call "<vcvarsall>" <arch>
//!       if errorlevel set, exit with it
//!       echo <marker>
//!       set
//!   cmd.exe /d /q /c <script>        env = baseline, timeout
//!       spawn error / timeout / exit != 0 --> ScriptFailed
//!   parse lines after marker --> Env (after)
//!   compute_diff(baseline, after) --> EnvironmentDiff
//! ```

use bon::Builder;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempPath;
use tracing::{debug, info};

use crate::core::arch::CanonicalArch;
use crate::core::env::container::Env;
use crate::core::env::diff::{DEFAULT_PATH_VARIABLES, EnvironmentDiff, compute_diff, parse_env_dump};
use crate::core::process::{CommandRunner, ProcessBuilder, ProcessFlags};
use crate::core::vs::Installation;
use crate::error::{ProcessError, ResolveError, ResolveResult};
use crate::utility::encoding::Encoding;

/// Line separating vcvarsall's own chatter from the `set` dump. Contains no `=`.
pub const ENV_MARKER: &str = "---- vsenv environment ----";

/// Default wall-clock limit for the setup script.
pub const DEFAULT_SCRIPT_TIMEOUT: Duration = Duration::from_secs(600);

/// Knobs for one extraction.
#[derive(Debug, Clone, Builder)]
pub struct ExtractOptions {
    /// Script location relative to the installation root.
    /// Defaults to `VC\Auxiliary\Build\vcvarsall.bat`.
    #[builder(setters(name = with_script), into)]
    script: Option<PathBuf>,

    #[builder(setters(name = with_timeout), default = DEFAULT_SCRIPT_TIMEOUT)]
    timeout: Duration,

    /// Encoding `cmd.exe` output is decoded with.
    #[builder(setters(name = with_encoding), default)]
    encoding: Encoding,

    /// Directory for the disposable script. Defaults to the system temp dir.
    #[builder(setters(name = with_script_dir), into)]
    script_dir: Option<PathBuf>,

    #[builder(
        setters(name = with_path_variables),
        default = DEFAULT_PATH_VARIABLES.iter().map(ToString::to_string).collect()
    )]
    path_variables: Vec<String>,

    /// Environment to diff against. Defaults to the current process environment.
    #[builder(setters(name = with_baseline))]
    baseline: Option<Env>,

    /// Command interpreter running the script.
    #[builder(setters(name = with_shell), into, default = PathBuf::from("cmd.exe"))]
    shell: PathBuf,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn path_variables(&self) -> &[String] {
        &self.path_variables
    }

    /// Where the setup script is expected for `installation`.
    #[must_use]
    pub fn script_path(&self, installation: &Installation) -> PathBuf {
        self.script.as_ref().map_or_else(
            || installation.vcvarsall(),
            |relative| installation.root().join(relative),
        )
    }
}

/// Renders the disposable batch file (CRLF line endings).
#[must_use]
pub fn render_script(vcvarsall: &Path, arch: CanonicalArch, encoding: Encoding) -> String {
    let mut lines = vec!["@echo off".to_string()];
    if let Some(code_page) = encoding.console_code_page() {
        lines.push(format!("chcp {code_page} >nul"));
    }
    lines.push(format!("call \"{}\" {}", vcvarsall.display(), arch.vcvars_arg()));
    lines.push("if %ERRORLEVEL% neq 0 exit /b %ERRORLEVEL%".to_string());
    lines.push(format!("echo {ENV_MARKER}"));
    lines.push("set".to_string());

    let mut script = lines.join("\r\n");
    script.push_str("\r\n");
    script
}

/// Environment dump that follows the marker, or everything if it is absent.
#[must_use]
pub fn after_marker(stdout: &str) -> &str {
    stdout
        .find(ENV_MARKER)
        .map_or(stdout, |at| &stdout[at + ENV_MARKER.len()..])
}

/// Writes `contents` to a fresh `.bat` file in `dir`.
fn write_script(dir: &Path, contents: &str) -> ResolveResult<TempPath> {
    let io_error = |source| ResolveError::ScriptIo {
        dir: dir.to_path_buf(),
        source,
    };

    let mut file = tempfile::Builder::new()
        .prefix("vsenv-")
        .suffix(".bat")
        .tempfile_in(dir)
        .map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.flush().map_err(io_error)?;

    Ok(file.into_temp_path())
}

/// Runs `vcvarsall.bat` for `arch` and returns what it changed.
///
/// The disposable script is removed on every return path.
///
/// # Errors
///
/// - [`ResolveError::ScriptNotFound`] if the setup script is missing. Nothing is spawned.
/// - [`ResolveError::ScriptIo`] if the disposable script cannot be written.
/// - [`ResolveError::ScriptFailed`] if the script cannot run, times out or exits non-zero.
pub async fn extract_diff<R: CommandRunner>(
    runner: &R,
    installation: &Installation,
    arch: CanonicalArch,
    options: &ExtractOptions,
) -> ResolveResult<EnvironmentDiff> {
    let vcvarsall = options.script_path(installation);
    if !vcvarsall.is_file() {
        return Err(ResolveError::ScriptNotFound { path: vcvarsall });
    }

    let baseline = options.baseline.clone().unwrap_or_else(Env::current);

    let dir = options
        .script_dir
        .clone()
        .unwrap_or_else(std::env::temp_dir);
    let script = write_script(&dir, &render_script(&vcvarsall, arch, options.encoding))?;

    info!(arch = %arch, script = %vcvarsall.display(), "Running setup script");
    debug!(path = %script.display(), "Wrote disposable script");

    let command = ProcessBuilder::new(&options.shell)
        .args(["/d", "/q", "/c"])
        .arg(script.as_os_str())
        .name("vcvarsall")
        .env(baseline.clone())
        .flag(ProcessFlags::ALLOW_FAILURE)
        .stdout_encoding(options.encoding)
        .stderr_encoding(options.encoding)
        .timeout(options.timeout);

    let result = runner.run(command).await;
    drop(script);

    let output = result.map_err(|e| script_failed(&vcvarsall, &e))?;
    if !output.success() {
        let stderr = output.stderr().trim();
        let text = if stderr.is_empty() {
            output.stdout().trim()
        } else {
            stderr
        };
        return Err(ResolveError::ScriptFailed {
            script: vcvarsall,
            code: output.exit_code(),
            output: text.to_string(),
        });
    }

    let after = parse_env_dump(after_marker(output.stdout()));
    let diff = compute_diff(&baseline, &after, &options.path_variables);

    debug!(
        set = diff.set.len(),
        prepended = diff.prepended.len(),
        "Computed environment diff"
    );

    Ok(diff)
}

fn script_failed(script: &Path, error: &ProcessError) -> ResolveError {
    ResolveError::ScriptFailed {
        script: script.to_path_buf(),
        code: None,
        output: error.to_string(),
    }
}

#[cfg(test)]
mod tests;
