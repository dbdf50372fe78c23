// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Toolchain-specific adjustments on top of the captured environment.
//!
//! ```text
//! plan(installation, arch, options)          filesystem checks only
//!   none      --> Adjustments::default()
//!   msvc      --> VC\Tools\MSVC\<max>\bin\Host<host>\<target>   PATH (front)
//!   clang-cl  --> msvc, plus
//!                 <llvm>\bin                                   PATH (front)
//!                 VC\Tools\MSVC\<max>\lib\<target>             LIB  (back)
//!                 CC CXX LD CFLAGS CXXFLAGS LDFLAGS
//!
//! Adjustments::apply_to(sink)                 runs only after plan() succeeded
//! ```
//!
//! Toolsets are ordered by plain string comparison, so `14.9.x` sorts above
//! `14.10.x`. Shipped MSVC toolsets all share the `14.NN` shape.

use bon::Builder;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::arch::CanonicalArch;
use crate::core::env::diff::{PATH_LIST_SEPARATOR, missing_segments, split_path_list};
use crate::core::vs::Installation;
use crate::error::{ResolveError, ResolveResult, SinkResult};
use crate::sink::JobEnvironmentSink;

/// Default LLVM installation directory.
pub const DEFAULT_LLVM_ROOT: &str = r"C:\Program Files\LLVM";

/// Variables set for clang-cl builds against the debug CRT.
pub const CLANG_CL_VARIABLES: &[(&str, &str)] = &[
    ("CC", "clang-cl"),
    ("CXX", "clang-cl"),
    ("LD", "lld-link"),
    ("CFLAGS", "/MDd"),
    ("CXXFLAGS", "/MDd"),
    ("LDFLAGS", "/DEFAULTLIB:msvcrtd.lib /NODEFAULTLIB:libcmt.lib"),
];

/// Toolchain flavor to prepare the job for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Toolchain {
    /// Captured environment only
    None,
    /// Put the selected MSVC toolset's binaries first on PATH
    #[default]
    Msvc,
    /// MSVC plus LLVM clang-cl / lld-link
    ClangCl,
}

impl std::fmt::Display for Toolchain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Msvc => "msvc",
            Self::ClangCl => "clang-cl",
        })
    }
}

/// Postprocessing settings.
#[derive(Debug, Clone, Builder)]
pub struct PostprocessOptions {
    #[builder(setters(name = with_toolchain), default)]
    toolchain: Toolchain,
    #[builder(setters(name = with_llvm_root), into, default = PathBuf::from(DEFAULT_LLVM_ROOT))]
    llvm_root: PathBuf,
}

impl Default for PostprocessOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl PostprocessOptions {
    #[must_use]
    pub const fn toolchain(&self) -> Toolchain {
        self.toolchain
    }
}

/// Sink changes decided by [`plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjustments {
    /// Selected toolset version, if one was needed.
    pub toolset: Option<String>,
    /// Segments for the front of `PATH`, in order.
    pub path_front: Vec<String>,
    /// Segments for the back of `LIB`, in order.
    pub lib_back: Vec<String>,
    /// Scalar variables to set.
    pub variables: Vec<(String, String)>,
}

impl Adjustments {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path_front.is_empty() && self.lib_back.is_empty() && self.variables.is_empty()
    }

    /// Writes the adjustments, skipping path segments already present.
    ///
    /// # Errors
    ///
    /// Returns the first [`SinkError`](crate::error::SinkError) reported by the sink.
    pub fn apply_to<S: JobEnvironmentSink + ?Sized>(&self, sink: &mut S) -> SinkResult<()> {
        let existing = sink.current("PATH").unwrap_or_default();
        let front = missing_segments(self.path_front.iter().map(String::as_str), &existing);
        if !front.is_empty() {
            sink.prepend_to_path("PATH", &front)?;
        }

        if !self.lib_back.is_empty() {
            let lib = sink.current("LIB").unwrap_or_default();
            let back = missing_segments(self.lib_back.iter().map(String::as_str), &lib);
            if !back.is_empty() {
                let value = split_path_list(&lib)
                    .chain(back.iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(&PATH_LIST_SEPARATOR.to_string());
                sink.set_variable("LIB", &value)?;
            }
        }

        for (name, value) in &self.variables {
            sink.set_variable(name, value)?;
        }

        Ok(())
    }
}

/// Picks the highest toolset version directory below `tools_root`.
///
/// # Errors
///
/// Returns [`ResolveError::NoToolsetFound`] if `tools_root` is missing or has
/// no subdirectories.
pub fn select_toolset(tools_root: &Path) -> ResolveResult<String> {
    let not_found = || ResolveError::NoToolsetFound {
        path: tools_root.to_path_buf(),
    };

    let entries = std::fs::read_dir(tools_root).map_err(|_| not_found())?;

    entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .max()
        .ok_or_else(not_found)
}

/// Decides every adjustment for `options.toolchain`, touching only the filesystem.
///
/// # Errors
///
/// - [`ResolveError::NoToolsetFound`] if no MSVC toolset is installed.
/// - [`ResolveError::DependencyMissing`] if the LLVM root or the toolset's
///   library directory is absent (clang-cl only).
pub fn plan(
    installation: &Installation,
    arch: CanonicalArch,
    options: &PostprocessOptions,
) -> ResolveResult<Adjustments> {
    if options.toolchain == Toolchain::None {
        return Ok(Adjustments::default());
    }

    let toolset = select_toolset(&installation.msvc_tools_root())?;
    let toolset_root = installation.toolset_root(&toolset);
    let msvc_bin = toolset_root
        .join("bin")
        .join(format!("Host{}", arch.host()))
        .join(arch.target());

    debug!(toolset = %toolset, bin = %msvc_bin.display(), "Selected MSVC toolset");

    let mut adjustments = Adjustments {
        toolset: Some(toolset),
        path_front: vec![msvc_bin.display().to_string()],
        ..Adjustments::default()
    };

    if options.toolchain == Toolchain::ClangCl {
        let llvm = &options.llvm_root;
        if !llvm.is_dir() {
            return Err(ResolveError::DependencyMissing {
                what: "LLVM".to_string(),
                path: llvm.clone(),
            });
        }

        let lib = toolset_root.join("lib").join(arch.target());
        if !lib.is_dir() {
            return Err(ResolveError::DependencyMissing {
                what: "MSVC toolset libraries".to_string(),
                path: lib,
            });
        }

        adjustments
            .path_front
            .insert(0, llvm.join("bin").display().to_string());
        adjustments.lib_back.push(lib.display().to_string());
        adjustments.variables = CLANG_CL_VARIABLES
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
    }

    info!(
        toolchain = %options.toolchain,
        toolset = ?adjustments.toolset,
        "Planned toolchain adjustments"
    );

    Ok(adjustments)
}

/// Plans and applies in one go.
///
/// Nothing is written to `sink` unless planning succeeds.
///
/// # Errors
///
/// Returns planning errors as [`crate::error::VsenvError::Resolve`] and write
/// failures as [`crate::error::VsenvError::Sink`].
pub fn postprocess<S: JobEnvironmentSink + ?Sized>(
    installation: &Installation,
    arch: CanonicalArch,
    options: &PostprocessOptions,
    sink: &mut S,
) -> crate::error::VsenvResult<Adjustments> {
    let adjustments = plan(installation, arch, options)?;
    adjustments.apply_to(sink)?;
    Ok(adjustments)
}
