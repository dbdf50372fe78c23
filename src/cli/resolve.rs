// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the commands that talk to Visual Studio.
//!
//! ```text
//! --arch        INPUT_ARCH        (required for apply / diff)
//! --vs-version  INPUT_VSVERSION   → locator.version
//! --toolchain   INPUT_TOOLCHAIN   → postprocess.toolchain
//! ```
//!
//! The `INPUT_*` names are what GitHub Actions exports for action inputs.

use clap::{Args, ValueEnum};

use crate::postprocess::Toolchain;
use crate::sink::ShellSyntax;

/// Where `apply` writes the resolved environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SinkKind {
    /// `GITHUB_ENV` and `GITHUB_PATH` files
    Github,
    /// Assignment statements on stdout
    Shell,
    /// Log the result, export nothing
    Dry,
}

/// Installation selection shared by every command.
#[derive(Debug, Clone, Default, Args)]
pub struct VersionArgs {
    /// Version range passed to vswhere, e.g. `[17.0,18.0)`.
    #[arg(long = "vs-version", value_name = "RANGE", env = "INPUT_VSVERSION")]
    pub vs_version: Option<String>,
}

/// Arguments for the `apply` command.
#[derive(Debug, Clone, Args)]
pub struct ApplyArgs {
    /// Target architecture (see `vsenv archs`).
    #[arg(short = 'a', long, value_name = "ARCH", env = "INPUT_ARCH")]
    pub arch: String,

    #[command(flatten)]
    pub version: VersionArgs,

    /// Toolchain adjustments on top of the captured environment.
    #[arg(short = 't', long, value_enum, env = "INPUT_TOOLCHAIN")]
    pub toolchain: Option<Toolchain>,

    /// Output target. Defaults to `github` when GITHUB_ENV is set, else `shell`.
    #[arg(long, value_enum)]
    pub sink: Option<SinkKind>,

    /// Statement syntax for `--sink shell`.
    #[arg(long, value_enum, default_value_t = ShellSyntax::default())]
    pub shell: ShellSyntax,
}

/// Arguments for the `locate` command.
#[derive(Debug, Clone, Default, Args)]
pub struct LocateArgs {
    #[command(flatten)]
    pub version: VersionArgs,

    /// List every complete installation, newest first.
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the `diff` command.
#[derive(Debug, Clone, Args)]
pub struct DiffArgs {
    /// Target architecture (see `vsenv archs`).
    #[arg(short = 'a', long, value_name = "ARCH", env = "INPUT_ARCH")]
    pub arch: String,

    #[command(flatten)]
    pub version: VersionArgs,
}
