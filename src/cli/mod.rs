// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for vsenv-rs using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! vsenv [global options] <command>
//! apply --arch A [--vs-version R] [--toolchain T] [--sink S] [--shell sh|pwsh]
//! locate [--vs-version R] [--all]
//! diff --arch A [--vs-version R]
//! archs
//! options
//! version
//! ```

pub mod global;
pub mod resolve;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use crate::cli::resolve::{ApplyArgs, DiffArgs, LocateArgs};
use clap::{Parser, Subcommand};

/// Visual Studio toolchain environment resolver
///
/// Finds a Visual Studio installation, captures what `vcvarsall.bat` does to
/// the environment and exports it into the surrounding CI job.
#[derive(Debug, Parser)]
#[command(
    name = "vsenv",
    author,
    version,
    about = "Visual Studio toolchain environment resolver",
    long_about = "vsenv-rs Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Resolves the MSVC build environment for an architecture and\n\
                  exports it into the CI job. Invoking `vsenv apply --arch x64`\n\
                  inside a GitHub Actions step is usually all that is needed.",
    after_help = "CONFIG FILES:\n\n\
                  vsenv reads `vsenv.toml` from the current directory if it exists.\n\
                  Additional files can be given with --config and are loaded after it.\n\
                  VSENV_<SECTION>__<KEY> environment variables override both, and\n\
                  command line flags override everything."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values, then the config files used.
    Options,

    /// Lists the accepted architecture names.
    Archs,

    /// Resolves the toolchain environment and exports it into the job.
    Apply(ApplyArgs),

    /// Prints the Visual Studio installation that would be used.
    Locate(LocateArgs),

    /// Prints the environment changes as JSON without exporting them.
    Diff(DiffArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
