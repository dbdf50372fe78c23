// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning behind a runner seam.
//!
//! ```text
//! ProcessBuilder::new("vswhere.exe")
//!   .args() .env() .timeout() .stdout_encoding()
//!       --> CommandRunner::run()
//!           SystemRunner: tokio::process::Command
//!       --> ProcessOutput { exit_code, stdout, stderr }
//! ```

pub mod builder;
pub mod runner;
#[cfg(test)]
pub(crate) mod test_utils;

pub use builder::{ProcessBuilder, ProcessFlags, ProcessOutput};
pub use runner::{CommandRunner, SystemRunner};
