// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for toolchain discovery and environment capture.
//!
//! ```text
//!                    core
//!                     |
//!     +-------+-------+-------+---------+
//!     |       |       |       |         |
//!     v       v       v       v         v
//!   arch     vs    vcvars    env     process
//!     |       |       |       |         |
//!  normalize vswhere  .bat   Env     Builder
//!  Canonical Install  cmd    diff    CommandRunner
//! ```
//!
//! Nothing here is Windows-only at compile time; the Windows tools are
//! reached through [`process::CommandRunner`].

pub mod arch;
pub mod env;
pub mod process;
pub mod vcvars;
pub mod vs;
