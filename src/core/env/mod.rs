// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment snapshots and diffs.
//!
//! # Architecture
//!
//! ```text
//! Env (BTreeMap<EnvKey, String>)
//! Sources: Env::current(), parse_env_dump(), Env::from_map()
//! compute_diff(before, after) --> EnvironmentDiff { set, prepended }
//! ```
//!
//! - **Case-insensitive on Windows**
//! - **UTF-8 internal**: Encoding at I/O boundaries only

pub mod container;
pub mod diff;
mod types;
