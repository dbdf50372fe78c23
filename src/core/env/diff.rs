// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Environment dump parsing and snapshot diffing.
//!
//! ```text
//! "NAME=VALUE\n..." --parse_env_dump--> Env (after)
//!
//! compute_diff(baseline, after, path_variables)
//!   new key                 --> set
//!   changed scalar          --> set
//!   changed path-like key   --> prepended (segments not in baseline)
//!   unchanged               --> skipped
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{Level, enabled, trace};

use super::container::Env;

/// Separator of Windows path lists (`PATH`, `INCLUDE`, `LIB`, ...).
pub const PATH_LIST_SEPARATOR: char = ';';

/// Variables treated as path lists unless configured otherwise.
pub const DEFAULT_PATH_VARIABLES: &[&str] = &["PATH", "INCLUDE", "EXTERNAL_INCLUDE", "LIB", "LIBPATH"];

/// Environment delta needed to use a toolchain from a clean process.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentDiff {
    /// New or changed scalar variables.
    pub set: BTreeMap<String, String>,
    /// Segments to put in front of path-like variables, in order.
    pub prepended: BTreeMap<String, Vec<String>>,
}

impl EnvironmentDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.prepended.is_empty()
    }

    /// Number of variables touched by this diff.
    #[must_use]
    pub fn len(&self) -> usize {
        self.set.len() + self.prepended.len()
    }
}

/// Parses `set`-style output into an environment snapshot.
///
/// Only the first `=` splits a line. Lines whose trimmed key or value is
/// empty are skipped, which also drops cmd's hidden `=C:=C:\...` entries.
/// Values are kept verbatim apart from a stray trailing `\r`.
#[must_use]
pub fn parse_env_dump(output: &str) -> Env {
    let mut env = Env::new();

    for line in output.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.strip_suffix('\r').unwrap_or(value);
        if key.is_empty() || value.trim().is_empty() {
            continue;
        }

        if enabled!(Level::TRACE) {
            trace!(key = key, value = value, "captured env var");
        }
        env.set(key, value);
    }

    env
}

/// Splits a path list into its non-empty segments.
pub fn split_path_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(PATH_LIST_SEPARATOR)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
}

/// Compares two path segments the way Windows resolves them.
///
/// Case-insensitive, and a trailing separator does not make a different
/// directory.
#[must_use]
pub fn same_path(a: &str, b: &str) -> bool {
    let trim = |s: &str| s.trim_end_matches(['\\', '/']).to_string();
    trim(a).eq_ignore_ascii_case(&trim(b))
}

/// Returns the segments of `candidates` not present in `existing`.
///
/// Order is preserved and duplicates among the candidates are dropped.
#[must_use]
pub fn missing_segments<'a, I>(candidates: I, existing: &str) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = split_path_list(existing).collect();
    let mut missing: Vec<String> = Vec::new();

    for candidate in candidates {
        let known = present.iter().any(|p| same_path(p, candidate))
            || missing.iter().any(|m| same_path(m, candidate));
        if !known {
            missing.push(candidate.to_string());
        }
    }

    missing
}

/// Returns true if `key` names one of the configured path-like variables.
#[must_use]
pub fn is_path_variable<S: AsRef<str>>(key: &str, path_variables: &[S]) -> bool {
    path_variables
        .iter()
        .any(|name| name.as_ref().eq_ignore_ascii_case(key))
}

/// Computes the delta from `baseline` to `after`.
#[must_use]
pub fn compute_diff<S: AsRef<str>>(
    baseline: &Env,
    after: &Env,
    path_variables: &[S],
) -> EnvironmentDiff {
    let mut diff = EnvironmentDiff::default();

    for (key, value) in after.iter() {
        match baseline.get(key) {
            None => {
                diff.set.insert(key.to_string(), value.to_string());
            }
            Some(old) if old == value => {}
            Some(old) if is_path_variable(key, path_variables) => {
                let added = missing_segments(split_path_list(value), old);
                if !added.is_empty() {
                    diff.prepended.insert(key.to_string(), added);
                }
            }
            Some(_) => {
                diff.set.insert(key.to_string(), value.to_string());
            }
        }
    }

    diff
}
