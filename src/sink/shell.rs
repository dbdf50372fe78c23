// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shell statements for local use, e.g. `vsenv apply --sink shell | Invoke-Expression`.
//!
//! ```text
//! state (Windows form)           emitted
//! PATH = C:\B;C:\A    pwsh      $env:PATH = 'C:\B;C:\A'
//!                     sh        export PATH='/c/B:/c/A'
//! LIB  = C:\libs      sh        export LIB='C:\libs'
//! ```
//!
//! `sh` rewrites only `PATH` into the MSYS form bash resolves commands from.
//! Other lists are read by the MSVC tools themselves and stay `;`-separated.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Write;

use super::{JobEnvironmentSink, prepend_segments, validate_name};
use crate::core::env::container::Env;
use crate::core::env::diff::split_path_list;
use crate::error::{SinkError, SinkResult};

/// Statement syntax emitted by [`ShellSink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShellSyntax {
    /// POSIX `export NAME='value'`
    Sh,
    /// PowerShell `$env:NAME = 'value'`
    #[default]
    Pwsh,
}

impl ShellSyntax {
    /// Renders an assignment of `value` to `name`.
    #[must_use]
    pub fn assignment(self, name: &str, value: &str) -> String {
        match self {
            Self::Sh => format!("export {name}='{}'", value.replace('\'', r"'\''")),
            Self::Pwsh => format!("$env:{name} = '{}'", value.replace('\'', "''")),
        }
    }

    /// Value of `name` in the form this shell expects.
    #[must_use]
    pub fn export_value<'a>(self, name: &str, value: &'a str) -> Cow<'a, str> {
        match self {
            Self::Sh if name.eq_ignore_ascii_case("PATH") => Cow::Owned(posix_path_list(value)),
            _ => Cow::Borrowed(value),
        }
    }
}

/// Rewrites a `;`-separated Windows path list as a `:`-separated one.
///
/// `C:\VS\bin` becomes `/c/VS/bin`. Segments without a drive letter pass
/// through, so a list that already uses `:` is preserved.
#[must_use]
pub fn posix_path_list(value: &str) -> String {
    split_path_list(value)
        .map(posix_path)
        .collect::<Vec<_>>()
        .join(":")
}

fn posix_path(segment: &str) -> String {
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(drive), Some(':')) if drive.is_ascii_alphabetic() => {
            let rest = chars.as_str().replace('\\', "/");
            let rest = rest.trim_end_matches('/');
            let sep = if rest.starts_with('/') || rest.is_empty() { "" } else { "/" };
            format!("/{}{sep}{rest}", drive.to_ascii_lowercase())
        }
        _ => segment.to_string(),
    }
}

/// Sink printing one assignment per change to a writer.
#[derive(Debug)]
pub struct ShellSink<W: Write> {
    out: W,
    syntax: ShellSyntax,
    state: Env,
}

impl<W: Write> ShellSink<W> {
    pub const fn new(out: W, syntax: ShellSyntax, state: Env) -> Self {
        Self { out, syntax, state }
    }

    #[must_use]
    pub const fn state(&self) -> &Env {
        &self.state
    }

    #[must_use]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, name: &str, value: &str) -> SinkResult<()> {
        let exported = self.syntax.export_value(name, value);
        writeln!(self.out, "{}", self.syntax.assignment(name, &exported)).map_err(|source| {
            SinkError::Io {
                path: "<stdout>".to_string(),
                source,
            }
        })?;
        self.state.set(name, value);
        Ok(())
    }
}

impl<W: Write> JobEnvironmentSink for ShellSink<W> {
    fn current(&self, name: &str) -> Option<String> {
        self.state.get(name).map(ToString::to_string)
    }

    fn set_variable(&mut self, name: &str, value: &str) -> SinkResult<()> {
        validate_name(name)?;
        self.emit(name, value)
    }

    fn prepend_to_path(&mut self, name: &str, segments: &[String]) -> SinkResult<()> {
        validate_name(name)?;
        if segments.is_empty() {
            return Ok(());
        }
        let value = prepend_segments(segments, self.state.get(name));
        self.emit(name, &value)
    }
}
