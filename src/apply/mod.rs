// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Merging an [`EnvironmentDiff`] into a job environment.
//!
//! ```text
//! diff.set        --> sink.set_variable        (overwrite)
//! diff.prepended  --> missing_segments(new, sink.current)
//!                       empty? skip
//!                       else   sink.prepend_to_path
//! ```
//!
//! Applying the same diff twice leaves the sink as after the first time.

use tracing::{debug, info};

use crate::core::env::diff::{EnvironmentDiff, missing_segments};
use crate::error::SinkResult;
use crate::sink::JobEnvironmentSink;

/// Applies `diff` to `sink`.
///
/// # Errors
///
/// Returns the first [`SinkError`](crate::error::SinkError) reported by the sink.
pub fn apply<S: JobEnvironmentSink + ?Sized>(diff: &EnvironmentDiff, sink: &mut S) -> SinkResult<()> {
    for (name, value) in &diff.set {
        sink.set_variable(name, value)?;
    }

    let mut added = 0;
    for (name, segments) in &diff.prepended {
        let existing = sink.current(name).unwrap_or_default();
        let missing = missing_segments(segments.iter().map(String::as_str), &existing);
        if missing.is_empty() {
            debug!(name = %name, "path list already up to date");
            continue;
        }
        added += missing.len();
        sink.prepend_to_path(name, &missing)?;
    }

    info!(
        variables = diff.set.len(),
        path_segments = added,
        "Applied environment"
    );
    Ok(())
}

#[cfg(test)]
mod tests;
