// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities for code that runs external commands.
//!
//! Provides a scripted `CommandRunner` that never spawns anything.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::builder::{ProcessBuilder, ProcessOutput};
use super::runner::CommandRunner;
use crate::error::ProcessError;

type Responder = Box<dyn Fn(&ProcessBuilder) -> Result<ProcessOutput, ProcessError> + Send + Sync>;

/// One recorded call to [`ScriptedRunner::run`].
#[derive(Debug, Clone)]
pub(crate) struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    /// Contents of the last argument if it named an existing file at call time.
    pub script: Option<String>,
}

impl Invocation {
    /// Path named by the last argument.
    pub fn last_arg_path(&self) -> Option<&Path> {
        self.args.last().map(Path::new)
    }
}

/// Runner answering every command with a canned response.
pub(crate) struct ScriptedRunner {
    respond: Responder,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new<F>(respond: F) -> Self
    where
        F: Fn(&ProcessBuilder) -> Result<ProcessOutput, ProcessError> + Send + Sync + 'static,
    {
        Self {
            respond: Box::new(respond),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always exits with `code` and the given output.
    pub fn replying(code: i32, stdout: &str, stderr: &str) -> Self {
        let (stdout, stderr) = (stdout.to_string(), stderr.to_string());
        Self::new(move |_| Ok(ProcessOutput::new(Some(code), stdout.clone(), stderr.clone())))
    }

    /// Always fails with the error built by `make`.
    pub fn failing<F>(make: F) -> Self
    where
        F: Fn() -> ProcessError + Send + Sync + 'static,
    {
        Self::new(move |_| Err(make()))
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(
        &self,
        command: ProcessBuilder,
    ) -> impl Future<Output = Result<ProcessOutput, ProcessError>> + Send {
        let script = command
            .arguments()
            .last()
            .and_then(|arg| std::fs::read_to_string(arg).ok());

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(Invocation {
                program: command.program().clone(),
                args: command.arguments().to_vec(),
                script,
            });
        }

        std::future::ready((self.respond)(&command))
    }
}
