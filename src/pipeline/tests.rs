// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use crate::core::env::container::Env;
use crate::core::process::ProcessOutput;
use crate::core::process::test_utils::ScriptedRunner;
use crate::core::vcvars::ENV_MARKER;
use crate::error::{ResolveError, VsenvError};
use crate::postprocess::Toolchain;
use crate::sink::MemorySink;
use std::path::Path;
use tempfile::TempDir;

const TOOLSET: &str = "14.38.33130";

struct Fixture {
    dir: TempDir,
    vswhere: PathBuf,
    root: PathBuf,
}

impl Fixture {
    /// `vswhere.exe` stub plus an installation with a toolset and, optionally,
    /// a `vcvarsall.bat`.
    fn new(with_vcvarsall: bool) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let vswhere = dir.path().join("vswhere.exe");
        std::fs::write(&vswhere, "").expect("write vswhere");

        let root = dir.path().join("vs");
        let installation = Installation::new(&root);
        std::fs::create_dir_all(installation.toolset_root(TOOLSET).join("bin")).expect("mkdir");
        if with_vcvarsall {
            let script = installation.vcvarsall();
            std::fs::create_dir_all(script.parent().expect("parent")).expect("mkdir");
            std::fs::write(&script, "@echo off\r\n").expect("write vcvarsall");
        }

        Self { dir, vswhere, root }
    }

    fn scratch(&self) -> PathBuf {
        let scratch = self.dir.path().join("scratch");
        std::fs::create_dir_all(&scratch).expect("mkdir scratch");
        scratch
    }

    fn request(&self, arch: &str, toolchain: Toolchain) -> ResolveRequest {
        let extract = ExtractOptions::builder()
            .with_script_dir(self.scratch())
            .with_baseline(baseline())
            .build();
        let postprocess = PostprocessOptions::builder()
            .with_toolchain(toolchain)
            .with_llvm_root(self.dir.path().join("no-llvm"))
            .build();

        ResolveRequest::builder()
            .with_arch(arch)
            .with_vswhere(self.vswhere.clone())
            .with_extract(extract)
            .with_postprocess(postprocess)
            .build()
    }

    /// Answers vswhere with the installation root and cmd with `dump`.
    fn runner(&self, dump: &'static str) -> ScriptedRunner {
        let root = self.root.display().to_string();
        ScriptedRunner::new(move |command| {
            let stdout = if command.program().ends_with("vswhere.exe") {
                format!("{root}\r\n")
            } else {
                format!("banner\r\n{ENV_MARKER}\r\n{dump}")
            };
            Ok(ProcessOutput::new(Some(0), stdout, String::new()))
        })
    }

    fn msvc_bin(&self, host: &str, target: &str) -> String {
        Installation::new(&self.root)
            .toolset_root(TOOLSET)
            .join("bin")
            .join(format!("Host{host}"))
            .join(target)
            .display()
            .to_string()
    }
}

fn baseline() -> Env {
    let mut env = Env::new();
    env.set("PATH", r"C:\Windows");
    env
}

const DUMP: &str = "PATH=C:\\VS\\bin;C:\\Windows\r\nVSCMD_ARG_TGT_ARCH=x64\r\n";

#[tokio::test]
async fn test_unsupported_arch_spawns_nothing() {
    let fixture = Fixture::new(true);
    let runner = fixture.runner(DUMP);

    let err = resolve(&runner, &fixture.request("ia64", Toolchain::Msvc))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::UnsupportedArchitecture { ref token } if token == "ia64"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_missing_vcvarsall_leaves_sink_untouched() {
    let fixture = Fixture::new(false);
    let runner = fixture.runner(DUMP);
    let mut sink = MemorySink::new(baseline());

    let err = run(&runner, &fixture.request("x64", Toolchain::Msvc), &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(
        err.as_resolve(),
        Some(ResolveError::ScriptNotFound { .. })
    ));
    assert_eq!(runner.calls().len(), 1);
    assert_eq!(sink.env(), &baseline());
}

#[tokio::test]
async fn test_not_found_stops_before_script() {
    let fixture = Fixture::new(true);
    let runner = ScriptedRunner::replying(0, "", "");

    let err = resolve(&runner, &fixture.request("x64", Toolchain::Msvc))
        .await
        .unwrap_err();

    assert!(matches!(err, ResolveError::NotFound { .. }));
    assert_eq!(runner.calls().len(), 1);
}

#[tokio::test]
async fn test_full_pipeline_msvc() {
    let fixture = Fixture::new(true);
    let runner = fixture.runner(DUMP);
    let mut sink = MemorySink::new(baseline());

    let resolution = run(&runner, &fixture.request("amd64", Toolchain::Msvc), &mut sink)
        .await
        .expect("pipeline should succeed");

    assert_eq!(resolution.arch, CanonicalArch::X64);
    assert_eq!(resolution.installation.root(), fixture.root.as_path());
    assert_eq!(resolution.adjustments.toolset.as_deref(), Some(TOOLSET));
    assert_eq!(resolution.diff.prepended["PATH"], [r"C:\VS\bin"]);

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].program, Path::new("cmd.exe"));
    assert!(
        calls[1]
            .script
            .as_deref()
            .is_some_and(|s| s.contains("x64\r\n"))
    );

    let bin = fixture.msvc_bin("x64", "x64");
    assert_eq!(
        sink.env().get("PATH"),
        Some(format!(r"{bin};C:\VS\bin;C:\Windows").as_str())
    );
    assert_eq!(sink.env().get("VSCMD_ARG_TGT_ARCH"), Some("x64"));
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let fixture = Fixture::new(true);
    let runner = fixture.runner(DUMP);
    let request = fixture.request("x64", Toolchain::Msvc);
    let mut sink = MemorySink::new(baseline());

    let resolution = run(&runner, &request, &mut sink).await.expect("first run");
    let once = sink.env().clone();
    resolution.apply_to(&mut sink).expect("second apply");

    assert_eq!(sink.env(), &once);
}

#[tokio::test]
async fn test_postprocess_failure_writes_nothing() {
    let fixture = Fixture::new(true);
    let runner = fixture.runner(DUMP);
    let mut sink = MemorySink::new(baseline());

    let err = run(&runner, &fixture.request("x64", Toolchain::ClangCl), &mut sink)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VsenvError::Resolve(ref e) if matches!(**e, ResolveError::DependencyMissing { .. })
    ));
    assert_eq!(sink.env(), &baseline());
}

#[test]
fn test_request_from_config() {
    let config = VsenvConfig::parse(
        "[locator]\nversion = \"[17.0,18.0)\"\ntimeout_secs = 5\n[postprocess]\ntoolchain = \"none\"\n",
    )
    .expect("config");

    let request = ResolveRequest::from_config(&config, "x64_arm64");

    assert_eq!(request.arch(), "x64_arm64");
    assert_eq!(request.constraint().version(), Some("[17.0,18.0)"));
    assert_eq!(request.locator_timeout, Duration::from_secs(5));
    assert_eq!(request.postprocess.toolchain(), Toolchain::None);
}
