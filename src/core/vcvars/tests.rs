// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use crate::core::process::ProcessOutput;
use crate::core::process::test_utils::ScriptedRunner;
use tempfile::TempDir;

/// Installation root with a stub `vcvarsall.bat`.
fn fake_installation() -> (TempDir, Installation) {
    let dir = tempfile::tempdir().expect("tempdir");
    let installation = Installation::new(dir.path());
    let script = installation.vcvarsall();
    std::fs::create_dir_all(script.parent().expect("script has parent")).expect("mkdir");
    std::fs::write(&script, "@echo off\r\n").expect("write vcvarsall");
    (dir, installation)
}

fn options(script_dir: &Path, baseline: Env) -> ExtractOptions {
    ExtractOptions::builder()
        .with_script_dir(script_dir)
        .with_baseline(baseline)
        .build()
}

fn vcvars_stdout(dump: &str) -> String {
    format!(
        "**********************************************************************\r\n\
         ** Visual Studio 2022 Developer Command Prompt v17.9\r\n\
         [vcvarsall.bat] Environment initialized for: 'x64'\r\n\
         {ENV_MARKER}\r\n{dump}"
    )
}

#[test]
fn test_render_script_utf8() {
    let script = render_script(
        Path::new(r"C:\VS\VC\Auxiliary\Build\vcvarsall.bat"),
        CanonicalArch::X64Arm64,
        Encoding::Utf8,
    );

    insta::assert_snapshot!(script.replace("\r\n", "\n").trim_end(), @r#"
    @echo off
    chcp 65001 >nul
    call "C:\VS\VC\Auxiliary\Build\vcvarsall.bat" x64_arm64
    if %ERRORLEVEL% neq 0 exit /b %ERRORLEVEL%
    echo ---- vsenv environment ----
    set
    "#);
    assert!(script.ends_with("set\r\n"));
}

#[test]
fn test_render_script_legacy_code_page_skips_chcp() {
    let script = render_script(Path::new("vcvarsall.bat"), CanonicalArch::X86, Encoding::Oem);
    assert!(!script.contains("chcp"));
    assert!(script.contains("\"vcvarsall.bat\" x86"));
}

#[test]
fn test_after_marker() {
    assert_eq!(after_marker(&vcvars_stdout("A=1\r\n")), "\r\nA=1\r\n");
    assert_eq!(after_marker("A=1\nB=2\n"), "A=1\nB=2\n");
}

#[test]
fn test_script_path_override() {
    let installation = Installation::new("/vs");
    let opts = ExtractOptions::builder()
        .with_script("Common7/Tools/VsDevCmd.bat")
        .build();
    assert_eq!(
        opts.script_path(&installation),
        Path::new("/vs/Common7/Tools/VsDevCmd.bat")
    );
    assert_eq!(
        ExtractOptions::default().script_path(&installation),
        installation.vcvarsall()
    );
}

#[tokio::test]
async fn test_extract_diff_end_to_end() {
    let (_vs, installation) = fake_installation();
    let scratch = tempfile::tempdir().expect("tempdir");
    let baseline: Env = [("PATH", r"C:\A")].into_iter().collect();

    let stdout = vcvars_stdout("PATH=C:\\B;C:\\A\r\nLIB=C:\\libs\r\n");
    let runner = ScriptedRunner::replying(0, &stdout, "");

    let diff = extract_diff(
        &runner,
        &installation,
        CanonicalArch::X64,
        &options(scratch.path(), baseline),
    )
    .await
    .expect("extraction should succeed");

    assert_eq!(diff.set.get("LIB").map(String::as_str), Some(r"C:\libs"));
    assert_eq!(diff.set.len(), 1);
    assert_eq!(diff.prepended.get("PATH"), Some(&vec![r"C:\B".to_string()]));

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, Path::new("cmd.exe"));
    assert_eq!(&calls[0].args[..3], ["/d", "/q", "/c"]);

    let script = calls[0].script.as_deref().expect("script existed during run");
    assert!(script.contains(&format!("\"{}\" x64", installation.vcvarsall().display())));
}

#[tokio::test]
async fn test_script_removed_after_success() {
    let (_vs, installation) = fake_installation();
    let scratch = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::replying(0, &vcvars_stdout("A=1\r\n"), "");

    extract_diff(
        &runner,
        &installation,
        CanonicalArch::X64,
        &options(scratch.path(), Env::new()),
    )
    .await
    .expect("extraction should succeed");

    let call = &runner.calls()[0];
    assert!(call.script.is_some());
    let path = call.last_arg_path().expect("script argument");
    assert!(path.starts_with(scratch.path()));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_script_removed_after_failure() {
    let (_vs, installation) = fake_installation();
    let scratch = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::replying(
        1,
        "[ERROR:vcvarsall.bat] Invalid argument found : bogus\r\n",
        "",
    );

    let err = extract_diff(
        &runner,
        &installation,
        CanonicalArch::X64,
        &options(scratch.path(), Env::new()),
    )
    .await
    .unwrap_err();

    match &err {
        ResolveError::ScriptFailed { code, output, .. } => {
            assert_eq!(*code, Some(1));
            assert_eq!(output, "[ERROR:vcvarsall.bat] Invalid argument found : bogus");
        }
        other => panic!("expected ScriptFailed, got {other:?}"),
    }

    let call = &runner.calls()[0];
    assert!(call.script.is_some());
    assert!(!call.last_arg_path().expect("script argument").exists());
    assert_eq!(std::fs::read_dir(scratch.path()).expect("read dir").count(), 0);
}

#[tokio::test]
async fn test_script_failed_prefers_stderr() {
    let (_vs, installation) = fake_installation();
    let scratch = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::new(|_| Ok(ProcessOutput::new(Some(2), "noise", "real problem\r\n")));

    let err = extract_diff(
        &runner,
        &installation,
        CanonicalArch::X64,
        &options(scratch.path(), Env::new()),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(&err, ResolveError::ScriptFailed { output, .. } if output == "real problem"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_timeout_is_script_failed() {
    let (_vs, installation) = fake_installation();
    let scratch = tempfile::tempdir().expect("tempdir");
    let runner = ScriptedRunner::failing(|| ProcessError::Timeout {
        command: "cmd.exe".to_string(),
        timeout_secs: 600,
    });

    let err = extract_diff(
        &runner,
        &installation,
        CanonicalArch::X64,
        &options(scratch.path(), Env::new()),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(err, ResolveError::ScriptFailed { code: None, .. }),
        "got {err:?}"
    );
    assert_eq!(std::fs::read_dir(scratch.path()).expect("read dir").count(), 0);
}

#[tokio::test]
async fn test_missing_script_spawns_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let installation = Installation::new(dir.path());
    let runner = ScriptedRunner::replying(0, "", "");

    let err = extract_diff(
        &runner,
        &installation,
        CanonicalArch::X64,
        &options(dir.path(), Env::new()),
    )
    .await
    .unwrap_err();

    assert!(
        matches!(&err, ResolveError::ScriptNotFound { path } if *path == installation.vcvarsall()),
        "got {err:?}"
    );
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_unwritable_script_dir_is_script_io() {
    let (_vs, installation) = fake_installation();
    let runner = ScriptedRunner::replying(0, "", "");
    let missing = installation.root().join("no-such-dir");

    let err = extract_diff(
        &runner,
        &installation,
        CanonicalArch::X64,
        &options(&missing, Env::new()),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ResolveError::ScriptIo { .. }), "got {err:?}");
    assert!(runner.calls().is_empty());
}
