// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use crate::cli::resolve::VersionArgs;
use crate::core::arch::CanonicalArch;
use crate::core::env::diff::EnvironmentDiff;
use crate::core::process::test_utils::ScriptedRunner;
use crate::core::vs::Installation;
use crate::postprocess::Adjustments;

#[test]
fn test_default_sink() {
    assert_eq!(default_sink(true), SinkKind::Github);
    assert_eq!(default_sink(false), SinkKind::Shell);
}

#[test]
fn test_changed_variables() {
    let mut before = Env::new();
    before.set("PATH", r"C:\Windows");
    before.set("TEMP", r"C:\Temp");

    let mut after = before.clone();
    after.set("PATH", r"C:\VS\bin;C:\Windows");
    after.set("VCINSTALLDIR", r"C:\VS\VC\");

    assert_eq!(
        changed_variables(&before, &after),
        [r"PATH=C:\VS\bin;C:\Windows", r"VCINSTALLDIR=C:\VS\VC\"]
    );
}

#[test]
fn test_diff_report() {
    let mut diff = EnvironmentDiff::default();
    diff.set.insert("LIB".to_string(), r"C:\libs".to_string());
    diff.prepended
        .insert("PATH".to_string(), vec![r"C:\B".to_string()]);

    let resolution = Resolution {
        installation: Installation::new(r"C:\VS"),
        arch: CanonicalArch::X64Arm64,
        diff,
        adjustments: Adjustments {
            toolset: Some("14.38.33130".to_string()),
            path_front: vec![r"C:\VS\bin".to_string()],
            lib_back: Vec::new(),
            variables: vec![("CC".to_string(), "clang-cl".to_string())],
        },
    };

    insta::assert_snapshot!(serde_json::to_string_pretty(&diff_report(&resolution)).unwrap(), @r#"
    {
      "arch": "x64_arm64",
      "installation": "C:\\VS",
      "prepended": {
        "PATH": [
          "C:\\B"
        ]
      },
      "set": {
        "LIB": "C:\\libs"
      },
      "toolchain": {
        "lib_back": [],
        "path_front": [
          "C:\\VS\\bin"
        ],
        "toolset": "14.38.33130",
        "variables": {
          "CC": "clang-cl"
        }
      }
    }
    "#);
}

#[test]
fn test_format_installations() {
    let installations: Vec<VsInstallation> = serde_json::from_str(
        r#"[
            {"instanceId": "a", "installationPath": "C:\\VS\\2022", "installationVersion": "17.14.36915.13", "displayName": "Visual Studio Enterprise 2022"},
            {"instanceId": "b", "installationPath": "C:\\VS\\2019", "installationVersion": "16.11.5.0", "displayName": "Build Tools 2019"}
        ]"#,
    )
    .unwrap();

    insta::assert_snapshot!(format_installations(&installations).join("\n"), @r"
    17.14.36915.13  Visual Studio Enterprise 2022  C:\VS\2022
    16.11.5.0       Build Tools 2019               C:\VS\2019
    ");
}

#[tokio::test]
async fn test_locate_command_uses_configured_vswhere() {
    let dir = tempfile::tempdir().unwrap();
    let vswhere = dir.path().join("vswhere.exe");
    std::fs::write(&vswhere, "").unwrap();

    let mut config = VsenvConfig::default();
    config.locator.vswhere = Some(vswhere.clone());
    config.locator.version = Some("[17.0,18.0)".to_string());

    let runner = ScriptedRunner::replying(0, "C:\\VS\r\n", "");
    let args = LocateArgs {
        version: VersionArgs::default(),
        all: false,
    };

    run_locate_command(&runner, &args, &config).await.unwrap();

    let calls = runner.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, vswhere);
    assert!(calls[0].args.contains(&"[17.0,18.0)".to_string()));
}

#[tokio::test]
async fn test_diff_command_rejects_unknown_arch() {
    let runner = ScriptedRunner::replying(0, "", "");
    let args = DiffArgs {
        arch: "sparc".to_string(),
        version: VersionArgs::default(),
    };

    let err = run_diff_command(&runner, &args, &VsenvConfig::default())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "unsupported architecture: 'sparc'");
    assert!(runner.calls().is_empty());
}
