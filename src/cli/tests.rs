// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::cli::resolve::SinkKind;
use crate::cli::{Cli, Command};
use crate::config::types::LoggingConfig;
use crate::logging::LogLevel;
use crate::postprocess::Toolchain;
use crate::sink::ShellSyntax;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_parse_version() {
    let cli = Cli::try_parse_from(["vsenv", "version"]).unwrap();
    assert!(matches!(cli.command, Some(Command::Version)));
}

#[test]
fn test_parse_global_options() {
    let cli = Cli::try_parse_from([
        "vsenv",
        "-l",
        "5",
        "--config",
        "a.toml",
        "-c",
        "b.toml",
        "--log-file",
        "vsenv.log",
        "archs",
    ])
    .unwrap();

    assert_eq!(cli.global.log_level, Some(5));
    assert_eq!(
        cli.global.configs,
        [PathBuf::from("a.toml"), PathBuf::from("b.toml")]
    );
    assert_eq!(cli.global.log_file, Some(PathBuf::from("vsenv.log")));
    assert!(matches!(cli.command, Some(Command::Archs)));
}

#[test]
fn test_log_level_out_of_range() {
    assert!(Cli::try_parse_from(["vsenv", "-l", "7", "version"]).is_err());
}

#[test]
fn test_parse_apply() {
    let cli = Cli::try_parse_from([
        "vsenv",
        "apply",
        "--arch",
        "amd64_arm64",
        "--vs-version",
        "[17.0,18.0)",
        "--toolchain",
        "clang-cl",
        "--sink",
        "shell",
        "--shell",
        "sh",
    ])
    .unwrap();

    let Some(Command::Apply(args)) = cli.command else {
        panic!("expected apply command");
    };
    assert_eq!(args.arch, "amd64_arm64");
    assert_eq!(args.version.vs_version.as_deref(), Some("[17.0,18.0)"));
    assert_eq!(args.toolchain, Some(Toolchain::ClangCl));
    assert_eq!(args.sink, Some(SinkKind::Shell));
    assert_eq!(args.shell, ShellSyntax::Sh);
}

#[test]
fn test_parse_apply_rejects_unknown_toolchain() {
    assert!(Cli::try_parse_from(["vsenv", "apply", "--arch", "x64", "--toolchain", "gcc"]).is_err());
}

#[test]
fn test_parse_locate_all() {
    let cli = Cli::try_parse_from(["vsenv", "locate", "--all"]).unwrap();
    let Some(Command::Locate(args)) = cli.command else {
        panic!("expected locate command");
    };
    assert!(args.all);
}

#[test]
fn test_log_config_prefers_flags() {
    let logging = LoggingConfig {
        level: LogLevel::WARN,
        file_level: LogLevel::DEBUG,
        file: Some(PathBuf::from("from-config.log")),
    };

    let cli = Cli::try_parse_from(["vsenv", "-l", "1", "version"]).unwrap();
    let config = cli.global.log_config(&logging);
    assert_eq!(config.console_level(), LogLevel::ERROR);
    assert_eq!(config.file_level(), LogLevel::ERROR);
    assert_eq!(config.log_file(), Some("from-config.log"));

    let cli = Cli::try_parse_from(["vsenv", "version"]).unwrap();
    let config = cli.global.log_config(&logging);
    assert_eq!(config.console_level(), LogLevel::WARN);
    assert_eq!(config.file_level(), LogLevel::DEBUG);
}
