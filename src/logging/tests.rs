// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::{LogConfig, LogLevel};

#[test]
fn test_log_level_bounds() {
    assert!(LogLevel::new(0).is_ok());
    assert!(LogLevel::new(6).is_ok());
    let err = LogLevel::new(7).unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"invalid value for 'level' in section '[logging]': log level must be 0-6, got 7");

    assert_eq!(LogLevel::from_u8(4), Some(LogLevel::DEBUG));
    assert_eq!(LogLevel::from_u8(9), None);
    assert_eq!(LogLevel::try_from(2u8).map(|l| l.as_u8()).ok(), Some(2));
}

#[test]
fn test_filter_strings() {
    let filters: Vec<String> = (0..=6)
        .filter_map(LogLevel::from_u8)
        .map(|level| format!("{}={}", level.as_u8(), level.to_filter_string()))
        .collect();

    insta::assert_snapshot!(filters.join("\n"), @r"
    0=off
    1=error
    2=warn
    3=info
    4=debug
    5=info,vsenv_rs=trace,vsenv=trace
    6=trace
    ");
}

#[test]
fn test_log_level_serde() {
    let level: LogLevel = serde_json::from_str("5").unwrap();
    assert_eq!(level, LogLevel::TRACE);
    assert_eq!(serde_json::to_string(&LogLevel::WARN).unwrap(), "2");
    assert!(serde_json::from_str::<LogLevel>("12").is_err());
}

#[test]
fn test_log_config_defaults() {
    let config = LogConfig::default();
    assert_eq!(config.console_level(), LogLevel::INFO);
    assert_eq!(config.file_level(), LogLevel::TRACE);
    assert_eq!(config.log_file(), None);
    assert!(!config.show_target());

    let config = LogConfig::builder()
        .with_console_level(LogLevel::WARN)
        .maybe_with_log_file(Some("out/vsenv.log".to_string()))
        .build();
    assert_eq!(config.log_file(), Some("out/vsenv.log"));
    assert_eq!(config.console_level(), LogLevel::WARN);
}
