// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use super::*;
use crate::core::env::container::Env;
use crate::sink::MemorySink;
use std::collections::BTreeMap;

fn diff(set: &[(&str, &str)], prepended: &[(&str, &[&str])]) -> EnvironmentDiff {
    EnvironmentDiff {
        set: set
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
        prepended: prepended
            .iter()
            .map(|(k, segs)| {
                (
                    (*k).to_string(),
                    segs.iter().map(ToString::to_string).collect(),
                )
            })
            .collect::<BTreeMap<_, _>>(),
    }
}

#[test]
fn test_apply_scalars_overwrite() {
    let mut sink = MemorySink::new([("CC", "cl")].into_iter().collect());
    apply(&diff(&[("CC", "clang-cl")], &[]), &mut sink).unwrap();
    assert_eq!(sink.current("CC").as_deref(), Some("clang-cl"));
}

#[test]
fn test_apply_end_to_end_scenario() {
    let mut sink = MemorySink::new([("PATH", r"C:\A")].into_iter().collect());
    let d = diff(&[("LIB", r"C:\libs")], &[("PATH", &[r"C:\B"])]);

    apply(&d, &mut sink).unwrap();

    let expected: Env = [("PATH", r"C:\B;C:\A"), ("LIB", r"C:\libs")]
        .into_iter()
        .collect();
    assert_eq!(sink.env(), &expected);
}

#[test]
fn test_apply_is_idempotent() {
    let mut sink = MemorySink::new([("PATH", r"C:\Windows")].into_iter().collect());
    let d = diff(
        &[("VSINSTALLDIR", r"C:\VS\")],
        &[
            ("PATH", &[r"C:\VS\bin", r"C:\VS\tools"]),
            ("INCLUDE", &[r"C:\VS\include"]),
        ],
    );

    apply(&d, &mut sink).unwrap();
    let once = sink.env().clone();
    apply(&d, &mut sink).unwrap();

    assert_eq!(sink.env(), &once);
    assert_eq!(
        once.get("PATH"),
        Some(r"C:\VS\bin;C:\VS\tools;C:\Windows")
    );
}

#[test]
fn test_apply_skips_present_segments_case_insensitively() {
    let mut sink = MemorySink::new([("PATH", r"c:\vs\BIN\;C:\Windows")].into_iter().collect());
    let d = diff(&[], &[("PATH", &[r"C:\VS\bin", r"C:\New", r"c:\new\"])]);

    apply(&d, &mut sink).unwrap();

    assert_eq!(
        sink.current("PATH").as_deref(),
        Some(r"C:\New;c:\vs\BIN\;C:\Windows")
    );
}

#[test]
fn test_apply_prepend_to_unset_variable() {
    let mut sink = MemorySink::default();
    apply(&diff(&[], &[("LIBPATH", &[r"C:\a", r"C:\b"])]), &mut sink).unwrap();
    assert_eq!(sink.current("LIBPATH").as_deref(), Some(r"C:\a;C:\b"));
}

#[test]
fn test_apply_stops_at_first_sink_error() {
    let mut sink = MemorySink::default();
    let err = apply(&diff(&[("BAD NAME", "x")], &[("PATH", &["C:\\a"])]), &mut sink).unwrap_err();

    assert!(matches!(err, crate::error::SinkError::InvalidName(_)));
    assert!(sink.env().is_empty());
}
