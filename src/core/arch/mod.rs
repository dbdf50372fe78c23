// vsenv-rs: Visual Studio toolchain environment resolver
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Architecture token normalization.
//!
//! ```text
//! "amd64" / "Win64" / "x64"       --> X64       (vcvarsall x64)
//! "Win32" / "x86"                 --> X86       (vcvarsall x86)
//! "arm64"                         --> Arm64     (vcvarsall arm64)
//! "x64_arm64" / "amd64_arm64"     --> X64Arm64  (vcvarsall x64_arm64)
//! "x64_x86" / "amd64_x86"         --> X64X86    (vcvarsall x64_x86)
//! anything else                   --> UnsupportedArchitecture
//! ```
//!
//! The table is exact and case-sensitive; nothing is inferred.

use crate::error::{ResolveError, ResolveResult};

/// User-facing tokens and the canonical architecture they map to.
pub const ARCH_TABLE: &[(&str, CanonicalArch)] = &[
    ("x64", CanonicalArch::X64),
    ("arm64", CanonicalArch::Arm64),
    ("x86", CanonicalArch::X86),
    ("x64_arm64", CanonicalArch::X64Arm64),
    ("x64_x86", CanonicalArch::X64X86),
    ("amd64", CanonicalArch::X64),
    ("amd64_arm64", CanonicalArch::X64Arm64),
    ("amd64_x86", CanonicalArch::X64X86),
    ("Win32", CanonicalArch::X86),
    ("Win64", CanonicalArch::X64),
];

/// Architecture (or host_target pair) understood by `vcvarsall.bat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalArch {
    /// 64-bit x86-64, native
    X64,
    /// 32-bit x86
    X86,
    /// ARM64, native
    Arm64,
    /// ARM64 cross-compiled on an x64 host
    X64Arm64,
    /// x86 cross-compiled on an x64 host
    X64X86,
}

impl CanonicalArch {
    /// Returns the positional argument passed to `vcvarsall.bat`.
    #[must_use]
    pub const fn vcvars_arg(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 => "x86",
            Self::Arm64 => "arm64",
            Self::X64Arm64 => "x64_arm64",
            Self::X64X86 => "x64_x86",
        }
    }

    /// Host half, as used in `bin\Host<host>`.
    ///
    /// Plain x86 builds run the x64-hosted compiler, which is what the
    /// hosted CI agents provide.
    #[must_use]
    pub const fn host(&self) -> &'static str {
        match self {
            Self::Arm64 => "arm64",
            Self::X64 | Self::X86 | Self::X64Arm64 | Self::X64X86 => "x64",
        }
    }

    /// Target half, as used in `bin\Host<host>\<target>` and `lib\<target>`.
    #[must_use]
    pub const fn target(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::X86 | Self::X64X86 => "x86",
            Self::Arm64 | Self::X64Arm64 => "arm64",
        }
    }
}

impl std::fmt::Display for CanonicalArch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.vcvars_arg())
    }
}

impl std::str::FromStr for CanonicalArch {
    type Err = ResolveError;

    fn from_str(s: &str) -> ResolveResult<Self> {
        normalize(s)
    }
}

/// Maps a user-facing architecture token to its canonical form.
///
/// # Errors
///
/// Returns [`ResolveError::UnsupportedArchitecture`] naming the token when it
/// is empty or not in [`ARCH_TABLE`].
pub fn normalize(token: &str) -> ResolveResult<CanonicalArch> {
    ARCH_TABLE
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, arch)| *arch)
        .ok_or_else(|| ResolveError::UnsupportedArchitecture {
            token: token.to_string(),
        })
}
