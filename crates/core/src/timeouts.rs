// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized timeout classes and output-truncation limits (C1).
//!
//! Pure data plus a `duration_of` helper for suffix-style duration strings
//! (`"30m"`, `"2h"`, `"1d"`, `"1w"`). No state, no failure modes.

use std::time::Duration;

/// A named timeout class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeoutClass {
    Instant,
    Quick,
    Short,
    Fast,
    Default,
    Lint,
    Build,
    Deploy,
    TestSuite,
    HttpRequest,
    ClusterLogin,
}

impl TimeoutClass {
    /// The duration this class resolves to.
    pub const fn duration(self) -> Duration {
        let secs = match self {
            Self::Instant => 2,
            Self::Quick => 5,
            Self::Short => 10,
            Self::Fast => 30,
            Self::Default => 60,
            Self::Lint => 300,
            Self::Build => 600,
            Self::Deploy => 900,
            Self::TestSuite => 1200,
            Self::HttpRequest => 30,
            Self::ClusterLogin => 120,
        };
        Duration::from_secs(secs)
    }
}

impl Default for TimeoutClass {
    fn default() -> Self {
        Self::Default
    }
}

/// A named output-truncation cap, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputCap {
    Short,
    Medium,
    Standard,
    Long,
    Full,
    Extended,
}

impl OutputCap {
    /// The character limit this cap resolves to.
    pub const fn chars(self) -> usize {
        match self {
            Self::Short => 1_000,
            Self::Medium => 2_000,
            Self::Standard => 5_000,
            Self::Long => 10_000,
            Self::Full => 15_000,
            Self::Extended => 20_000,
        }
    }
}

/// Error returned by [`duration_of`] when a string cannot be parsed.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
#[error("invalid duration string: {0:?}")]
pub struct DurationParseError(pub String);

/// Parse a suffix-style duration string (`30m`, `2h`, `1d`, `1w`) into minutes.
///
/// Supported suffixes: `m` (minutes), `h` (hours), `d` (days), `w` (weeks).
/// No suffix is rejected, since the unit would be ambiguous.
pub fn duration_of(s: &str) -> Result<u64, DurationParseError> {
    let s = s.trim();
    if s.len() < 2 {
        return Err(DurationParseError(s.to_string()));
    }
    let (digits, suffix) = s.split_at(s.len() - 1);
    let n: u64 = digits.parse().map_err(|_| DurationParseError(s.to_string()))?;
    let minutes = match suffix {
        "m" => n,
        "h" => n * 60,
        "d" => n * 60 * 24,
        "w" => n * 60 * 24 * 7,
        _ => return Err(DurationParseError(s.to_string())),
    };
    Ok(minutes)
}

#[cfg(test)]
#[path = "timeouts_tests.rs"]
mod tests;
