// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;

use crate::lifecycle::LifecycleError;

/// Resolve state directory: `WARDEN_STATE_DIR` > `XDG_STATE_HOME`/warden > `~/.local/state/warden`.
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("WARDEN_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("warden"));
    }
    dirs::home_dir().map(|home| home.join(".local/state/warden")).ok_or(LifecycleError::NoStateDir)
}

/// The external command the `credential_refresh` ops tool shells out to
/// (§6.5 "an external auth tool"). Absent a configured command, the
/// default adapter is never installed and the tool reports failure.
pub fn credential_command() -> Option<String> {
    std::env::var("WARDEN_CREDENTIAL_CMD").ok().filter(|s| !s.is_empty())
}

/// The external command the `link_up` ops tool shells out to (§6.5 "an
/// external network tool"), split on whitespace into program + args.
pub fn network_command() -> Option<(String, Vec<String>)> {
    let raw = std::env::var("WARDEN_NETWORK_CMD").ok().filter(|s| !s.is_empty())?;
    let mut parts = raw.split_whitespace().map(str::to_string);
    let program = parts.next()?;
    Some((program, parts.collect()))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
