// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod config;
pub mod failure_log;
pub mod json_store;
pub mod state;
pub mod workspace_registry;

pub use config::{Config, ConfigStore};
pub use failure_log::{FailureLog, NewFailure};
pub use json_store::{JsonFileStore, StoreError};
pub use state::{State, StateStore};
pub use workspace_registry::WorkspaceRegistry;
