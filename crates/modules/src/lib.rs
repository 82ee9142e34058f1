// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability provider traits, default implementations, and the tool
//! modules that ground the registration contract (§6.5) against a real
//! [`warden_core::registry::ToolRegistry`]: the memory-backed slice of the
//! protected core, the `credential_refresh`/`link_up` ops tools, and a
//! three-tier `git` module demonstrating the bare/`_basic`/`_extra`
//! suffix-resolution rule (§3 Module).

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod capability;
pub mod defaults;
pub mod git_basic;
pub mod git_core;
pub mod git_extra;
pub mod ops;
pub mod protected;

#[cfg(any(test, feature = "test-support"))]
pub mod fakes;

pub use capability::{CredentialAdapter, MemoryAdapter, NetworkAdapter};
pub use defaults::{CommandCredentialAdapter, CommandNetworkAdapter};
pub use ops::register_ops_tools;
pub use protected::register_memory_tools;

#[cfg(any(test, feature = "test-support"))]
pub use fakes::{FakeCredentialAdapter, FakeMemoryAdapter, FakeNetworkAdapter, MemoryCall};
