// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill execution state machine (C9 execution, §4.9): the part of the
//! Skill Engine that actually runs a loaded, validated
//! [`warden_core::skill::Skill`] step by step. Loading/parsing/templating
//! lives in `warden-skills`; this crate only adds the runtime loop and the
//! capability traits (tool invocation, event fan-out, confirmations,
//! auto-heal delegation) it needs from the rest of the daemon.

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod error;
pub mod executor;
pub mod traits;
pub mod validate;

pub use error::EngineError;
pub use executor::{EngineOutcome, Executor, RuntimeContext};
pub use traits::{AutoHealer, ConfirmationSource, EventSink, ToolInvoker};
pub use validate::{validate_inputs, ValidationError};
