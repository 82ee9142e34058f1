// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Wire-level message envelopes for the Event Bus (§6.2) and the
//! length-prefixed framing helper shared with the stdio host-protocol
//! adapter.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

mod envelope;
mod framing;

pub use envelope::{Event, Hello, InboundMessage};
pub use framing::{decode, encode, read_message, write_message, ProtocolError};
