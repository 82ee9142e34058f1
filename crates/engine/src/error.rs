// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;
use warden_skills::TemplateError;

use crate::validate::ValidationError;

/// Errors the executor can surface outside the normal step-failure path
/// (§4.9 execution step 4.d: "reject unresolved references").
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("step {step:?}: {source}")]
    Template { step: String, #[source] source: TemplateError },
}
