// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill loading, validation, and the restricted template expression
//! language (C9 loading + templating, §4.9).
//!
//! Execution of a loaded [`warden_core::skill::Skill`] lives in
//! `warden-engine`, which depends on this crate for the same document shape
//! and templating grammar rather than redefining either.

#![cfg_attr(test, allow(clippy::panic, clippy::unwrap_used, clippy::expect_used))]

pub mod doc;
pub mod lookup;
pub mod template;

pub use doc::{parse_skill_yaml, MissingToolWarning, SkillDocError, ToolKnowledge};
pub use lookup::{list_skill_names, load_all_skills, load_skill, SkillLookupError};
pub use template::{
    eval_condition, referenced_paths, render, resolve_value, resolve_value_tree, Context, Namespace,
    TemplateError,
};
