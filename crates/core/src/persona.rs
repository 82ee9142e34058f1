// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persona data model (§3).
//!
//! A persona is a named set of modules plus free-form instruction text and a
//! default skill list. Loading a persona replaces the live tool set save for
//! the protected core (C7).

use serde::{Deserialize, Serialize};

/// A persona definition, as parsed from `<project>/personas/*.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
    pub modules: Vec<String>,
    #[serde(default)]
    pub prose: Option<String>,
    #[serde(default)]
    pub append: Option<String>,
    #[serde(default)]
    pub default_skills: Vec<String>,
}

impl Persona {
    /// The full instruction text: `prose`, followed by `append` if present.
    pub fn instruction_text(&self) -> String {
        match (&self.prose, &self.append) {
            (Some(prose), Some(append)) => format!("{prose}\n\n{append}"),
            (Some(prose), None) => prose.clone(),
            (None, Some(append)) => append.clone(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
#[path = "persona_tests.rs"]
mod tests;
