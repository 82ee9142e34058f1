// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Session/Super-Prompt Builder (C10).
//!
//! A pure accumulator of named context sections. Sections that require I/O
//! to populate (e.g. fetching a Jira issue) are resolved by a caller behind
//! a capability interface defined in a higher crate; this builder only
//! concatenates already-resolved text in canonical order and estimates cost.

use indexmap::IndexMap;

/// The fixed canonical section ordering `build()` concatenates in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Persona,
    Skills,
    Memory,
    Jira,
    Slack,
    Code,
    Meeting,
    Custom,
}

crate::simple_display!(SectionKind {
    Persona => "persona",
    Skills => "skills",
    Memory => "memory",
    Jira => "jira",
    Slack => "slack",
    Code => "code",
    Meeting => "meeting",
    Custom => "custom",
});

/// Roughly 4 characters per token, the same heuristic the spec prescribes.
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

struct Section {
    kind: SectionKind,
    label: String,
    content: String,
}

/// Accumulates sections and assembles the final prompt plus a token budget
/// assessment.
pub struct SuperPromptBuilder {
    sections: Vec<Section>,
    budget_tokens: usize,
}

/// The assembled result of [`SuperPromptBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct SuperPrompt {
    pub text: String,
    pub per_section_tokens: IndexMap<String, usize>,
    pub total_tokens: usize,
    pub warning: bool,
    pub danger: bool,
}

impl SuperPromptBuilder {
    /// `budget_tokens` is the soft context budget this session is allowed;
    /// `warning` fires past 75% of it, `danger` past 90%.
    pub fn new(budget_tokens: usize) -> Self {
        Self { sections: Vec::new(), budget_tokens }
    }

    /// Add a named section. `label` distinguishes multiple custom sections
    /// of the same kind (e.g. two different meeting transcripts).
    pub fn add_section(&mut self, kind: SectionKind, label: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.sections.push(Section { kind, label: label.into(), content: content.into() });
        self
    }

    pub fn add_persona(&mut self, content: impl Into<String>) -> &mut Self {
        self.add_section(SectionKind::Persona, "persona", content)
    }

    pub fn add_skills(&mut self, content: impl Into<String>) -> &mut Self {
        self.add_section(SectionKind::Skills, "skills", content)
    }

    pub fn add_memory(&mut self, content: impl Into<String>) -> &mut Self {
        self.add_section(SectionKind::Memory, "memory", content)
    }

    /// Assemble the sections in canonical order and estimate token cost.
    pub fn build(&self) -> SuperPrompt {
        let mut ordered: Vec<&Section> = self.sections.iter().collect();
        ordered.sort_by_key(|s| s.kind);

        let mut text = String::new();
        let mut per_section_tokens = IndexMap::new();
        let mut total_tokens = 0usize;

        for section in ordered {
            if !text.is_empty() {
                text.push_str("\n\n");
            }
            text.push_str(&section.content);
            let tokens = estimate_tokens(&section.content);
            per_section_tokens.insert(section.label.clone(), tokens);
            total_tokens += tokens;
        }

        let warning = total_tokens >= self.budget_tokens * 3 / 4;
        let danger = total_tokens >= self.budget_tokens * 9 / 10;

        SuperPrompt { text, per_section_tokens, total_tokens, warning, danger }
    }
}

#[cfg(test)]
#[path = "super_prompt_tests.rs"]
mod tests;
