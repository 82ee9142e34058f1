// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn estimate_tokens_uses_four_chars_per_token_heuristic() {
    assert_eq!(estimate_tokens(""), 0);
    assert_eq!(estimate_tokens("abcd"), 1);
    assert_eq!(estimate_tokens("abcde"), 2);
}

#[test]
fn build_concatenates_sections_in_canonical_order_regardless_of_insertion_order() {
    let mut builder = SuperPromptBuilder::new(10_000);
    builder.add_memory("memory section");
    builder.add_persona("persona section");
    builder.add_skills("skills section");

    let prompt = builder.build();
    assert_eq!(prompt.text, "persona section\n\nskills section\n\nmemory section");
}

#[test]
fn per_section_tokens_are_keyed_by_label() {
    let mut builder = SuperPromptBuilder::new(10_000);
    builder.add_section(SectionKind::Jira, "jira:AAP-1", "issue body");
    let prompt = builder.build();
    assert_eq!(prompt.per_section_tokens.get("jira:AAP-1"), Some(&3));
}

#[test]
fn warning_and_danger_flags_key_off_budget_thresholds() {
    let mut builder = SuperPromptBuilder::new(40);
    // 30 chars => ceil(30/4) = 8 tokens, below 75% of 40 (30 tokens).
    builder.add_persona("x".repeat(30));
    let under = builder.build();
    assert!(!under.warning);
    assert!(!under.danger);

    let mut heavy = SuperPromptBuilder::new(40);
    heavy.add_persona("x".repeat(160)); // 40 tokens, at 100% of budget
    let over = heavy.build();
    assert!(over.warning);
    assert!(over.danger);
}

#[test]
fn build_with_no_sections_yields_empty_prompt() {
    let builder = SuperPromptBuilder::new(1_000);
    let prompt = builder.build();
    assert_eq!(prompt.text, "");
    assert_eq!(prompt.total_tokens, 0);
    assert!(!prompt.warning);
}
