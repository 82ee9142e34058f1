// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Skill document parsing and validation beyond the structural checks in
//! `warden_core::skill::Skill::validate_shape` (§4.9 Loading).

use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use warden_core::skill::{Skill, SkillShapeError};

use crate::template::referenced_paths;

#[derive(Debug, Error)]
pub enum SkillDocError {
    #[error("failed to parse skill document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error(transparent)]
    Shape(#[from] SkillShapeError),
    #[error("step {step:?} references unknown name {reference:?}")]
    UnknownReference { step: String, reference: String },
}

/// Parse a skill YAML document and run the structural + reference checks
/// that do not require knowledge of which tools are currently registered.
pub fn parse_skill_yaml(content: &str) -> Result<Skill, SkillDocError> {
    let skill: Skill = serde_yaml::from_str(content)?;
    skill.validate_shape()?;
    validate_references(&skill)?;
    Ok(skill)
}

/// Every template expression in a skill may reference only input names,
/// step outputs already assigned by an earlier step, or the unconstrained
/// `environment`/`config` namespaces.
fn validate_references(skill: &Skill) -> Result<(), SkillDocError> {
    let input_names: HashSet<&str> = skill.inputs.iter().map(|i| i.name.as_str()).collect();
    let mut assigned_outputs: HashSet<&str> = HashSet::new();

    for step in &skill.steps {
        let mut strings = Vec::new();
        for value in step.args.values() {
            collect_strings(value, &mut strings);
        }
        if let Some(condition) = &step.condition {
            strings.push(condition.as_str());
        }

        for text in strings {
            for path in referenced_paths(text) {
                check_reference(&step.name, path, &input_names, &assigned_outputs)?;
            }
        }

        if let Some(output) = &step.output {
            assigned_outputs.insert(output.as_str());
        }
    }
    Ok(())
}

fn check_reference<'a>(
    step_name: &str,
    path: &'a str,
    input_names: &HashSet<&str>,
    assigned_outputs: &HashSet<&str>,
) -> Result<(), SkillDocError> {
    let mut parts = path.splitn(3, '.');
    let namespace = parts.next().unwrap_or("");
    let first = parts.next();

    let known = match namespace {
        "environment" | "config" => true,
        "inputs" => first.is_some_and(|name| input_names.contains(name)),
        "outputs" => first.is_some_and(|name| assigned_outputs.contains(name)),
        _ => false,
    };

    if known {
        Ok(())
    } else {
        Err(SkillDocError::UnknownReference { step: step_name.to_string(), reference: path.to_string() })
    }
}

fn collect_strings<'a>(value: &'a Value, out: &mut Vec<&'a str>) {
    match value {
        Value::String(s) => out.push(s.as_str()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

/// A warning describing a skill step that names a tool not currently
/// registered anywhere known (§4.9 Loading: "a missing tool yields a
/// pre-flight warning listing the personas that would provide it").
#[derive(Debug, Clone, PartialEq)]
pub struct MissingToolWarning {
    pub step_name: String,
    pub tool: String,
    pub providing_personas: Vec<String>,
}

/// What the loader needs to know about the rest of the runtime to check
/// tool availability; implemented by `warden-daemon` over its live Tool
/// Registry and Persona Loader, kept as a trait here to avoid a dependency
/// cycle.
pub trait ToolKnowledge {
    /// True if the tool is live or present in the manifest.
    fn is_known(&self, tool: &str) -> bool;
    /// Personas whose module set would register this tool.
    fn personas_providing(&self, tool: &str) -> Vec<String>;
}

/// Pre-flight check: every step's `tool` is live or known in the manifest.
/// Unknown tools do not fail loading; they are surfaced as warnings.
pub fn check_tool_availability(skill: &Skill, knowledge: &dyn ToolKnowledge) -> Vec<MissingToolWarning> {
    skill
        .steps
        .iter()
        .filter(|step| !knowledge.is_known(&step.tool))
        .map(|step| MissingToolWarning {
            step_name: step.name.clone(),
            tool: step.tool.clone(),
            providing_personas: knowledge.personas_providing(&step.tool),
        })
        .collect()
}

#[cfg(test)]
#[path = "doc_tests.rs"]
mod tests;
