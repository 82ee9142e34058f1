// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input validation and default/scalar coercion (§4.9 execution step 2).

use indexmap::IndexMap;
use serde_json::Value;
use thiserror::Error;
use warden_core::skill::{InputType, Skill};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("missing required input: {0:?}")]
    MissingRequired(String),
    #[error("input {name:?} expected type {expected:?}, got {got}")]
    TypeMismatch { name: String, expected: InputType, got: &'static str },
}

/// Check that every `required` input is present and of the declared type,
/// fill declared defaults for absent optional inputs, and coerce simple
/// scalars (string → int/bool, etc.) to their declared type.
pub fn validate_inputs(
    skill: &Skill,
    raw: &IndexMap<String, Value>,
) -> Result<IndexMap<String, Value>, ValidationError> {
    let mut resolved = IndexMap::new();
    for input in &skill.inputs {
        match raw.get(&input.name) {
            Some(value) => {
                let coerced = coerce(&input.name, value, input.type_)?;
                resolved.insert(input.name.clone(), coerced);
            }
            None => {
                if let Some(default) = &input.default {
                    resolved.insert(input.name.clone(), default.clone());
                } else if input.required {
                    return Err(ValidationError::MissingRequired(input.name.clone()));
                }
            }
        }
    }
    Ok(resolved)
}

fn coerce(name: &str, value: &Value, expected: InputType) -> Result<Value, ValidationError> {
    let mismatch = |got| ValidationError::TypeMismatch { name: name.to_string(), expected, got };

    match (expected, value) {
        (InputType::String, Value::String(_)) => Ok(value.clone()),
        (InputType::String, Value::Number(n)) => Ok(Value::String(n.to_string())),
        (InputType::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),

        (InputType::Int, Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(value.clone()),
        (InputType::Int, Value::String(s)) => {
            s.parse::<i64>().map(Value::from).map_err(|_| mismatch("non-numeric string"))
        }

        (InputType::Bool, Value::Bool(_)) => Ok(value.clone()),
        (InputType::Bool, Value::String(s)) => {
            s.parse::<bool>().map(Value::Bool).map_err(|_| mismatch("non-boolean string"))
        }

        (InputType::List, Value::Array(_)) => Ok(value.clone()),
        (InputType::Map, Value::Object(_)) => Ok(value.clone()),

        (_, other) => Err(mismatch(type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
