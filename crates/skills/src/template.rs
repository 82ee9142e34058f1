// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The restricted template expression grammar (§4.9): dotted-path reads over
//! a fixed context, a small set of pure filters, and boolean comparisons for
//! step conditions. No arbitrary code execution, no I/O.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;

/// Matches `${path.to.value}` and `${path.to.value|filter}` placeholders.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{\s*([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_][a-zA-Z0-9_]*)*)\s*((?:\|\s*[a-zA-Z_]+\s*)*)\}")
        .expect("constant regex pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("unresolved template reference: {0:?}")]
    UnresolvedReference(String),
    #[error("unknown filter: {0:?}")]
    UnknownFilter(String),
}

/// The four namespaces a template expression may dereference into.
#[derive(Debug, Clone, Copy)]
pub enum Namespace {
    Inputs,
    Outputs,
    Environment,
    Config,
}

/// A read-only view over the four namespaces a template may reference.
pub struct Context<'a> {
    pub inputs: &'a serde_json::Map<String, Value>,
    pub outputs: &'a serde_json::Map<String, Value>,
    pub environment: &'a serde_json::Map<String, Value>,
    pub config: &'a serde_json::Map<String, Value>,
}

impl<'a> Context<'a> {
    /// Resolve a dotted path like `inputs.foo` or `outputs.step_name.field`.
    pub fn resolve(&self, path: &str) -> Option<Value> {
        let mut parts = path.split('.');
        let namespace = parts.next()?;
        let root = match namespace {
            "inputs" => self.inputs,
            "outputs" => self.outputs,
            "environment" => self.environment,
            "config" => self.config,
            _ => return None,
        };
        let mut current = Value::Object(root.clone());
        for part in parts {
            current = current.get(part)?.clone();
        }
        Some(current)
    }
}

/// Every namespace-qualified name a raw expression string references,
/// without needing a context to resolve them — used by shape validation to
/// reject templates naming a not-yet-assigned step output.
#[allow(clippy::expect_used)]
pub fn referenced_paths(expr: &str) -> Vec<&str> {
    PLACEHOLDER.captures_iter(expr).map(|caps| caps.get(1).expect("group 1 always matches").as_str()).collect()
}

fn apply_filter(value: Value, filter: &str) -> Result<Value, TemplateError> {
    match filter {
        "default" => Ok(value),
        "json" => Ok(Value::String(serde_json::to_string(&value).unwrap_or_default())),
        "upper" => Ok(Value::String(as_text(&value).to_uppercase())),
        "lower" => Ok(Value::String(as_text(&value).to_lowercase())),
        "slugify" => Ok(Value::String(slugify(&as_text(&value)))),
        other => Err(TemplateError::UnknownFilter(other.to_string())),
    }
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_was_dash = false;
    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && !out.is_empty() {
            out.push('-');
            last_was_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

/// Substitute every `${...}` placeholder in `template` against `ctx`,
/// applying any trailing `|filter` chain. Unless `expr|default(value)` style
/// defaulting is present, an unresolved reference is an error — callers must
/// have already checked the template only names known paths (§4.9 step 4.d).
#[allow(clippy::expect_used)]
pub fn render(template: &str, ctx: &Context<'_>, defaults: &[(&str, &str)]) -> Result<String, TemplateError> {
    let mut err = None;
    let result = PLACEHOLDER
        .replace_all(template, |caps: &regex::Captures| {
            let path = caps.get(1).expect("group 1 always matches").as_str();
            let filters = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let resolved = ctx.resolve(path).or_else(|| {
                defaults.iter().find(|(p, _)| *p == path).map(|(_, d)| Value::String((*d).to_string()))
            });
            let Some(mut value) = resolved else {
                err = Some(TemplateError::UnresolvedReference(path.to_string()));
                return String::new();
            };
            for filter in filters.split('|').map(str::trim).filter(|f| !f.is_empty()) {
                match apply_filter(value, filter) {
                    Ok(v) => value = v,
                    Err(e) => {
                        err = Some(e);
                        return String::new();
                    }
                }
            }
            as_text(&value)
        })
        .to_string();

    match err {
        Some(e) => Err(e),
        None => Ok(result),
    }
}

/// Resolve one template string against `ctx`, preserving JSON type when the
/// whole (trimmed) string is a single placeholder — e.g. an arg template of
/// `"${inputs.count}"` yields the underlying number rather than its string
/// form. Mixed content (`"issue/${inputs.issue_key}"`) always renders to a
/// string, same as [`render`].
#[allow(clippy::expect_used)]
pub fn resolve_value(template: &str, ctx: &Context<'_>, defaults: &[(&str, &str)]) -> Result<Value, TemplateError> {
    let trimmed = template.trim();
    if let Some(caps) = PLACEHOLDER.captures(trimmed) {
        if caps.get(0).map(|m| m.as_str()) == Some(trimmed) {
            let path = caps.get(1).expect("group 1 always matches").as_str();
            let filters = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            let resolved = ctx.resolve(path).or_else(|| {
                defaults.iter().find(|(p, _)| *p == path).map(|(_, d)| Value::String((*d).to_string()))
            });
            let Some(mut value) = resolved else {
                return Err(TemplateError::UnresolvedReference(path.to_string()));
            };
            for filter in filters.split('|').map(str::trim).filter(|f| !f.is_empty()) {
                value = apply_filter(value, filter)?;
            }
            return Ok(value);
        }
    }
    render(template, ctx, defaults).map(Value::String)
}

/// Recursively resolve every string leaf of a JSON value tree (a step's
/// `args` map may nest templated strings inside arrays/objects).
pub fn resolve_value_tree(value: &Value, ctx: &Context<'_>, defaults: &[(&str, &str)]) -> Result<Value, TemplateError> {
    match value {
        Value::String(s) => resolve_value(s, ctx, defaults),
        Value::Array(items) => {
            let resolved: Result<Vec<Value>, TemplateError> =
                items.iter().map(|v| resolve_value_tree(v, ctx, defaults)).collect();
            Ok(Value::Array(resolved?))
        }
        Value::Object(map) => {
            let mut out = serde_json::Map::new();
            for (k, v) in map {
                out.insert(k.clone(), resolve_value_tree(v, ctx, defaults)?);
            }
            Ok(Value::Object(out))
        }
        other => Ok(other.clone()),
    }
}

/// Evaluate a `condition` expression as a boolean.
///
/// Supports a bare placeholder (`${outputs.check.ok}`, truthy per JSON
/// truthiness) and simple `left OP right` comparisons where `left`/`right`
/// are each either a placeholder or a literal, and `OP` is one of
/// `==`, `!=`, `<`, `<=`, `>`, `>=`.
pub fn eval_condition(expr: &str, ctx: &Context<'_>) -> Result<bool, TemplateError> {
    let expr = expr.trim();
    for op in ["==", "!=", "<=", ">=", "<", ">"] {
        if let Some((lhs, rhs)) = expr.split_once(op) {
            let left = eval_operand(lhs.trim(), ctx)?;
            let right = eval_operand(rhs.trim(), ctx)?;
            return Ok(compare(&left, &right, op));
        }
    }
    let value = eval_operand(expr, ctx)?;
    Ok(truthy(&value))
}

#[allow(clippy::expect_used)]
fn eval_operand(token: &str, ctx: &Context<'_>) -> Result<Value, TemplateError> {
    if let Some(caps) = PLACEHOLDER.captures(token) {
        if caps.get(0).map(|m| m.as_str()) == Some(token) {
            let path = caps.get(1).expect("group 1 always matches").as_str();
            return ctx.resolve(path).ok_or_else(|| TemplateError::UnresolvedReference(path.to_string()));
        }
    }
    Ok(literal(token))
}

fn literal(token: &str) -> Value {
    let unquoted = token.trim_matches('"').trim_matches('\'');
    if let Ok(n) = unquoted.parse::<i64>() {
        return Value::from(n);
    }
    if let Ok(b) = unquoted.parse::<bool>() {
        return Value::Bool(b);
    }
    Value::String(unquoted.to_string())
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn compare(left: &Value, right: &Value, op: &str) -> bool {
    let ordering = match (left.as_f64(), right.as_f64()) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => as_text(left).partial_cmp(&as_text(right)),
    };
    match op {
        "==" => left == right || as_text(left) == as_text(right),
        "!=" => !(left == right || as_text(left) == as_text(right)),
        "<" => ordering == Some(std::cmp::Ordering::Less),
        "<=" => matches!(ordering, Some(std::cmp::Ordering::Less | std::cmp::Ordering::Equal)),
        ">" => ordering == Some(std::cmp::Ordering::Greater),
        ">=" => matches!(ordering, Some(std::cmp::Ordering::Greater | std::cmp::Ordering::Equal)),
        _ => false,
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
