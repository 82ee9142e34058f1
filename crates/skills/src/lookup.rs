// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fixed-directory skill lookup (§4.9 Loading: "locate its YAML under a
//! fixed directory").

use std::path::{Path, PathBuf};
use thiserror::Error;
use warden_core::skill::Skill;

use crate::doc::{parse_skill_yaml, SkillDocError};

#[derive(Debug, Error)]
pub enum SkillLookupError {
    #[error("skill {0:?} not found")]
    NotFound(String),
    #[error("io error reading {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },
    #[error(transparent)]
    Doc(#[from] SkillDocError),
}

/// Load `<skills_dir>/<name>.yaml` (or `.yml`), parsing and validating it.
pub fn load_skill(skills_dir: &Path, name: &str) -> Result<Skill, SkillLookupError> {
    let path = find_skill_file(skills_dir, name).ok_or_else(|| SkillLookupError::NotFound(name.to_string()))?;
    let content = std::fs::read_to_string(&path).map_err(|source| SkillLookupError::Io { path, source })?;
    Ok(parse_skill_yaml(&content)?)
}

fn find_skill_file(skills_dir: &Path, name: &str) -> Option<PathBuf> {
    for ext in ["yaml", "yml"] {
        let candidate = skills_dir.join(format!("{name}.{ext}"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// List every skill name discoverable under `skills_dir`, sorted.
/// Files that fail to parse are skipped and logged rather than failing the
/// whole listing.
pub fn list_skill_names(skills_dir: &Path) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(skills_dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            let ext = path.extension()?.to_str()?;
            if ext != "yaml" && ext != "yml" {
                return None;
            }
            path.file_stem()?.to_str().map(|s| s.to_string())
        })
        .collect();
    names.sort();
    names.dedup();
    names
}

/// Load every parseable skill under `skills_dir`, skipping (and logging)
/// any file that fails validation rather than failing the whole scan.
pub fn load_all_skills(skills_dir: &Path) -> Vec<Skill> {
    list_skill_names(skills_dir)
        .into_iter()
        .filter_map(|name| match load_skill(skills_dir, &name) {
            Ok(skill) => Some(skill),
            Err(err) => {
                tracing::warn!(skill = %name, error = %err, "skipping invalid skill document");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "lookup_tests.rs"]
mod tests;
