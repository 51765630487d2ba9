//! Skills taxonomy: the read-only catalog every extraction and scoring pass matches against.
//!
//! Loaded once at startup (built-in catalog or a JSON override) and shared as
//! `Arc<Taxonomy>`. Lookups for unknown names degrade to defaults instead of failing.

mod builtin;

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use builtin::BUILTIN_SKILLS;

/// Category reported for names the taxonomy does not know.
pub const UNKNOWN_CATEGORY: &str = "Other";

/// A single known skill with its alternate spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub category: String,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Taxonomy {
    skills: Vec<Skill>,
    /// lower-cased canonical name → position in `skills`
    index: HashMap<String, usize>,
}

impl Taxonomy {
    /// Builds a taxonomy, rejecting lists that break the catalog invariants:
    /// non-empty unique names, non-empty categories, at least one non-blank keyword.
    pub fn new(skills: Vec<Skill>) -> Result<Self> {
        let mut index = HashMap::with_capacity(skills.len());

        for (i, skill) in skills.iter().enumerate() {
            if skill.name.trim().is_empty() {
                bail!("Skill at position {i} has an empty name");
            }
            if skill.category.trim().is_empty() {
                bail!("Skill '{}' has an empty category", skill.name);
            }
            if skill.keywords.is_empty() {
                bail!("Skill '{}' has no keywords", skill.name);
            }
            if skill.keywords.iter().any(|k| k.trim().is_empty()) {
                bail!("Skill '{}' has a blank keyword", skill.name);
            }
            if index.insert(skill.name.to_lowercase(), i).is_some() {
                bail!("Duplicate skill name '{}'", skill.name);
            }
        }

        let taxonomy = Self { skills, index };
        if taxonomy.is_empty() {
            bail!("Skills taxonomy has no skills");
        }
        Ok(taxonomy)
    }

    /// The curated catalog compiled into the binary.
    pub fn builtin() -> Result<Self> {
        let skills = BUILTIN_SKILLS
            .iter()
            .map(|(name, category, keywords)| Skill {
                name: name.to_string(),
                category: category.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
                weight: None,
            })
            .collect();

        Self::new(skills).context("Built-in skills catalog is invalid")
    }

    /// Loads a JSON array of `Skill` records.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skills taxonomy '{}'", path.display()))?;
        let skills: Vec<Skill> = serde_json::from_str(&raw)
            .with_context(|| format!("Skills taxonomy '{}' is not valid JSON", path.display()))?;
        Self::new(skills)
            .with_context(|| format!("Skills taxonomy '{}' failed validation", path.display()))
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Case-insensitive lookup by canonical name.
    pub fn get(&self, name: &str) -> Option<&Skill> {
        self.index
            .get(&name.to_lowercase())
            .map(|&i| &self.skills[i])
    }

    pub fn category_of(&self, name: &str) -> &str {
        self.get(name)
            .map(|s| s.category.as_str())
            .unwrap_or(UNKNOWN_CATEGORY)
    }

    /// Canonical name followed by every keyword, lower-cased.
    /// Unknown names search for themselves only.
    pub fn search_terms(&self, name: &str) -> Vec<String> {
        match self.get(name) {
            Some(skill) => skill.search_terms(),
            None => vec![name.to_lowercase()],
        }
    }

    /// Distinct categories in catalog order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.skills
            .iter()
            .map(|s| s.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }
}

impl Skill {
    pub fn search_terms(&self) -> Vec<String> {
        std::iter::once(&self.name)
            .chain(self.keywords.iter())
            .map(|t| t.to_lowercase())
            .collect()
    }

    /// True when the canonical name or any keyword occurs in `text_lower`,
    /// which must already be lower-cased.
    pub fn occurs_in(&self, text_lower: &str) -> bool {
        self.search_terms().iter().any(|t| contains_term(text_lower, t))
    }
}

/// Case-sensitive literal match of `term` in `text` that is not glued to a letter or
/// digit on either side, so "rust" is found in "rust, go" but not in "trusted".
/// Callers lower-case both sides.
pub fn contains_term(text: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    text.match_indices(term).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + term.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
