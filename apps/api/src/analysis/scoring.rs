//! Fit scoring: compares a parsed résumé against a parsed JD.
//!
//! Four sub-scores (0–100): required skills, preferred skills, experience relevance and
//! education relevance, combined into one overall score by `ScoringWeights`.
//! Pure and deterministic: the same inputs always give the same `ScoreResult`.

use anyhow::{bail, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::extraction::jd::ParsedJD;
use crate::extraction::resume::ParsedResume;
use crate::taxonomy::{contains_term, Taxonomy};

static YEARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\+?\s*(?:years?|yrs?)").unwrap());

/// Fields of study that earn an education bonus when both documents mention them.
const STUDY_FIELDS: &[&str] = &[
    "computer science",
    "software",
    "engineering",
    "information technology",
    "it",
    "data science",
    "mathematics",
    "statistics",
    "business",
];

const NEUTRAL_EDUCATION_SCORE: u32 = 50;
const FIELD_OF_STUDY_BONUS: u32 = 10;
const NO_JD_KEYWORDS_POINTS: f64 = 25.0;
const KEYWORD_OVERLAP_POINTS: f64 = 50.0;

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub required_skills_weight: f64,
    pub preferred_skills_weight: f64,
    pub experience_weight: f64,
    pub education_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            required_skills_weight: 0.5,
            preferred_skills_weight: 0.2,
            experience_weight: 0.2,
            education_weight: 0.1,
        }
    }
}

impl ScoringWeights {
    /// Rejects negative or non-finite weights. Weights need not sum to 1.
    pub fn validate(&self) -> Result<()> {
        for (label, value) in [
            ("required_skills_weight", self.required_skills_weight),
            ("preferred_skills_weight", self.preferred_skills_weight),
            ("experience_weight", self.experience_weight),
            ("education_weight", self.education_weight),
        ] {
            if !value.is_finite() || value < 0.0 {
                bail!("{label} must be a non-negative number, got {value}");
            }
        }
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.required_skills_weight
            + self.preferred_skills_weight
            + self.experience_weight
            + self.education_weight
    }

    /// Warns when the weights do not sum to 1.0. Returns whether they do.
    pub fn warn_if_unnormalized(&self) -> bool {
        let sum = self.sum();
        let normalized = (sum - 1.0).abs() <= 1e-6;
        if !normalized {
            warn!(sum, "Scoring weights do not sum to 1.0; overall scores are still capped at 100");
        }
        normalized
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Output data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub required_skills_score: u32,
    pub preferred_skills_score: u32,
    pub experience_score: u32,
    pub education_score: u32,
    pub overall_score: u32,
    pub matched_required_skills: Vec<String>,
    pub missing_required_skills: Vec<String>,
    pub matched_preferred_skills: Vec<String>,
    pub missing_preferred_skills: Vec<String>,
}

/// One JD skill tested against both documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub skill: String,
    pub category: String,
    pub found_in_resume: bool,
    pub found_in_jd: bool,
    /// Surface strings (name or keyword) that occur in the résumé.
    pub resume_keywords: Vec<String>,
    /// Surface strings (name or keyword) that occur in the JD.
    pub jd_keywords: Vec<String>,
}

struct SkillCoverage {
    score: u32,
    matched: Vec<String>,
    missing: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scoring
// ────────────────────────────────────────────────────────────────────────────

pub fn score(
    taxonomy: &Taxonomy,
    resume: &ParsedResume,
    jd: &ParsedJD,
    weights: &ScoringWeights,
) -> ScoreResult {
    let required = skill_coverage(taxonomy, resume, &jd.required_skills);
    let preferred = skill_coverage(taxonomy, resume, &jd.preferred_skills);
    let experience_score = experience_score(taxonomy, resume, jd);
    let education_score = education_score(resume, jd);

    let weighted = required.score as f64 * weights.required_skills_weight
        + preferred.score as f64 * weights.preferred_skills_weight
        + experience_score as f64 * weights.experience_weight
        + education_score as f64 * weights.education_weight;

    // Only the upper bound is clamped; `as` saturates anything below zero.
    let overall_score = weighted.round().min(100.0) as u32;

    tracing::debug!(
        required = required.score,
        preferred = preferred.score,
        experience = experience_score,
        education = education_score,
        overall = overall_score,
        "Scored resume against job description"
    );

    ScoreResult {
        required_skills_score: required.score,
        preferred_skills_score: preferred.score,
        experience_score,
        education_score,
        overall_score,
        matched_required_skills: required.matched,
        missing_required_skills: required.missing,
        matched_preferred_skills: preferred.matched,
        missing_preferred_skills: preferred.missing,
    }
}

/// A target skill is matched when its name or any keyword is in the résumé's skill
/// list or its raw text. An empty target list is a vacuous 100.
fn skill_coverage(taxonomy: &Taxonomy, resume: &ParsedResume, targets: &[String]) -> SkillCoverage {
    if targets.is_empty() {
        return SkillCoverage {
            score: 100,
            matched: vec![],
            missing: vec![],
        };
    }

    let raw_lower = resume.raw_text.to_lowercase();
    let skills_lower: Vec<String> = resume.skills.iter().map(|s| s.to_lowercase()).collect();

    let (matched, missing): (Vec<String>, Vec<String>) =
        targets.iter().cloned().partition(|name| {
            taxonomy.search_terms(name).iter().any(|term| {
                skills_lower.iter().any(|s| s == term) || contains_term(&raw_lower, term)
            })
        });

    let score = (matched.len() as f64 / targets.len() as f64 * 100.0).round() as u32;

    SkillCoverage {
        score,
        matched,
        missing,
    }
}

fn max_years_mentioned(text: &str) -> u32 {
    YEARS_RE
        .captures_iter(text)
        .filter_map(|c| c.get(1)?.as_str().parse::<u32>().ok())
        .max()
        .unwrap_or(0)
}

fn years_points(years: u32) -> f64 {
    match years {
        y if y >= 5 => 50.0,
        y if y >= 3 => 40.0,
        y if y >= 1 => 30.0,
        _ => 10.0,
    }
}

/// Years-of-experience step (≤50) plus JD keyword overlap with the experience
/// entries (≤50). No experience entries scores 0.
fn experience_score(taxonomy: &Taxonomy, resume: &ParsedResume, jd: &ParsedJD) -> u32 {
    if resume.experience.is_empty() {
        return 0;
    }

    let years = years_points(max_years_mentioned(&resume.raw_text));

    let jd_lower = jd.raw_text.to_lowercase();
    let experience_lower = resume.experience.join(" ").to_lowercase();

    let jd_keywords: Vec<String> = taxonomy
        .skills()
        .iter()
        .map(|s| s.name.to_lowercase())
        .filter(|name| contains_term(&jd_lower, name))
        .collect();

    let overlap = if jd_keywords.is_empty() {
        NO_JD_KEYWORDS_POINTS
    } else {
        let matched = jd_keywords
            .iter()
            .filter(|k| contains_term(&experience_lower, k))
            .count();
        matched as f64 / jd_keywords.len() as f64 * KEYWORD_OVERLAP_POINTS
    };

    (years + overlap).min(100.0).round() as u32
}

/// Highest degree found sets the base; a field of study shared with the JD adds a bonus.
/// No education entries is neutral.
fn education_score(resume: &ParsedResume, jd: &ParsedJD) -> u32 {
    if resume.education.is_empty() {
        return NEUTRAL_EDUCATION_SCORE;
    }

    let education_lower = resume.education.join(" ").to_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|n| education_lower.contains(n));

    let mut score = if has(&["phd", "ph.d", "doctorate"]) {
        100
    } else if has(&["master", "msc", "mba"]) {
        90
    } else if has(&["bachelor", "bsc", "ba "]) {
        80
    } else if has(&["associate", "diploma"]) {
        70
    } else {
        NEUTRAL_EDUCATION_SCORE
    };

    let jd_lower = jd.raw_text.to_lowercase();
    if STUDY_FIELDS
        .iter()
        .any(|f| contains_term(&education_lower, f) && contains_term(&jd_lower, f))
    {
        score = (score + FIELD_OF_STUDY_BONUS).min(100);
    }

    score
}

/// Per-skill match detail for every skill the JD names, required first.
pub fn skill_breakdown(
    taxonomy: &Taxonomy,
    resume: &ParsedResume,
    jd: &ParsedJD,
) -> Vec<SkillMatch> {
    let resume_lower = resume.raw_text.to_lowercase();
    let jd_lower = jd.raw_text.to_lowercase();

    jd.required_skills
        .iter()
        .chain(jd.preferred_skills.iter())
        .map(|name| {
            let surfaces = surface_forms(taxonomy, name);
            let found_in = |text_lower: &str| -> Vec<String> {
                surfaces
                    .iter()
                    .filter(|s| contains_term(text_lower, &s.to_lowercase()))
                    .cloned()
                    .collect()
            };

            let resume_keywords = found_in(&resume_lower);
            let jd_keywords = found_in(&jd_lower);
            let listed = resume.skills.iter().any(|s| s.eq_ignore_ascii_case(name));

            SkillMatch {
                skill: name.clone(),
                category: taxonomy.category_of(name).to_string(),
                found_in_resume: listed || !resume_keywords.is_empty(),
                found_in_jd: !jd_keywords.is_empty(),
                resume_keywords,
                jd_keywords,
            }
        })
        .collect()
}

/// Canonical name plus keywords, de-duplicated case-insensitively, original spelling.
fn surface_forms(taxonomy: &Taxonomy, name: &str) -> Vec<String> {
    let mut forms: Vec<String> = vec![name.to_string()];
    if let Some(skill) = taxonomy.get(name) {
        for keyword in &skill.keywords {
            if !forms.iter().any(|f| f.eq_ignore_ascii_case(keyword)) {
                forms.push(keyword.clone());
            }
        }
    }
    forms
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
