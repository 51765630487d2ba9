//! Résumé extractor.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::sections::{
    extract_sections, joined_body, EDUCATION_SECTIONS, EXPERIENCE_SECTIONS,
};
use crate::extraction::{
    detect_skills, extract_email, extract_phone, find_span, first_non_blank_line, split_entries,
};
use crate::taxonomy::Taxonomy;

const MAX_NAME_LEN: usize = 50;
const MIN_EXPERIENCE_ENTRY_LEN: usize = 20;
const MIN_EDUCATION_ENTRY_LEN: usize = 10;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z\s.]+$").unwrap());

static EXPERIENCE_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)experience|work history|employment").unwrap());
static EXPERIENCE_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)education|skills|projects|certifications").unwrap());
static EDUCATION_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)education|academic").unwrap());
static EDUCATION_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)experience|work history|employment|skills|projects|certifications").unwrap()
});

/// A year, `MM/YYYY`, or `Month YYYY` (full or abbreviated month) at the start of a
/// line opens a new position.
static DATE_ENTRY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\d{4}|\d{2}/\d{4}|(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)\.? \d{4})",
    )
    .unwrap()
});
/// A degree keyword at the start of a line opens a new education entry.
static DEGREE_ENTRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:bachelor|master|phd|ph\.d|associate|diploma)").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedResume {
    pub raw_text: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// Canonical taxonomy names, catalog order, no duplicates.
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    /// lower-cased header → body
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
}

pub fn parse_resume(text: &str, taxonomy: &Taxonomy) -> ParsedResume {
    let sections = extract_sections(text);

    let resume = ParsedResume {
        raw_text: text.to_string(),
        name: extract_name(text),
        email: extract_email(text),
        phone: extract_phone(text),
        skills: detect_skills(text, taxonomy),
        experience: extract_experience(text, &sections),
        education: extract_education(text, &sections),
        sections,
    };

    debug!(
        skills = resume.skills.len(),
        experience = resume.experience.len(),
        education = resume.education.len(),
        sections = resume.sections.len(),
        "Parsed resume"
    );

    resume
}

/// The first non-blank line, if it looks like a person's name.
fn extract_name(text: &str) -> Option<String> {
    first_non_blank_line(text)
        .filter(|line| line.chars().count() < MAX_NAME_LEN && NAME_RE.is_match(line))
        .map(str::to_string)
}

fn extract_experience(text: &str, sections: &BTreeMap<String, String>) -> Vec<String> {
    match joined_body(sections, EXPERIENCE_SECTIONS) {
        Some(body) => split_entries(&body, &DATE_ENTRY_RE, MIN_EXPERIENCE_ENTRY_LEN),
        None => find_span(text, &EXPERIENCE_START_RE, &EXPERIENCE_END_RE)
            .map(|span| split_entries(span, &DATE_ENTRY_RE, MIN_EXPERIENCE_ENTRY_LEN))
            .unwrap_or_default(),
    }
}

fn extract_education(text: &str, sections: &BTreeMap<String, String>) -> Vec<String> {
    match joined_body(sections, EDUCATION_SECTIONS) {
        Some(body) => split_entries(&body, &DEGREE_ENTRY_RE, MIN_EDUCATION_ENTRY_LEN),
        None => find_span(text, &EDUCATION_START_RE, &EDUCATION_END_RE)
            .map(|span| split_entries(span, &DEGREE_ENTRY_RE, MIN_EDUCATION_ENTRY_LEN))
            .unwrap_or_default(),
    }
}
