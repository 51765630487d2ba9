//! JD extractor: title, company, required/preferred skill split, responsibilities and
//! qualifications from a raw job description.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extraction::sections::extract_sections;
use crate::extraction::{find_span, first_non_blank_line, split_bullets};
use crate::taxonomy::Taxonomy;

const MAX_FALLBACK_TITLE_LEN: usize = 100;

static TITLE_LABEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:position|job title|role)\s*:\s*([^\n]+)").unwrap());
static ROLE_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:Engineer|Developer|Manager|Analyst|Designer|Architect|Lead|Director|Specialist|Consultant)$",
    )
    .unwrap()
});
static COMPANY_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:company|organization|employer)\s*:\s*([^\n]+)$").unwrap()
});

static REQUIRED_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)required|must have|essential").unwrap());
static REQUIRED_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)preferred|nice to have|optional|responsibilities|qualifications").unwrap()
});
static PREFERRED_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)preferred|nice to have|optional|desired").unwrap());
static PREFERRED_END_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)responsibilities|qualifications").unwrap());

static RESPONSIBILITIES_START_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)responsibilities|what you'll do|what you will do|duties").unwrap()
});
static RESPONSIBILITIES_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)requirements|qualifications|required|preferred|nice to have|benefits|about us")
        .unwrap()
});
static QUALIFICATIONS_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)qualifications|requirements").unwrap());
static QUALIFICATIONS_END_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)responsibilities|preferred|nice to have|benefits|about us").unwrap()
});

/// Structured output of job-description extraction.
///
/// `required_skills` and `preferred_skills` are disjoint: a skill found in the
/// required span is never repeated as preferred.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedJD {
    pub raw_text: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub sections: BTreeMap<String, String>,
}

pub fn parse_jd(text: &str, taxonomy: &Taxonomy) -> ParsedJD {
    let (required_skills, preferred_skills) = split_skills(text, taxonomy);

    let jd = ParsedJD {
        raw_text: text.to_string(),
        title: extract_title(text),
        company: extract_company(text),
        required_skills,
        preferred_skills,
        responsibilities: find_span(text, &RESPONSIBILITIES_START_RE, &RESPONSIBILITIES_END_RE)
            .map(split_bullets)
            .unwrap_or_default(),
        qualifications: find_span(text, &QUALIFICATIONS_START_RE, &QUALIFICATIONS_END_RE)
            .map(split_bullets)
            .unwrap_or_default(),
        sections: extract_sections(text),
    };

    debug!(
        title = jd.title.as_deref().unwrap_or("-"),
        required = jd.required_skills.len(),
        preferred = jd.preferred_skills.len(),
        responsibilities = jd.responsibilities.len(),
        qualifications = jd.qualifications.len(),
        "Parsed job description"
    );

    jd
}

/// Explicit label, then a line ending in a role noun, then a short first line.
fn extract_title(text: &str) -> Option<String> {
    if let Some(title) = TITLE_LABEL_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty())
    {
        return Some(title.to_string());
    }

    if let Some(line) = text
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty() && ROLE_LINE_RE.is_match(l))
    {
        return Some(line.to_string());
    }

    first_non_blank_line(text)
        .filter(|l| l.chars().count() < MAX_FALLBACK_TITLE_LEN)
        .map(str::to_string)
}

fn extract_company(text: &str) -> Option<String> {
    COMPANY_LABEL_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Classifies every taxonomy skill mentioned in the JD as required or preferred.
///
/// Required: mentioned inside the required span. Preferred: otherwise mentioned in the
/// preferred span or anywhere else in the text.
fn split_skills(text: &str, taxonomy: &Taxonomy) -> (Vec<String>, Vec<String>) {
    let text_lower = text.to_lowercase();
    let required_span = find_span(text, &REQUIRED_START_RE, &REQUIRED_END_RE)
        .map(str::to_lowercase)
        .unwrap_or_default();
    let preferred_span = find_span(text, &PREFERRED_START_RE, &PREFERRED_END_RE)
        .map(str::to_lowercase)
        .unwrap_or_default();

    let mut required = Vec::new();
    let mut preferred = Vec::new();

    for skill in taxonomy.skills() {
        if skill.occurs_in(&required_span) {
            required.push(skill.name.clone());
        } else if skill.occurs_in(&preferred_span) || skill.occurs_in(&text_lower) {
            preferred.push(skill.name.clone());
        }
    }

    (required, preferred)
}

#[cfg(test)]
mod tests {
    use super::*;

    const JD: &str = r#"Position: Senior Software Engineer
Company: Globex Corporation

About the role
We build payments infrastructure.

Responsibilities:
- Design and operate Python services on AWS
- Mentor engineers across the platform team
- On-call

Required Skills:
Python, PostgreSQL, Docker

Nice to have:
Kubernetes and Terraform experience

Qualifications:
1. 5+ years of backend development
2. Bachelor's degree in Computer Science
"#;

    fn parse(text: &str) -> ParsedJD {
        parse_jd(text, &Taxonomy::builtin().unwrap())
    }

    #[test]
    fn test_title_from_position_label() {
        let jd = parse("Position: Senior Software Engineer\nWe are hiring.");
        assert_eq!(jd.title.as_deref(), Some("Senior Software Engineer"));
    }

    #[test]
    fn test_title_from_role_noun_line() {
        let jd = parse("Acme is growing fast!\nStaff Data Engineer\nJoin us.");
        assert_eq!(jd.title.as_deref(), Some("Staff Data Engineer"));
    }

    #[test]
    fn test_title_falls_back_to_short_first_line() {
        let jd = parse("\n  Growth Hacker Wanted  \nDetails follow.");
        assert_eq!(jd.title.as_deref(), Some("Growth Hacker Wanted"));

        let long_first = format!("{}\nbody", "x".repeat(120));
        assert_eq!(parse(&long_first).title, None);
    }

    #[test]
    fn test_company_label() {
        assert_eq!(parse(JD).company.as_deref(), Some("Globex Corporation"));
        assert_eq!(parse("No company here").company, None);
    }

    #[test]
    fn test_required_skills_span() {
        let jd = parse("Required Skills: JavaScript, TypeScript, Node.js");
        for skill in ["JavaScript", "TypeScript", "Node.js"] {
            assert!(jd.required_skills.contains(&skill.to_string()), "missing {skill}");
            assert!(!jd.preferred_skills.contains(&skill.to_string()));
        }
    }

    #[test]
    fn test_must_have_and_essential_open_required_span() {
        let jd = parse("Must have: Python, Docker\nOptional: Kubernetes");
        assert_eq!(jd.required_skills, vec!["Python", "Docker"]);
        assert_eq!(jd.preferred_skills, vec!["Kubernetes"]);

        let jd = parse("Essential skills: PostgreSQL\nNice to have: Redis");
        assert_eq!(jd.required_skills, vec!["PostgreSQL"]);
        assert_eq!(jd.preferred_skills, vec!["Redis"]);
    }

    #[test]
    fn test_desired_opens_preferred_span() {
        let jd = parse("Desired: Kafka\nRequired: Python");
        assert_eq!(jd.required_skills, vec!["Python"]);
        assert_eq!(jd.preferred_skills, vec!["Kafka"]);
    }

    #[test]
    fn test_everyday_words_do_not_become_skills() {
        let jd = parse("We are a trusted partner and expressed interest in reactive teams.");
        assert!(jd.required_skills.is_empty());
        assert!(jd.preferred_skills.is_empty(), "{:?}", jd.preferred_skills);
    }

    #[test]
    fn test_required_and_preferred_are_disjoint() {
        let jd = parse(JD);
        assert!(jd.required_skills.contains(&"PostgreSQL".to_string()));
        assert!(jd.required_skills.contains(&"Docker".to_string()));
        assert!(jd.preferred_skills.contains(&"Kubernetes".to_string()));
        assert!(jd.preferred_skills.contains(&"Terraform".to_string()));
        for skill in &jd.required_skills {
            assert!(!jd.preferred_skills.contains(skill), "{skill} in both lists");
        }
    }

    #[test]
    fn test_incidental_mentions_count_as_preferred() {
        // AWS only appears under Responsibilities, outside both spans
        let jd = parse(JD);
        assert!(jd.preferred_skills.contains(&"AWS".to_string()));
        assert!(!jd.required_skills.contains(&"AWS".to_string()));
    }

    #[test]
    fn test_responsibilities_bullets() {
        let jd = parse(JD);
        assert_eq!(
            jd.responsibilities,
            vec![
                "Design and operate Python services on AWS",
                "Mentor engineers across the platform team",
            ]
        );
    }

    #[test]
    fn test_qualifications_numbered_items() {
        let jd = parse(JD);
        assert_eq!(
            jd.qualifications,
            vec![
                "5+ years of backend development",
                "Bachelor's degree in Computer Science",
            ]
        );
    }

    #[test]
    fn test_sections_include_jd_headers() {
        let jd = parse(JD);
        assert!(jd.sections.contains_key("responsibilities"));
        assert!(jd.sections.contains_key("required skills"));
        assert!(jd.sections.contains_key("nice to have"));
    }

    #[test]
    fn test_empty_jd_has_no_fields() {
        let jd = parse("");
        assert_eq!(jd.title, None);
        assert!(jd.required_skills.is_empty());
        assert!(jd.preferred_skills.is_empty());
        assert!(jd.responsibilities.is_empty());
    }
}
