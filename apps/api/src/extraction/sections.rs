//! Named-section splitting as a line-driven state machine.
//!
//! States: outside any section, or inside a named section. A header line moves the
//! machine into the section it names and is not itself part of any body.

use std::collections::BTreeMap;

/// Header vocabulary shared by résumés and job descriptions. Longest match wins, so
/// "work experience" beats "experience" on the same line.
const SECTION_HEADERS: &[&str] = &[
    "summary",
    "professional summary",
    "objective",
    "profile",
    "about me",
    "experience",
    "work experience",
    "professional experience",
    "work history",
    "employment",
    "employment history",
    "education",
    "academic background",
    "skills",
    "technical skills",
    "core competencies",
    "projects",
    "certifications",
    "awards",
    "publications",
    "languages",
    "interests",
    "references",
    "volunteer",
    "responsibilities",
    "requirements",
    "qualifications",
    "required skills",
    "preferred skills",
    "preferred qualifications",
    "nice to have",
    "benefits",
    "about us",
    "about the role",
    "job description",
];

pub const EXPERIENCE_SECTIONS: &[&str] = &[
    "experience",
    "work experience",
    "professional experience",
    "work history",
    "employment",
    "employment history",
];

pub const EDUCATION_SECTIONS: &[&str] = &["education", "academic background"];

enum State<'a> {
    Outside,
    Inside {
        name: &'static str,
        body: Vec<&'a str>,
    },
}

/// Returns the vocabulary header a line opens, if any.
///
/// The line matches when, lower-cased and stripped of a trailing colon, it equals a
/// header or starts with one followed by a non-alphanumeric character
/// ("Experience with Rust" opens a section, "Experienced engineer" does not).
pub fn match_header(line: &str) -> Option<&'static str> {
    let normalized = line.trim().trim_end_matches(':').trim_end().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    SECTION_HEADERS
        .iter()
        .copied()
        .filter(|header| match normalized.strip_prefix(header) {
            Some("") => true,
            Some(rest) => rest.chars().next().is_some_and(|c| !c.is_alphanumeric()),
            None => false,
        })
        .max_by_key(|header| header.len())
}

/// Maps each lower-cased section header to its body text.
/// A header that appears twice accumulates both bodies.
pub fn extract_sections(text: &str) -> BTreeMap<String, String> {
    let mut sections: BTreeMap<String, String> = BTreeMap::new();
    let mut state = State::Outside;

    for line in text.lines() {
        match match_header(line) {
            Some(header) => {
                let next = State::Inside {
                    name: header,
                    body: Vec::new(),
                };
                flush(&mut sections, std::mem::replace(&mut state, next));
            }
            None => {
                if let State::Inside { body, .. } = &mut state {
                    body.push(line);
                }
            }
        }
    }
    flush(&mut sections, state);

    sections
}

fn flush(sections: &mut BTreeMap<String, String>, state: State<'_>) {
    if let State::Inside { name, body } = state {
        let body = body.join("\n").trim().to_string();
        let slot = sections.entry(name.to_string()).or_default();
        if !slot.is_empty() && !body.is_empty() {
            slot.push('\n');
        }
        slot.push_str(&body);
    }
}

/// Concatenated bodies of whichever of `names` were found, in `names` order.
pub fn joined_body(sections: &BTreeMap<String, String>, names: &[&str]) -> Option<String> {
    let bodies: Vec<&str> = names
        .iter()
        .filter_map(|n| sections.get(*n))
        .map(String::as_str)
        .filter(|b| !b.trim().is_empty())
        .collect();

    if bodies.is_empty() {
        None
    } else {
        Some(bodies.join("\n"))
    }
}
