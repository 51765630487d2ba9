//! Extraction: turns decoded document text into structured résumé / job-description records.
//!
//! Every extractor here is a pure function of the text and the taxonomy. Nothing fails:
//! a field that no pattern matches is simply left empty.

pub mod jd;
pub mod resume;
pub mod sections;

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::taxonomy::Taxonomy;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

/// Loose North-American number: optional +1, optional parens around the area code.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}").unwrap()
});

/// A bullet (`-`, `•`, `*`) or numbered-list marker at the start of a line.
static BULLET_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(?:[-•*]\s*|\d+[.)]\s+)").unwrap());

pub fn first_non_blank_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|l| !l.is_empty())
}

pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_RE.find(text).map(|m| m.as_str().to_string())
}

pub fn extract_phone(text: &str) -> Option<String> {
    PHONE_RE.find(text).map(|m| m.as_str().trim().to_string())
}

/// Canonical names of every taxonomy skill mentioned in `text`, in catalog order.
///
/// A skill is present when its canonical name or any keyword variant occurs as a
/// case-insensitive substring.
pub fn detect_skills(text: &str, taxonomy: &Taxonomy) -> Vec<String> {
    let text_lower = text.to_lowercase();
    let mut seen = HashSet::new();

    taxonomy
        .skills()
        .iter()
        .filter(|skill| skill.occurs_in(&text_lower))
        .filter(|skill| seen.insert(skill.name.to_lowercase()))
        .map(|skill| skill.name.clone())
        .collect()
}

/// Returns the text from the first `start` marker up to (not including) the nearest
/// `end` marker after it, or to end of text when no end marker follows.
pub fn find_span<'a>(text: &'a str, start: &Regex, end: &Regex) -> Option<&'a str> {
    let marker = start.find(text)?;
    let stop = end
        .find(&text[marker.end()..])
        .map(|m| marker.end() + m.start())
        .unwrap_or(text.len());
    Some(&text[marker.start()..stop])
}

/// Splits a block into entries, opening a new entry on every line that matches
/// `starts_entry`. Entries shorter than `min_len` characters are dropped as noise.
pub fn split_entries(block: &str, starts_entry: &Regex, min_len: usize) -> Vec<String> {
    let mut entries = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in block.lines().map(str::trim) {
        if starts_entry.is_match(line) && !current.is_empty() {
            entries.push(current.join("\n"));
            current.clear();
        }
        if !line.is_empty() {
            current.push(line);
        }
    }
    if !current.is_empty() {
        entries.push(current.join("\n"));
    }

    entries
        .into_iter()
        .filter(|e| e.chars().count() >= min_len)
        .collect()
}

/// Splits a labelled span into list items on bullet / numbered markers.
///
/// Text before the first marker (the label line) is not an item. Unmarked lines
/// continue the previous item. Items under 10 characters are dropped.
pub fn split_bullets(span: &str) -> Vec<String> {
    const MIN_ITEM_LEN: usize = 10;

    let mut items: Vec<String> = Vec::new();
    let mut in_item = false;

    for line in span.lines() {
        if let Some(marker) = BULLET_RE.find(line) {
            items.push(line[marker.end()..].trim().to_string());
            in_item = true;
        } else if in_item {
            let continuation = line.trim();
            if continuation.is_empty() {
                in_item = false;
            } else if let Some(last) = items.last_mut() {
                last.push(' ');
                last.push_str(continuation);
            }
        }
    }

    items
        .into_iter()
        .filter(|i| i.chars().count() >= MIN_ITEM_LEN)
        .collect()
}
