//! Assessment: narrative strengths, weaknesses, recommendation and detailed analysis
//! derived from a score result and the two parsed documents.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::scoring::ScoreResult;
use crate::extraction::jd::ParsedJD;
use crate::extraction::resume::ParsedResume;
use crate::taxonomy::Taxonomy;

const DEFAULT_CANDIDATE_NAME: &str = "Candidate";
const DEFAULT_JOB_TITLE: &str = "this position";
const MAX_LISTED_SKILLS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Yes")]
    StrongYes,
    #[serde(rename = "Yes")]
    Yes,
    #[serde(rename = "Maybe")]
    Maybe,
    #[serde(rename = "No")]
    No,
    #[serde(rename = "Strong No")]
    StrongNo,
}

impl Recommendation {
    /// Lower bound of each tier is inclusive.
    pub fn from_score(overall: u32) -> Self {
        match overall {
            s if s >= 85 => Self::StrongYes,
            s if s >= 70 => Self::Yes,
            s if s >= 55 => Self::Maybe,
            s if s >= 40 => Self::No,
            _ => Self::StrongNo,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongYes => "Strong Yes",
            Self::Yes => "Yes",
            Self::Maybe => "Maybe",
            Self::No => "No",
            Self::StrongNo => "Strong No",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetailedAnalysis {
    pub skills_analysis: String,
    pub experience_analysis: String,
    pub education_analysis: String,
    pub overall_fit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: Uuid,
    pub candidate_name: String,
    pub job_title: String,
    pub score: ScoreResult,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendation: Recommendation,
    pub executive_summary: String,
    pub detailed_analysis: DetailedAnalysis,
    pub created_at: DateTime<Utc>,
}

pub fn assess(
    taxonomy: &Taxonomy,
    resume: &ParsedResume,
    jd: &ParsedJD,
    score: &ScoreResult,
) -> Assessment {
    let candidate_name = resume
        .name
        .clone()
        .unwrap_or_else(|| DEFAULT_CANDIDATE_NAME.to_string());
    let job_title = jd
        .title
        .clone()
        .unwrap_or_else(|| DEFAULT_JOB_TITLE.to_string());
    let recommendation = Recommendation::from_score(score.overall_score);

    Assessment {
        id: Uuid::new_v4(),
        strengths: build_strengths(taxonomy, resume, score),
        weaknesses: build_weaknesses(score),
        executive_summary: build_executive_summary(
            &candidate_name,
            &job_title,
            score,
            recommendation,
        ),
        detailed_analysis: DetailedAnalysis {
            skills_analysis: skills_analysis(jd, score),
            experience_analysis: experience_analysis(resume, score),
            education_analysis: education_analysis(resume, score),
            overall_fit: overall_fit(&candidate_name, &job_title, score),
        },
        candidate_name,
        job_title,
        score: score.clone(),
        recommendation,
        created_at: Utc::now(),
    }
}

/// "A, B, C" plus a suffix when the list was cut.
fn list_skills(skills: &[String], overflow: impl Fn(usize) -> String) -> String {
    let shown = skills
        .iter()
        .take(MAX_LISTED_SKILLS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if skills.len() > MAX_LISTED_SKILLS {
        format!("{shown}{}", overflow(skills.len() - MAX_LISTED_SKILLS))
    } else {
        shown
    }
}

fn score_descriptor(overall: u32) -> &'static str {
    match overall {
        s if s >= 80 => "excellent",
        s if s >= 65 => "strong",
        s if s >= 50 => "moderate",
        s if s >= 35 => "limited",
        _ => "weak",
    }
}

fn build_strengths(taxonomy: &Taxonomy, resume: &ParsedResume, score: &ScoreResult) -> Vec<String> {
    let mut strengths = Vec::new();
    let required_total = score.matched_required_skills.len() + score.missing_required_skills.len();

    if score.required_skills_score >= 80 {
        strengths.push(format!(
            "Strong match on required skills ({}%): {} of {} required skills present",
            score.required_skills_score,
            score.matched_required_skills.len(),
            required_total
        ));
    } else if score.required_skills_score >= 60 {
        strengths.push(format!(
            "Good coverage of required skills ({}%)",
            score.required_skills_score
        ));
    }

    if !score.matched_preferred_skills.is_empty() {
        strengths.push(format!(
            "Brings preferred skills: {}",
            list_skills(&score.matched_preferred_skills, |n| format!(" and {n} more"))
        ));
    }

    if score.experience_score >= 75 {
        strengths.push(format!(
            "Relevant work history across {} position(s)",
            resume.experience.len()
        ));
    }

    if score.education_score >= 85 {
        strengths.push("Strong educational background for this role".to_string());
    }

    if score.overall_score >= 80 {
        strengths.push("Excellent overall alignment with the job requirements".to_string());
    }

    let mut seen = HashSet::new();
    let categories: Vec<&str> = score
        .matched_required_skills
        .iter()
        .chain(score.matched_preferred_skills.iter())
        .map(|s| taxonomy.category_of(s))
        .filter(|c| seen.insert(*c))
        .collect();
    if !categories.is_empty() {
        strengths.push(format!("Skills span: {}", categories.join(", ")));
    }

    strengths
}

fn build_weaknesses(score: &ScoreResult) -> Vec<String> {
    let mut weaknesses = Vec::new();

    if !score.missing_required_skills.is_empty() {
        weaknesses.push(format!(
            "Missing required skills: {}",
            list_skills(&score.missing_required_skills, |_| " and more".to_string())
        ));
    }

    if score.required_skills_score < 50 {
        weaknesses.push(format!(
            "Low required skills match ({}%)",
            score.required_skills_score
        ));
    }

    if score.missing_preferred_skills.len() > score.matched_preferred_skills.len() {
        weaknesses.push(format!(
            "Limited preferred skills: {} of {} present",
            score.matched_preferred_skills.len(),
            score.matched_preferred_skills.len() + score.missing_preferred_skills.len()
        ));
    }

    if score.experience_score < 50 {
        weaknesses.push("Limited relevant work experience for this role".to_string());
    }

    if score.education_score < 60 {
        weaknesses.push("Educational background may not meet the role's expectations".to_string());
    }

    if score.overall_score < 50 {
        weaknesses.push("Significant gaps against the overall job requirements".to_string());
    }

    weaknesses
}

fn build_executive_summary(
    candidate_name: &str,
    job_title: &str,
    score: &ScoreResult,
    recommendation: Recommendation,
) -> String {
    let missing = score.missing_required_skills.len();
    let required_note = if missing == 0 {
        "All required skills are present.".to_string()
    } else {
        format!("{missing} required skill(s) are missing.")
    };

    format!(
        "{candidate_name} shows {} alignment with {job_title} (overall {}%, recommendation: {}), \
         matching {}% of required and {}% of preferred skills. {required_note}",
        score_descriptor(score.overall_score),
        score.overall_score,
        recommendation.label(),
        score.required_skills_score,
        score.preferred_skills_score,
    )
}

fn skills_analysis(jd: &ParsedJD, score: &ScoreResult) -> String {
    let required_total = jd.required_skills.len();
    let preferred_total = jd.preferred_skills.len();
    let matched_required = score.matched_required_skills.len();
    let matched_preferred = score.matched_preferred_skills.len();

    let lead = match score.required_skills_score {
        s if s >= 80 => format!(
            "The candidate covers the core technical requirements well, matching {matched_required} of {required_total} required skills."
        ),
        s if s >= 60 => format!(
            "The candidate covers most core requirements, matching {matched_required} of {required_total} required skills."
        ),
        _ => format!(
            "The candidate covers few of the core requirements, matching {matched_required} of {required_total} required skills."
        ),
    };

    let gaps = if score.missing_required_skills.is_empty() {
        String::new()
    } else {
        format!(
            " Gaps: {}.",
            list_skills(&score.missing_required_skills, |n| format!(" and {n} more"))
        )
    };

    format!(
        "{lead}{gaps} Preferred skills: {matched_preferred} of {preferred_total} matched ({}%).",
        score.preferred_skills_score
    )
}

fn experience_analysis(resume: &ParsedResume, score: &ScoreResult) -> String {
    let positions = resume.experience.len();
    match score.experience_score {
        s if s >= 75 => format!(
            "Extensive relevant experience across {positions} position(s); the work history lines up closely with the role ({s}%)."
        ),
        s if s >= 50 => format!(
            "Moderate relevant experience across {positions} position(s); some of the role's technologies appear in past work ({s}%)."
        ),
        s => format!(
            "Limited relevant experience: {positions} position(s) found, with little overlap with the role's technologies ({s}%)."
        ),
    }
}

fn education_analysis(resume: &ParsedResume, score: &ScoreResult) -> String {
    let entries = resume.education.len();
    match score.education_score {
        s if s >= 85 => format!(
            "Strong academic background ({entries} entr(ies)) that fits the role well ({s}%)."
        ),
        s if s >= 60 => format!(
            "Adequate academic background ({entries} entr(ies)) for the role ({s}%)."
        ),
        s => format!(
            "Academic background is limited or not clearly relevant ({entries} entr(ies), {s}%)."
        ),
    }
}

fn overall_fit(candidate_name: &str, job_title: &str, score: &ScoreResult) -> String {
    let overall = score.overall_score;
    match overall {
        s if s >= 85 => format!(
            "{candidate_name} is an exceptional fit for {job_title} ({s}%). Prioritise for interview."
        ),
        s if s >= 70 => format!(
            "{candidate_name} is a good fit for {job_title} ({s}%). Recommended for interview."
        ),
        s if s >= 55 => format!(
            "{candidate_name} is a partial fit for {job_title} ({s}%). Consider if the gaps can be trained."
        ),
        s if s >= 40 => format!(
            "{candidate_name} is a weak fit for {job_title} ({s}%). Significant gaps remain."
        ),
        s => format!(
            "{candidate_name} is not a fit for {job_title} ({s}%). Core requirements are not met."
        ),
    }
}
