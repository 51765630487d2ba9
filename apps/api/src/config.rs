use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::analysis::scoring::ScoringWeights;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON skills catalog replacing the built-in one.
    pub skills_taxonomy_path: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub scoring_weights: ScoringWeights,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = ScoringWeights::default();
        let scoring_weights = ScoringWeights {
            required_skills_weight: parse_or(
                &lookup,
                "REQUIRED_SKILLS_WEIGHT",
                defaults.required_skills_weight,
            )?,
            preferred_skills_weight: parse_or(
                &lookup,
                "PREFERRED_SKILLS_WEIGHT",
                defaults.preferred_skills_weight,
            )?,
            experience_weight: parse_or(&lookup, "EXPERIENCE_WEIGHT", defaults.experience_weight)?,
            education_weight: parse_or(&lookup, "EDUCATION_WEIGHT", defaults.education_weight)?,
        };
        scoring_weights
            .validate()
            .context("Invalid scoring weights in environment")?;

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            skills_taxonomy_path: lookup("SKILLS_TAXONOMY_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            scoring_weights,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.skills_taxonomy_path, None);
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.scoring_weights, ScoringWeights::default());
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = config_from(&[
            ("PORT", "3000"),
            ("SKILLS_TAXONOMY_PATH", "/etc/skills.json"),
            ("REQUIRED_SKILLS_WEIGHT", "0.6"),
            ("EDUCATION_WEIGHT", "0.0"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.skills_taxonomy_path, Some(PathBuf::from("/etc/skills.json")));
        assert_eq!(config.scoring_weights.required_skills_weight, 0.6);
        assert_eq!(config.scoring_weights.education_weight, 0.0);
        assert_eq!(config.scoring_weights.experience_weight, 0.2);
    }

    #[test]
    fn test_malformed_values_fail() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("EXPERIENCE_WEIGHT", "lots")]).is_err());
    }

    #[test]
    fn test_negative_weight_fails() {
        assert!(config_from(&[("PREFERRED_SKILLS_WEIGHT", "-0.2")]).is_err());
    }

    #[test]
    fn test_unnormalized_weights_accepted() {
        let config = config_from(&[("REQUIRED_SKILLS_WEIGHT", "0.9")]).unwrap();
        assert!((config.scoring_weights.sum() - 1.4).abs() < 1e-9);
    }
}
