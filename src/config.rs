//! Runtime settings loaded from the environment (and `.env` when present).

use std::env;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "https://www.googleapis.com/youtube/v3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_COMMENT_COUNT: usize = 800;
pub const DEFAULT_MAX_COMMENT_COUNT: usize = 5000;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Key for the YouTube Data API v3
    pub api_key: String,
    /// Base URL of the Data API, overridable for local mocks
    pub api_url: String,
    pub bind_addr: String,
    /// Used when the form leaves `comment_count` empty
    pub default_comment_count: usize,
    /// Upper bound applied to any requested comment count
    pub max_comment_count: usize,
    pub static_dir: String,
}

impl Settings {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds settings from an arbitrary key lookup. `from_env` delegates here.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("YOUTUBE_API_KEY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Config("YOUTUBE_API_KEY must be set".to_string()))?;

        let default_comment_count =
            parse_count(&lookup, "DEFAULT_COMMENT_COUNT", DEFAULT_COMMENT_COUNT)?;
        let max_comment_count =
            parse_count(&lookup, "MAX_COMMENT_COUNT", DEFAULT_MAX_COMMENT_COUNT)?;

        if default_comment_count > max_comment_count {
            return Err(AppError::Config(format!(
                "DEFAULT_COMMENT_COUNT ({}) exceeds MAX_COMMENT_COUNT ({})",
                default_comment_count, max_comment_count
            )));
        }

        Ok(Self {
            api_key,
            api_url: lookup("YOUTUBE_API_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
            default_comment_count,
            max_comment_count,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        })
    }
}

fn parse_count<F>(lookup: &F, key: &str, default: usize) -> Result<usize, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(0) | Err(_) => Err(AppError::Config(format!(
                "{} must be a positive integer, got '{}'",
                key, raw
            ))),
            Ok(n) => Ok(n),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_lookup(lookup_from(&[("YOUTUBE_API_KEY", "abc")])).unwrap();
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(settings.default_comment_count, 800);
        assert_eq!(settings.max_comment_count, 5000);
        assert_eq!(settings.static_dir, "static");
    }

    #[test]
    fn test_missing_api_key() {
        let err = Settings::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Settings::from_lookup(lookup_from(&[("YOUTUBE_API_KEY", "  ")])).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("YOUTUBE_API_KEY", "abc"),
            ("YOUTUBE_API_URL", "http://localhost:9000/v3/"),
            ("DEFAULT_COMMENT_COUNT", "50"),
            ("MAX_COMMENT_COUNT", "100"),
        ]))
        .unwrap();
        assert_eq!(settings.api_url, "http://localhost:9000/v3");
        assert_eq!(settings.default_comment_count, 50);
        assert_eq!(settings.max_comment_count, 100);
    }

    #[test]
    fn test_invalid_counts() {
        let err = Settings::from_lookup(lookup_from(&[
            ("YOUTUBE_API_KEY", "abc"),
            ("MAX_COMMENT_COUNT", "lots"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Settings::from_lookup(lookup_from(&[
            ("YOUTUBE_API_KEY", "abc"),
            ("DEFAULT_COMMENT_COUNT", "900"),
            ("MAX_COMMENT_COUNT", "100"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
