// src/utils/config.rs
use crate::utils::error::ConfigError;

pub const DEFAULT_BOLD_THRESHOLD: u16 = 700;
pub const DEFAULT_CONTAINER_TAG: &str = "div";

const ENV_BOLD_THRESHOLD: &str = "SECTION_BOLD_THRESHOLD";
const ENV_CONTAINER_TAG: &str = "SECTION_CONTAINER_TAG";
const ENV_SKIP_TOC: &str = "SECTION_SKIP_TOC";
const ENV_BOUNDARY: &str = "SECTION_BOUNDARY";

/// Tunables for the section extraction engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Minimum numeric font weight treated as bold.
    pub bold_threshold: u16,
    /// Tag name of the elements that act as rows/containers.
    pub container_tag: String,
    /// Reject heading candidates that look like table-of-contents entries.
    pub skip_toc: bool,
    /// Case-insensitive regex overriding the derived boundary pattern.
    pub boundary: Option<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            bold_threshold: DEFAULT_BOLD_THRESHOLD,
            container_tag: DEFAULT_CONTAINER_TAG.to_string(),
            skip_toc: false,
            boundary: None,
        }
    }
}

impl ExtractorConfig {
    /// Defaults overlaid with `SECTION_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but reads values through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BOLD_THRESHOLD) {
            config.bold_threshold = raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_BOLD_THRESHOLD,
                value: raw.clone(),
            })?;
            tracing::debug!("Using {}={} from environment", ENV_BOLD_THRESHOLD, config.bold_threshold);
        }

        if let Some(raw) = lookup(ENV_CONTAINER_TAG) {
            let tag = raw.trim().to_ascii_lowercase();
            if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::InvalidValue { key: ENV_CONTAINER_TAG, value: raw });
            }
            config.container_tag = tag;
        }

        if let Some(raw) = lookup(ENV_SKIP_TOC) {
            config.skip_toc = parse_flag(&raw)
                .ok_or(ConfigError::InvalidValue { key: ENV_SKIP_TOC, value: raw.clone() })?;
        }

        if let Some(raw) = lookup(ENV_BOUNDARY) {
            if !raw.trim().is_empty() {
                config.boundary = Some(raw);
            }
        }

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
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
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ExtractorConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ExtractorConfig::default());
        assert_eq!(config.bold_threshold, 700);
        assert_eq!(config.container_tag, "div");
        assert!(!config.skip_toc);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ExtractorConfig::from_lookup(lookup_from(&[
            ("SECTION_BOLD_THRESHOLD", "600"),
            ("SECTION_CONTAINER_TAG", " P "),
            ("SECTION_SKIP_TOC", "yes"),
            ("SECTION_BOUNDARY", r"Item\s*2"),
        ]))
        .unwrap();
        assert_eq!(config.bold_threshold, 600);
        assert_eq!(config.container_tag, "p");
        assert!(config.skip_toc);
        assert_eq!(config.boundary.as_deref(), Some(r"Item\s*2"));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ExtractorConfig::from_lookup(lookup_from(&[("SECTION_BOLD_THRESHOLD", "heavy")]))
            .unwrap_err();
        assert!(err.to_string().contains("SECTION_BOLD_THRESHOLD"));

        assert!(ExtractorConfig::from_lookup(lookup_from(&[("SECTION_CONTAINER_TAG", "div > p")])).is_err());
        assert!(ExtractorConfig::from_lookup(lookup_from(&[("SECTION_SKIP_TOC", "maybe")])).is_err());
    }
}
