// src/utils/error.rs
use std::fmt;
use thiserror::Error;

/// Why a requested section produced no content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    /// No bold node matched the section label.
    HeadingAbsent,
    /// A heading matched but it has no enclosing container element.
    NoContainer,
    /// Every escalation attempt came back empty.
    Exhausted { attempts: usize },
}

impl fmt::Display for NotFoundReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotFoundReason::HeadingAbsent => write!(f, "no bold heading matches the label"),
            NotFoundReason::NoContainer => write!(f, "heading has no container element"),
            NotFoundReason::Exhausted { attempts } => {
                write!(f, "no content collected after {} scan attempts", attempts)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Section '{section}' not found: {reason}")]
    SectionNotFound {
        section: String,
        reason: NotFoundReason,
    },

    #[error("Malformed input document: {0}")]
    MalformedInput(String),

    #[error("Invalid section name: {0:?}")]
    InvalidSectionName(String),

    #[error("Regular expression error: {0}")]
    Regex(#[from] regex::Error),
}

impl ExtractError {
    /// Not-found is an expected outcome, not a fault.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExtractError::SectionNotFound { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Data processing failed: {0}")]
    Processing(String),
}
