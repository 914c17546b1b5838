// src/extractors/section.rs

// --- Imports ---
use crate::document::{parent_container, FilingDocument};
use crate::extractors::boundary::{BoundaryScanner, ScanOutcome, ScanScope};
use crate::extractors::heading::{BoundaryPattern, HeadingMatcher, SectionName};
use crate::extractors::locator::SectionLocator;
use crate::utils::config::ExtractorConfig;
use crate::utils::error::{ExtractError, NotFoundReason};
use scraper::ElementRef;
use serde::Serialize;

// --- Constants ---
/// Scan attempts per extraction: the heading's own level plus two ancestors.
pub const MAX_ESCALATION_ATTEMPTS: usize = 3;
/// Separator placed between collected text blocks.
pub const BLOCK_SEPARATOR: &str = "\n\n";

// --- Data Structures ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedSection {
    pub section_name: String,   // e.g., "Item 1A"
    pub heading: String,        // e.g., "Item 1A. Risk Factors"
    pub blocks: Vec<String>,    // One per contributing container, in document order
    pub content: String,        // Blocks joined by BLOCK_SEPARATOR
    pub escalation_level: usize,
    pub stopped_at: Option<String>, // Boundary heading that ended the section
}

impl ExtractedSection {
    fn new(section: &SectionName, heading: String, level: usize, outcome: ScanOutcome) -> Self {
        Self {
            section_name: section.to_string(),
            heading,
            content: outcome.blocks.join(BLOCK_SEPARATOR),
            blocks: outcome.blocks,
            escalation_level: level,
            stopped_at: outcome.stopped_at,
        }
    }
}

/// States of the scope escalation.
#[derive(Debug, Clone)]
pub enum EscalationState<'a> {
    Scanning { level: usize, anchor: ElementRef<'a> },
    Found { level: usize, outcome: ScanOutcome },
    Exhausted { attempts: usize },
}

/// Terminal outcome of [`ScopeEscalator::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Escalation {
    Found { level: usize, outcome: ScanOutcome },
    Exhausted { attempts: usize },
}

/// Retries the boundary scan at successively wider ancestor scopes.
#[derive(Debug, Clone, Copy)]
pub struct ScopeEscalator<'p> {
    scanner: BoundaryScanner<'p>,
    container_tag: &'p str,
}

impl<'p> ScopeEscalator<'p> {
    pub fn new(scanner: BoundaryScanner<'p>, container_tag: &'p str) -> Self {
        Self { scanner, container_tag }
    }

    /// One transition. Terminal states are returned unchanged.
    pub fn step<'a>(&self, state: EscalationState<'a>) -> EscalationState<'a> {
        let EscalationState::Scanning { level, anchor } = state else {
            return state;
        };

        let scope = ScanScope::derive(anchor, self.container_tag);
        if scope.is_empty() {
            tracing::debug!("Escalation level {}: no sibling container carries text", level);
        } else {
            tracing::debug!("Escalation level {}: scanning {} sibling container(s)", level, scope.len());
        }

        let outcome = self.scanner.scan(&scope);
        if !outcome.blocks.is_empty() {
            return EscalationState::Found { level, outcome };
        }

        // A boundary ends the section even when nothing preceded it; every
        // wider scope lies past that boundary.
        let attempts = level + 1;
        if outcome.stopped_at.is_some() {
            tracing::debug!("Boundary reached before any content at level {}", level);
            return EscalationState::Exhausted { attempts };
        }

        // Scope ran out empty: widen, if attempts remain.
        if attempts >= MAX_ESCALATION_ATTEMPTS {
            return EscalationState::Exhausted { attempts };
        }
        match parent_container(scope.anchor, self.container_tag) {
            Some(parent) => {
                tracing::debug!("No content at level {}; escalating to parent <{}>", level, self.container_tag);
                EscalationState::Scanning { level: level + 1, anchor: parent }
            }
            None => EscalationState::Exhausted { attempts },
        }
    }

    /// Drives the state machine from `anchor` until Found or Exhausted.
    pub fn run(&self, anchor: ElementRef<'_>) -> Escalation {
        let mut state = EscalationState::Scanning { level: 0, anchor };
        loop {
            state = match self.step(state) {
                EscalationState::Found { level, outcome } => return Escalation::Found { level, outcome },
                EscalationState::Exhausted { attempts } => return Escalation::Exhausted { attempts },
                scanning => scanning,
            };
        }
    }
}

// --- Main Extractor Structure ---
/// Extracts named sections from filing documents whose headings are only
/// distinguishable by bold inline style.
#[derive(Debug, Clone, Default)]
pub struct SectionExtractor {
    config: ExtractorConfig,
}

impl SectionExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    /// Extracts the content between the bold heading for `section_name` and
    /// the next section heading.
    ///
    /// A missing section yields [`ExtractError::SectionNotFound`]; check
    /// [`ExtractError::is_not_found`] to tell it apart from real failures.
    pub fn extract_section(
        &self,
        document: &FilingDocument,
        section_name: &str,
    ) -> Result<ExtractedSection, ExtractError> {
        tracing::info!("Attempting extraction for '{}'", section_name);

        let section = SectionName::new(section_name)?;
        let boundary = BoundaryPattern::for_section(&section, self.config.boundary.as_deref())?;
        let matcher = HeadingMatcher::new(self.config.bold_threshold);
        let not_found = |reason: NotFoundReason| {
            tracing::warn!("Section '{}' not found: {}", section, reason);
            ExtractError::SectionNotFound {
                section: section.to_string(),
                reason,
            }
        };

        // 1. Find the heading and its container row
        let locator = SectionLocator::new(matcher, self.config.container_tag.as_str(), self.config.skip_toc);
        let located = locator.locate(document, &section).map_err(not_found)?;

        // 2. Collect content up to the next section heading, widening as needed
        let scanner = BoundaryScanner::new(matcher, &boundary);
        let escalator = ScopeEscalator::new(scanner, &self.config.container_tag);
        match escalator.run(located.container) {
            Escalation::Found { level, outcome } => {
                let extracted = ExtractedSection::new(&section, located.heading.label, level, outcome);
                tracing::info!(
                    "Successfully extracted '{}': {} block(s), {} chars (escalation level {})",
                    extracted.section_name,
                    extracted.blocks.len(),
                    extracted.content.len(),
                    level
                );
                Ok(extracted)
            }
            Escalation::Exhausted { attempts } => Err(not_found(NotFoundReason::Exhausted { attempts })),
        }
    }
}
