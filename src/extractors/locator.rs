// src/extractors/locator.rs
use crate::document::{parent_container, FilingDocument};
use crate::extractors::heading::{HeadingCandidate, HeadingMatcher, SectionName};
use crate::utils::error::NotFoundReason;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

// Selectors for potential ToC containers
static TOC_CONTAINER_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("div[class*='toc'], nav[class*='toc'], div[id*='toc'], nav[id*='toc']")
        .expect("Failed to compile TOC_CONTAINER_SELECTOR")
});

// A heading that is nothing but "Item 7." - typical of ToC rows
static BARE_ITEM_LABEL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*Item\s*\d{1,2}[A-Z]?\.?\s*$").expect("Failed to compile BARE_ITEM_LABEL_RE")
});

/// A located section heading and the container row it sits in.
#[derive(Debug, Clone)]
pub struct LocatedHeading<'a> {
    pub heading: HeadingCandidate<'a>,
    pub container: ElementRef<'a>,
}

/// Finds the heading node of a requested section.
#[derive(Debug, Clone)]
pub struct SectionLocator {
    matcher: HeadingMatcher,
    container_tag: String,
    skip_toc: bool,
}

impl SectionLocator {
    pub fn new(matcher: HeadingMatcher, container_tag: impl Into<String>, skip_toc: bool) -> Self {
        Self {
            matcher,
            container_tag: container_tag.into(),
            skip_toc,
        }
    }

    /// First heading for `section` in document order, with its container.
    ///
    /// Later duplicates are ignored. Unless ToC skipping is enabled, a bold
    /// table-of-contents entry wins over the real heading if it comes first.
    pub fn locate<'a>(
        &self,
        document: &'a FilingDocument,
        section: &SectionName,
    ) -> Result<LocatedHeading<'a>, NotFoundReason> {
        let heading = document
            .elements()
            .filter_map(|el| self.matcher.candidate(el, section))
            .find(|candidate| {
                if self.skip_toc && is_in_toc(candidate) {
                    tracing::debug!("Skipping heading candidate - likely in ToC: '{}'", candidate.label);
                    return false;
                }
                true
            })
            .ok_or(NotFoundReason::HeadingAbsent)?;

        tracing::debug!(
            "Found heading for '{}': <{}> '{}'",
            section,
            heading.element.value().name(),
            heading.label
        );

        let container = parent_container(heading.element, &self.container_tag).ok_or_else(|| {
            tracing::debug!("Heading '{}' has no <{}> ancestor", heading.label, self.container_tag);
            NotFoundReason::NoContainer
        })?;

        Ok(LocatedHeading { heading, container })
    }
}

fn is_link(element: ElementRef<'_>) -> bool {
    element.value().name() == "a" && element.value().attr("href").is_some()
}

/// Checks if a heading candidate is likely within a Table of Contents.
fn is_in_toc(candidate: &HeadingCandidate<'_>) -> bool {
    let element = candidate.element;
    if is_link(element) {
        tracing::trace!("Candidate itself is <a> tag with href, likely ToC link.");
        return true;
    }

    let mut table_ancestor_found = false;
    for ancestor in element.ancestors().filter_map(ElementRef::wrap) {
        let ancestor_name = ancestor.value().name();

        if TOC_CONTAINER_SELECTOR.matches(&ancestor) {
            tracing::trace!("Candidate has ancestor matching TOC_CONTAINER_SELECTOR ({})", ancestor_name);
            return true;
        }
        if is_link(ancestor) {
            tracing::trace!("Candidate sits inside an <a> tag with href.");
            return true;
        }
        if ["td", "tr", "table"].contains(&ancestor_name) {
            table_ancestor_found = true;
        }
        if ancestor_name == "body" {
            break;
        }
    }

    // Inside a table and nothing but "Item X." - ToC row rather than a heading.
    table_ancestor_found && BARE_ITEM_LABEL_RE.is_match(&candidate.label)
}
