// src/extractors/heading.rs

// --- Imports ---
use crate::document::{collapsed_text, InlineStyle};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use scraper::ElementRef;
use std::fmt;

// --- Regex Patterns for Text Matching (Lazy Static) ---
// An item label anywhere in a heading, e.g. "Item 7A." or "(ITEM 9)".
static ITEM_LABEL_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bitem\s*(\d{1,2})\s*([a-z])?(?:\W|$)")
        .expect("Failed to compile ITEM_LABEL_TEXT_RE")
});

// A requested section name that is a bare item label.
static ITEM_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*item\s*(\d{1,2})\s*([a-z])?\W*$").expect("Failed to compile ITEM_NAME_RE")
});

// Part and signature headings only count when they open the text.
static PART_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\W*part\s+(iv|i{1,3})(?:\W|$)").expect("Failed to compile PART_TEXT_RE")
});

static SIGNATURES_TEXT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\W*signatures?(?:\W|$)").expect("Failed to compile SIGNATURES_TEXT_RE")
});

// Trailing punctuation users tend to type after a label ("Item 1A.").
const TRAILING_PUNCTUATION: &[char] = &['.', ':', ';', ',', '-', '–', '—'];

/// Anything a heading's text can be tested against.
pub trait LabelPattern {
    fn matches_label(&self, text: &str) -> bool;
}

/// A numbered 10-K item, ordered by number then letter suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ItemLabel {
    pub number: u8,
    pub suffix: Option<char>,
}

impl ItemLabel {
    fn from_captures(caps: &regex::Captures<'_>) -> Option<Self> {
        let number = caps.get(1)?.as_str().parse().ok()?;
        let suffix = caps
            .get(2)
            .and_then(|m| m.as_str().chars().next())
            .map(|c| c.to_ascii_uppercase());
        Some(Self { number, suffix })
    }

    /// Parses a bare label such as "Item 1A" or "item 7a.".
    pub fn parse(name: &str) -> Option<Self> {
        ITEM_NAME_RE.captures(name).and_then(|caps| Self::from_captures(&caps))
    }

    /// Item labels mentioned in a heading text, in order.
    pub fn all_in(text: &str) -> impl Iterator<Item = Self> + '_ {
        ITEM_LABEL_TEXT_RE
            .captures_iter(text)
            .filter_map(|caps| Self::from_captures(&caps))
    }

    /// The 10-K part this item belongs to (1 to 4).
    pub fn part(&self) -> u8 {
        match self.number {
            0..=4 => 1,
            5..=9 => 2,
            10..=14 => 3,
            _ => 4,
        }
    }
}

impl fmt::Display for ItemLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item {}", self.number)?;
        if let Some(suffix) = self.suffix {
            write!(f, "{}", suffix)?;
        }
        Ok(())
    }
}

/// Part number of a "PART II"-style heading text.
fn leading_part(text: &str) -> Option<u8> {
    let caps = PART_TEXT_RE.captures(text)?;
    match caps.get(1)?.as_str().to_ascii_lowercase().as_str() {
        "i" => Some(1),
        "ii" => Some(2),
        "iii" => Some(3),
        "iv" => Some(4),
        _ => None,
    }
}

/// Case-insensitive label for a requested section.
///
/// Tolerates varying whitespace between label parts and surrounding
/// punctuation. The label may sit anywhere in the heading text ("Risk Factors
/// (Item 1A)") but may not run into further letters or digits on either side
/// ("Item 1" never matches "Item 1A").
#[derive(Debug, Clone)]
pub struct SectionName {
    raw: String,
    regex: Regex,
    item: Option<ItemLabel>,
}

impl SectionName {
    pub fn new(name: &str) -> Result<Self, ExtractError> {
        let trimmed = name.trim().trim_end_matches(TRAILING_PUNCTUATION).trim_end();
        let tokens = label_tokens(trimmed);
        if tokens.is_empty() {
            return Err(ExtractError::InvalidSectionName(name.to_string()));
        }

        let body = tokens
            .iter()
            .map(|token| regex::escape(token))
            .collect::<Vec<_>>()
            .join(r"\s*");
        let regex = RegexBuilder::new(&format!(r"(?:^|\W){}(?:\W|$)", body))
            .case_insensitive(true)
            .build()?;

        Ok(Self {
            raw: trimmed.to_string(),
            regex,
            item: ItemLabel::parse(trimmed),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn item(&self) -> Option<ItemLabel> {
        self.item
    }
}

impl LabelPattern for SectionName {
    fn matches_label(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Display for SectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a label into alphanumeric runs (broken at digit/letter changes)
/// and single punctuation characters. Whitespace only separates tokens.
fn label_tokens(label: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in label.chars() {
        if c.is_alphanumeric() {
            let switches_kind = current
                .chars()
                .last()
                .is_some_and(|last| last.is_ascii_digit() != c.is_ascii_digit());
            if switches_kind {
                tokens.push(std::mem::take(&mut current));
            }
            current.push(c);
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            if !c.is_whitespace() {
                tokens.push(c.to_string());
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Labels of the sections that may follow the requested one.
#[derive(Debug, Clone)]
pub enum BoundaryPattern {
    /// A heading naming a later item, else one opening a later part or the
    /// signature block.
    Following(ItemLabel),
    /// Caller-supplied, case-insensitive.
    Custom(Regex),
    /// Any item, part or signature heading that is not the requested section.
    OtherThan(SectionName),
}

impl BoundaryPattern {
    /// Picks the boundary for `section`: `custom` wins, then item ordering.
    pub fn for_section(section: &SectionName, custom: Option<&str>) -> Result<Self, ExtractError> {
        if let Some(pattern) = custom {
            let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
            return Ok(BoundaryPattern::Custom(regex));
        }
        Ok(match section.item() {
            Some(item) => BoundaryPattern::Following(item),
            None => BoundaryPattern::OtherThan(section.clone()),
        })
    }
}

impl LabelPattern for BoundaryPattern {
    fn matches_label(&self, text: &str) -> bool {
        match self {
            BoundaryPattern::Following(current) => {
                let mut items = ItemLabel::all_in(text).peekable();
                if items.peek().is_some() {
                    return items.any(|item| item > *current);
                }
                if let Some(part) = leading_part(text) {
                    return part > current.part();
                }
                SIGNATURES_TEXT_RE.is_match(text)
            }
            BoundaryPattern::Custom(regex) => regex.is_match(text),
            BoundaryPattern::OtherThan(section) => {
                !section.matches_label(text)
                    && (ItemLabel::all_in(text).next().is_some()
                        || leading_part(text).is_some()
                        || SIGNATURES_TEXT_RE.is_match(text))
            }
        }
    }
}

/// A bold node whose text matched a label pattern.
#[derive(Debug, Clone)]
pub struct HeadingCandidate<'a> {
    pub element: ElementRef<'a>,
    pub label: String,
}

/// Combines the two heading signals: label text AND bold inline style.
#[derive(Debug, Clone, Copy)]
pub struct HeadingMatcher {
    bold_threshold: u16,
}

impl HeadingMatcher {
    pub fn new(bold_threshold: u16) -> Self {
        Self { bold_threshold }
    }

    pub fn is_bold(&self, element: ElementRef<'_>) -> bool {
        InlineStyle::of(element).is_bold(self.bold_threshold)
    }

    pub fn candidate<'a, P: LabelPattern + ?Sized>(
        &self,
        element: ElementRef<'a>,
        pattern: &P,
    ) -> Option<HeadingCandidate<'a>> {
        // Style first; text is only gathered for bold nodes.
        if !self.is_bold(element) {
            return None;
        }
        let label = collapsed_text(element);
        if pattern.matches_label(&label) {
            Some(HeadingCandidate { element, label })
        } else {
            None
        }
    }

    /// First heading at or below `container`, in document order.
    pub fn find_within<'a, P: LabelPattern + ?Sized>(
        &self,
        container: ElementRef<'a>,
        pattern: &P,
    ) -> Option<HeadingCandidate<'a>> {
        container
            .descendants()
            .filter_map(ElementRef::wrap)
            .find_map(|el| self.candidate(el, pattern))
    }
}
