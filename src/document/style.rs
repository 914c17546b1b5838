// src/document/style.rs
use scraper::ElementRef;
use std::collections::HashMap;

const WEIGHT_NORMAL: u16 = 400;
const WEIGHT_BOLD: u16 = 700;
const WEIGHT_LIGHTER: u16 = 100;

/// Parsed `style` attribute of a single element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: HashMap<String, String>,
}

/// The weight half of the BoldSignal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
    Bolder,
    Lighter,
    Numeric(u16),
}

impl FontWeight {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "normal" => Some(FontWeight::Normal),
            "bold" => Some(FontWeight::Bold),
            "bolder" => Some(FontWeight::Bolder),
            "lighter" => Some(FontWeight::Lighter),
            other => other
                .parse::<u16>()
                .ok()
                .filter(|n| (1..=1000).contains(n))
                .map(FontWeight::Numeric),
        }
    }

    /// Approximate numeric weight. `bolder` is taken relative to normal text.
    pub fn numeric(self) -> u16 {
        match self {
            FontWeight::Normal => WEIGHT_NORMAL,
            FontWeight::Bold | FontWeight::Bolder => WEIGHT_BOLD,
            FontWeight::Lighter => WEIGHT_LIGHTER,
            FontWeight::Numeric(n) => n,
        }
    }
}

impl InlineStyle {
    /// Parses a raw declaration list such as `font-weight:700; color:#000`.
    /// Later declarations of the same property overwrite earlier ones.
    pub fn parse(raw: &str) -> Self {
        let declarations = raw
            .split(';')
            .filter_map(|decl| decl.split_once(':'))
            .filter_map(|(prop, value)| {
                let prop = prop.trim().to_ascii_lowercase();
                let value = value.trim();
                let value = value
                    .strip_suffix("!important")
                    .unwrap_or(value)
                    .trim()
                    .to_ascii_lowercase();
                (!prop.is_empty() && !value.is_empty()).then_some((prop, value))
            })
            .collect();
        Self { declarations }
    }

    /// Style of `element`; empty when it has no `style` attribute.
    pub fn of(element: ElementRef<'_>) -> Self {
        element
            .value()
            .attr("style")
            .map(Self::parse)
            .unwrap_or_default()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations.get(property).map(String::as_str)
    }

    /// Declared weight, from `font-weight` or else the `font` shorthand.
    pub fn font_weight(&self) -> Option<FontWeight> {
        if let Some(weight) = self.get("font-weight").and_then(FontWeight::parse) {
            return Some(weight);
        }
        // `normal` is ambiguous inside the shorthand, so only explicit weights count.
        self.get("font")?
            .split_whitespace()
            .filter(|token| *token != "normal")
            .find_map(FontWeight::parse)
    }

    pub fn is_bold(&self, threshold: u16) -> bool {
        self.font_weight()
            .map(|weight| weight.numeric() >= threshold)
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let style = InlineStyle::parse(" Font-Weight : 700 ; color:#000000;;margin-top:0pt ");
        assert_eq!(style.get("font-weight"), Some("700"));
        assert_eq!(style.get("color"), Some("#000000"));
        assert_eq!(style.get("margin-top"), Some("0pt"));
        assert_eq!(style.get("padding"), None);
        assert_eq!(InlineStyle::parse(""), InlineStyle::default());
        assert_eq!(InlineStyle::parse("garbage"), InlineStyle::default());
    }

    #[test]
    fn test_font_weight_forms() {
        assert_eq!(InlineStyle::parse("font-weight:bold").font_weight(), Some(FontWeight::Bold));
        assert_eq!(InlineStyle::parse("font-weight:600").font_weight(), Some(FontWeight::Numeric(600)));
        assert_eq!(InlineStyle::parse("font-weight:700 !important").font_weight(), Some(FontWeight::Numeric(700)));
        assert_eq!(InlineStyle::parse("font: italic bold 10pt Times").font_weight(), Some(FontWeight::Bold));
        assert_eq!(InlineStyle::parse("font: normal 700 10pt Times").font_weight(), Some(FontWeight::Numeric(700)));
        assert_eq!(InlineStyle::parse("font: 10pt Times New Roman").font_weight(), None);
        assert_eq!(InlineStyle::parse("font-weight:heavy").font_weight(), None);
    }

    #[test]
    fn test_bold_threshold() {
        assert!(InlineStyle::parse("font-weight:700").is_bold(700));
        assert!(InlineStyle::parse("font-weight:800").is_bold(700));
        assert!(InlineStyle::parse("font-weight:bolder").is_bold(700));
        assert!(!InlineStyle::parse("font-weight:400").is_bold(700));
        assert!(!InlineStyle::parse("font-weight:normal").is_bold(700));
        assert!(!InlineStyle::parse("font-weight:lighter").is_bold(700));
        assert!(!InlineStyle::parse("color:red").is_bold(700));
        assert!(InlineStyle::parse("font-weight:600").is_bold(600));
        assert!(!InlineStyle::parse("font-weight:bold").is_bold(800));
    }
}
