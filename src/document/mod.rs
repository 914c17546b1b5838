// src/document/mod.rs
//! Read-only view over a parsed filing document.
//!
//! The tree lives in the `ego_tree` arena owned by [`scraper::Html`]. Parent
//! and sibling navigation goes through node ids, so nothing here holds an
//! owning reference upwards.

pub mod style;

use crate::utils::error::ExtractError;
use scraper::{ElementRef, Html, node::Node};

pub use style::InlineStyle;

/// Elements whose text never counts as document content.
const NON_CONTENT_TAGS: &[&str] = &["script", "style", "head", "title"];

/// An immutable, parsed filing document.
pub struct FilingDocument {
    html: Html,
}

impl FilingDocument {
    /// Parses an HTML document.
    ///
    /// Fails with [`ExtractError::MalformedInput`] when the input is empty or
    /// the parsed tree carries no text at all.
    pub fn parse(html_content: &str) -> Result<Self, ExtractError> {
        if html_content.trim().is_empty() {
            return Err(ExtractError::MalformedInput("document is empty".to_string()));
        }
        Self::from_html(Html::parse_document(html_content))
    }

    /// Wraps an already-parsed tree.
    pub fn from_html(html: Html) -> Result<Self, ExtractError> {
        let root = html.root_element();
        if collapsed_text(root).is_empty() {
            return Err(ExtractError::MalformedInput(
                "document contains no text content".to_string(),
            ));
        }

        if !has_inline_style(root) {
            tracing::warn!("Document carries no inline style; bold headings cannot be detected.");
        }

        Ok(Self { html })
    }

    pub fn html(&self) -> &Html {
        &self.html
    }

    pub fn root(&self) -> ElementRef<'_> {
        self.html().root_element()
    }

    /// All elements in document (pre-order) order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.root().descendants().filter_map(ElementRef::wrap)
    }
}

/// Whether any element at or below `element` carries a `style` attribute.
fn has_inline_style(element: ElementRef<'_>) -> bool {
    element
        .descendants()
        .filter_map(ElementRef::wrap)
        .any(|el| el.value().attr("style").is_some())
}

/// Text of `element` and its descendants: each text node trimmed, joined by
/// a single space, runs of whitespace collapsed.
pub fn collapsed_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Node::Text(text) = node.value() else { continue };
        if node
            .ancestors()
            .filter_map(ElementRef::wrap)
            .any(|el| NON_CONTENT_TAGS.contains(&el.value().name()))
        {
            continue;
        }
        for word in text.split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(word);
        }
    }
    out
}

/// Nearest strict ancestor whose tag is `tag`.
pub fn parent_container<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
}

/// Following sibling elements of `element` with the tag `tag`.
pub fn next_sibling_containers<'a>(element: ElementRef<'a>, tag: &str) -> Vec<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() == tag)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Selector;

    fn first<'a>(doc: &'a FilingDocument, css: &str) -> ElementRef<'a> {
        let selector = Selector::parse(css).unwrap();
        doc.html().select(&selector).next().unwrap()
    }

    #[test]
    fn test_empty_input_is_malformed() {
        assert!(matches!(FilingDocument::parse(""), Err(ExtractError::MalformedInput(_))));
        assert!(matches!(FilingDocument::parse("  \n\t "), Err(ExtractError::MalformedInput(_))));
        assert!(matches!(
            FilingDocument::parse("<html><body><div></div></body></html>"),
            Err(ExtractError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_style_presence_is_recorded() {
        let styled = FilingDocument::parse(r#"<div style="color:red">x</div>"#).unwrap();
        let plain = FilingDocument::parse("<div>x</div>").unwrap();
        assert!(has_inline_style(styled.root()));
        assert!(!has_inline_style(plain.root()));
    }

    #[test]
    fn test_collapsed_text_joins_inline_runs() {
        let doc = FilingDocument::parse(
            "<html><head><title>T</title><style>p{}</style></head><body>\
             <div id=\"a\">  Item&nbsp;1A.<span>Risk</span>\n\n   <span>Factors </span></div></body></html>",
        )
        .unwrap();
        assert_eq!(collapsed_text(first(&doc, "#a")), "Item 1A. Risk Factors");
        assert_eq!(collapsed_text(doc.root()), "Item 1A. Risk Factors");
    }

    #[test]
    fn test_navigation_helpers() {
        let doc = FilingDocument::parse(
            r#"<body><div id="outer"><div id="row"><span id="h">x</span></div><p>p</p><div id="next">y</div></div></body>"#,
        )
        .unwrap();
        let heading = first(&doc, "#h");
        let row = parent_container(heading, "div").unwrap();
        assert_eq!(row.value().attr("id"), Some("row"));
        assert_eq!(parent_container(row, "div").unwrap().value().attr("id"), Some("outer"));

        let siblings: Vec<_> = next_sibling_containers(row, "div")
            .into_iter()
            .map(|el| el.value().attr("id"))
            .collect();
        assert_eq!(siblings, vec![Some("next")]);
        assert!(parent_container(doc.root(), "div").is_none());
    }
}
