// src/extractors/boundary.rs
use crate::document::{collapsed_text, next_sibling_containers, parent_container};
use crate::extractors::heading::{BoundaryPattern, HeadingMatcher};
use scraper::ElementRef;

/// A sibling container queued for scanning, with its extracted text.
#[derive(Debug, Clone)]
pub struct ScopeEntry<'a> {
    pub container: ElementRef<'a>,
    pub text: String,
}

/// The containers examined at one escalation level.
#[derive(Debug, Clone)]
pub struct ScanScope<'a> {
    /// Node whose following siblings make up the scope.
    pub anchor: ElementRef<'a>,
    pub entries: Vec<ScopeEntry<'a>>,
}

impl<'a> ScanScope<'a> {
    /// Next siblings of `anchor` tagged `container_tag` that carry text.
    ///
    /// When `anchor` has no such siblings at all, the rule is retried on its
    /// parent container, and so on upwards; the returned anchor is the node
    /// whose siblings were finally taken.
    pub fn derive(anchor: ElementRef<'a>, container_tag: &str) -> Self {
        let mut anchor = anchor;
        loop {
            let siblings = next_sibling_containers(anchor, container_tag);
            if !siblings.is_empty() {
                let entries = siblings
                    .into_iter()
                    .filter_map(|container| {
                        let text = collapsed_text(container);
                        (!text.is_empty()).then_some(ScopeEntry { container, text })
                    })
                    .collect();
                return Self { anchor, entries };
            }
            match parent_container(anchor, container_tag) {
                Some(parent) => {
                    tracing::trace!("Anchor has no sibling <{}>; deriving scope from its parent", container_tag);
                    anchor = parent;
                }
                None => {
                    return Self {
                        anchor,
                        entries: Vec::new(),
                    }
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of scanning one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Text blocks in document order.
    pub blocks: Vec<String>,
    /// Label of the boundary heading that halted the scan.
    pub stopped_at: Option<String>,
}

/// Collects container text until a next-section heading shows up.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryScanner<'p> {
    matcher: HeadingMatcher,
    boundary: &'p BoundaryPattern,
}

impl<'p> BoundaryScanner<'p> {
    pub fn new(matcher: HeadingMatcher, boundary: &'p BoundaryPattern) -> Self {
        Self { matcher, boundary }
    }

    /// Walks `scope` in order. A container holding a boundary heading (itself
    /// or any descendant) contributes nothing and ends the scan.
    pub fn scan(&self, scope: &ScanScope<'_>) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        for entry in &scope.entries {
            if let Some(boundary) = self.matcher.find_within(entry.container, self.boundary) {
                tracing::debug!("Boundary heading reached: '{}'", boundary.label);
                outcome.stopped_at = Some(boundary.label);
                break;
            }
            outcome.blocks.push(entry.text.clone());
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FilingDocument;
    use crate::extractors::heading::SectionName;
    use scraper::Selector;

    fn pick<'a>(doc: &'a FilingDocument, css: &str) -> ElementRef<'a> {
        doc.html().select(&Selector::parse(css).unwrap()).next().unwrap()
    }

    fn item_1a_boundary() -> BoundaryPattern {
        BoundaryPattern::for_section(&SectionName::new("Item 1A").unwrap(), None).unwrap()
    }

    #[test]
    fn test_scope_keeps_text_bearing_siblings_of_same_kind() {
        let doc = FilingDocument::parse(
            r#"<body><div>
               <div id="head">Heading</div>
               <div> </div>
               <p>Paragraph outside the container kind</p>
               <div>Block A</div>
               <table><tr><td>Cell</td></tr></table>
               <div><span>Block</span> <span>B</span></div>
               </div></body>"#,
        )
        .unwrap();
        let scope = ScanScope::derive(pick(&doc, "#head"), "div");
        assert_eq!(scope.anchor.value().attr("id"), Some("head"));
        let texts: Vec<&str> = scope.entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["Block A", "Block B"]);
    }

    #[test]
    fn test_scope_walks_up_when_anchor_has_no_siblings() {
        let doc = FilingDocument::parse(
            r#"<body>
               <div id="outer"><div id="mid"><div id="head">Heading</div></div></div>
               <div>After</div>
               </body>"#,
        )
        .unwrap();
        let scope = ScanScope::derive(pick(&doc, "#head"), "div");
        assert_eq!(scope.anchor.value().attr("id"), Some("outer"));
        assert_eq!(scope.len(), 1);

        let lonely = FilingDocument::parse(r#"<body><div id="only">Heading</div></body>"#).unwrap();
        let scope = ScanScope::derive(pick(&lonely, "#only"), "div");
        assert!(scope.is_empty());
    }

    #[test]
    fn test_scan_stops_before_boundary_container() {
        let doc = FilingDocument::parse(
            r#"<body>
               <div id="head"><span style="font-weight:700">Item 1A. Risk Factors</span></div>
               <div>Block A</div>
               <div>See <span style="font-weight:400">Item 2</span> for properties.</div>
               <div><div><p>Intro <span style="font-weight:700">Item 1B. Unresolved Staff Comments</span></p></div></div>
               <div>Block C</div>
               </body>"#,
        )
        .unwrap();
        let boundary = item_1a_boundary();
        let scanner = BoundaryScanner::new(HeadingMatcher::new(700), &boundary);
        let outcome = scanner.scan(&ScanScope::derive(pick(&doc, "#head"), "div"));

        assert_eq!(
            outcome.blocks,
            vec!["Block A".to_string(), "See Item 2 for properties.".to_string()]
        );
        assert_eq!(outcome.stopped_at.as_deref(), Some("Item 1B. Unresolved Staff Comments"));
    }

    #[test]
    fn test_scan_without_boundary_keeps_everything() {
        let doc = FilingDocument::parse(
            r#"<body>
               <div id="head"><span style="font-weight:700">Item 1A</span></div>
               <div>Block A</div>
               <div><span style="font-weight:700">Risks Related to Our Business</span></div>
               <div>Block B</div>
               </body>"#,
        )
        .unwrap();
        let boundary = item_1a_boundary();
        let scanner = BoundaryScanner::new(HeadingMatcher::new(700), &boundary);
        let outcome = scanner.scan(&ScanScope::derive(pick(&doc, "#head"), "div"));

        assert_eq!(outcome.blocks.len(), 3);
        assert_eq!(outcome.blocks[1], "Risks Related to Our Business");
        assert!(outcome.stopped_at.is_none());
    }
}
