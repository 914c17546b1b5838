// src/extractors/mod.rs
pub mod boundary;
pub mod heading;
pub mod locator;
pub mod section;

// Re-export key extraction types for convenience
pub use section::{ExtractedSection, SectionExtractor};
