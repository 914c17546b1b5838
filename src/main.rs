// src/main.rs
mod document;
mod extractors;
mod utils;

use clap::Parser;
use document::FilingDocument;
use extractors::{ExtractedSection, SectionExtractor};
use serde::Serialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use utils::config::ExtractorConfig;
use utils::error::ExtractError;
use utils::AppError;

const DEFAULT_SECTION: &str = "Item 1A";

/// Extract named sections (e.g. "Item 1A") from a 10-K filing rendered to HTML
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// HTML document of the filing ("-" reads stdin)
    input: PathBuf,

    /// Section to extract; repeat for several (default: "Item 1A")
    #[arg(short, long = "section", value_name = "NAME")]
    sections: Vec<String>,

    /// Case-insensitive regex marking where a section ends (overrides item ordering)
    #[arg(short, long)]
    boundary: Option<String>,

    /// Tag name of the row/container elements
    #[arg(long)]
    container_tag: Option<String>,

    /// Minimum numeric font weight treated as bold
    #[arg(long)]
    bold_threshold: Option<u16>,

    /// Skip heading candidates that look like table-of-contents entries
    #[arg(long)]
    skip_toc: bool,

    /// Print a JSON report instead of plain text
    #[arg(long)]
    json: bool,
}

/// Per-section entry of the JSON report.
#[derive(Debug, Serialize)]
struct SectionReport {
    section: String,
    found: bool,
    heading: Option<String>,
    escalation_level: Option<usize>,
    stopped_at: Option<String>,
    block_count: usize,
    content_length: usize,
    content: Option<String>,
    error: Option<String>,
    extracted_at: String,
}

impl SectionReport {
    fn found(section: &ExtractedSection) -> Self {
        Self {
            section: section.section_name.clone(),
            found: true,
            heading: Some(section.heading.clone()),
            escalation_level: Some(section.escalation_level),
            stopped_at: section.stopped_at.clone(),
            block_count: section.blocks.len(),
            content_length: section.content.len(),
            content: Some(section.content.clone()),
            error: None,
            extracted_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    fn missing(name: &str, err: &ExtractError) -> Self {
        Self {
            section: name.to_string(),
            found: false,
            heading: None,
            escalation_level: None,
            stopped_at: None,
            block_count: 0,
            content_length: 0,
            content: None,
            error: Some(err.to_string()),
            extracted_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// CLI flags override `SECTION_*` environment variables, which override defaults.
fn build_config(args: &Args) -> Result<ExtractorConfig, AppError> {
    let mut config = ExtractorConfig::from_env()?;
    if let Some(boundary) = &args.boundary {
        config.boundary = Some(boundary.clone());
    }
    if let Some(tag) = &args.container_tag {
        config.container_tag = tag.trim().to_ascii_lowercase();
    }
    if let Some(threshold) = args.bold_threshold {
        config.bold_threshold = threshold;
    }
    if args.skip_toc {
        config.skip_toc = true;
    }
    tracing::debug!("Using extractor config: {:?}", config);
    Ok(config)
}

/// Reads the document, replacing invalid UTF-8 rather than failing on it.
fn read_input(path: &Path) -> Result<String, AppError> {
    let bytes = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        std::fs::read(path)?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);
    let config = build_config(&args)?;

    // 3. Load and parse the document
    let html = read_input(&args.input)?;
    tracing::info!("Read document {} ({} bytes)", args.input.display(), html.len());
    let document = FilingDocument::parse(&html)?;

    // 4. Extract each requested section
    let extractor = SectionExtractor::new(config);
    let sections = if args.sections.is_empty() {
        vec![DEFAULT_SECTION.to_string()]
    } else {
        args.sections.clone()
    };

    let mut reports = Vec::with_capacity(sections.len());
    let mut success_count = 0;
    for name in &sections {
        match extractor.extract_section(&document, name) {
            Ok(section) => {
                success_count += 1;
                if !args.json {
                    println!("=== {} ===\n{}\n", section.heading, section.content);
                }
                reports.push(SectionReport::found(&section));
            }
            Err(e) => {
                if !e.is_not_found() {
                    tracing::error!("Failed to extract '{}': {}", name, e);
                }
                reports.push(SectionReport::missing(name, &e));
            }
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    let failure_count = sections.len() - success_count;
    tracing::info!("Processing finished. Found: {}, Missing: {}", success_count, failure_count);

    if success_count == 0 {
        return Err(AppError::Processing(format!(
            "None of the {} requested section(s) were found",
            sections.len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_flags_override_config() {
        let args = Args::parse_from([
            "filing_sections",
            "filing.html",
            "-s",
            "Item 1A",
            "--section",
            "Item 7",
            "--container-tag",
            "P",
            "--bold-threshold",
            "600",
            "--skip-toc",
            "--json",
        ]);
        assert_eq!(args.sections, vec!["Item 1A", "Item 7"]);
        assert!(args.json);

        let config = build_config(&args).unwrap();
        assert_eq!(config.container_tag, "p");
        assert_eq!(config.bold_threshold, 600);
        assert!(config.skip_toc);
    }

    #[test]
    fn test_reports_serialize() {
        let err = ExtractError::MalformedInput("document is empty".to_string());
        let json = serde_json::to_value(SectionReport::missing("Item 9", &err)).unwrap();
        assert_eq!(json["section"], "Item 9");
        assert_eq!(json["found"], false);
        assert_eq!(json["error"], "Malformed input document: document is empty");
        assert!(json["content"].is_null());
    }
}
