//! Analyze Command
//!
//! Scans a project and reports what was extracted, without calling any model.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::analyzer::ProjectScanner;
use crate::analyzer::parser::Language;
use crate::cli::Output;
use crate::config::Config;
use crate::types::{AnalysisStats, DocumentorError, ElementKind, ProjectAnalysis, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "yaml" | "yml" => Ok(ReportFormat::Yaml),
            _ => Err(format!(
                "Invalid format '{}'. Valid values: text, json, yaml",
                s
            )),
        }
    }
}

#[derive(Debug, Serialize)]
struct AnalysisReport<'a> {
    project: String,
    stats: AnalysisStats,
    languages: BTreeMap<String, usize>,
    elements: &'a ProjectAnalysis,
}

pub async fn run(root: &Path, config: &Config, format: ReportFormat) -> Result<()> {
    let scanner = ProjectScanner::new()?;
    let analysis = scanner.scan(root, &config.analysis).await?;

    match format {
        ReportFormat::Text => print_text(&analysis),
        _ => println!("{}", render(&analysis, format)?),
    }
    Ok(())
}

/// Machine-readable report
pub fn render(analysis: &ProjectAnalysis, format: ReportFormat) -> Result<String> {
    let report = AnalysisReport {
        project: analysis.project_name(),
        stats: analysis.stats(),
        languages: language_counts(analysis),
        elements: analysis,
    };
    match format {
        ReportFormat::Json => Ok(serde_json::to_string_pretty(&report)?),
        ReportFormat::Yaml => Ok(serde_yaml::to_string(&report)?),
        ReportFormat::Text => Err(DocumentorError::Config(
            "text reports are printed directly".to_string(),
        )),
    }
}

fn print_text(analysis: &ProjectAnalysis) {
    let out = Output::new();
    let stats = analysis.stats();

    out.header(&format!("Analysis: {}", analysis.project_name()));
    out.info(&stats.to_string());

    out.section("Elements");
    for kind in [ElementKind::Class, ElementKind::Method, ElementKind::Field] {
        let count = analysis.of_kind(kind).count();
        out.field(kind.description(), count);
    }

    let languages = language_counts(analysis);
    if !languages.is_empty() {
        out.section("Languages");
        for (lang, files) in &languages {
            out.field(lang, format!("{} files", files));
        }
    }

    if analysis.is_empty() {
        out.warning("No code elements found");
    } else {
        println!("\nTo generate documentation, run: documentor generate");
    }
}

/// Files per language among files that produced elements
fn language_counts(analysis: &ProjectAnalysis) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for file in analysis.elements_by_file().keys() {
        let name = Language::from_path(file).highlight_str().to_string();
        *counts.entry(name).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CodeElement;

    fn analysis() -> ProjectAnalysis {
        ProjectAnalysis::new(
            "/work/shop",
            vec![
                CodeElement::new(ElementKind::Class, "Cart", "Cart", "/work/shop/Cart.java", 1, "public class Cart"),
                CodeElement::new(ElementKind::Method, "run", "run", "/work/shop/run.py", 1, "def run():"),
            ],
        )
    }

    #[test]
    fn test_json_report() {
        let json = render(&analysis(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["project"], "shop");
        assert_eq!(value["stats"]["total"], 2);
        assert_eq!(value["languages"]["java"], 1);
        assert_eq!(value["languages"]["python"], 1);
    }

    #[test]
    fn test_yaml_report() {
        let yaml = render(&analysis(), ReportFormat::Yaml).unwrap();
        assert!(yaml.contains("project: shop"));
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<ReportFormat>(), Ok(ReportFormat::Json));
        assert!("xml".parse::<ReportFormat>().is_err());
    }
}
