//! Generated unit tests (`tests/unit-tests.md`)

use futures::stream::{self, StreamExt};
use tracing::debug;

use crate::ai::Purpose;
use crate::constants::output::{TESTS_DIR, TESTS_DOC};
use crate::types::{CodeElement, ElementKind, ProjectAnalysis, Result};

use super::GenerationContext;

/// Generate unit tests for every class and method and write the document.
pub async fn generate(ctx: &GenerationContext, analysis: &ProjectAnalysis) -> Result<String> {
    let targets: Vec<&CodeElement> = analysis
        .elements()
        .iter()
        .filter(|e| e.kind() != ElementKind::Field)
        .collect();
    debug!("Generating unit tests for {} elements", targets.len());

    let backends = Some(ctx.config.llm_models.as_slice());
    let mut responses: Vec<(usize, String)> = stream::iter(targets.iter().copied().enumerate())
        .map(|(i, element)| async move {
            let text = ctx.models.generate(backends, element, Purpose::UnitTests).await;
            (i, text)
        })
        .buffer_unordered(ctx.config.output.concurrency.max(1))
        .collect()
        .await;
    responses.sort_by_key(|(i, _)| *i);

    let sections: Vec<(&CodeElement, String)> = responses
        .into_iter()
        .map(|(i, text)| (targets[i], text))
        .collect();
    let content = render(ctx.config.output.target_coverage, &sections);

    let path = ctx
        .config
        .output
        .output_directory
        .join(TESTS_DIR)
        .join(TESTS_DOC);
    ctx.sink.write(&path, &content).await?;

    Ok(format!("Unit tests generated for {} elements", sections.len()))
}

pub fn render(target_coverage: f64, sections: &[(&CodeElement, String)]) -> String {
    let mut doc = String::from("# Generated Unit Tests\n\n");
    doc.push_str("This file contains AI-generated unit test suggestions for the analyzed code.\n\n");
    doc.push_str(&format!(
        "Target Coverage: {:.0}%\n\n",
        target_coverage * 100.0
    ));

    for (element, tests) in sections {
        doc.push_str(&format!(
            "## {} {} (`{}`)\n\n",
            element.kind().icon(),
            element.qualified_name(),
            element.file_path()
        ));
        doc.push_str(tests.trim());
        doc.push_str("\n\n");
    }
    doc
}
