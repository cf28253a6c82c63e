//! Project scanning: walk a tree and analyze every source file on a bounded pool.

pub mod file_scanner;

pub use file_scanner::{FileScanner, ScannedFile};

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::LanguageAnalyzer;
use crate::config::AnalysisSettings;
use crate::types::{CodeElement, DocumentorError, ProjectAnalysis, Result};

/// Produces immutable [`ProjectAnalysis`] snapshots
pub struct ProjectScanner {
    analyzer: Arc<LanguageAnalyzer>,
}

impl ProjectScanner {
    pub fn new() -> Result<Self> {
        Ok(Self {
            analyzer: Arc::new(LanguageAnalyzer::new()?),
        })
    }

    pub fn with_analyzer(analyzer: Arc<LanguageAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Scan `root` and analyze every matching file.
    ///
    /// Per-file failures are logged and contribute no elements; only a missing
    /// root is fatal.
    #[instrument(skip_all, fields(root = %root.display()))]
    pub async fn scan(&self, root: &Path, settings: &AnalysisSettings) -> Result<ProjectAnalysis> {
        if !root.exists() {
            return Err(DocumentorError::not_found(root));
        }

        let walk_root = root.to_path_buf();
        let walk_settings = settings.clone();
        let files = tokio::task::spawn_blocking(move || {
            FileScanner::from_settings(&walk_root, &walk_settings).scan()
        })
        .await
        .map_err(|e| DocumentorError::Io(std::io::Error::other(e.to_string())))??;

        let workers = worker_count(settings.max_threads);
        info!("Analyzing {} files with {} workers", files.len(), workers);

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut handles = Vec::with_capacity(files.len());

        for file in files {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| DocumentorError::Io(std::io::Error::other(e.to_string())))?;
            let analyzer = Arc::clone(&self.analyzer);
            let path = file.path.clone();

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                analyzer.analyze(&file.path)
            });
            handles.push((path, handle));
        }

        let mut elements: Vec<CodeElement> = Vec::new();
        for (path, handle) in handles {
            match handle.await {
                Ok(file_elements) => {
                    debug!("{}: {} elements", path.display(), file_elements.len());
                    elements.extend(file_elements);
                }
                Err(e) => warn!("Analysis task for {} failed: {}", path.display(), e),
            }
        }

        if !settings.include_private_members {
            elements.retain(|e| e.visibility().should_include(false));
        }

        // Stable: per-file declaration order is preserved
        elements.sort_by(|a, b| a.file_path().cmp(b.file_path()));

        let analysis = ProjectAnalysis::new(root, elements);
        info!("{}", analysis.stats());
        Ok(analysis)
    }
}

fn worker_count(configured: Option<usize>) -> usize {
    configured
        .filter(|n| *n > 0)
        .unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
}
