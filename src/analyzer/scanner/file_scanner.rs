use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::analyzer::parser::Language;
use crate::config::AnalysisSettings;
use crate::constants::analysis::DEFAULT_MAX_FILE_SIZE;
use crate::types::Result;

/// Directory walk producing the source files worth analyzing
pub struct FileScanner {
    root: PathBuf,
    include: Vec<glob::Pattern>,
    exclude: Vec<glob::Pattern>,
    languages: Vec<Language>,
    max_file_size: u64,
}

impl FileScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            include: Vec::new(),
            exclude: Vec::new(),
            languages: vec![Language::Java, Language::Python],
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Scanner configured from analysis settings
    pub fn from_settings<P: AsRef<Path>>(root: P, settings: &AnalysisSettings) -> Self {
        let languages = settings
            .supported_languages
            .iter()
            .filter_map(|name| match name.parse::<Language>() {
                Ok(lang) => Some(lang),
                Err(e) => {
                    tracing::warn!("{}", e);
                    None
                }
            })
            .collect();

        Self::new(root)
            .with_include(settings.include_patterns.clone())
            .with_exclude(settings.exclude_patterns.clone())
            .with_languages(languages)
            .with_max_file_size(settings.max_file_size)
    }

    pub fn with_include(mut self, patterns: Vec<String>) -> Self {
        self.include = compile_patterns(&patterns);
        self
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude = compile_patterns(&patterns);
        self
    }

    pub fn with_languages(mut self, languages: Vec<Language>) -> Self {
        self.languages = languages;
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    pub fn scan(&self) -> Result<Vec<ScannedFile>> {
        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .require_git(false)
            .follow_links(false) // Security: prevent symlink traversal attacks
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&self.root).unwrap_or(path);

            if self.should_exclude(relative, path) {
                continue;
            }

            if !self.should_include(relative, path) {
                continue;
            }

            let language = Language::from_path(path);
            if !language.is_known() {
                tracing::debug!("Skipping unrecognised file: {}", path.display());
                continue;
            }
            if !self.languages.contains(&language) {
                tracing::debug!("Skipping {} file (not enabled): {}", language, path.display());
                continue;
            }

            if let Ok(metadata) = path.metadata() {
                if metadata.len() > self.max_file_size {
                    tracing::debug!(
                        "Skipping {} ({} bytes exceeds limit)",
                        path.display(),
                        metadata.len()
                    );
                    continue;
                }

                files.push(ScannedFile {
                    path: path.to_path_buf(),
                    language,
                    size: metadata.len(),
                });
            }
        }

        Ok(files)
    }

    fn should_exclude(&self, relative: &Path, absolute: &Path) -> bool {
        self.exclude
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(absolute))
    }

    fn should_include(&self, relative: &Path, absolute: &Path) -> bool {
        self.include.is_empty()
            || self
                .include
                .iter()
                .any(|p| p.matches_path(relative) || p.matches_path(absolute))
    }
}

fn compile_patterns(patterns: &[String]) -> Vec<glob::Pattern> {
    patterns
        .iter()
        .filter_map(|pattern| match glob::Pattern::new(pattern) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!("Ignoring invalid glob pattern '{}': {}", pattern, e);
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ScannedFile {
    pub path: PathBuf,
    pub language: Language,
    pub size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn names(files: &[ScannedFile], root: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.path
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn test_scan_filters_by_language() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/App.java", "class App {}");
        write(dir.path(), "pkg/mod.py", "x = 1");
        write(dir.path(), "README.md", "# readme");

        let files = FileScanner::new(dir.path()).scan().unwrap();
        assert_eq!(names(&files, dir.path()), ["pkg/mod.py", "src/App.java"]);

        let java_only = FileScanner::new(dir.path())
            .with_languages(vec![Language::Java])
            .scan()
            .unwrap();
        assert_eq!(names(&java_only, dir.path()), ["src/App.java"]);
    }

    #[test]
    fn test_scan_exclude_and_include() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/App.java", "class App {}");
        write(dir.path(), "build/Gen.java", "class Gen {}");
        write(dir.path(), "scripts/tool.py", "x = 1");

        let files = FileScanner::new(dir.path())
            .with_exclude(vec!["build/**".to_string()])
            .with_include(vec!["**/*.java".to_string()])
            .scan()
            .unwrap();
        assert_eq!(names(&files, dir.path()), ["src/App.java"]);
    }

    #[test]
    fn test_scan_respects_gitignore() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), ".gitignore", "generated/\n");
        write(dir.path(), "generated/Out.java", "class Out {}");
        write(dir.path(), "src/In.java", "class In {}");

        let files = FileScanner::new(dir.path()).scan().unwrap();
        assert_eq!(names(&files, dir.path()), ["src/In.java"]);
    }

    #[test]
    fn test_scan_skips_large_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "big.py", &"x = 1\n".repeat(100));
        write(dir.path(), "small.py", "x = 1\n");

        let files = FileScanner::new(dir.path())
            .with_max_file_size(64)
            .scan()
            .unwrap();
        assert_eq!(names(&files, dir.path()), ["small.py"]);
    }
}
