use std::path::Path;

use console::style;

/// Styled terminal messages for command handlers
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label: value` row
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("  {:<10} {}", style(format!("{}:", label)).dim(), value);
    }

    /// Path row marked with whether the path exists
    pub fn path_status(&self, label: &str, path: &Path) {
        let mark = if path.exists() {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!("  {:<9} {} {}", format!("{}:", label), mark, path.display());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
