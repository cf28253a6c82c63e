//! Filesystem output sink
//!
//! Artifacts are written to a uniquely named temp file in the target
//! directory and renamed into place, so readers never observe a partial file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashSet;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::CollisionPolicy;
use crate::types::{DocumentorError, Result};

/// Destination for generated artifacts
#[async_trait]
pub trait FileOutputSink: Send + Sync {
    /// Write `content` and return the path actually used
    async fn write(&self, path: &Path, content: &str) -> Result<PathBuf>;

    /// Create a directory and its parents; idempotent
    async fn ensure_dir(&self, path: &Path) -> Result<()>;
}

pub type SharedSink = Arc<dyn FileOutputSink>;

/// Atomic filesystem writer with a collision policy
#[derive(Debug, Default)]
pub struct FsOutputSink {
    policy: CollisionPolicy,
    /// Paths claimed by writers of this sink
    reserved: DashSet<PathBuf>,
}

impl FsOutputSink {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            reserved: DashSet::new(),
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Claim `path` if nothing exists there yet
    fn claim(&self, path: &Path) -> bool {
        !path.exists() && self.reserved.insert(path.to_path_buf())
    }

    /// Target path under the collision policy; `None` means skip
    fn resolve_target(&self, path: &Path) -> Option<PathBuf> {
        match self.policy {
            CollisionPolicy::Overwrite => Some(path.to_path_buf()),
            CollisionPolicy::Skip => self.claim(path).then(|| path.to_path_buf()),
            CollisionPolicy::Suffix => {
                if self.claim(path) {
                    return Some(path.to_path_buf());
                }
                (1..)
                    .map(|n| suffixed_path(path, n))
                    .find(|candidate| self.claim(candidate))
            }
        }
    }
}

/// `name.ext` -> `name_<n>.ext`
pub fn suffixed_path(path: &Path, n: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, n, ext.to_string_lossy()),
        None => format!("{}_{}", stem, n),
    };
    path.with_file_name(file_name)
}

fn output_error(action: &str, path: &Path, err: std::io::Error) -> DocumentorError {
    DocumentorError::Output(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// A failed write may leave a partial temp file behind
async fn discard_temp(temp: &Path) {
    match tokio::fs::remove_file(temp).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!("Failed to remove temp file {}: {}", temp.display(), e),
    }
}

#[async_trait]
impl FileOutputSink for FsOutputSink {
    async fn write(&self, path: &Path, content: &str) -> Result<PathBuf> {
        let Some(target) = self.resolve_target(path) else {
            debug!("Skipping existing file: {}", path.display());
            return Ok(path.to_path_buf());
        };

        let parent = target
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| output_error("create directory", parent, e))?;

        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let temp = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let written = match tokio::fs::write(&temp, content).await {
            Ok(()) => tokio::fs::rename(&temp, &target)
                .await
                .map_err(|e| output_error("write", &target, e)),
            Err(e) => Err(output_error("write", &temp, e)),
        };
        if let Err(e) = written {
            discard_temp(&temp).await;
            return Err(e);
        }

        debug!("Wrote {} ({} bytes)", target.display(), content.len());
        Ok(target)
    }

    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| output_error("create directory", path, e))
    }
}
