use anyhow::{Context, Result};
use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Which endpoint produced a document; decides the filename prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Generated,
    Refined,
}

impl ArtifactKind {
    fn prefix(self) -> &'static str {
        match self {
            ArtifactKind::Generated => "ui",
            ArtifactKind::Refined => "ui_refined",
        }
    }
}

/// Writes every produced document to disk as an audit trail. Files are never
/// read back.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    dir: PathBuf,
}

impl ArtifactWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the output directory if missing.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("failed to create output directory {}", self.dir.display()))
    }

    /// Save `code` and return the bare filename, e.g. `ui_20250101_120000_042.html`.
    pub async fn write(&self, kind: ArtifactKind, code: &str) -> Result<String> {
        let filename = format!(
            "{}_{}.html",
            kind.prefix(),
            Local::now().format("%Y%m%d_%H%M%S_%3f")
        );
        let path = self.dir.join(&filename);
        tokio::fs::write(&path, code)
            .await
            .with_context(|| format!("failed to write artifact {}", path.display()))?;
        debug!("Saved artifact {}", path.display());
        Ok(filename)
    }
}
