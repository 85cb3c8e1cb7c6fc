use super::traits::PageDriver;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Writes numbered screenshots, HTML snapshots and the run summary.
///
/// Capture failures are logged and swallowed so diagnostics can never break
/// the run they are diagnosing. Without a directory nothing is written but
/// checkpoints are still counted.
#[derive(Debug)]
pub struct ArtifactRecorder {
    dir: Option<PathBuf>,
    counter: u32,
}

impl ArtifactRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create artifact directory {}", dir.display()))?;
        Ok(Self {
            dir: Some(dir),
            counter: 0,
        })
    }

    pub fn disabled() -> Self {
        Self {
            dir: None,
            counter: 0,
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Checkpoints taken so far
    pub fn count(&self) -> u32 {
        self.counter
    }

    /// Saves `stepNN_<name>.png`
    pub fn screenshot(&mut self, page: &dyn PageDriver, name: &str) -> Option<PathBuf> {
        self.counter += 1;
        let dir = self.dir.as_ref()?;
        let path = dir.join(format!("step{:02}_{}.png", self.counter, name));
        match page.screenshot().and_then(|png| {
            fs::write(&path, png).with_context(|| format!("Failed to write {}", path.display()))
        }) {
            Ok(()) => {
                debug!("Screenshot: {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("Screenshot {} failed: {:#}", name, e);
                None
            }
        }
    }

    /// Saves `<name>.html`
    pub fn snapshot(&mut self, page: &dyn PageDriver, name: &str) -> Option<PathBuf> {
        let dir = self.dir.as_ref()?;
        let path = dir.join(format!("{name}.html"));
        match page.html().and_then(|html| {
            fs::write(&path, &html).with_context(|| format!("Failed to write {}", path.display()))?;
            Ok(html.len())
        }) {
            Ok(bytes) => {
                debug!("HTML saved: {} ({} bytes)", path.display(), bytes);
                Some(path)
            }
            Err(e) => {
                warn!("HTML snapshot {} failed: {:#}", name, e);
                None
            }
        }
    }

    /// Screenshot plus HTML under the same name
    pub fn capture(&mut self, page: &dyn PageDriver, name: &str) {
        self.screenshot(page, name);
        self.snapshot(page, name);
    }

    /// Writes `summary.txt`
    pub fn write_summary(&self, text: &str) -> Result<Option<PathBuf>> {
        let Some(dir) = self.dir.as_ref() else {
            return Ok(None);
        };
        let path = dir.join("summary.txt");
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(Some(path))
    }
}
