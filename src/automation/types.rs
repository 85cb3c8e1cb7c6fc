use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Wait limits for one driver run
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Timeouts {
    /// Visibility wait per field candidate
    pub field: Duration,
    /// Visibility wait for optional controls (advance, reveal, entry links)
    pub probe: Duration,
    /// Upper bound for fixed settle waits
    pub max_settle: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            field: Duration::from_secs(5),
            probe: Duration::from_secs(2),
            max_settle: Duration::from_secs(10),
        }
    }
}

/// Options for an upload run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    /// Run Chrome without a window
    pub headless: bool,
    /// Print what would be uploaded without opening a browser
    pub dry_run: bool,
    /// Only the record at this 0-based index
    pub index: Option<usize>,
    /// Pause between records
    pub pause: Duration,
    /// Click the final save control where the portal allows it
    pub submit: bool,
    /// Artifact directory for this run
    pub artifacts_dir: PathBuf,
    /// Operator may solve CAPTCHA/OTP challenges in the browser window
    pub interactive: bool,
    pub timeouts: Timeouts,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            headless: true,
            dry_run: false,
            index: None,
            pause: Duration::from_secs(3),
            submit: false,
            artifacts_dir: PathBuf::from("artifacts"),
            interactive: false,
            timeouts: Timeouts::default(),
        }
    }
}
