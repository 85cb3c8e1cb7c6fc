use std::path::PathBuf;
use thiserror::Error;

/// Conditions that end a run with a non-zero exit code.
///
/// Everything else (missing fields, broken selectors, a failing wizard step)
/// is reported and the run carries on.
#[derive(Debug, Error)]
pub enum UploadError {
    /// Source file is missing.
    #[error("input file not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// `--index` points past the loaded records.
    #[error("record index {index} out of range ({available} records loaded)")]
    IndexOutOfRange { index: usize, available: usize },

    /// No usable record in the input.
    #[error("no valid property records in {}", .0.display())]
    NoRecords(PathBuf),

    /// Credentials for a portal are not configured.
    #[error("missing credentials: set {email_var} and {password_var}")]
    MissingCredentials {
        email_var: &'static str,
        password_var: &'static str,
    },

    /// Still on the login page after submitting credentials.
    #[error("authentication failed on {portal}: still at {url}")]
    Authentication { portal: String, url: String },

    /// The feed endpoint rejected the payload.
    #[error("upload rejected by {endpoint}: HTTP {status}: {body}")]
    Transmission {
        endpoint: String,
        status: u16,
        body: String,
    },
}
