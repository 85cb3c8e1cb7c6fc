use super::locator::Locator;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Capabilities the form driver needs from a live browser page.
/// Keeps the wizard logic independent of the automation engine behind it.
pub trait PageDriver {
    /// Navigate and wait for the load to finish
    fn goto(&self, url: &str) -> Result<()>;

    fn current_url(&self) -> Result<String>;

    /// Wait up to `timeout` for an attached, visible match
    fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<bool>;

    /// Lower-cased tag name of the first visible match
    fn tag_name(&self, locator: &Locator) -> Result<String>;

    /// Clear the current value, then type the new one
    fn fill(&self, locator: &Locator, value: &str) -> Result<()>;

    /// Select the option whose visible label equals `label`; false when none does
    fn select_by_label(&self, locator: &Locator, label: &str) -> Result<bool>;

    /// Select the option whose value equals `value` ignoring case; false when none does
    fn select_by_value(&self, locator: &Locator, value: &str) -> Result<bool>;

    fn is_checked(&self, locator: &Locator) -> Result<bool>;

    fn click(&self, locator: &Locator) -> Result<()>;

    fn set_files(&self, locator: &Locator, files: &[PathBuf]) -> Result<()>;

    fn press_key(&self, key: &str) -> Result<()>;

    /// Visible text of the document body
    fn body_text(&self) -> Result<String>;

    /// Full serialized HTML of the document
    fn html(&self) -> Result<String>;

    /// Full-page PNG
    fn screenshot(&self) -> Result<Vec<u8>>;

    /// Fixed wait to let slow third-party pages settle
    fn pause(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
