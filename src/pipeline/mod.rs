pub mod export;
pub mod report;
pub mod validate;

use crate::error::UploadError;
use crate::models::{PropertyDocument, PropertyRecord, SourceRow};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

pub use export::{read_booking_csv, write_exports, BookingRow, ExportSummary};
pub use report::render_report;
pub use validate::{normalize_phone, parse_row, ValidationRules};

/// Reads the tabular source and validates every row.
///
/// Only a missing file or an unreadable header is fatal; a broken row becomes
/// an invalid record carrying the reason.
pub fn load_records(path: &Path, rules: &ValidationRules) -> Result<Vec<PropertyRecord>> {
    if !path.exists() {
        return Err(UploadError::MissingInput(path.to_path_buf()).into());
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open {}", path.display()))?;
    reader
        .headers()
        .with_context(|| format!("Failed to read CSV header of {}", path.display()))?;

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<SourceRow>().enumerate() {
        let index = i + 1;
        let record = match result {
            Ok(row) => parse_row(row, index, rules),
            Err(e) => {
                warn!("Row {} could not be read: {}", index, e);
                PropertyRecord {
                    row: index,
                    errors: vec![format!("row could not be read: {e}")],
                    ..Default::default()
                }
            }
        };
        records.push(record);
    }

    let valid = records.iter().filter(|r| r.is_valid()).count();
    info!(
        "Loaded {} records from {} ({} valid)",
        records.len(),
        path.display(),
        valid
    );
    Ok(records)
}

/// Reads a nested property document (one property per file)
pub fn load_document(path: &Path, rules: &ValidationRules) -> Result<PropertyRecord> {
    if !path.exists() {
        return Err(UploadError::MissingInput(path.to_path_buf()).into());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: PropertyDocument = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse property document {}", path.display()))?;

    Ok(parse_row(document.into_row(), 1, rules))
}

/// Loads either input shape, chosen by file extension
pub fn load_input(path: &Path, rules: &ValidationRules) -> Result<Vec<PropertyRecord>> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if is_json {
        Ok(vec![load_document(path, rules)?])
    } else {
        load_records(path, rules)
    }
}
