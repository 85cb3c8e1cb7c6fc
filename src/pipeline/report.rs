use crate::models::{self, PropertyRecord};
use std::fmt::Write;

/// Human-readable validation report: totals, per-row errors, valid records table
pub fn render_report(records: &[PropertyRecord]) -> String {
    let total = records.len();
    let valid = records.iter().filter(|r| r.is_valid()).count();
    let invalid = total - valid;
    let rule = "=".repeat(60);
    let thin = "-".repeat(60);

    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "VALIDATION REPORT");
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "Records read      : {total}");
    let _ = writeln!(out, "Valid records     : {valid}");
    let _ = writeln!(out, "Records w/ errors : {invalid}");

    if invalid > 0 {
        let _ = writeln!(out, "\nERROR DETAILS:");
        let _ = writeln!(out, "{thin}");
        for record in records.iter().filter(|r| !r.is_valid()) {
            let _ = writeln!(out, "\n  Row {} - '{}':", record.row, record.display_name());
            for error in &record.errors {
                let _ = writeln!(out, "    - {error}");
            }
        }
    }

    let _ = writeln!(out, "\nVALID RECORDS:");
    let _ = writeln!(out, "{thin}");
    for record in records.iter().filter(|r| r.is_valid()) {
        let _ = writeln!(
            out,
            "  {:<40} {:<15} €{:>7}/night  {}",
            record.identity.name,
            record.structure_label(),
            models::money(record.terms.price_per_night),
            record.location.city
        );
    }
    let _ = writeln!(out, "{rule}");
    out
}
