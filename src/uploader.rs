//! Upload runs: record selection, one authenticated session per portal,
//! one wizard pass per record.

use crate::automation::{
    ArtifactRecorder, ChromePage, PageDriver, RunOptions, SubmissionOutcome, WizardReport,
    WizardSequencer,
};
use crate::config::{Config, Credentials};
use crate::error::UploadError;
use crate::models::{self, PropertyRecord};
use crate::portals::{Portal, PortalProfile};
use anyhow::Result;
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of one record's wizard pass
#[derive(Debug)]
pub struct RecordOutcome {
    pub name: String,
    pub wizard_opened: bool,
    pub report: WizardReport,
}

/// Outcome of a whole upload run
#[derive(Debug, Default)]
pub struct UploadSummary {
    pub records: Vec<RecordOutcome>,
    pub summary_path: Option<PathBuf>,
}

/// Valid records only, narrowed to `index` when given
pub fn select_records(
    records: Vec<PropertyRecord>,
    index: Option<usize>,
) -> Result<Vec<PropertyRecord>, UploadError> {
    let mut valid = Vec::with_capacity(records.len());
    for record in records {
        if record.is_valid() {
            valid.push(record);
        } else {
            warn!(
                "Skipping row {} ({}): {}",
                record.row,
                record.display_name(),
                record.errors.join("; ")
            );
        }
    }

    match index {
        None => Ok(valid),
        Some(index) if index < valid.len() => Ok(vec![valid.swap_remove(index)]),
        Some(index) => Err(UploadError::IndexOutOfRange {
            index,
            available: valid.len(),
        }),
    }
}

/// What a dry run prints for one record
pub fn describe(record: &PropertyRecord, profile: &PortalProfile) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "{} -> {}", record.display_name(), profile.portal);
    let _ = writeln!(text, "  address: {}", record.full_address());
    let _ = writeln!(
        text,
        "  {} guests, {} bedrooms, {} bathrooms, {} m2",
        record.capacity.max_guests,
        record.capacity.bedrooms,
        record.capacity.bathrooms,
        record.capacity.area_sqm
    );
    let _ = writeln!(
        text,
        "  price/night: {} EUR",
        models::money(record.terms.price_per_night)
    );
    let _ = writeln!(text, "  amenities: {}", record.amenities.present_keys().join(", "));
    let _ = writeln!(text, "  photos: {}", record.photos.len());
    for step in profile.steps_for(record) {
        let fields: Vec<&str> = step
            .targets
            .iter()
            .filter(|t| t.value.is_some())
            .map(|t| t.name.as_str())
            .collect();
        let _ = writeln!(text, "  step {}: {}", step.name, fields.join(", "));
    }
    text
}

/// Launches Chrome and uploads every selected record to `portal`
pub fn run_upload(
    portal: Portal,
    records: &[PropertyRecord],
    options: &RunOptions,
    config: &Config,
) -> Result<UploadSummary> {
    let profile = portal.profile();

    if options.dry_run {
        for record in records {
            println!("{}", describe(record, &profile));
        }
        info!("Dry run: {} records, browser not started", records.len());
        return Ok(UploadSummary::default());
    }

    let credentials = config.credentials_for(portal)?;
    let artifacts = ArtifactRecorder::new(&options.artifacts_dir)?;
    let page = ChromePage::launch(options.headless, config.chromium_path.clone())?;

    drive(&page, &profile, records, credentials, artifacts, options)
}

/// Runs the whole session on an already open page
pub fn drive(
    page: &dyn PageDriver,
    profile: &PortalProfile,
    records: &[PropertyRecord],
    credentials: &Credentials,
    artifacts: ArtifactRecorder,
    options: &RunOptions,
) -> Result<UploadSummary> {
    let mut seq = WizardSequencer::new(page, artifacts, options.timeouts).interactive(options.interactive);
    let policy = profile.submit_policy(options.submit);

    let login = seq.authenticate(profile.portal.key(), &profile.login, credentials);
    if let Err(e) = login {
        let (log, artifacts) = seq.into_parts();
        artifacts.write_summary(&log.render())?;
        return Err(e);
    }

    let mut outcomes = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        if i > 0 {
            seq.log_mut()
                .info(format!("Pausing {}s before the next record", options.pause.as_secs()));
            page.pause(options.pause);
        }
        seq.log_mut().info(format!(
            "[{}/{}] {}",
            i + 1,
            records.len(),
            record.display_name()
        ));

        let wizard_opened = match seq.open_wizard(&profile.entry) {
            Ok(opened) => opened,
            Err(e) => {
                seq.log_mut().error(format!("Could not reach the wizard: {e:#}"));
                false
            }
        };
        seq.survey();
        let report = seq.run(&profile.steps_for(record), policy, &profile.submit);
        seq.log_mut().info(format!(
            "{}: {} fields filled, {} not found, {} failed steps",
            record.display_name(),
            report.filled(),
            report.not_found(),
            report.failed_steps()
        ));

        outcomes.push(RecordOutcome {
            name: record.display_name().to_string(),
            wizard_opened,
            report,
        });
    }

    let (log, artifacts) = seq.into_parts();
    let text = render_summary(profile.portal, &outcomes, &log.render());
    let summary_path = artifacts.write_summary(&text)?;
    if let Some(path) = &summary_path {
        info!("Summary written to {}", path.display());
    }

    Ok(UploadSummary {
        records: outcomes,
        summary_path,
    })
}

fn render_summary(portal: Portal, outcomes: &[RecordOutcome], log: &str) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Portal: {portal}");
    let _ = writeln!(text, "Records: {}", outcomes.len());
    for outcome in outcomes {
        let submission = match &outcome.report.submission {
            SubmissionOutcome::Withheld => "withheld".to_string(),
            SubmissionOutcome::Confirmed(keyword) => format!("confirmed ({keyword})"),
            SubmissionOutcome::Rejected(keyword) => format!("rejected ({keyword})"),
            SubmissionOutcome::Unverified => "unverified".to_string(),
            SubmissionOutcome::ControlNotFound => "save control not found".to_string(),
            SubmissionOutcome::Failed(e) => format!("failed ({e})"),
        };
        let _ = writeln!(
            text,
            "- {}: wizard {}, {} filled, {} not found, {} failed steps, submission {}",
            outcome.name,
            if outcome.wizard_opened { "opened" } else { "not confirmed" },
            outcome.report.filled(),
            outcome.report.not_found(),
            outcome.report.failed_steps(),
            submission
        );
    }
    text.push('\n');
    text.push_str(log);
    text
}
