pub mod artifacts;
pub mod browser;
pub mod checklist;
pub mod locator;
pub mod log;
#[cfg(test)]
pub(crate) mod mock;
pub mod resolver;
pub mod sequencer;
pub mod survey;
pub mod traits;
pub mod types;

pub use artifacts::ArtifactRecorder;
pub use browser::ChromePage;
pub use checklist::{amenity_checklist, checklist_targets, AmenityLabels, ChecklistEntry};
pub use locator::{css_all, text_all, Locator};
pub use log::{LogLevel, RunLog};
pub use resolver::{FieldResolver, FieldTarget, FillMode, FillOutcome};
pub use sequencer::{
    FollowUp, LoginFlow, StepReport, SubmissionOutcome, SubmitControls, SubmitPolicy,
    WizardEntry, WizardReport, WizardSequencer, WizardStep,
};
pub use survey::{survey_html, FormControl};
pub use traits::PageDriver;
pub use types::{RunOptions, Timeouts};
