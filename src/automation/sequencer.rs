use super::artifacts::ArtifactRecorder;
use super::locator::Locator;
use super::log::RunLog;
use super::resolver::{FieldResolver, FieldTarget, FillOutcome};
use super::survey::{survey_html, FormControl};
use super::traits::PageDriver;
use super::types::Timeouts;
use crate::config::Credentials;
use crate::error::UploadError;
use anyhow::{Context, Result};
use std::io::BufRead;
use std::time::Duration;

/// Page texts that suggest a CAPTCHA or a one-time-code challenge
const CHALLENGE_MARKERS: [&str; 5] = ["captcha", "verification", "verifica", "codice", "confirm"];

/// Extra action after a step's fields are filled
#[derive(Debug, Clone, PartialEq)]
pub enum FollowUp {
    /// Click the first autocomplete suggestion, pressing Enter when none shows
    PickSuggestion(Vec<Locator>),
    PressKey(&'static str),
}

/// One screen (or tab) of a portal wizard
#[derive(Debug, Clone)]
pub struct WizardStep {
    pub name: &'static str,
    /// Control that must be activated first ("show more amenities", manual address entry, a tab)
    pub reveal: Option<FieldTarget>,
    pub targets: Vec<FieldTarget>,
    pub follow_up: Option<FollowUp>,
    /// "Next" control candidates; empty for single-page forms
    pub advance: Vec<Locator>,
    pub settle: Duration,
}

impl WizardStep {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            reveal: None,
            targets: Vec::new(),
            follow_up: None,
            advance: Vec::new(),
            settle: Duration::from_secs(2),
        }
    }

    pub fn reveal(mut self, target: FieldTarget) -> Self {
        self.reveal = Some(target);
        self
    }

    pub fn target(mut self, target: FieldTarget) -> Self {
        self.targets.push(target);
        self
    }

    pub fn targets(mut self, targets: impl IntoIterator<Item = FieldTarget>) -> Self {
        self.targets.extend(targets);
        self
    }

    pub fn follow_up(mut self, follow_up: FollowUp) -> Self {
        self.follow_up = Some(follow_up);
        self
    }

    pub fn advance(mut self, advance: Vec<Locator>) -> Self {
        self.advance = advance;
        self
    }

    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }
}

/// Login form description
#[derive(Debug, Clone)]
pub struct LoginFlow {
    pub url: String,
    pub email: Vec<Locator>,
    /// Two-screen logins show the password after a "continue" control
    pub continue_after_email: Vec<Locator>,
    pub password: Vec<Locator>,
    pub submit: Vec<Locator>,
    /// Still on a URL containing one of these after submitting means the login failed
    pub failure_markers: &'static [&'static str],
    pub settle: Duration,
}

/// How to reach the "add property" wizard after login
#[derive(Debug, Clone)]
pub struct WizardEntry {
    pub home: Option<String>,
    pub links: Vec<Locator>,
    /// Direct URLs tried in order when no link is visible
    pub urls: Vec<String>,
    /// Visible once the wizard has loaded
    pub probe: Vec<Locator>,
    pub settle: Duration,
}

/// Whether the final save control is clicked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitPolicy {
    /// Stop at the review page
    Withhold,
    /// Click save and classify the resulting page by keyword
    SubmitAndVerify,
}

/// Final save control and the keywords used to classify the response page
#[derive(Debug, Clone)]
pub struct SubmitControls {
    pub save: Vec<Locator>,
    pub success: &'static [&'static str],
    pub failure: &'static [&'static str],
    pub settle: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Withheld,
    /// Response page contains this success keyword
    Confirmed(String),
    /// Response page contains this error keyword
    Rejected(String),
    /// Saved, but the page says neither
    Unverified,
    ControlNotFound,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct StepReport {
    pub name: &'static str,
    pub fields: Vec<(String, FillOutcome)>,
    pub advanced: bool,
    pub error: Option<String>,
}

impl StepReport {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            fields: Vec::new(),
            advanced: false,
            error: None,
        }
    }

    pub fn outcome(&self, field: &str) -> Option<&FillOutcome> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, outcome)| outcome)
    }
}

#[derive(Debug, Clone)]
pub struct WizardReport {
    pub steps: Vec<StepReport>,
    pub submission: SubmissionOutcome,
}

impl WizardReport {
    pub fn filled(&self) -> usize {
        self.count(|o| o.is_filled())
    }

    pub fn not_found(&self) -> usize {
        self.count(|o| matches!(o, FillOutcome::NotFound))
    }

    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.error.is_some()).count()
    }

    fn count(&self, pred: impl Fn(&FillOutcome) -> bool) -> usize {
        self.steps
            .iter()
            .flat_map(|s| s.fields.iter())
            .filter(|(_, o)| pred(o))
            .count()
    }
}

/// Drives one authenticated page through a portal's step table
pub struct WizardSequencer<'a> {
    page: &'a dyn PageDriver,
    resolver: FieldResolver,
    probe: FieldResolver,
    timeouts: Timeouts,
    interactive: bool,
    artifacts: ArtifactRecorder,
    log: RunLog,
}

impl<'a> WizardSequencer<'a> {
    pub fn new(page: &'a dyn PageDriver, artifacts: ArtifactRecorder, timeouts: Timeouts) -> Self {
        Self {
            page,
            resolver: FieldResolver::new(timeouts.field),
            probe: FieldResolver::new(timeouts.probe),
            timeouts,
            interactive: false,
            artifacts,
            log: RunLog::new(),
        }
    }

    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn log(&self) -> &RunLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut RunLog {
        &mut self.log
    }

    pub fn artifacts(&self) -> &ArtifactRecorder {
        &self.artifacts
    }

    fn settle(&self, duration: Duration) {
        self.page.pause(duration.min(self.timeouts.max_settle));
    }

    /// Clicks the first visible cookie-consent control, if any
    pub fn dismiss_cookies(&mut self) -> bool {
        let candidates = vec![
            Locator::css("#onetrust-accept-btn-handler"),
            Locator::css("button[id*='accept']"),
            Locator::text("Accetta tutti"),
            Locator::text("Accept All"),
            Locator::text("Accetta"),
            Locator::text("Accept"),
            Locator::text("Accetto"),
        ];
        let quick = FieldResolver::new(Duration::from_millis(500));
        let Some(button) = quick.resolve(self.page, &candidates) else {
            return false;
        };
        match self.page.click(&button) {
            Ok(()) => {
                self.log.info(format!("Cookie banner closed ({button})"));
                self.settle(Duration::from_secs(1));
                true
            }
            Err(e) => {
                self.log.warn(format!("Cookie banner click failed: {e}"));
                false
            }
        }
    }

    /// Logs in; still being on a login URL afterwards is fatal
    pub fn authenticate(&mut self, portal: &str, flow: &LoginFlow, credentials: &Credentials) -> Result<()> {
        self.log.info(format!("Login page: {}", flow.url));
        self.page
            .goto(&flow.url)
            .with_context(|| format!("Failed to open login page {}", flow.url))?;
        self.settle(flow.settle);
        self.artifacts.screenshot(self.page, "login_page");
        self.dismiss_cookies();

        let email = FieldTarget::text("login_email", flow.email.clone(), credentials.email.clone());
        self.resolver.apply(self.page, &email, &mut self.log);

        if let Some(next) = self.probe.resolve(self.page, &flow.continue_after_email) {
            self.page.click(&next).context("Failed to continue past the email screen")?;
            self.settle(Duration::from_secs(3));
        }

        let password = FieldTarget::text("login_password", flow.password.clone(), credentials.password.clone());
        self.resolver.apply(self.page, &password, &mut self.log);
        self.resolver
            .apply(self.page, &FieldTarget::click("login_submit", flow.submit.clone()), &mut self.log);
        self.settle(flow.settle);

        if self.interactive {
            let body = self.page.body_text().unwrap_or_default().to_lowercase();
            if CHALLENGE_MARKERS.iter().any(|m| body.contains(m)) {
                self.log.warn("Verification challenge detected, waiting for the operator");
                wait_for_operator("Complete the verification in the browser, then press Enter...")?;
            }
        }

        self.artifacts.screenshot(self.page, "after_login");
        let url = self.page.current_url()?;
        self.log.info(format!("URL after login: {url}"));
        let lowered = url.to_lowercase();
        if flow.failure_markers.iter().any(|m| lowered.contains(m)) {
            self.artifacts.capture(self.page, "login_failed");
            self.log.error("Still on the login page: wrong credentials or 2FA pending");
            return Err(UploadError::Authentication {
                portal: portal.to_string(),
                url,
            }
            .into());
        }

        self.log.ok("Login successful");
        Ok(())
    }

    /// Reaches the wizard through a visible link, else through direct URLs.
    /// Returns false (and keeps going on the current page) when neither works.
    pub fn open_wizard(&mut self, entry: &WizardEntry) -> Result<bool> {
        if let Some(home) = &entry.home {
            self.page
                .goto(home)
                .with_context(|| format!("Failed to open {home}"))?;
            self.settle(entry.settle);
            self.artifacts.screenshot(self.page, "home");
        }

        if let Some(link) = self.probe.resolve(self.page, &entry.links) {
            match self.page.click(&link) {
                Ok(()) => {
                    self.settle(entry.settle);
                    if self.wizard_visible(entry) {
                        self.log.ok(format!("Wizard opened via {link}"));
                        self.artifacts.capture(self.page, "wizard");
                        return Ok(true);
                    }
                }
                Err(e) => self.log.warn(format!("Entry link {link} failed: {e}")),
            }
        }

        for url in &entry.urls {
            self.log.info(format!("[fallback] {url}"));
            if let Err(e) = self.page.goto(url) {
                self.log.warn(format!("Navigation to {url} failed: {e}"));
                continue;
            }
            self.settle(entry.settle);
            if self.wizard_visible(entry) {
                self.log.ok(format!("Wizard found at {url}"));
                self.artifacts.capture(self.page, "wizard");
                return Ok(true);
            }
        }

        self.log.warn("Wizard entry not reached, continuing on the current page");
        self.artifacts.capture(self.page, "wizard_not_found");
        Ok(false)
    }

    fn wizard_visible(&self, entry: &WizardEntry) -> bool {
        entry.probe.is_empty() || self.probe.resolve(self.page, &entry.probe).is_some()
    }

    /// Logs every form control on the current page
    pub fn survey(&mut self) -> Vec<FormControl> {
        let controls = match self.page.html().and_then(|html| survey_html(&html)) {
            Ok(controls) => controls,
            Err(e) => {
                self.log.warn(format!("Form survey failed: {e}"));
                return Vec::new();
            }
        };
        self.log.info(format!("[form] {} controls", controls.len()));
        for control in &controls {
            self.log.info(format!("  {}", control.describe()));
        }
        controls
    }

    /// Runs the step table, captures the review page, then applies the submit policy
    pub fn run(
        &mut self,
        steps: &[WizardStep],
        policy: SubmitPolicy,
        controls: &SubmitControls,
    ) -> WizardReport {
        let mut reports = Vec::with_capacity(steps.len());

        for (i, step) in steps.iter().enumerate() {
            self.log.info(format!("Step {}: {}", i + 1, step.name));
            let mut report = StepReport::new(step.name);
            match self.run_step(step, &mut report) {
                Ok(()) => self.log.ok(format!("{} done", step.name)),
                Err(e) => {
                    self.log.error(format!("{} failed: {:#}", step.name, e));
                    self.artifacts
                        .capture(self.page, &format!("error_{}", step.name));
                    report.error = Some(format!("{e:#}"));
                }
            }
            self.artifacts.screenshot(self.page, step.name);
            reports.push(report);
        }

        self.artifacts.capture(self.page, "review");
        let submission = self.submit(policy, controls);

        WizardReport {
            steps: reports,
            submission,
        }
    }

    fn run_step(&mut self, step: &WizardStep, report: &mut StepReport) -> Result<()> {
        if let Some(reveal) = &step.reveal {
            match self.probe.resolve(self.page, &reveal.candidates) {
                Some(control) => {
                    self.page
                        .click(&control)
                        .with_context(|| format!("Failed to activate {}", reveal.name))?;
                    self.log.ok(format!("{} -> {}", reveal.name, control));
                    self.settle(Duration::from_secs(1));
                }
                None => self.log.info(format!("{}: not present", reveal.name)),
            }
        }

        for target in &step.targets {
            let outcome = self.resolver.apply(self.page, target, &mut self.log);
            report.fields.push((target.name.clone(), outcome));
        }

        match &step.follow_up {
            Some(FollowUp::PickSuggestion(suggestions)) => {
                self.settle(Duration::from_secs(2));
                match self.probe.resolve(self.page, suggestions) {
                    Some(suggestion) => self
                        .page
                        .click(&suggestion)
                        .context("Failed to pick the autocomplete suggestion")?,
                    None => self.page.press_key("Enter")?,
                }
            }
            Some(FollowUp::PressKey(key)) => self.page.press_key(key)?,
            None => {}
        }

        report.advanced = self.advance(step);
        self.settle(step.settle);
        Ok(())
    }

    fn advance(&mut self, step: &WizardStep) -> bool {
        if step.advance.is_empty() {
            return false;
        }
        let Some(control) = self.probe.resolve(self.page, &step.advance) else {
            self.log.warn(format!("{}: no advance control found", step.name));
            return false;
        };
        match self.page.click(&control) {
            Ok(()) => {
                self.log.ok(format!("{}: advanced via {}", step.name, control));
                true
            }
            Err(e) => {
                self.log.warn(format!("{}: advance via {} failed: {}", step.name, control, e));
                false
            }
        }
    }

    /// Applies the submit policy on the current page
    pub fn submit(&mut self, policy: SubmitPolicy, controls: &SubmitControls) -> SubmissionOutcome {
        if policy == SubmitPolicy::Withhold {
            self.log.info("STOP: submission withheld, review the listing manually");
            return SubmissionOutcome::Withheld;
        }

        let Some(save) = self.probe.resolve(self.page, &controls.save) else {
            self.log.error("Save control not found");
            self.artifacts.capture(self.page, "save_not_found");
            return SubmissionOutcome::ControlNotFound;
        };
        if let Err(e) = self.page.click(&save) {
            self.log.error(format!("Could not click save ({save}): {e}"));
            self.artifacts.capture(self.page, "save_failed");
            return SubmissionOutcome::Failed(e.to_string());
        }
        self.settle(controls.settle);
        self.artifacts.screenshot(self.page, "after_save");

        let body = match self.page.body_text() {
            Ok(body) => body.to_lowercase(),
            Err(e) => {
                self.log.warn(format!("Could not read the response page: {e}"));
                return SubmissionOutcome::Unverified;
            }
        };

        if let Some(keyword) = controls.success.iter().find(|k| body.contains(*k)) {
            self.log.ok(format!("Listing saved (page says '{keyword}')"));
            SubmissionOutcome::Confirmed(keyword.to_string())
        } else if let Some(keyword) = controls.failure.iter().find(|k| body.contains(*k)) {
            self.log.warn(format!("Possible validation error after save (page says '{keyword}')"));
            self.artifacts.capture(self.page, "save_rejected");
            SubmissionOutcome::Rejected(keyword.to_string())
        } else {
            self.log.warn("Save sent without an explicit confirmation, verify manually");
            SubmissionOutcome::Unverified
        }
    }

    pub fn into_parts(self) -> (RunLog, ArtifactRecorder) {
        (self.log, self.artifacts)
    }
}

fn wait_for_operator(prompt: &str) -> Result<()> {
    println!("\n>>> {prompt}");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read operator confirmation")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::log::LogLevel;
    use crate::automation::mock::MockPage;

    const SUCCESS: &[&str] = &["success", "salvato"];
    const FAILURE: &[&str] = &["error", "obbligatorio"];

    fn controls() -> SubmitControls {
        SubmitControls {
            save: vec![Locator::css("button[type=submit]")],
            success: SUCCESS,
            failure: FAILURE,
            settle: Duration::ZERO,
        }
    }

    fn sequencer(page: &MockPage) -> WizardSequencer<'_> {
        WizardSequencer::new(page, ArtifactRecorder::disabled(), Timeouts::default())
    }

    #[test]
    fn missing_controls_do_not_stop_later_steps() {
        let name = Locator::css("#name");
        let city = Locator::css("#city");
        let page = MockPage::new().visible(name.clone()).visible(city.clone());
        let steps = vec![
            WizardStep::new("name")
                .target(FieldTarget::text("name", vec![name], "Il Faro"))
                .follow_up(FollowUp::PickSuggestion(vec![Locator::css(".suggestion")])),
            WizardStep::new("broken")
                .reveal(FieldTarget::click("tab", vec![Locator::css("#tab")]))
                .target(FieldTarget::text("missing", vec![Locator::css("#nope")], "x")),
            WizardStep::new("city").target(FieldTarget::text("city", vec![city], "Badesi")),
        ];

        let mut seq = sequencer(&page);
        let report = seq.run(&steps, SubmitPolicy::Withhold, &controls());

        assert_eq!(report.steps.len(), 3);
        assert_eq!(report.filled(), 2);
        assert_eq!(report.not_found(), 1);
        assert_eq!(report.submission, SubmissionOutcome::Withheld);
        assert!(page.actions().contains(&"key Enter".to_string()));
        // one checkpoint per step plus the review capture
        assert_eq!(seq.artifacts().count(), 4);
    }

    #[test]
    fn step_error_is_captured_and_run_continues() {
        let tab = Locator::css("#tab");
        let city = Locator::css("#city");
        let page = MockPage::new()
            .visible(tab.clone())
            .failing(tab.clone())
            .visible(city.clone());
        let steps = vec![
            WizardStep::new("location")
                .reveal(FieldTarget::click("tab_location", vec![tab]))
                .target(FieldTarget::text("address", vec![Locator::css("#address")], "Via Roma 1")),
            WizardStep::new("city").target(FieldTarget::text("city", vec![city], "Badesi")),
        ];

        let mut seq = sequencer(&page);
        let report = seq.run(&steps, SubmitPolicy::Withhold, &controls());

        assert!(report.steps[0].error.is_some());
        assert_eq!(report.failed_steps(), 1);
        assert!(report.steps[1].outcome("city").is_some_and(FillOutcome::is_filled));
        // error capture + two step checkpoints + review
        assert_eq!(seq.artifacts().count(), 4);
        assert_eq!(seq.log().count_matching(LogLevel::Error, "location failed"), 1);
    }

    #[test]
    fn missing_advance_control_is_logged_not_fatal() {
        let page = MockPage::new();
        let steps = vec![
            WizardStep::new("type").advance(vec![Locator::text("Avanti")]),
            WizardStep::new("single_page"),
        ];

        let mut seq = sequencer(&page);
        let report = seq.run(&steps, SubmitPolicy::Withhold, &controls());

        assert!(!report.steps[0].advanced);
        assert_eq!(seq.log().count_matching(LogLevel::Warn, "no advance control"), 1);
    }

    #[test]
    fn submit_classifies_response_by_keyword() {
        let save = Locator::css("button[type=submit]");
        let confirmed = MockPage::new()
            .visible(save.clone())
            .body("Your property has been submitted successfully.");
        assert_eq!(
            sequencer(&confirmed).submit(SubmitPolicy::SubmitAndVerify, &controls()),
            SubmissionOutcome::Confirmed("success".to_string())
        );

        let rejected = MockPage::new()
            .visible(save.clone())
            .body("Campo obbligatorio");
        assert_eq!(
            sequencer(&rejected).submit(SubmitPolicy::SubmitAndVerify, &controls()),
            SubmissionOutcome::Rejected("obbligatorio".to_string())
        );

        let silent = MockPage::new().visible(save).body("Dashboard");
        assert_eq!(
            sequencer(&silent).submit(SubmitPolicy::SubmitAndVerify, &controls()),
            SubmissionOutcome::Unverified
        );

        let missing = MockPage::new();
        assert_eq!(
            sequencer(&missing).submit(SubmitPolicy::SubmitAndVerify, &controls()),
            SubmissionOutcome::ControlNotFound
        );
    }

    fn login_flow() -> LoginFlow {
        LoginFlow {
            url: "https://portal.test/login".to_string(),
            email: vec![Locator::css("input[type=email]")],
            continue_after_email: Vec::new(),
            password: vec![Locator::css("input[type=password]")],
            submit: vec![Locator::css("button[type=submit]")],
            failure_markers: &["login", "sign-in"],
            settle: Duration::ZERO,
        }
    }

    fn credentials() -> Credentials {
        Credentials {
            email: "host@example.it".to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn authentication_fails_when_still_on_login_page() {
        let page = MockPage::new()
            .visible(Locator::css("input[type=email]"))
            .visible(Locator::css("input[type=password]"))
            .visible(Locator::css("button[type=submit]"));

        let err = sequencer(&page)
            .authenticate("casevacanza", &login_flow(), &credentials())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<UploadError>(),
            Some(UploadError::Authentication { .. })
        ));
    }

    #[test]
    fn authentication_succeeds_after_redirect() {
        let submit = Locator::css("button[type=submit]");
        let page = MockPage::new()
            .visible(Locator::css("input[type=email]"))
            .visible(Locator::css("input[type=password]"))
            .visible(submit.clone())
            .redirect_on_click(submit, "https://portal.test/dashboard");

        let mut seq = sequencer(&page);
        seq.authenticate("casevacanza", &login_flow(), &credentials()).unwrap();
        assert!(page
            .actions()
            .contains(&"fill css=input[type=email] = host@example.it".to_string()));
        assert!(!seq.log().render().contains("secret"));
    }

    #[test]
    fn open_wizard_falls_back_to_direct_urls() {
        let page = MockPage::new().visible(Locator::css("input[name=property_name]"));
        let entry = WizardEntry {
            home: None,
            links: vec![Locator::text("List your property")],
            urls: vec!["https://portal.test/create".to_string()],
            probe: vec![Locator::css("input[name=property_name]")],
            settle: Duration::ZERO,
        };

        assert!(sequencer(&page).open_wizard(&entry).unwrap());
        assert_eq!(page.actions(), vec!["goto https://portal.test/create".to_string()]);
    }
}
