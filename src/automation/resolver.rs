use super::locator::Locator;
use super::log::RunLog;
use super::traits::PageDriver;
use anyhow::{bail, Result};
use std::path::PathBuf;
use std::time::Duration;

/// How a resolved control receives its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Text,
    Select,
    /// Tick a checkbox or radio; never unticks
    Check,
    Click,
    /// `;`-separated local paths for a file input
    Files,
}

/// A logical form field and the ranked ways to find it
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTarget {
    pub name: String,
    pub candidates: Vec<Locator>,
    /// `None` when the record has nothing for this field
    pub value: Option<String>,
    pub mode: FillMode,
}

impl FieldTarget {
    pub fn new(
        name: impl Into<String>,
        candidates: Vec<Locator>,
        value: Option<String>,
        mode: FillMode,
    ) -> Self {
        Self {
            name: name.into(),
            candidates,
            value,
            mode,
        }
    }

    /// Text field; an empty value counts as absent
    pub fn text(name: impl Into<String>, candidates: Vec<Locator>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(name, candidates, (!value.is_empty()).then_some(value), FillMode::Text)
    }

    pub fn optional(name: impl Into<String>, candidates: Vec<Locator>, value: Option<String>) -> Self {
        Self::new(name, candidates, value.filter(|v| !v.is_empty()), FillMode::Text)
    }

    pub fn select(name: impl Into<String>, candidates: Vec<Locator>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(name, candidates, (!value.is_empty()).then_some(value), FillMode::Select)
    }

    pub fn check(name: impl Into<String>, candidates: Vec<Locator>) -> Self {
        Self::new(name, candidates, Some(String::new()), FillMode::Check)
    }

    pub fn click(name: impl Into<String>, candidates: Vec<Locator>) -> Self {
        Self::new(name, candidates, Some(String::new()), FillMode::Click)
    }

    pub fn files(name: impl Into<String>, candidates: Vec<Locator>, paths: &[PathBuf]) -> Self {
        let value = paths
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(";");
        Self::new(name, candidates, (!value.is_empty()).then_some(value), FillMode::Files)
    }
}

/// Result of applying one target
#[derive(Debug, Clone, PartialEq)]
pub enum FillOutcome {
    Filled(Locator),
    /// The record omits the field; the page was not touched
    Absent,
    /// No candidate became visible
    NotFound,
    /// A candidate resolved but acting on it failed
    Failed { locator: Locator, error: String },
}

impl FillOutcome {
    pub fn is_filled(&self) -> bool {
        matches!(self, FillOutcome::Filled(_))
    }
}

/// First-match-wins field resolution
#[derive(Debug, Clone)]
pub struct FieldResolver {
    pub timeout: Duration,
}

impl Default for FieldResolver {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

impl FieldResolver {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// First candidate that is attached and visible within the timeout.
    /// Page errors while probing count as "not this candidate".
    pub fn resolve(&self, page: &dyn PageDriver, candidates: &[Locator]) -> Option<Locator> {
        candidates
            .iter()
            .find(|locator| page.wait_visible(locator, self.timeout).unwrap_or(false))
            .cloned()
    }

    /// Resolves and fills one target; never fails the caller
    pub fn apply(&self, page: &dyn PageDriver, target: &FieldTarget, log: &mut RunLog) -> FillOutcome {
        let Some(value) = target.value.as_deref() else {
            log.info(format!("{}: no value in record, skipped", target.name));
            return FillOutcome::Absent;
        };

        let Some(locator) = self.resolve(page, &target.candidates) else {
            log.warn(format!(
                "{}: not found ({} candidates tried)",
                target.name,
                target.candidates.len()
            ));
            return FillOutcome::NotFound;
        };

        match act(page, &locator, value, target.mode) {
            Ok(()) => {
                log.ok(format!("{} -> {}", target.name, locator));
                FillOutcome::Filled(locator)
            }
            Err(e) => {
                log.warn(format!("{}: {} failed: {}", target.name, locator, e));
                FillOutcome::Failed {
                    locator,
                    error: e.to_string(),
                }
            }
        }
    }
}

fn act(page: &dyn PageDriver, locator: &Locator, value: &str, mode: FillMode) -> Result<()> {
    match mode {
        FillMode::Text => {
            if page.tag_name(locator)? == "select" {
                select(page, locator, value)
            } else {
                page.fill(locator, value)
            }
        }
        FillMode::Select => select(page, locator, value),
        FillMode::Check => {
            if !page.is_checked(locator)? {
                page.click(locator)?;
            }
            Ok(())
        }
        FillMode::Click => page.click(locator),
        FillMode::Files => {
            let files: Vec<PathBuf> = value
                .split(';')
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect();
            page.set_files(locator, &files)
        }
    }
}

/// Visible label first, then the lower-cased value
fn select(page: &dyn PageDriver, locator: &Locator, value: &str) -> Result<()> {
    if page.select_by_label(locator, value)? {
        return Ok(());
    }
    if page.select_by_value(locator, &value.to_lowercase())? {
        return Ok(());
    }
    bail!("no option matching '{}'", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::log::LogLevel;
    use crate::automation::mock::MockPage;

    fn abc() -> Vec<Locator> {
        vec![
            Locator::css("#a"),
            Locator::label("B"),
            Locator::text("C"),
        ]
    }

    #[test]
    fn first_visible_candidate_wins_and_later_ones_are_never_queried() {
        let page = MockPage::new().visible(Locator::label("B")).visible(Locator::text("C"));
        let mut log = RunLog::new();
        let target = FieldTarget::text("city", abc(), "Stintino");

        let outcome = FieldResolver::default().apply(&page, &target, &mut log);

        assert_eq!(outcome, FillOutcome::Filled(Locator::label("B")));
        assert_eq!(page.queried(), vec![Locator::css("#a"), Locator::label("B")]);
        assert_eq!(page.actions(), vec!["fill label=B = Stintino".to_string()]);
    }

    #[test]
    fn unresolved_field_logs_exactly_one_not_found() {
        let page = MockPage::new();
        let mut log = RunLog::new();
        let target = FieldTarget::text("city", abc(), "Stintino");

        let outcome = FieldResolver::default().apply(&page, &target, &mut log);

        assert_eq!(outcome, FillOutcome::NotFound);
        assert_eq!(page.queried().len(), 3);
        assert_eq!(log.count_matching(LogLevel::Warn, "not found"), 1);
        assert_eq!(log.entries().len(), 1);
        assert!(page.actions().is_empty());
    }

    #[test]
    fn absent_value_never_touches_the_page() {
        let page = MockPage::new().visible(Locator::css("#a"));
        let mut log = RunLog::new();
        let target = FieldTarget::optional("deposit", abc(), None);

        let outcome = FieldResolver::default().apply(&page, &target, &mut log);

        assert_eq!(outcome, FillOutcome::Absent);
        assert!(page.queried().is_empty());
    }

    #[test]
    fn select_tries_label_then_lowercased_value() {
        let country = Locator::css("select[name=country]");
        let page = MockPage::new()
            .visible(country.clone())
            .select(country.clone(), &[("Italy", "IT"), ("France", "FR")]);
        let mut log = RunLog::new();

        let by_value = FieldTarget::select("country", vec![country.clone()], "IT");
        assert!(FieldResolver::default().apply(&page, &by_value, &mut log).is_filled());

        let by_label = FieldTarget::select("country", vec![country.clone()], "France");
        assert!(FieldResolver::default().apply(&page, &by_label, &mut log).is_filled());

        assert_eq!(
            page.actions(),
            vec![
                "select css=select[name=country] value it".to_string(),
                "select css=select[name=country] label France".to_string(),
            ]
        );

        let missing = FieldTarget::select("country", vec![country], "Spain");
        assert!(matches!(
            FieldResolver::default().apply(&page, &missing, &mut log),
            FillOutcome::Failed { .. }
        ));
    }

    #[test]
    fn text_mode_delegates_to_select_for_select_elements() {
        let guests = Locator::css("select[name=guests]");
        let page = MockPage::new()
            .visible(guests.clone())
            .select(guests.clone(), &[("4", "4")]);
        let mut log = RunLog::new();

        let target = FieldTarget::text("guests", vec![guests], "4");
        assert!(FieldResolver::default().apply(&page, &target, &mut log).is_filled());
        assert_eq!(page.actions(), vec!["select css=select[name=guests] label 4".to_string()]);
    }

    #[test]
    fn check_never_unticks() {
        let wifi = Locator::label("WiFi");
        let pool = Locator::label("Piscina");
        let page = MockPage::new()
            .visible(wifi.clone())
            .visible(pool.clone())
            .checked(wifi.clone());
        let mut log = RunLog::new();
        let resolver = FieldResolver::default();

        resolver.apply(&page, &FieldTarget::check("wifi", vec![wifi]), &mut log);
        resolver.apply(&page, &FieldTarget::check("pool", vec![pool]), &mut log);

        assert_eq!(page.actions(), vec!["click label=Piscina".to_string()]);
    }

    #[test]
    fn action_error_is_reported_as_failed() {
        let name = Locator::css("#name");
        let page = MockPage::new().visible(name.clone()).failing(name.clone());
        let mut log = RunLog::new();

        let outcome =
            FieldResolver::default().apply(&page, &FieldTarget::text("name", vec![name], "x"), &mut log);
        assert!(matches!(outcome, FillOutcome::Failed { .. }));
        assert_eq!(log.count_matching(LogLevel::Warn, "failed"), 1);
    }

    #[test]
    fn file_targets_split_paths() {
        let input = Locator::css("input[type=file]");
        let page = MockPage::new().visible(input.clone());
        let mut log = RunLog::new();
        let target = FieldTarget::files(
            "photos",
            vec![input],
            &[PathBuf::from("a.jpg"), PathBuf::from("b.jpg")],
        );

        assert!(FieldResolver::default().apply(&page, &target, &mut log).is_filled());
        assert_eq!(page.actions(), vec!["files css=input[type=file] = 2".to_string()]);
        assert_eq!(FieldTarget::files("photos", vec![], &[]).value, None);
    }
}
