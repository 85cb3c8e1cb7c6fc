//! Recording in-memory page used by the driver tests.

use super::locator::Locator;
use super::traits::PageDriver;
use anyhow::{bail, Result};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct MockPage {
    visible: HashSet<Locator>,
    failing: HashSet<Locator>,
    tags: HashMap<Locator, String>,
    options: HashMap<Locator, Vec<(String, String)>>,
    redirects: HashMap<Locator, String>,
    body: String,
    html: String,
    url: RefCell<String>,
    checked: RefCell<HashSet<Locator>>,
    queried: RefCell<Vec<Locator>>,
    actions: RefCell<Vec<String>>,
}

impl MockPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible(mut self, locator: Locator) -> Self {
        self.visible.insert(locator);
        self
    }

    pub fn failing(mut self, locator: Locator) -> Self {
        self.failing.insert(locator);
        self
    }

    pub fn select(mut self, locator: Locator, options: &[(&str, &str)]) -> Self {
        self.tags.insert(locator.clone(), "select".to_string());
        self.options.insert(
            locator,
            options
                .iter()
                .map(|(label, value)| (label.to_string(), value.to_string()))
                .collect(),
        );
        self
    }

    pub fn checked(self, locator: Locator) -> Self {
        self.checked.borrow_mut().insert(locator);
        self
    }

    pub fn redirect_on_click(mut self, locator: Locator, url: &str) -> Self {
        self.redirects.insert(locator, url.to_string());
        self
    }

    pub fn body(mut self, text: &str) -> Self {
        self.body = text.to_string();
        self
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn at(self, url: &str) -> Self {
        *self.url.borrow_mut() = url.to_string();
        self
    }

    pub fn queried(&self) -> Vec<Locator> {
        self.queried.borrow().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.borrow().clone()
    }

    fn act(&self, locator: &Locator, action: String) -> Result<()> {
        if self.failing.contains(locator) {
            bail!("element detached: {}", locator);
        }
        self.actions.borrow_mut().push(action);
        Ok(())
    }
}

impl PageDriver for MockPage {
    fn goto(&self, url: &str) -> Result<()> {
        self.actions.borrow_mut().push(format!("goto {url}"));
        *self.url.borrow_mut() = url.to_string();
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.url.borrow().clone())
    }

    fn wait_visible(&self, locator: &Locator, _timeout: Duration) -> Result<bool> {
        self.queried.borrow_mut().push(locator.clone());
        Ok(self.visible.contains(locator))
    }

    fn tag_name(&self, locator: &Locator) -> Result<String> {
        Ok(self
            .tags
            .get(locator)
            .cloned()
            .unwrap_or_else(|| "input".to_string()))
    }

    fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        self.act(locator, format!("fill {locator} = {value}"))
    }

    fn select_by_label(&self, locator: &Locator, label: &str) -> Result<bool> {
        let found = self
            .options
            .get(locator)
            .map(|opts| opts.iter().any(|(l, _)| l == label))
            .unwrap_or(false);
        if found {
            self.act(locator, format!("select {locator} label {label}"))?;
        }
        Ok(found)
    }

    fn select_by_value(&self, locator: &Locator, value: &str) -> Result<bool> {
        let found = self
            .options
            .get(locator)
            .map(|opts| opts.iter().any(|(_, v)| v.eq_ignore_ascii_case(value)))
            .unwrap_or(false);
        if found {
            self.act(locator, format!("select {locator} value {value}"))?;
        }
        Ok(found)
    }

    fn is_checked(&self, locator: &Locator) -> Result<bool> {
        Ok(self.checked.borrow().contains(locator))
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        self.act(locator, format!("click {locator}"))?;
        self.checked.borrow_mut().insert(locator.clone());
        if let Some(url) = self.redirects.get(locator) {
            *self.url.borrow_mut() = url.clone();
        }
        Ok(())
    }

    fn set_files(&self, locator: &Locator, files: &[PathBuf]) -> Result<()> {
        self.act(locator, format!("files {locator} = {}", files.len()))
    }

    fn press_key(&self, key: &str) -> Result<()> {
        self.actions.borrow_mut().push(format!("key {key}"));
        Ok(())
    }

    fn body_text(&self) -> Result<String> {
        Ok(self.body.clone())
    }

    fn html(&self) -> Result<String> {
        Ok(self.html.clone())
    }

    fn screenshot(&self) -> Result<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    fn pause(&self, _duration: Duration) {}
}
