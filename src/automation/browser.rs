use super::locator::Locator;
use super::traits::PageDriver;
use anyhow::{anyhow, bail, Context, Result};
use base64::prelude::{Engine as _, BASE64_STANDARD};
use headless_chrome::protocol::cdp::{Page, DOM};
use headless_chrome::{Browser, Element, LaunchOptions, Tab};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Chrome refuses captures taller than this
const MAX_CAPTURE_HEIGHT: f64 = 16_384.0;

const IS_VISIBLE: &str = "function() {
    if (!this.isConnected) return false;
    if (this.tagName === 'INPUT' && this.type === 'file') return true;
    const rect = this.getBoundingClientRect();
    const style = window.getComputedStyle(this);
    return rect.width > 0 && rect.height > 0
        && style.visibility !== 'hidden' && style.display !== 'none';
}";

const CLEAR_VALUE: &str = "function() {
    this.focus();
    this.value = '';
    this.dispatchEvent(new Event('input', { bubbles: true }));
}";

const SELECT_OPTION: &str = "function(wanted, byValue) {
    const match = Array.from(this.options || []).find(o => byValue
        ? o.value.toLowerCase() === wanted.toLowerCase()
        : o.text.trim() === wanted);
    if (!match) return false;
    this.value = match.value;
    this.dispatchEvent(new Event('input', { bubbles: true }));
    this.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
}";

/// One Chrome tab driven over the DevTools protocol
pub struct ChromePage {
    // Dropping the browser closes the tab
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromePage {
    /// Launch Chrome and open a blank tab
    pub fn launch(headless: bool, chromium_path: Option<PathBuf>) -> Result<Self> {
        info!("🌐 Launching Chrome (headless: {})...", headless);

        let options = LaunchOptions::default_builder()
            .headless(headless)
            .path(chromium_path)
            .window_size(Some((1366, 900)))
            .idle_browser_timeout(Duration::from_secs(600))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;
        let tab = browser.new_tab().context("Failed to open browser tab")?;

        Ok(Self {
            _browser: browser,
            tab,
        })
    }

    fn matches(&self, locator: &Locator) -> Vec<Element<'_>> {
        let found = match locator.to_xpath() {
            Some(xpath) => self.tab.find_elements_by_xpath(&xpath),
            None => match locator {
                Locator::Css(css) => self.tab.find_elements(css),
                _ => return Vec::new(),
            },
        };
        // Lookups fail with "no element found" instead of returning an empty list
        found.unwrap_or_default()
    }

    fn first_visible(&self, locator: &Locator) -> Option<Element<'_>> {
        self.matches(locator).into_iter().find(|element| {
            element
                .call_js_fn(IS_VISIBLE, vec![], false)
                .map(|result| result.value == Some(Value::Bool(true)))
                .unwrap_or(false)
        })
    }

    fn element(&self, locator: &Locator) -> Result<Element<'_>> {
        self.first_visible(locator)
            .ok_or_else(|| anyhow!("no visible element for {}", locator))
    }

    fn call_bool(&self, locator: &Locator, function: &str, args: Vec<Value>) -> Result<bool> {
        let result = self.element(locator)?.call_js_fn(function, args, false)?;
        Ok(result.value.and_then(|v| v.as_bool()).unwrap_or(false))
    }

    fn evaluate_string(&self, expression: &str) -> Result<String> {
        let result = self
            .tab
            .evaluate(expression, false)
            .with_context(|| format!("Failed to evaluate {expression}"))?;
        Ok(result
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }
}

impl PageDriver for ChromePage {
    fn goto(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.tab
            .navigate_to(url)
            .with_context(|| format!("Failed to navigate to {url}"))?;
        self.tab
            .wait_until_navigated()
            .with_context(|| format!("Timed out loading {url}"))?;
        Ok(())
    }

    fn current_url(&self) -> Result<String> {
        Ok(self.tab.get_url())
    }

    fn wait_visible(&self, locator: &Locator, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.first_visible(locator).is_some() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn tag_name(&self, locator: &Locator) -> Result<String> {
        let result = self
            .element(locator)?
            .call_js_fn("function() { return this.tagName.toLowerCase(); }", vec![], false)?;
        Ok(result
            .value
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    fn fill(&self, locator: &Locator, value: &str) -> Result<()> {
        let element = self.element(locator)?;
        element.call_js_fn(CLEAR_VALUE, vec![], false)?;
        element.type_into(value)?;
        Ok(())
    }

    fn select_by_label(&self, locator: &Locator, label: &str) -> Result<bool> {
        self.call_bool(locator, SELECT_OPTION, vec![json!(label), json!(false)])
    }

    fn select_by_value(&self, locator: &Locator, value: &str) -> Result<bool> {
        self.call_bool(locator, SELECT_OPTION, vec![json!(value), json!(true)])
    }

    fn is_checked(&self, locator: &Locator) -> Result<bool> {
        self.call_bool(locator, "function() { return !!this.checked; }", vec![])
    }

    fn click(&self, locator: &Locator) -> Result<()> {
        self.element(locator)?.click()?;
        Ok(())
    }

    fn set_files(&self, locator: &Locator, files: &[PathBuf]) -> Result<()> {
        let mut paths = Vec::with_capacity(files.len());
        for file in files {
            if !file.exists() {
                bail!("photo not found: {}", file.display());
            }
            let absolute = file
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", file.display()))?;
            paths.push(absolute.display().to_string());
        }

        let element = self.element(locator)?;
        self.tab.call_method(DOM::SetFileInputFiles {
            files: paths,
            node_id: None,
            backend_node_id: None,
            object_id: Some(element.remote_object_id.clone()),
        })?;
        Ok(())
    }

    fn press_key(&self, key: &str) -> Result<()> {
        self.tab.press_key(key)?;
        Ok(())
    }

    fn body_text(&self) -> Result<String> {
        self.evaluate_string("document.body ? document.body.innerText : ''")
    }

    fn html(&self) -> Result<String> {
        self.evaluate_string("document.documentElement.outerHTML")
    }

    fn screenshot(&self) -> Result<Vec<u8>> {
        let metrics = self
            .tab
            .call_method(Page::GetLayoutMetrics(None))
            .context("Failed to read page layout metrics")?;
        let content = metrics.css_content_size;

        let data = self
            .tab
            .call_method(Page::CaptureScreenshot {
                format: Some(Page::CaptureScreenshotFormatOption::Png),
                quality: None,
                clip: Some(full_page_clip(content.width, content.height)),
                from_surface: Some(true),
                capture_beyond_viewport: Some(true),
                optimize_for_speed: None,
            })
            .context("Failed to capture screenshot")?
            .data;
        BASE64_STANDARD
            .decode(data)
            .context("Screenshot data is not valid base64")
    }
}

/// Clip covering the whole scrollable document
fn full_page_clip(width: f64, height: f64) -> Page::Viewport {
    Page::Viewport {
        x: 0.0,
        y: 0.0,
        width: width.max(1.0).ceil(),
        height: height.clamp(1.0, MAX_CAPTURE_HEIGHT).ceil(),
        scale: 1.0,
    }
}
