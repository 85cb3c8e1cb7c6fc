use std::fmt;

/// Typed descriptor for finding one control on a page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// CSS attribute pattern, e.g. `input[name="city"]`
    Css(String),
    /// Form control associated with a `<label>` containing this text
    Label(String),
    /// Element whose own text contains this text
    Text(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn label(text: impl Into<String>) -> Self {
        Locator::Label(text.into())
    }

    pub fn text(text: impl Into<String>) -> Self {
        Locator::Text(text.into())
    }

    /// XPath equivalent for the label and text variants; `None` for CSS
    pub fn to_xpath(&self) -> Option<String> {
        match self {
            Locator::Css(_) => None,
            Locator::Label(text) => {
                let label = format!("//label[contains(normalize-space(.), {})]", xpath_literal(text));
                Some(format!(
                    "//*[@id={label}/@for] | {label}//*[self::input or self::select or self::textarea]"
                ))
            }
            Locator::Text(text) => Some(format!(
                "//*[not(self::script or self::style)][text()[contains(normalize-space(.), {})]]",
                xpath_literal(text)
            )),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css={selector}"),
            Locator::Label(text) => write!(f, "label={text}"),
            Locator::Text(text) => write!(f, "text={text}"),
        }
    }
}

/// Quotes a string for XPath 1.0, which has no escape sequences
fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value.split('\'').map(|part| format!("'{part}'")).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

/// Candidate list built from CSS selectors
pub fn css_all(selectors: &[&str]) -> Vec<Locator> {
    selectors.iter().map(|s| Locator::css(*s)).collect()
}

/// Candidate list built from visible texts
pub fn text_all(texts: &[&str]) -> Vec<Locator> {
    texts.iter().map(|t| Locator::text(*t)).collect()
}
