use anyhow::{anyhow, Result};
use scraper::{Html, Selector};

/// One form control found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormControl {
    pub tag: String,
    pub kind: String,
    pub name: String,
    pub id: String,
    pub placeholder: String,
    /// Button caption, trimmed to 80 characters
    pub text: String,
}

impl FormControl {
    pub fn describe(&self) -> String {
        match self.tag.as_str() {
            "button" => format!("button type={:?} text={:?}", self.kind, self.text),
            "select" => format!("select name={:?} id={:?}", self.name, self.id),
            tag => format!(
                "{} type={:?} name={:?} id={:?} placeholder={:?}",
                tag, self.kind, self.name, self.id, self.placeholder
            ),
        }
    }
}

const MAX_INPUTS: usize = 40;
const MAX_OTHERS: usize = 20;

/// Lists the inputs, textareas, selects and buttons of a page, for
/// building selector tables against a changed portal layout
pub fn survey_html(html: &str) -> Result<Vec<FormControl>> {
    let document = Html::parse_document(html);
    let mut controls = Vec::new();

    for (query, limit) in [
        ("input", MAX_INPUTS),
        ("textarea", MAX_OTHERS),
        ("select", MAX_OTHERS),
        ("button", MAX_OTHERS),
    ] {
        let selector =
            Selector::parse(query).map_err(|e| anyhow!("Invalid selector {}: {:?}", query, e))?;
        for element in document.select(&selector).take(limit) {
            let attr = |name: &str| element.value().attr(name).unwrap_or("").to_string();
            let kind = match (query, element.value().attr("type")) {
                (_, Some(kind)) => kind.to_string(),
                ("input", None) => "text".to_string(),
                _ => String::new(),
            };
            let text = if query == "button" {
                element
                    .text()
                    .collect::<String>()
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .chars()
                    .take(80)
                    .collect()
            } else {
                String::new()
            };
            controls.push(FormControl {
                tag: query.to_string(),
                kind,
                name: attr("name"),
                id: attr("id"),
                placeholder: attr("placeholder"),
                text,
            });
        }
    }

    Ok(controls)
}
