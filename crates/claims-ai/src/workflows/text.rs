use serde::{Deserialize, Serialize};

/// Lowercases and collapses whitespace so keyword checks see a stable form.
pub(crate) fn normalize_text(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_lowercase()
}

/// First keyword (in list order) contained in the already-normalized text.
pub(crate) fn first_keyword<'a>(normalized: &str, keywords: &'a [String]) -> Option<&'a str> {
    keywords
        .iter()
        .map(|keyword| keyword.as_str())
        .find(|keyword| {
            let keyword = keyword.trim();
            !keyword.is_empty() && normalized.contains(&keyword.to_lowercase())
        })
}

/// Named bucket with the keywords that route text into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub category: String,
    pub keywords: Vec<String>,
}

impl KeywordCategory {
    pub fn new(category: &str, keywords: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
        }
    }
}

/// First category whose keywords appear in `text`; categories are checked in order.
pub(crate) fn categorize<'a>(text: &str, categories: &'a [KeywordCategory]) -> Option<&'a str> {
    let normalized = normalize_text(text);
    categories
        .iter()
        .find(|entry| first_keyword(&normalized, &entry.keywords).is_some())
        .map(|entry| entry.category.as_str())
}

pub(crate) fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
