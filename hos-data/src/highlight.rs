//! Search-term highlighting.

use regex::{Captures, RegexBuilder};

/// Markers placed around each highlighted occurrence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emphasis {
    pub open: String,
    pub close: String,
}

impl Emphasis {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }
}

impl Default for Emphasis {
    fn default() -> Self {
        Self::new("<mark>", "</mark>")
    }
}

/// Wrap every case-insensitive occurrence of `query` in `<mark>` tags.
pub fn highlight_match(text: &str, query: &str) -> String {
    highlight_with(text, query, &Emphasis::default())
}

/// Like [`highlight_match`] with custom markers.
///
/// The query is matched literally. An empty query, or one that cannot be
/// compiled, returns the text unchanged; matched text keeps its casing.
pub fn highlight_with(text: &str, query: &str, emphasis: &Emphasis) -> String {
    if text.is_empty() {
        return String::new();
    }
    if query.is_empty() {
        return text.to_string();
    }

    let pattern = match RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return text.to_string(),
    };

    pattern
        .replace_all(text, |caps: &Captures| {
            format!("{}{}{}", emphasis.open, &caps[0], emphasis.close)
        })
        .into_owned()
}
