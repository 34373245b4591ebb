//! Pure presentation helpers: URLs, authority links and short labels.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::Serialize;

use crate::person::{Person, Year};

/// Characters left unescaped by a browser's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const WIKIPEDIA_BASE: &str = "https://en.wikipedia.org/wiki/Special:GoToLinkedPage/enwiki/";
const WIKIDATA_BASE: &str = "https://www.wikidata.org/wiki/";
const ISISCB_BASE: &str = "https://data.isiscb.org/isis/authority/";
const VIAF_BASE: &str = "https://viaf.org/viaf/";

/// A link to an external authority record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExternalLink {
    pub label: &'static str,
    pub url: String,
}

/// Detail page URL for a person id
pub fn person_url(id: &str) -> String {
    format!("person.html?id={}", utf8_percent_encode(id, URI_COMPONENT))
}

/// Wikipedia, Wikidata, IsisCB and VIAF links, skipping absent identifiers
pub fn external_links(person: &Person) -> Vec<ExternalLink> {
    let mut links = Vec::new();
    if let Some(qid) = &person.wikidata_id {
        links.push(ExternalLink {
            label: "Wikipedia",
            url: format!("{WIKIPEDIA_BASE}{qid}"),
        });
        links.push(ExternalLink {
            label: "Wikidata",
            url: format!("{WIKIDATA_BASE}{qid}"),
        });
    }
    if let Some(isiscb) = &person.isiscb_id {
        links.push(ExternalLink {
            label: "IsisCB",
            url: format!("{ISISCB_BASE}{isiscb}"),
        });
    }
    if let Some(viaf) = &person.viaf_id {
        links.push(ExternalLink {
            label: "VIAF",
            url: format!("{VIAF_BASE}{viaf}"),
        });
    }
    links
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Role counts as short tags, e.g. `["2 awards", "1 membership"]`
pub fn role_summary(person: &Person) -> Vec<String> {
    [
        (person.awards.len(), "award"),
        (person.editorships.len(), "editorship"),
        (person.memberships.len(), "membership"),
    ]
    .into_iter()
    .filter(|(count, _)| *count > 0)
    .map(|(count, noun)| plural(count, noun))
    .collect()
}

/// `"1920 - 1935"`, a single year, or empty
pub fn year_range(start: Option<Year>, end: Option<Year>) -> String {
    match (start, end) {
        (Some(s), Some(e)) => format!("{s} - {e}"),
        (Some(y), None) | (None, Some(y)) => y.to_string(),
        (None, None) => String::new(),
    }
}

/// Shorten long option labels to `max - 2` characters plus `...`
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(2)).collect();
    format!("{kept}...")
}
