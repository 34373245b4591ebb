//! Person records and their role entries
//!
//! Core types for representing scholars in the people dataset.

use serde::{Deserialize, Serialize};

use crate::wire;

/// Calendar year as written by the data generator
pub type Year = i32;

/// An award received by a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub name: String,
    #[serde(default, deserialize_with = "wire::opt_year")]
    pub year: Option<Year>,
}

/// A journal editorship held by a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editorship {
    pub journal: String,
    #[serde(default, deserialize_with = "wire::opt_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_year")]
    pub start: Option<Year>,
    #[serde(default, deserialize_with = "wire::opt_year")]
    pub end: Option<Year>,
}

/// An organizational role held by a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub org: String,
    #[serde(default, deserialize_with = "wire::opt_string")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_year")]
    pub start: Option<Year>,
    #[serde(default, deserialize_with = "wire::opt_year")]
    pub end: Option<Year>,
}

/// One scholar record from `people.json`.
///
/// Deserialization goes through [`PersonRecord`] so that fields the
/// generator may omit (`role_count`, the year span) are derived instead of
/// defaulting to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PersonRecord")]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wikidata_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isiscb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viaf_id: Option<String>,
    pub awards: Vec<Award>,
    pub editorships: Vec<Editorship>,
    pub memberships: Vec<Membership>,
    /// Declared number of role entries; checked against the arrays at load time
    pub role_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earliest_year: Option<Year>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_year: Option<Year>,
}

/// Wire shape of a person as produced by the generator.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonRecord {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "wire::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_string")]
    pub wikidata_id: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_string")]
    pub isiscb_id: Option<String>,
    #[serde(default, deserialize_with = "wire::opt_string")]
    pub viaf_id: Option<String>,
    #[serde(default)]
    pub awards: Vec<Award>,
    #[serde(default)]
    pub editorships: Vec<Editorship>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
    #[serde(default)]
    pub role_count: Option<usize>,
    #[serde(default, deserialize_with = "wire::opt_year")]
    pub earliest_year: Option<Year>,
    #[serde(default, deserialize_with = "wire::opt_year")]
    pub latest_year: Option<Year>,
}

impl From<PersonRecord> for Person {
    fn from(record: PersonRecord) -> Self {
        let mut person = Person {
            id: record.id,
            name: record.name,
            description: record.description,
            wikidata_id: record.wikidata_id,
            isiscb_id: record.isiscb_id,
            viaf_id: record.viaf_id,
            awards: record.awards,
            editorships: record.editorships,
            memberships: record.memberships,
            role_count: 0,
            earliest_year: record.earliest_year,
            latest_year: record.latest_year,
        };
        person.role_count = record
            .role_count
            .unwrap_or_else(|| person.computed_role_count());
        if person.earliest_year.is_none() && person.latest_year.is_none() {
            if let Some((lo, hi)) = person.year_span() {
                person.earliest_year = Some(lo);
                person.latest_year = Some(hi);
            }
        }
        person
    }
}

impl Person {
    /// Create a person with no roles
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            wikidata_id: None,
            isiscb_id: None,
            viaf_id: None,
            awards: Vec::new(),
            editorships: Vec::new(),
            memberships: Vec::new(),
            role_count: 0,
            earliest_year: None,
            latest_year: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_award(mut self, name: impl Into<String>, year: Option<Year>) -> Self {
        self.awards.push(Award {
            name: name.into(),
            year,
        });
        self.refresh_derived();
        self
    }

    pub fn with_editorship(
        mut self,
        journal: impl Into<String>,
        start: Option<Year>,
        end: Option<Year>,
    ) -> Self {
        self.editorships.push(Editorship {
            journal: journal.into(),
            role: None,
            start,
            end,
        });
        self.refresh_derived();
        self
    }

    pub fn with_membership(
        mut self,
        org: impl Into<String>,
        start: Option<Year>,
        end: Option<Year>,
    ) -> Self {
        self.memberships.push(Membership {
            org: org.into(),
            role: None,
            start,
            end,
        });
        self.refresh_derived();
        self
    }

    fn refresh_derived(&mut self) {
        self.role_count = self.computed_role_count();
        let span = self.year_span();
        self.earliest_year = span.map(|(lo, _)| lo);
        self.latest_year = span.map(|(_, hi)| hi);
    }

    /// Number of role entries actually present
    pub fn computed_role_count(&self) -> usize {
        self.awards.len() + self.editorships.len() + self.memberships.len()
    }

    /// Whether the declared role count disagrees with the role arrays
    pub fn role_count_mismatch(&self) -> bool {
        self.role_count != self.computed_role_count()
    }

    /// Earliest and latest year across all role entries
    pub fn year_span(&self) -> Option<(Year, Year)> {
        let years = self
            .awards
            .iter()
            .filter_map(|a| a.year)
            .chain(self.editorships.iter().flat_map(|e| [e.start, e.end]).flatten())
            .chain(self.memberships.iter().flat_map(|m| [m.start, m.end]).flatten());

        years.fold(None, |acc, y| match acc {
            None => Some((y, y)),
            Some((lo, hi)) => Some((lo.min(y), hi.max(y))),
        })
    }

    pub fn is_member_of(&self, org: &str) -> bool {
        self.memberships.iter().any(|m| m.org == org)
    }

    pub fn is_editor_of(&self, journal: &str) -> bool {
        self.editorships.iter().any(|e| e.journal == journal)
    }

    pub fn holds_award(&self, award: &str) -> bool {
        self.awards.iter().any(|a| a.name == award)
    }

    /// Awards ordered by year, unknown years last. Ties keep input order.
    pub fn awards_by_year(&self) -> Vec<&Award> {
        let mut awards: Vec<&Award> = self.awards.iter().collect();
        awards.sort_by_key(|a| a.year.unwrap_or(Year::MAX));
        awards
    }
}
