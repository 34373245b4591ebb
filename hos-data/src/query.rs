//! Search, filter and sort over the people index.
//!
//! Everything here is a synchronous read over resident data:
//! - `search_people`: bounded, order-preserving substring search
//! - `PersonFilter`: conjunction of optional directory criteria
//! - `sort_people`: stable two-key sort used by the directory table

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::index::PeopleIndex;
use crate::person::Person;

/// Maximum number of results returned by [`search_people`]
pub const SEARCH_LIMIT: usize = 50;

/// Whether `person` contains the lowercased needle in any searchable field
fn matches_any_field(person: &Person, needle: &str) -> bool {
    contains_lower(&person.name, needle)
        || person
            .description
            .as_deref()
            .is_some_and(|d| contains_lower(d, needle))
        || person.awards.iter().any(|a| contains_lower(&a.name, needle))
        || person
            .editorships
            .iter()
            .any(|e| contains_lower(&e.journal, needle))
        || person
            .memberships
            .iter()
            .any(|m| contains_lower(&m.org, needle))
}

fn contains_lower(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Case-insensitive substring search over name, description, award names,
/// journals and organizations. Dataset order is kept and the result is
/// capped at [`SEARCH_LIMIT`].
pub fn search_people<'a>(index: &'a PeopleIndex, query: &str) -> Vec<&'a Person> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    index
        .iter()
        .filter(|p| matches_any_field(p, &needle))
        .take(SEARCH_LIMIT)
        .collect()
}

/// Directory filter. Every criterion left as `None` (or empty) passes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonFilter {
    /// Substring of name or description, case-insensitive
    pub text: Option<String>,
    /// Exact organization name of some membership
    pub organization: Option<String>,
    /// Exact journal name of some editorship
    pub journal: Option<String>,
    /// Exact award name
    pub award: Option<String>,
}

impl PersonFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_organization(mut self, org: impl Into<String>) -> Self {
        self.organization = Some(org.into());
        self
    }

    pub fn with_journal(mut self, journal: impl Into<String>) -> Self {
        self.journal = Some(journal.into());
        self
    }

    pub fn with_award(mut self, award: impl Into<String>) -> Self {
        self.award = Some(award.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        criterion(&self.text).is_none()
            && criterion(&self.organization).is_none()
            && criterion(&self.journal).is_none()
            && criterion(&self.award).is_none()
    }

    pub fn matches(&self, person: &Person) -> bool {
        if let Some(text) = criterion(&self.text) {
            let needle = text.to_lowercase();
            let hit = contains_lower(&person.name, &needle)
                || person
                    .description
                    .as_deref()
                    .is_some_and(|d| contains_lower(d, &needle));
            if !hit {
                return false;
            }
        }
        if let Some(org) = criterion(&self.organization) {
            if !person.is_member_of(org) {
                return false;
            }
        }
        if let Some(journal) = criterion(&self.journal) {
            if !person.is_editor_of(journal) {
                return false;
            }
        }
        if let Some(award) = criterion(&self.award) {
            if !person.holds_award(award) {
                return false;
            }
        }
        true
    }

    /// Matching people in dataset order
    pub fn apply<'a>(&self, people: &'a [Person]) -> Vec<&'a Person> {
        people.iter().filter(|p| self.matches(p)).collect()
    }
}

fn criterion(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Directory sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    Name,
    RoleCount,
}

impl FromStr for SortField {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "roles" | "role_count" => Ok(Self::RoleCount),
            other => Err(DataError::other(format!("unknown sort field: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Current directory sort, toggled by clicking column headers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortState {
    pub fn new(field: SortField, order: SortOrder) -> Self {
        Self { field, order }
    }

    /// Same field flips the order; a new field starts ascending
    pub fn toggle(self, field: SortField) -> Self {
        if self.field == field {
            Self::new(field, self.order.reversed())
        } else {
            Self::new(field, SortOrder::Ascending)
        }
    }

    pub fn compare(&self, a: &Person, b: &Person) -> Ordering {
        let ord = match self.field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::RoleCount => a.role_count.cmp(&b.role_count),
        };
        match self.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

/// Stable sort; equal keys keep their input order in both directions
pub fn sort_people(people: &mut [&Person], sort: SortState) {
    match sort.field {
        SortField::Name => {
            // Lowercase each name once instead of per comparison
            let mut keyed: Vec<(String, &Person)> = people
                .iter()
                .map(|p| (p.name.to_lowercase(), *p))
                .collect();
            keyed.sort_by(|(ka, _), (kb, _)| match sort.order {
                SortOrder::Ascending => ka.cmp(kb),
                SortOrder::Descending => kb.cmp(ka),
            });
            for (slot, (_, person)) in people.iter_mut().zip(keyed) {
                *slot = person;
            }
        }
        SortField::RoleCount => people.sort_by(|a, b| sort.compare(a, b)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Person {
        Person::new("p1", "Ada Lovelace").with_award("Legion of Honor", Some(1855))
    }

    fn sample() -> Vec<Person> {
        vec![
            Person::new("p1", "Sarton, George")
                .with_description("Founder of Isis")
                .with_editorship("Isis", Some(1913), Some(1952))
                .with_membership("History of Science Society", Some(1924), None),
            Person::new("p2", "Kuhn, Thomas").with_award("Sarton Medal", Some(1982)),
            Person::new("p3", "Needham, Joseph")
                .with_membership("Royal Society", Some(1941), None)
                .with_award("Sarton Medal", Some(1968)),
            Person::new("p4", "Lovelace, Ada"),
        ]
    }

    fn ids(people: &[&Person]) -> Vec<String> {
        people.iter().map(|p| p.id.clone()).collect()
    }

    #[test]
    fn test_search_matches_every_field() {
        let index = PeopleIndex::new(sample());

        assert_eq!(ids(&search_people(&index, "kuhn")), vec!["p2"]);
        assert_eq!(ids(&search_people(&index, "FOUNDER")), vec!["p1"]);
        assert_eq!(ids(&search_people(&index, "sarton medal")), vec!["p2", "p3"]);
        assert_eq!(ids(&search_people(&index, "isis")), vec!["p1"]);
        assert_eq!(ids(&search_people(&index, "royal")), vec!["p3"]);
    }

    #[test]
    fn test_search_preserves_dataset_order() {
        let index = PeopleIndex::new(sample());
        // "sarton" hits p1 by name and p2/p3 by award
        assert_eq!(ids(&search_people(&index, "sarton")), vec!["p1", "p2", "p3"]);
    }

    #[test]
    fn test_search_empty_query() {
        let index = PeopleIndex::new(sample());
        assert!(search_people(&index, "").is_empty());
    }

    #[test]
    fn test_search_caps_results() {
        let people: Vec<Person> = (0..120)
            .map(|i| Person::new(format!("p{i}"), format!("Member {i}")))
            .collect();
        let index = PeopleIndex::new(people);

        let results = search_people(&index, "member");
        assert_eq!(results.len(), SEARCH_LIMIT);
        assert_eq!(results[0].id, "p0");
        assert_eq!(results[49].id, "p49");
        assert!(results.iter().all(|p| p.name.to_lowercase().contains("member")));
    }

    #[test]
    fn test_search_scenario() {
        let index = PeopleIndex::new(vec![ada()]);
        assert_eq!(ids(&search_people(&index, "honor")), vec!["p1"]);
        assert!(search_people(&index, "zzz").is_empty());
    }

    #[test]
    fn test_filter_vacuous_when_empty() {
        let people = sample();
        let filter = PersonFilter::new().with_text("");
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&people).len(), people.len());
    }

    #[test]
    fn test_filter_text_only_checks_name_and_description() {
        let people = sample();
        assert_eq!(ids(&PersonFilter::new().with_text("isis").apply(&people)), vec!["p1"]);
        // award names are not part of the directory text filter
        assert!(PersonFilter::new().with_text("medal").apply(&people).is_empty());
    }

    #[test]
    fn test_filter_criteria_are_conjunctive() {
        let people = sample();

        let by_award = PersonFilter::new().with_award("Sarton Medal");
        assert_eq!(ids(&by_award.apply(&people)), vec!["p2", "p3"]);

        let narrowed = by_award.clone().with_organization("Royal Society");
        assert_eq!(ids(&narrowed.apply(&people)), vec!["p3"]);

        let none = narrowed.with_journal("Isis");
        assert!(none.apply(&people).is_empty());
    }

    #[test]
    fn test_filter_names_match_exactly() {
        let people = sample();
        assert!(PersonFilter::new()
            .with_organization("Royal")
            .apply(&people)
            .is_empty());
        assert_eq!(
            ids(&PersonFilter::new().with_journal("Isis").apply(&people)),
            vec!["p1"]
        );
    }

    #[test]
    fn test_sort_by_name_reverses_without_ties() {
        let people = sample();
        let mut asc: Vec<&Person> = people.iter().collect();
        sort_people(&mut asc, SortState::new(SortField::Name, SortOrder::Ascending));
        let mut desc: Vec<&Person> = people.iter().collect();
        sort_people(&mut desc, SortState::new(SortField::Name, SortOrder::Descending));

        assert_eq!(ids(&asc), vec!["p2", "p4", "p3", "p1"]);
        let mut reversed = ids(&desc);
        reversed.reverse();
        assert_eq!(ids(&asc), reversed);
    }

    #[test]
    fn test_sort_name_is_case_insensitive() {
        let people = vec![Person::new("a", "beta"), Person::new("b", "Alpha")];
        let mut refs: Vec<&Person> = people.iter().collect();
        sort_people(&mut refs, SortState::default());
        assert_eq!(ids(&refs), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_is_stable_both_directions() {
        let people = vec![
            Person::new("a", "Same"),
            Person::new("b", "same"),
            Person::new("c", "Other").with_award("X", None),
            Person::new("d", "SAME"),
        ];

        let mut refs: Vec<&Person> = people.iter().collect();
        sort_people(&mut refs, SortState::new(SortField::Name, SortOrder::Descending));
        assert_eq!(ids(&refs), vec!["a", "b", "d", "c"]);

        let mut refs: Vec<&Person> = people.iter().collect();
        sort_people(&mut refs, SortState::new(SortField::RoleCount, SortOrder::Descending));
        assert_eq!(ids(&refs), vec!["c", "a", "b", "d"]);

        let mut refs: Vec<&Person> = people.iter().collect();
        sort_people(&mut refs, SortState::new(SortField::RoleCount, SortOrder::Ascending));
        assert_eq!(ids(&refs), vec!["a", "b", "d", "c"]);
    }

    #[test]
    fn test_sort_state_toggle() {
        let state = SortState::default();
        let flipped = state.toggle(SortField::Name);
        assert_eq!(flipped.order, SortOrder::Descending);

        let switched = flipped.toggle(SortField::RoleCount);
        assert_eq!(
            switched,
            SortState::new(SortField::RoleCount, SortOrder::Ascending)
        );
    }

    #[test]
    fn test_sort_field_parse() {
        assert_eq!("roles".parse::<SortField>().unwrap(), SortField::RoleCount);
        assert_eq!("name".parse::<SortField>().unwrap(), SortField::Name);
        assert!("year".parse::<SortField>().is_err());
    }
}
