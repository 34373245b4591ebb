//! Person index for O(1) lookups by id.

use std::collections::HashMap;

use crate::person::Person;

/// The people dataset in source order plus an id -> position map.
///
/// Built once right after `people.json` is parsed and never mutated.
#[derive(Debug, Default)]
pub struct PeopleIndex {
    people: Vec<Person>,
    by_id: HashMap<String, usize>,
}

impl PeopleIndex {
    /// Build the index. On duplicate ids the first record wins, matching a
    /// front-to-back scan.
    pub fn new(people: Vec<Person>) -> Self {
        let mut by_id = HashMap::with_capacity(people.len());
        for (pos, person) in people.iter().enumerate() {
            by_id.entry(person.id.clone()).or_insert(pos);
        }
        Self { people, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&Person> {
        self.by_id.get(id).map(|&pos| &self.people[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// All people in dataset order
    pub fn all(&self) -> &[Person] {
        &self.people
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Person> {
        self.people.iter()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Number of ids that appear more than once
    pub fn duplicate_ids(&self) -> usize {
        self.people.len() - self.by_id.len()
    }
}
