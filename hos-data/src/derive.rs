//! Offline derivation of `graph.json` and `stats.json` from `people.json`.
//!
//! Two people are linked when they share an organization (weight 1 per
//! organization), a journal (weight 2 per journal) or an award (weight 1 per
//! award). Only links with a total weight of at least [`MIN_LINK_WEIGHT`]
//! are kept.
//!
//! Years are taken as decoded by the loader, so a date-form editorship start
//! such as `"1985-03-01"` counts toward the 1980s in the timeline. The
//! upstream generator skips those strings; this derivation keeps them.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::graph::{Graph, GraphLink, GraphNode};
use crate::person::Person;
use crate::stats::{ConnectedPerson, DecadeCount, OrgCount, Stats};

pub const ORG_WEIGHT: u32 = 1;
pub const JOURNAL_WEIGHT: u32 = 2;
pub const AWARD_WEIGHT: u32 = 1;
pub const MIN_LINK_WEIGHT: u32 = 2;
/// Length of the `top_connected` ranking
pub const TOP_CONNECTED: usize = 15;

fn add_group_edges(
    groups: &BTreeMap<&str, BTreeSet<&str>>,
    weight: u32,
    edges: &mut BTreeMap<(String, String), u32>,
) {
    for members in groups.values() {
        let members: Vec<&str> = members.iter().copied().collect();
        for (i, a) in members.iter().enumerate() {
            for b in &members[i + 1..] {
                *edges.entry((a.to_string(), b.to_string())).or_default() += weight;
            }
        }
    }
}

/// Build the co-occurrence graph. Links are ordered by `(source, target)`
/// with `source < target`; nodes are the link endpoints ordered by id.
pub fn build_graph(people: &[Person]) -> Graph {
    let mut orgs: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut journals: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    let mut awards: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();

    for person in people {
        let id = person.id.as_str();
        for m in &person.memberships {
            orgs.entry(&m.org).or_default().insert(id);
        }
        for e in &person.editorships {
            journals.entry(&e.journal).or_default().insert(id);
        }
        for a in &person.awards {
            awards.entry(&a.name).or_default().insert(id);
        }
    }

    let mut edges: BTreeMap<(String, String), u32> = BTreeMap::new();
    add_group_edges(&orgs, ORG_WEIGHT, &mut edges);
    add_group_edges(&journals, JOURNAL_WEIGHT, &mut edges);
    add_group_edges(&awards, AWARD_WEIGHT, &mut edges);

    let links: Vec<GraphLink> = edges
        .into_iter()
        .filter(|(_, w)| *w >= MIN_LINK_WEIGHT)
        .map(|((source, target), weight)| GraphLink {
            source,
            target,
            weight,
        })
        .collect();

    let connected: BTreeSet<&str> = links
        .iter()
        .flat_map(|l| [l.source.as_str(), l.target.as_str()])
        .collect();

    let by_id: HashMap<&str, &Person> = people.iter().map(|p| (p.id.as_str(), p)).collect();
    let nodes = connected
        .into_iter()
        .filter_map(|id| by_id.get(id))
        .map(|p| GraphNode {
            id: p.id.clone(),
            name: p.name.clone(),
            description: p.description.clone(),
            role_count: Some(p.role_count),
        })
        .collect();

    Graph { nodes, links }
}

fn decade(year: i32) -> i32 {
    year.div_euclid(10) * 10
}

/// Compute dashboard aggregates from the people list and its graph
pub fn build_stats(people: &[Person], graph: &Graph) -> Stats {
    let mut all_awards: BTreeSet<&str> = BTreeSet::new();
    let mut all_journals: BTreeSet<&str> = BTreeSet::new();
    let mut all_orgs: BTreeSet<&str> = BTreeSet::new();
    let mut decades: BTreeMap<i32, usize> = BTreeMap::new();
    let mut org_members: HashMap<&str, usize> = HashMap::new();

    for person in people {
        for a in &person.awards {
            all_awards.insert(&a.name);
            if let Some(year) = a.year {
                *decades.entry(decade(year)).or_default() += 1;
            }
        }
        for e in &person.editorships {
            all_journals.insert(&e.journal);
            if let Some(start) = e.start {
                *decades.entry(decade(start)).or_default() += 1;
            }
        }
        for m in &person.memberships {
            all_orgs.insert(&m.org);
            *org_members.entry(&m.org).or_default() += 1;
        }
    }

    let mut connections: HashMap<&str, usize> = HashMap::new();
    for link in &graph.links {
        *connections.entry(&link.source).or_default() += 1;
        *connections.entry(&link.target).or_default() += 1;
    }
    let mut ranked: Vec<(&str, usize)> = connections.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let by_id: HashMap<&str, &Person> = people.iter().map(|p| (p.id.as_str(), p)).collect();
    let top_connected = ranked
        .into_iter()
        .take(TOP_CONNECTED)
        .filter_map(|(id, connections)| {
            by_id.get(id).map(|p| ConnectedPerson {
                id: p.id.clone(),
                name: p.name.clone(),
                connections,
            })
        })
        .collect();

    let mut org_stats: Vec<OrgCount> = org_members
        .into_iter()
        .map(|(name, count)| OrgCount {
            name: name.to_string(),
            count,
        })
        .collect();
    org_stats.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));

    Stats {
        total_people: people.len(),
        total_awards: all_awards.len(),
        total_journals: all_journals.len(),
        total_organizations: all_orgs.len(),
        total_connected: graph.nodes.len(),
        total_edges: graph.links.len(),
        awards_list: all_awards.into_iter().map(String::from).collect(),
        journals_list: all_journals.into_iter().map(String::from).collect(),
        organizations_list: all_orgs.into_iter().map(String::from).collect(),
        timeline: decades
            .into_iter()
            .map(|(decade, count)| DecadeCount { decade, count })
            .collect(),
        top_connected,
        org_stats,
    }
}
