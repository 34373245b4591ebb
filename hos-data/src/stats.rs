//! Precomputed aggregate statistics (`stats.json`)

use serde::{Deserialize, Serialize};

/// Role entries per decade
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecadeCount {
    pub decade: i32,
    pub count: usize,
}

/// A person ranked by number of graph links
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectedPerson {
    pub id: String,
    pub name: String,
    pub connections: usize,
}

/// Membership count for one organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_people: usize,
    pub total_awards: usize,
    pub total_journals: usize,
    pub total_organizations: usize,
    #[serde(default)]
    pub total_connected: usize,
    #[serde(default)]
    pub total_edges: usize,
    #[serde(default)]
    pub awards_list: Vec<String>,
    #[serde(default)]
    pub journals_list: Vec<String>,
    #[serde(default)]
    pub organizations_list: Vec<String>,
    #[serde(default)]
    pub timeline: Vec<DecadeCount>,
    #[serde(default)]
    pub top_connected: Vec<ConnectedPerson>,
    #[serde(default)]
    pub org_stats: Vec<OrgCount>,
}
