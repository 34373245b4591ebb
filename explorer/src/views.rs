//! View models handed to the rendering layer.
//!
//! Plain serializable data; nothing here knows how it is displayed.

use hos_data::{
    ConnectedPerson, DecadeCount, EgoNetwork, ExternalLink, GraphLink, GraphNode, NetworkFilter,
    OrgCount, Person, RoleCategory, SortState,
};
use serde::Serialize;

/// One row of the search results list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub url: String,
    /// Name with the query highlighted
    pub name: String,
    /// Description with the query highlighted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// e.g. `["2 awards", "1 editorship"]`
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub query: String,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryRow {
    pub id: String,
    pub url: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub awards: Vec<String>,
    pub journals: Vec<String>,
    pub membership_count: usize,
    pub role_count: usize,
    pub links: Vec<ExternalLink>,
}

/// Filter drop-down choices
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterChoices {
    pub organizations: Vec<String>,
    pub journals: Vec<String>,
    pub awards: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectoryPage {
    pub rows: Vec<DirectoryRow>,
    pub total: usize,
    pub sort: SortState,
    pub choices: FilterChoices,
}

impl DirectoryPage {
    /// `"12 of 340 people"`
    pub fn count_label(&self) -> String {
        format!("{} of {} people", self.rows.len(), self.total)
    }
}

/// An award, editorship or membership line on the detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleLine {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub years: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonDetail {
    pub person: Person,
    pub url: String,
    pub links: Vec<ExternalLink>,
    pub awards: Vec<RoleLine>,
    pub editorships: Vec<RoleLine>,
    pub memberships: Vec<RoleLine>,
    pub network: EgoNetwork,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkNode {
    #[serde(flatten)]
    pub node: GraphNode,
    pub category: RoleCategory,
    pub degree: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkView {
    pub filter: NetworkFilter,
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<GraphLink>,
    pub choices: FilterChoices,
}

impl NetworkView {
    /// `"120 people, 340 connections"`
    pub fn summary(&self) -> String {
        format!("{} people, {} connections", self.nodes.len(), self.links.len())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_people: usize,
    pub total_awards: usize,
    pub total_journals: usize,
    pub total_organizations: usize,
    pub timeline: Vec<DecadeCount>,
    pub top_connected: Vec<ConnectedPerson>,
    pub top_organizations: Vec<OrgCount>,
}
