//! Network views over the co-occurrence graph.
//!
//! Produces the node/link sets a force layout would draw: the filtered
//! whole-network view and the per-person ego network. Layout itself is not
//! computed here.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;
use crate::graph::{Graph, GraphLink, GraphNode};
use crate::index::PeopleIndex;
use crate::person::Person;

/// Default number of strongest links kept in an ego network
pub const EGO_LINK_LIMIT: usize = 20;

/// Restrict the network to holders of one organization, journal or award
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum CategoryFilter {
    #[serde(rename = "org")]
    Organization(String),
    Journal(String),
    Award(String),
}

impl CategoryFilter {
    pub fn matches(&self, person: &Person) -> bool {
        match self {
            Self::Organization(org) => person.is_member_of(org),
            Self::Journal(journal) => person.is_editor_of(journal),
            Self::Award(award) => person.holds_award(award),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = DataError;

    /// Parse `org:<name>`, `journal:<name>` or `award:<name>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, name) = s
            .split_once(':')
            .ok_or_else(|| DataError::other(format!("invalid category filter: {s}")))?;
        if name.is_empty() {
            return Err(DataError::other(format!("empty category name in: {s}")));
        }
        match kind {
            "org" => Ok(Self::Organization(name.to_string())),
            "journal" => Ok(Self::Journal(name.to_string())),
            "award" => Ok(Self::Award(name.to_string())),
            other => Err(DataError::other(format!("unknown category kind: {other}"))),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organization(name) => write!(f, "org:{name}"),
            Self::Journal(name) => write!(f, "journal:{name}"),
            Self::Award(name) => write!(f, "award:{name}"),
        }
    }
}

/// How a node's connection strength is counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionMeasure {
    /// Sum of link weights
    #[default]
    Weight,
    /// Number of links
    Links,
}

impl FromStr for ConnectionMeasure {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weight" => Ok(Self::Weight),
            "links" => Ok(Self::Links),
            other => Err(DataError::other(format!("unknown connection measure: {other}"))),
        }
    }
}

/// Network view options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkFilter {
    pub category: Option<CategoryFilter>,
    pub min_connections: u64,
    pub measure: ConnectionMeasure,
}

impl Default for NetworkFilter {
    fn default() -> Self {
        Self {
            category: None,
            min_connections: 1,
            measure: ConnectionMeasure::Weight,
        }
    }
}

impl NetworkFilter {
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_min_connections(mut self, min: u64) -> Self {
        self.min_connections = min;
        self
    }

    pub fn with_measure(mut self, measure: ConnectionMeasure) -> Self {
        self.measure = measure;
        self
    }
}

/// Nodes and links surviving a [`NetworkFilter`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Subgraph {
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
    /// Links per node within this subgraph
    pub degree: BTreeMap<String, usize>,
}

impl Subgraph {
    fn from_parts(nodes: Vec<GraphNode>, links: Vec<GraphLink>) -> Self {
        let mut degree: BTreeMap<String, usize> = BTreeMap::new();
        for link in &links {
            *degree.entry(link.source.clone()).or_default() += 1;
            *degree.entry(link.target.clone()).or_default() += 1;
        }
        Self {
            nodes,
            links,
            degree,
        }
    }

    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

/// Filter the graph by category and minimum connection strength.
///
/// Strength only counts links whose endpoints are both candidates. A
/// threshold of 0 is treated as 1, so unconnected candidates are never
/// shown. Nodes and links keep their graph order.
pub fn filter_network(graph: &Graph, people: &PeopleIndex, filter: &NetworkFilter) -> Subgraph {
    let candidates: HashSet<&str> = match &filter.category {
        Some(category) => people
            .iter()
            .filter(|p| category.matches(p))
            .map(|p| p.id.as_str())
            .collect(),
        None => graph.node_ids(),
    };

    let mut strength: HashMap<&str, u64> = HashMap::new();
    for link in &graph.links {
        let (s, t) = (link.source.as_str(), link.target.as_str());
        if candidates.contains(s) && candidates.contains(t) {
            let amount = match filter.measure {
                ConnectionMeasure::Weight => u64::from(link.weight),
                ConnectionMeasure::Links => 1,
            };
            *strength.entry(s).or_default() += amount;
            *strength.entry(t).or_default() += amount;
        }
    }

    let min = filter.min_connections.max(1);
    let visible: HashSet<&str> = candidates
        .into_iter()
        .filter(|id| strength.get(id).copied().unwrap_or(0) >= min)
        .collect();

    let nodes: Vec<GraphNode> = graph
        .nodes
        .iter()
        .filter(|n| visible.contains(n.id.as_str()))
        .cloned()
        .collect();
    let shown: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let links: Vec<GraphLink> = graph
        .links
        .iter()
        .filter(|l| shown.contains(l.source.as_str()) && shown.contains(l.target.as_str()))
        .cloned()
        .collect();

    Subgraph::from_parts(nodes, links)
}

/// A person's strongest direct connections
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EgoNetwork {
    pub center: String,
    pub nodes: Vec<GraphNode>,
    pub links: Vec<GraphLink>,
}

impl EgoNetwork {
    /// True when the person has no drawable connections
    pub fn is_isolated(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn neighbor_ids(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .map(|n| n.id.as_str())
            .filter(|id| *id != self.center)
            .collect()
    }
}

/// The `limit` heaviest links touching `person` and their endpoints.
///
/// Ties in weight keep graph order. A person missing from the graph still
/// appears as the (isolated) center.
pub fn ego_network(graph: &Graph, person: &Person, limit: usize) -> EgoNetwork {
    let center = person.id.as_str();

    let mut touching: Vec<&GraphLink> = graph.links.iter().filter(|l| l.touches(center)).collect();
    touching.sort_by(|a, b| b.weight.cmp(&a.weight));
    touching.truncate(limit);

    let mut wanted: HashSet<&str> = HashSet::new();
    wanted.insert(center);
    for link in &touching {
        wanted.insert(&link.source);
        wanted.insert(&link.target);
    }

    let mut nodes: Vec<GraphNode> = graph
        .nodes
        .iter()
        .filter(|n| wanted.contains(n.id.as_str()))
        .cloned()
        .collect();
    if !nodes.iter().any(|n| n.id == center) {
        nodes.push(GraphNode::new(center, person.name.clone()));
    }

    let present: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let links = touching
        .into_iter()
        .filter(|l| present.contains(l.source.as_str()) && present.contains(l.target.as_str()))
        .cloned()
        .collect();

    EgoNetwork {
        center: center.to_string(),
        nodes,
        links,
    }
}

/// Which kinds of roles a person holds, used to colour network nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    Award,
    Editor,
    Member,
    /// Two or more role kinds
    Multi,
    Unaffiliated,
}

impl RoleCategory {
    pub fn of(person: &Person) -> Self {
        let has_award = !person.awards.is_empty();
        let has_editor = !person.editorships.is_empty();
        let has_member = !person.memberships.is_empty();

        let kinds = [has_award, has_editor, has_member]
            .iter()
            .filter(|b| **b)
            .count();
        if kinds >= 2 {
            Self::Multi
        } else if has_award {
            Self::Award
        } else if has_editor {
            Self::Editor
        } else if has_member {
            Self::Member
        } else {
            Self::Unaffiliated
        }
    }

    /// Category of a graph node; unknown people are unaffiliated
    pub fn of_node(people: &PeopleIndex, id: &str) -> Self {
        people.get(id).map(Self::of).unwrap_or(Self::Unaffiliated)
    }
}
