//! The explorer backend.
//!
//! Each view loads only the datasets it needs through the shared store, then
//! builds its view model from pure query results.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hos_data::derive::{build_graph, build_stats};
use hos_data::{
    ego_network, external_links, filter_network, highlight_with, person_url, role_summary,
    search_people, sort_people, year_range, ConsistencyReport, DataError, DatasetName,
    DatasetStore, Emphasis, NetworkFilter, PersonFilter, RoleCategory, SortState, EGO_LINK_LIMIT,
};
use serde::Serialize;

use crate::cache::QueryCache;
use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, ExplorerResult};
use crate::views::{
    Dashboard, DirectoryPage, DirectoryRow, FilterChoices, NetworkNode, NetworkView,
    PersonDetail, RoleLine, SearchHit, SearchPage,
};

/// Shortest query the search view accepts.
pub const MIN_QUERY_LEN: usize = 2;

/// Number of entries in each dashboard ranking.
pub const DASHBOARD_TOP: usize = 10;

fn require<T>(value: Option<T>, dataset: DatasetName) -> ExplorerResult<T> {
    value.ok_or_else(|| DataError::unavailable(dataset, "not loaded").into())
}

/// Files written by [`Explorer::derive_datasets`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeriveReport {
    pub people: usize,
    pub nodes: usize,
    pub links: usize,
    pub graph_path: PathBuf,
    pub stats_path: PathBuf,
}

pub struct Explorer {
    store: Arc<DatasetStore>,
    cache: QueryCache,
    emphasis: Emphasis,
}

impl Explorer {
    pub fn new(store: Arc<DatasetStore>) -> Self {
        Self {
            store,
            cache: QueryCache::default(),
            emphasis: Emphasis::default(),
        }
    }

    pub fn from_config(config: &ExplorerConfig) -> ExplorerResult<Self> {
        let store = DatasetStore::new(config.source()?).with_integrity(config.integrity);
        Ok(Self::new(Arc::new(store))
            .with_cache(QueryCache::new(config.search_cache_capacity))
            .with_emphasis(config.emphasis()))
    }

    pub fn with_cache(mut self, cache: QueryCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.store
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Search page: highlighted hits for a query of at least two characters.
    pub async fn search(&self, query: &str) -> ExplorerResult<SearchPage> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(ExplorerError::EmptyQuery {
                min_len: MIN_QUERY_LEN,
            });
        }

        self.store.ensure_loaded(&[DatasetName::People]).await?;

        if let Some(hits) = self.cache.get_search(query) {
            tracing::debug!("Search cache hit for {:?}", query);
            return Ok(SearchPage {
                query: query.to_string(),
                hits,
            });
        }

        let people = require(self.store.people(), DatasetName::People)?;
        let hits: Vec<SearchHit> = search_people(&people, query)
            .into_iter()
            .map(|p| SearchHit {
                id: p.id.clone(),
                url: person_url(&p.id),
                name: highlight_with(&p.name, query, &self.emphasis),
                description: p
                    .description
                    .as_deref()
                    .map(|d| highlight_with(d, query, &self.emphasis)),
                roles: role_summary(p),
            })
            .collect();

        tracing::debug!("Search {:?} matched {} people", query, hits.len());
        self.cache.set_search(query, hits.clone());

        Ok(SearchPage {
            query: query.to_string(),
            hits,
        })
    }

    /// Directory table: filtered, then sorted.
    pub async fn directory(
        &self,
        filter: &PersonFilter,
        sort: SortState,
    ) -> ExplorerResult<DirectoryPage> {
        self.store
            .ensure_loaded(&[DatasetName::People, DatasetName::Stats])
            .await?;
        let people = require(self.store.people(), DatasetName::People)?;
        let stats = require(self.store.stats(), DatasetName::Stats)?;

        let mut matched = filter.apply(people.all());
        sort_people(&mut matched, sort);

        let rows = matched
            .into_iter()
            .map(|p| DirectoryRow {
                id: p.id.clone(),
                url: person_url(&p.id),
                name: p.name.clone(),
                description: p.description.clone(),
                awards: p.awards.iter().map(|a| a.name.clone()).collect(),
                journals: p.editorships.iter().map(|e| e.journal.clone()).collect(),
                membership_count: p.memberships.len(),
                role_count: p.role_count,
                links: external_links(p),
            })
            .collect();

        Ok(DirectoryPage {
            rows,
            total: people.len(),
            sort,
            choices: FilterChoices {
                organizations: stats.organizations_list.clone(),
                journals: stats.journals_list.clone(),
                awards: stats.awards_list.clone(),
            },
        })
    }

    /// Person detail page with the person's ego network.
    pub async fn person_detail(&self, id: &str) -> ExplorerResult<PersonDetail> {
        let id = id.trim();
        if id.is_empty() {
            return Err(ExplorerError::MissingId);
        }

        self.store
            .ensure_loaded(&[DatasetName::People, DatasetName::Graph])
            .await?;
        let people = require(self.store.people(), DatasetName::People)?;
        let person = people
            .get(id)
            .ok_or_else(|| ExplorerError::NotFound(id.to_string()))?;

        let network = match self.cache.get_ego_network(id) {
            Some(network) => network,
            None => {
                let graph = require(self.store.graph(), DatasetName::Graph)?;
                let network = ego_network(&graph, person, EGO_LINK_LIMIT);
                self.cache.set_ego_network(id.to_string(), network.clone());
                network
            }
        };

        let awards = person
            .awards_by_year()
            .into_iter()
            .map(|a| RoleLine {
                name: a.name.clone(),
                detail: None,
                years: a
                    .year
                    .map(|y| y.to_string())
                    .unwrap_or_else(|| "unknown year".to_string()),
            })
            .collect();
        let editorships = person
            .editorships
            .iter()
            .map(|e| RoleLine {
                name: e.journal.clone(),
                detail: e.role.clone(),
                years: year_range(e.start, e.end),
            })
            .collect();
        let memberships = person
            .memberships
            .iter()
            .map(|m| RoleLine {
                name: m.org.clone(),
                detail: m.role.clone(),
                years: year_range(m.start, m.end),
            })
            .collect();

        Ok(PersonDetail {
            url: person_url(&person.id),
            links: external_links(person),
            awards,
            editorships,
            memberships,
            network,
            person: person.clone(),
        })
    }

    /// Whole-network view with role categories for colouring.
    pub async fn network(&self, filter: &NetworkFilter) -> ExplorerResult<NetworkView> {
        self.store
            .ensure_loaded(&[DatasetName::Graph, DatasetName::People, DatasetName::Stats])
            .await?;
        let graph = require(self.store.graph(), DatasetName::Graph)?;
        let people = require(self.store.people(), DatasetName::People)?;
        let stats = require(self.store.stats(), DatasetName::Stats)?;

        let subgraph = filter_network(&graph, &people, filter);
        tracing::debug!(
            "Network filter {:?} kept {} of {} nodes",
            filter,
            subgraph.nodes.len(),
            graph.nodes.len()
        );

        let nodes = subgraph
            .nodes
            .iter()
            .map(|n| NetworkNode {
                category: RoleCategory::of_node(&people, &n.id),
                degree: subgraph.degree.get(&n.id).copied().unwrap_or(0),
                node: n.clone(),
            })
            .collect();

        Ok(NetworkView {
            filter: filter.clone(),
            nodes,
            links: subgraph.links,
            choices: FilterChoices {
                organizations: stats.organizations_list.clone(),
                journals: stats.journals_list.clone(),
                awards: stats.awards_list.clone(),
            },
        })
    }

    /// Home page totals and rankings.
    pub async fn dashboard(&self) -> ExplorerResult<Dashboard> {
        self.store
            .ensure_loaded(&[DatasetName::Stats, DatasetName::People])
            .await?;
        let stats = require(self.store.stats(), DatasetName::Stats)?;

        Ok(Dashboard {
            total_people: stats.total_people,
            total_awards: stats.total_awards,
            total_journals: stats.total_journals,
            total_organizations: stats.total_organizations,
            timeline: stats.timeline.clone(),
            top_connected: stats.top_connected.iter().take(DASHBOARD_TOP).cloned().collect(),
            top_organizations: stats.org_stats.iter().take(DASHBOARD_TOP).cloned().collect(),
        })
    }

    /// Rebuild `graph.json` and `stats.json` from the people dataset.
    pub async fn derive_datasets(&self, out_dir: &Path) -> ExplorerResult<DeriveReport> {
        self.store.ensure_loaded(&[DatasetName::People]).await?;
        let people = require(self.store.people(), DatasetName::People)?;

        let graph = build_graph(people.all());
        let stats = build_stats(people.all(), &graph);

        if let Ok(meta) = tokio::fs::metadata(out_dir).await {
            if !meta.is_dir() {
                return Err(ExplorerError::InvalidArgument(format!(
                    "{} is not a directory",
                    out_dir.display()
                )));
            }
        }
        tokio::fs::create_dir_all(out_dir).await?;
        let graph_path = out_dir.join(DatasetName::Graph.file_name());
        let stats_path = out_dir.join(DatasetName::Stats.file_name());
        tokio::fs::write(&graph_path, serde_json::to_vec_pretty(&graph)?).await?;
        tokio::fs::write(&stats_path, serde_json::to_vec_pretty(&stats)?).await?;

        tracing::info!(
            "Derived {} nodes and {} links from {} people into {}",
            graph.nodes.len(),
            graph.links.len(),
            people.len(),
            out_dir.display()
        );

        Ok(DeriveReport {
            people: people.len(),
            nodes: graph.nodes.len(),
            links: graph.links.len(),
            graph_path,
            stats_path,
        })
    }

    /// Load everything and cross-check the datasets.
    pub async fn check(&self) -> ExplorerResult<ConsistencyReport> {
        self.store.ensure_loaded(&DatasetName::ALL).await?;
        let report = self.store.consistency_report();
        if !report.is_clean() {
            tracing::warn!(
                "{} graph nodes and {} ranked people are missing from people.json",
                report.unknown_graph_nodes.len(),
                report.unknown_top_connected.len()
            );
        }
        Ok(report)
    }
}
