//! Lazily populated dataset store.
//!
//! `DatasetStore` owns the three read-only datasets for one session. Each
//! slot starts empty, is filled at most once by [`DatasetStore::ensure_loaded`],
//! and is never invalidated. A failed retrieval leaves its slot empty so a
//! later call can try again.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use futures::future::join_all;
use log::{debug, info, warn};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};
use crate::graph::Graph;
use crate::index::PeopleIndex;
use crate::person::Person;
use crate::query;
use crate::source::DatasetSource;
use crate::stats::Stats;

/// Logical names of the datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetName {
    People,
    Graph,
    Stats,
}

impl DatasetName {
    pub const ALL: [DatasetName; 3] = [Self::People, Self::Graph, Self::Stats];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::People => "people",
            Self::Graph => "graph",
            Self::Stats => "stats",
        }
    }

    /// Resource file name, e.g. `people.json`
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::People => "people.json",
            Self::Graph => "graph.json",
            Self::Stats => "stats.json",
        }
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetName {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "people" => Ok(Self::People),
            "graph" => Ok(Self::Graph),
            "stats" => Ok(Self::Stats),
            other => Err(DataError::InvalidDataset(other.to_string())),
        }
    }
}

/// What to do when a dataset breaks one of its invariants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrityMode {
    /// Fix the record (recompute `role_count`, drop dangling links) and warn
    #[default]
    Repair,
    /// Fail the load
    Strict,
}

/// Cross-dataset findings, see [`DatasetStore::consistency_report`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Graph node ids with no matching person
    pub unknown_graph_nodes: Vec<String>,
    /// `top_connected` entries with no matching person
    pub unknown_top_connected: Vec<String>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_graph_nodes.is_empty() && self.unknown_top_connected.is_empty()
    }
}

enum Payload {
    People(PeopleIndex),
    Graph(Graph),
    Stats(Stats),
}

/// Session-wide cache of the people, graph and stats datasets
pub struct DatasetStore {
    source: Arc<dyn DatasetSource>,
    integrity: IntegrityMode,
    people: RwLock<Option<Arc<PeopleIndex>>>,
    graph: RwLock<Option<Arc<Graph>>>,
    stats: RwLock<Option<Arc<Stats>>>,
}

impl DatasetStore {
    pub fn new(source: Arc<dyn DatasetSource>) -> Self {
        Self {
            source,
            integrity: IntegrityMode::default(),
            people: RwLock::new(None),
            graph: RwLock::new(None),
            stats: RwLock::new(None),
        }
    }

    pub fn with_integrity(mut self, integrity: IntegrityMode) -> Self {
        self.integrity = integrity;
        self
    }

    pub fn is_loaded(&self, dataset: DatasetName) -> bool {
        match dataset {
            DatasetName::People => self.people.read().is_some(),
            DatasetName::Graph => self.graph.read().is_some(),
            DatasetName::Stats => self.stats.read().is_some(),
        }
    }

    /// Load every requested dataset that is not already resident.
    ///
    /// Missing datasets are fetched concurrently. Datasets that load are
    /// stored even if another one in the same call fails; the first failure
    /// is returned.
    pub async fn ensure_loaded(&self, datasets: &[DatasetName]) -> Result<()> {
        let mut missing: Vec<DatasetName> = datasets
            .iter()
            .copied()
            .filter(|d| !self.is_loaded(*d))
            .collect();
        missing.sort();
        missing.dedup();

        if missing.is_empty() {
            return Ok(());
        }

        debug!(
            "Fetching {:?} from {}",
            missing,
            self.source.describe()
        );

        let results = join_all(missing.iter().map(|&d| self.fetch(d))).await;

        let mut first_error = None;
        for (dataset, result) in missing.into_iter().zip(results) {
            match result {
                Ok(payload) => {
                    self.install(payload);
                    info!("Loaded dataset {}", dataset);
                }
                Err(e) => {
                    warn!("Failed to load dataset {}: {}", dataset, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn fetch(&self, dataset: DatasetName) -> Result<Payload> {
        let bytes = self.source.fetch(dataset).await?;
        parse_payload(dataset, &bytes, self.integrity)
    }

    /// A concurrent load may already have filled the slot; the first value wins.
    fn install(&self, payload: Payload) {
        match payload {
            Payload::People(index) => {
                self.people.write().get_or_insert_with(|| Arc::new(index));
            }
            Payload::Graph(graph) => {
                self.graph.write().get_or_insert_with(|| Arc::new(graph));
            }
            Payload::Stats(stats) => {
                self.stats.write().get_or_insert_with(|| Arc::new(stats));
            }
        }
    }

    pub fn people(&self) -> Option<Arc<PeopleIndex>> {
        self.people.read().clone()
    }

    pub fn graph(&self) -> Option<Arc<Graph>> {
        self.graph.read().clone()
    }

    pub fn stats(&self) -> Option<Arc<Stats>> {
        self.stats.read().clone()
    }

    /// The person with this id; `None` if unknown or people is not loaded
    pub fn person_by_id(&self, id: &str) -> Option<Person> {
        self.people()?.get(id).cloned()
    }

    /// Bounded free-text search; empty if people is not loaded
    pub fn search_people(&self, query_text: &str) -> Vec<Person> {
        match self.people() {
            Some(index) => query::search_people(&index, query_text)
                .into_iter()
                .cloned()
                .collect(),
            None => Vec::new(),
        }
    }

    /// Cross-check loaded datasets against the people index
    pub fn consistency_report(&self) -> ConsistencyReport {
        let mut report = ConsistencyReport::default();
        let Some(people) = self.people() else {
            return report;
        };

        if let Some(graph) = self.graph() {
            report.unknown_graph_nodes = graph
                .nodes
                .iter()
                .filter(|n| !people.contains(&n.id))
                .map(|n| n.id.clone())
                .collect();
        }
        if let Some(stats) = self.stats() {
            report.unknown_top_connected = stats
                .top_connected
                .iter()
                .filter(|c| !people.contains(&c.id))
                .map(|c| c.id.clone())
                .collect();
        }
        report
    }
}

fn parse_payload(dataset: DatasetName, bytes: &[u8], integrity: IntegrityMode) -> Result<Payload> {
    let parse_err = |e: serde_json::Error| DataError::unavailable(dataset, e);

    match dataset {
        DatasetName::People => {
            let mut people: Vec<Person> = serde_json::from_slice(bytes).map_err(parse_err)?;
            check_role_counts(&mut people, integrity)?;
            let index = PeopleIndex::new(people);
            if index.duplicate_ids() > 0 {
                warn!("people dataset has {} duplicate ids", index.duplicate_ids());
            }
            Ok(Payload::People(index))
        }
        DatasetName::Graph => {
            let mut graph: Graph = serde_json::from_slice(bytes).map_err(parse_err)?;
            check_links(&mut graph, integrity)?;
            Ok(Payload::Graph(graph))
        }
        DatasetName::Stats => {
            let stats: Stats = serde_json::from_slice(bytes).map_err(parse_err)?;
            Ok(Payload::Stats(stats))
        }
    }
}

fn check_role_counts(people: &mut [Person], integrity: IntegrityMode) -> Result<()> {
    let mut repaired = 0;
    for person in people.iter_mut().filter(|p| p.role_count_mismatch()) {
        if integrity == IntegrityMode::Strict {
            return Err(DataError::unavailable(
                DatasetName::People,
                format!(
                    "role_count mismatch for {}: declared {}, found {}",
                    person.id,
                    person.role_count,
                    person.computed_role_count()
                ),
            ));
        }
        person.role_count = person.computed_role_count();
        repaired += 1;
    }
    if repaired > 0 {
        warn!("Recomputed role_count for {} people", repaired);
    }
    Ok(())
}

fn check_links(graph: &mut Graph, integrity: IntegrityMode) -> Result<()> {
    if integrity == IntegrityMode::Strict {
        if let Some(link) = graph.dangling_links().first() {
            return Err(DataError::unavailable(
                DatasetName::Graph,
                format!(
                    "link {} -- {} references a missing node",
                    link.source, link.target
                ),
            ));
        }
        return Ok(());
    }

    let dropped = graph.prune_dangling_links();
    if dropped > 0 {
        warn!("Dropped {} graph links with missing endpoints", dropped);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory source that counts fetches per dataset.
    struct CountingSource {
        payloads: parking_lot::Mutex<HashMap<DatasetName, String>>,
        fetches: AtomicUsize,
    }

    impl CountingSource {
        fn new(payloads: &[(DatasetName, &str)]) -> Self {
            Self {
                payloads: parking_lot::Mutex::new(
                    payloads.iter().map(|(d, s)| (*d, s.to_string())).collect(),
                ),
                fetches: AtomicUsize::new(0),
            }
        }

        fn set(&self, dataset: DatasetName, body: &str) {
            self.payloads.lock().insert(dataset, body.to_string());
        }

        fn fetches(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DatasetSource for CountingSource {
        async fn fetch(&self, dataset: DatasetName) -> Result<Vec<u8>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            self.payloads
                .lock()
                .get(&dataset)
                .map(|s| s.as_bytes().to_vec())
                .ok_or_else(|| DataError::unavailable(dataset, "not found"))
        }

        fn describe(&self) -> String {
            "memory".to_string()
        }
    }

    const PEOPLE: &str = r#"[
        {"id": "p1", "name": "Ada Lovelace",
         "awards": [{"name": "Legion of Honor", "year": 1855}],
         "editorships": [], "memberships": []}
    ]"#;
    const GRAPH: &str = r#"{"nodes": [{"id": "p1", "name": "Ada Lovelace"}], "links": []}"#;
    const STATS: &str = r#"{"total_people": 1, "total_awards": 1, "total_journals": 0,
        "total_organizations": 0}"#;

    fn store_with(source: &Arc<CountingSource>) -> DatasetStore {
        DatasetStore::new(source.clone())
    }

    #[test]
    fn test_dataset_name_round_trip_names() {
        for name in DatasetName::ALL {
            assert_eq!(name.as_str().parse::<DatasetName>().unwrap(), name);
        }
        assert!("papers".parse::<DatasetName>().is_err());
        assert_eq!(DatasetName::Stats.file_name(), "stats.json");
    }

    #[tokio::test]
    async fn test_ensure_loaded_is_idempotent() {
        let source = Arc::new(CountingSource::new(&[
            (DatasetName::People, PEOPLE),
            (DatasetName::Graph, GRAPH),
        ]));
        let store = store_with(&source);

        store
            .ensure_loaded(&[DatasetName::People, DatasetName::Graph])
            .await
            .unwrap();
        assert_eq!(source.fetches(), 2);

        store.ensure_loaded(&[DatasetName::People]).await.unwrap();
        store
            .ensure_loaded(&[DatasetName::Graph, DatasetName::People])
            .await
            .unwrap();
        assert_eq!(source.fetches(), 2);
    }

    /// Source whose fetches only complete once two are in flight together.
    struct RendezvousSource {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait]
    impl DatasetSource for RendezvousSource {
        async fn fetch(&self, dataset: DatasetName) -> Result<Vec<u8>> {
            self.barrier.wait().await;
            let body = match dataset {
                DatasetName::People => PEOPLE,
                DatasetName::Graph => GRAPH,
                DatasetName::Stats => STATS,
            };
            Ok(body.as_bytes().to_vec())
        }

        fn describe(&self) -> String {
            "rendezvous".to_string()
        }
    }

    #[tokio::test]
    async fn test_missing_datasets_are_fetched_concurrently() {
        let source = Arc::new(RendezvousSource {
            barrier: tokio::sync::Barrier::new(2),
        });
        let store = DatasetStore::new(source);

        let loaded = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            store.ensure_loaded(&[DatasetName::People, DatasetName::Graph]),
        )
        .await
        .expect("fetches ran one after another");
        loaded.unwrap();

        assert!(store.is_loaded(DatasetName::People));
        assert!(store.is_loaded(DatasetName::Graph));
    }

    #[tokio::test]
    async fn test_duplicate_names_fetch_once() {
        let source = Arc::new(CountingSource::new(&[(DatasetName::Stats, STATS)]));
        let store = store_with(&source);

        store
            .ensure_loaded(&[DatasetName::Stats, DatasetName::Stats])
            .await
            .unwrap();
        assert_eq!(source.fetches(), 1);
        assert_eq!(store.stats().unwrap().total_people, 1);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_slot_unset_and_retries() {
        let source = Arc::new(CountingSource::new(&[(DatasetName::People, PEOPLE)]));
        let store = store_with(&source);

        let err = store
            .ensure_loaded(&[DatasetName::People, DatasetName::Graph])
            .await
            .unwrap_err();
        assert_eq!(err.dataset(), Some(DatasetName::Graph));
        assert!(store.is_loaded(DatasetName::People));
        assert!(!store.is_loaded(DatasetName::Graph));

        source.set(DatasetName::Graph, GRAPH);
        store.ensure_loaded(&[DatasetName::Graph]).await.unwrap();
        assert!(store.is_loaded(DatasetName::Graph));
        // people was not fetched again
        assert_eq!(source.fetches(), 3);
    }

    #[tokio::test]
    async fn test_parse_failure_is_unavailable() {
        let source = Arc::new(CountingSource::new(&[(DatasetName::Stats, "{not json")]));
        let store = store_with(&source);

        let err = store.ensure_loaded(&[DatasetName::Stats]).await.unwrap_err();
        assert!(matches!(
            err,
            DataError::DatasetUnavailable {
                dataset: DatasetName::Stats,
                ..
            }
        ));
        assert!(store.stats().is_none());
    }

    #[tokio::test]
    async fn test_lookup_and_search_before_load_are_empty() {
        let source = Arc::new(CountingSource::new(&[(DatasetName::People, PEOPLE)]));
        let store = store_with(&source);

        assert!(store.person_by_id("p1").is_none());
        assert!(store.search_people("ada").is_empty());
        assert_eq!(source.fetches(), 0);
    }

    #[tokio::test]
    async fn test_ada_lovelace_scenario() {
        let source = Arc::new(CountingSource::new(&[(DatasetName::People, PEOPLE)]));
        let store = store_with(&source);
        store.ensure_loaded(&[DatasetName::People]).await.unwrap();

        let ids: Vec<String> = store
            .search_people("honor")
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec!["p1".to_string()]);
        assert!(store.search_people("zzz").is_empty());
        assert!(store.search_people("").is_empty());
        assert_eq!(store.person_by_id("p1").unwrap().role_count, 1);
        assert!(store.person_by_id("p2").is_none());
    }

    #[tokio::test]
    async fn test_role_count_repaired_by_default() {
        let people = r#"[{"id": "p1", "name": "A", "awards": [{"name": "X"}], "role_count": 5}]"#;
        let source = Arc::new(CountingSource::new(&[(DatasetName::People, people)]));
        let store = store_with(&source);

        store.ensure_loaded(&[DatasetName::People]).await.unwrap();
        assert_eq!(store.person_by_id("p1").unwrap().role_count, 1);
    }

    #[tokio::test]
    async fn test_role_count_rejected_when_strict() {
        let people = r#"[{"id": "p1", "name": "A", "awards": [{"name": "X"}], "role_count": 5}]"#;
        let source = Arc::new(CountingSource::new(&[(DatasetName::People, people)]));
        let store = store_with(&source).with_integrity(IntegrityMode::Strict);

        let err = store.ensure_loaded(&[DatasetName::People]).await.unwrap_err();
        assert!(err.to_string().contains("role_count mismatch for p1"));
        assert!(!store.is_loaded(DatasetName::People));
    }

    #[tokio::test]
    async fn test_dangling_links_dropped_or_rejected() {
        let graph = r#"{"nodes": [{"id": "a", "name": "A"}, {"id": "b", "name": "B"}],
            "links": [{"source": "a", "target": "b", "weight": 2},
                      {"source": "a", "target": "zz", "weight": 2}]}"#;

        let source = Arc::new(CountingSource::new(&[(DatasetName::Graph, graph)]));
        let lenient = store_with(&source);
        lenient.ensure_loaded(&[DatasetName::Graph]).await.unwrap();
        assert_eq!(lenient.graph().unwrap().links.len(), 1);

        let strict = store_with(&source).with_integrity(IntegrityMode::Strict);
        assert!(strict.ensure_loaded(&[DatasetName::Graph]).await.is_err());
    }

    #[tokio::test]
    async fn test_consistency_report() {
        let graph = r#"{"nodes": [{"id": "p1", "name": "Ada"}, {"id": "ghost", "name": "?"}],
            "links": []}"#;
        let source = Arc::new(CountingSource::new(&[
            (DatasetName::People, PEOPLE),
            (DatasetName::Graph, graph),
        ]));
        let store = store_with(&source);
        assert!(store.consistency_report().is_clean());

        store
            .ensure_loaded(&[DatasetName::People, DatasetName::Graph])
            .await
            .unwrap();
        let report = store.consistency_report();
        assert_eq!(report.unknown_graph_nodes, vec!["ghost".to_string()]);
        assert!(!report.is_clean());
    }
}
