//! HoS People Explorer dataset layer
//!
//! Loads the precomputed `people`, `graph` and `stats` JSON datasets once per
//! session and answers lookup, search, filter and sort queries over them.
//!
//! ## Features
//!
//! - **Lazy, idempotent loading** - each dataset is fetched at most once, concurrently
//! - **Indexed lookups** - person by id in O(1)
//! - **Bounded search** - order-preserving substring search capped at 50 results
//! - **Network views** - category/strength filtering and ego networks for graph layouts
//!
//! ## Example
//!
//! ```ignore
//! use hos_data::{DatasetName, DatasetStore, DirectorySource};
//!
//! let store = DatasetStore::new(Arc::new(DirectorySource::new("site/data")));
//! store.ensure_loaded(&[DatasetName::People]).await?;
//!
//! for person in store.search_people("sarton") {
//!     println!("{} -> {}", person.name, hos_data::person_url(&person.id));
//! }
//! ```

pub mod derive;
pub mod error;
pub mod graph;
pub mod highlight;
pub mod index;
pub mod links;
pub mod network;
pub mod person;
pub mod query;
pub mod source;
pub mod stats;
pub mod store;
mod wire;

// Re-exports for convenience
pub use error::{DataError, Result};
pub use graph::{Graph, GraphLink, GraphNode};
pub use highlight::{highlight_match, highlight_with, Emphasis};
pub use index::PeopleIndex;
pub use links::{external_links, person_url, role_summary, truncate_label, year_range, ExternalLink};
pub use network::{
    ego_network, filter_network, CategoryFilter, ConnectionMeasure, EgoNetwork, NetworkFilter,
    RoleCategory, Subgraph, EGO_LINK_LIMIT,
};
pub use person::{Award, Editorship, Membership, Person, Year};
pub use query::{search_people, sort_people, PersonFilter, SortField, SortOrder, SortState, SEARCH_LIMIT};
pub use source::{DatasetSource, DirectorySource, HttpSource};
pub use stats::{ConnectedPerson, DecadeCount, OrgCount, Stats};
pub use store::{ConsistencyReport, DatasetName, DatasetStore, IntegrityMode};
