//! HoS People Explorer
//!
//! View layer over the `hos-data` datasets: search, directory, person
//! detail, network and dashboard views, rendered for a terminal or as JSON.

pub mod cache;
pub mod config;
pub mod error;
pub mod explorer;
pub mod render;
pub mod views;

pub use cache::{CacheStats, QueryCache};
pub use config::{DataLocation, ExplorerConfig, OutputFormat};
pub use error::{ExplorerError, ExplorerResult};
pub use explorer::{DeriveReport, Explorer};
pub use render::{render, TextView};
