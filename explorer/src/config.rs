//! Explorer configuration.

use std::path::PathBuf;
use std::sync::Arc;

use hos_data::{DatasetSource, DirectorySource, Emphasis, HttpSource, IntegrityMode};

use crate::error::ExplorerResult;

/// Default directory holding `people.json`, `graph.json` and `stats.json`.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Default capacity of the search result cache.
pub const DEFAULT_SEARCH_CACHE: usize = 256;

/// Where datasets are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataLocation {
    Directory(PathBuf),
    Http(String),
}

/// How views are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct ExplorerConfig {
    pub location: DataLocation,
    pub integrity: IntegrityMode,
    pub format: OutputFormat,
    pub search_cache_capacity: usize,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            location: DataLocation::Directory(PathBuf::from(DEFAULT_DATA_DIR)),
            integrity: IntegrityMode::Repair,
            format: OutputFormat::Text,
            search_cache_capacity: DEFAULT_SEARCH_CACHE,
        }
    }
}

impl ExplorerConfig {
    /// Resolve the data location; a base URL wins over a directory.
    pub fn from_parts(data_dir: Option<PathBuf>, base_url: Option<String>) -> Self {
        let location = match (base_url, data_dir) {
            (Some(url), _) => DataLocation::Http(url),
            (None, Some(dir)) => DataLocation::Directory(dir),
            (None, None) => DataLocation::Directory(PathBuf::from(DEFAULT_DATA_DIR)),
        };
        Self {
            location,
            ..Self::default()
        }
    }

    pub fn with_integrity(mut self, integrity: IntegrityMode) -> Self {
        self.integrity = integrity;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Build the dataset source for this location.
    pub fn source(&self) -> ExplorerResult<Arc<dyn DatasetSource>> {
        let source: Arc<dyn DatasetSource> = match &self.location {
            DataLocation::Directory(dir) => Arc::new(DirectorySource::new(dir.clone())),
            DataLocation::Http(url) => Arc::new(HttpSource::new(url.clone())?),
        };
        Ok(source)
    }

    /// Highlight markers: HTML for JSON consumers, brackets on a terminal.
    pub fn emphasis(&self) -> Emphasis {
        match self.format {
            OutputFormat::Json => Emphasis::default(),
            OutputFormat::Text => Emphasis::new("[", "]"),
        }
    }
}
