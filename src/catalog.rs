use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CatalogError, Result};
use crate::models::{Pattern, Service, TrendingTopic};

const BUNDLED_CATALOG: &str = include_str!("../data/catalog.json");

/// On-disk shape of the catalog, field for field.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
struct CatalogData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    #[serde(default)]
    services: Vec<Service>,
    #[serde(default)]
    patterns: Vec<Pattern>,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    trending_topics: Vec<TrendingTopic>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// The read-only collection of services, patterns, and trending topics.
///
/// Loaded once and never mutated. Id lookups go through indexes built at load
/// time; when an id is duplicated the first record wins, matching a linear scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "CatalogData")]
pub struct Catalog {
    data: CatalogData,
    service_index: HashMap<String, usize>,
    pattern_index: HashMap<String, usize>,
    topic_index: HashMap<String, usize>,
}

impl From<CatalogData> for Catalog {
    fn from(data: CatalogData) -> Self {
        let service_index = index_by_id(data.services.iter().map(|s| s.id.as_str()));
        let pattern_index = index_by_id(data.patterns.iter().map(|p| p.id.as_str()));
        let topic_index = index_by_id(data.trending_topics.iter().map(|t| t.id.as_str()));
        Self {
            data,
            service_index,
            pattern_index,
            topic_index,
        }
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

fn index_by_id<'a>(ids: impl Iterator<Item = &'a str>) -> HashMap<String, usize> {
    let mut index = HashMap::new();
    for (position, id) in ids.enumerate() {
        index.entry(id.to_string()).or_insert(position);
    }
    index
}

impl Catalog {
    /// Build a catalog from records already in memory.
    pub fn new(
        services: Vec<Service>,
        patterns: Vec<Pattern>,
        categories: Vec<&str>,
        trending_topics: Vec<TrendingTopic>,
    ) -> Self {
        CatalogData {
            version: None,
            services,
            patterns,
            categories: categories.into_iter().map(String::from).collect(),
            trending_topics,
            extra: Map::new(),
        }
        .into()
    }

    pub fn with_version(mut self, version: &str) -> Self {
        self.data.version = Some(version.to_string());
        self
    }

    /// Parse a catalog from its JSON load format.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        let summary = catalog.summary();
        debug!(
            version = catalog.version().unwrap_or("unversioned"),
            services = summary.service_count,
            patterns = summary.pattern_count,
            topics = summary.topic_count,
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Read and parse a catalog file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The catalog shipped with the crate (`data/catalog.json`).
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Serialize back to the load format.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn version(&self) -> Option<&str> {
        self.data.version.as_deref()
    }

    /// Services in catalog order.
    pub fn services(&self) -> &[Service] {
        &self.data.services
    }

    /// Patterns in catalog order.
    pub fn patterns(&self) -> &[Pattern] {
        &self.data.patterns
    }

    pub fn categories(&self) -> &[String] {
        &self.data.categories
    }

    pub fn trending_topics(&self) -> &[TrendingTopic] {
        &self.data.trending_topics
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.service_index
            .get(id)
            .and_then(|&i| self.data.services.get(i))
    }

    pub fn pattern(&self, id: &str) -> Option<&Pattern> {
        self.pattern_index
            .get(id)
            .and_then(|&i| self.data.patterns.get(i))
    }

    pub fn topic(&self, id: &str) -> Option<&TrendingTopic> {
        self.topic_index
            .get(id)
            .and_then(|&i| self.data.trending_topics.get(i))
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            service_count: self.data.services.len(),
            pattern_count: self.data.patterns.len(),
            category_count: self.data.categories.len(),
            topic_count: self.data.trending_topics.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogSummary {
    pub service_count: usize,
    pub pattern_count: usize,
    pub category_count: usize,
    pub topic_count: usize,
}
