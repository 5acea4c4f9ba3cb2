use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One offered capability in the catalog (e.g. "Amazon S3").
/// Referenced by id from `Pattern::stack` and `Service::related_service_ids`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,

    /// One of the catalog's declared categories (e.g. "Compute", "Storage")
    pub category: String,

    /// Free-text keywords searched by substring
    #[serde(default)]
    pub tags: Vec<String>,

    /// Presentation-only links to other services
    #[serde(default)]
    pub related_service_ids: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_free_tier: Option<bool>,

    /// Any other fields present in the source data, carried through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            tags: Vec::new(),
            related_service_ids: Vec::new(),
            icon: None,
            short_description: None,
            documentation: None,
            billing_model: None,
            cost_hint: None,
            has_free_tier: None,
            extra: Map::new(),
        }
    }

    pub fn with_tags(mut self, tags: Vec<&str>) -> Self {
        self.tags = tags.into_iter().map(String::from).collect();
        self
    }

    pub fn with_related(mut self, ids: Vec<&str>) -> Self {
        self.related_service_ids = ids.into_iter().map(String::from).collect();
        self
    }

    pub fn with_free_tier(mut self, has_free_tier: bool) -> Self {
        self.has_free_tier = Some(has_free_tier);
        self
    }
}

/// A pre-curated recommendation: a use case backed by a stack of 1-5 services.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: String,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    /// Keywords the matching engine scores a query against
    #[serde(default)]
    pub intent_keywords: Vec<String>,

    /// Service ids, in workflow order
    pub stack: Vec<String>,

    /// Secondary labels, only used to break scoring ties
    #[serde(default)]
    pub trend_tags: Vec<String>,

    /// 1 (niche) to 100 (very common)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity_score: Option<u32>,

    pub cost_level: CostLevel,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_build_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisite_knowledge: Option<Vec<String>>,
    #[serde(default)]
    pub security_notes: Vec<String>,

    /// Opaque to the core; rendered by the documentation panel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_resources: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_diagram: Option<WorkflowDiagram>,

    /// Present only for patterns that offer a side-by-side comparison
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_stack: Option<AlternativeStack>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Pattern {
    pub fn new(id: &str, label: &str, cost_level: CostLevel) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            summary: None,
            intent_keywords: Vec::new(),
            stack: Vec::new(),
            trend_tags: Vec::new(),
            popularity_score: None,
            cost_level,
            difficulty_level: None,
            estimated_build_time: None,
            prerequisite_knowledge: None,
            security_notes: Vec::new(),
            learning_resources: None,
            workflow_diagram: None,
            alternative_stack: None,
            extra: Map::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<&str>) -> Self {
        self.intent_keywords = keywords.into_iter().map(String::from).collect();
        self
    }

    pub fn with_stack(mut self, ids: Vec<&str>) -> Self {
        self.stack = ids.into_iter().map(String::from).collect();
        self
    }

    pub fn with_trend_tags(mut self, tags: Vec<&str>) -> Self {
        self.trend_tags = tags.into_iter().map(String::from).collect();
        self
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn with_popularity(mut self, score: u32) -> Self {
        self.popularity_score = Some(score);
        self
    }

    /// Popularity used for ordering; a pattern without a score sorts last.
    pub fn popularity(&self) -> u32 {
        self.popularity_score.unwrap_or(0)
    }

    pub fn with_security_notes(mut self, notes: Vec<&str>) -> Self {
        self.security_notes = notes.into_iter().map(String::from).collect();
        self
    }

    pub fn with_alternative(mut self, alternative: AlternativeStack) -> Self {
        self.alternative_stack = Some(alternative);
        self
    }

    /// True when an alternative stack with at least one service is attached.
    pub fn has_comparison(&self) -> bool {
        self.alternative_stack
            .as_ref()
            .is_some_and(|alt| !alt.services.is_empty())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CostLevel {
    Low,
    Medium,
    High,
}

impl CostLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CostLevel::Low => "Low",
            CostLevel::Medium => "Medium",
            CostLevel::High => "High",
        }
    }
}

/// Node/edge description of how requests flow through a pattern's stack.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WorkflowDiagram {
    #[serde(default)]
    pub nodes: Vec<WorkflowNode>,
    #[serde(default)]
    pub edges: Vec<WorkflowEdge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowNode {
    pub id: String,
    /// A catalog service id, or the pseudo-service `user`
    pub service_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub position: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowEdge {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlternativeStack {
    pub label: String,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_level: Option<CostLevel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AlternativeStack {
    pub fn new(label: &str, services: Vec<&str>) -> Self {
        Self {
            label: label.to_string(),
            services: services.into_iter().map(String::from).collect(),
            cost_level: None,
            extra: Map::new(),
        }
    }
}

/// Groups patterns under a trending topic (e.g. "generative-ai").
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopic {
    pub id: String,
    #[serde(default)]
    pub related_patterns: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TrendingTopic {
    pub fn new(id: &str, related_patterns: Vec<&str>) -> Self {
        Self {
            id: id.to_string(),
            related_patterns: related_patterns.into_iter().map(String::from).collect(),
            extra: Map::new(),
        }
    }
}

/// Outcome of matching a free-text query against a set of patterns.
/// Borrows the winning pattern from the catalog rather than copying it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult<'a> {
    pub pattern: Option<&'a Pattern>,
    pub score: usize,
    /// Lower-cased intent keywords of the winner hit by the query, in query order
    pub matched_keywords: Vec<String>,
    pub no_match: bool,
}

impl<'a> MatchResult<'a> {
    pub fn none() -> Self {
        Self {
            pattern: None,
            score: 0,
            matched_keywords: Vec::new(),
            no_match: true,
        }
    }

    pub fn pattern_id(&self) -> Option<&'a str> {
        self.pattern.map(|p| p.id.as_str())
    }
}

/// Result of the combined search: a pattern recommendation, or services found
/// by name when no pattern matched.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "snake_case")]
pub enum SearchOutcome<'a> {
    Pattern(MatchResult<'a>),
    Services(Vec<&'a Service>),
}

impl SearchOutcome<'_> {
    pub fn is_empty(&self) -> bool {
        match self {
            SearchOutcome::Pattern(result) => result.no_match,
            SearchOutcome::Services(services) => services.is_empty(),
        }
    }
}
