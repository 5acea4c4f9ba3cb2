//! Offline integrity checks over a loaded catalog.
//!
//! Lookups tolerate every defect reported here by skipping bad references;
//! this pass exists so data authors can catch them before shipping.

use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use crate::catalog::Catalog;
use crate::models::{Pattern, Service};

pub const MAX_STACK_SIZE: usize = 5;
pub const MAX_SECURITY_NOTES: usize = 3;
pub const POPULARITY_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Pseudo-service id for the end user in workflow diagrams.
pub const USER_NODE: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogIssue {
    #[error("duplicate service id '{0}'")]
    DuplicateServiceId(String),

    #[error("duplicate pattern id '{0}'")]
    DuplicatePatternId(String),

    #[error("pattern '{pattern}' has {size} services in its stack, expected 1-5")]
    StackSize { pattern: String, size: usize },

    #[error("pattern '{pattern}' has popularity {score}, expected 1-100")]
    PopularityOutOfRange { pattern: String, score: u32 },

    #[error("pattern '{pattern}' has {count} security notes, expected 1-3")]
    SecurityNotes { pattern: String, count: usize },

    #[error("pattern '{0}' has no intent keywords and can never match")]
    NoIntentKeywords(String),

    #[error("pattern '{pattern}' references unknown service '{service}'")]
    UnknownStackService { pattern: String, service: String },

    #[error("service '{service}' lists unknown related service '{related}'")]
    UnknownRelatedService { service: String, related: String },

    #[error("topic '{topic}' references unknown pattern '{pattern}'")]
    UnknownTopicPattern { topic: String, pattern: String },

    #[error("category '{0}' has no services")]
    EmptyCategory(String),

    #[error("service '{service}' uses undeclared category '{category}'")]
    UndeclaredCategory { service: String, category: String },

    #[error("pattern '{pattern}' workflow edge {from} -> {to} references an unknown node")]
    DanglingEdge {
        pattern: String,
        from: String,
        to: String,
    },

    #[error("pattern '{pattern}' places the user node at position {position}, expected 0")]
    UserNodePosition { pattern: String, position: u32 },

    #[error("service '{service}' is missing required field '{field}'")]
    MissingServiceField {
        service: String,
        field: &'static str,
    },

    #[error("pattern '{pattern}' is missing required field '{field}'")]
    MissingPatternField {
        pattern: String,
        field: &'static str,
    },
}

/// Run every check and return all findings. An empty list means the catalog is clean.
pub fn validate(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();

    check_duplicate_ids(catalog, &mut issues);
    check_categories(catalog, &mut issues);

    for service in catalog.services() {
        check_service_fields(service, &mut issues);
        for related in &service.related_service_ids {
            if catalog.service(related).is_none() {
                issues.push(CatalogIssue::UnknownRelatedService {
                    service: service.id.clone(),
                    related: related.clone(),
                });
            }
        }
    }

    for pattern in catalog.patterns() {
        check_pattern(catalog, pattern, &mut issues);
    }

    for topic in catalog.trending_topics() {
        for pattern in &topic.related_patterns {
            if catalog.pattern(pattern).is_none() {
                issues.push(CatalogIssue::UnknownTopicPattern {
                    topic: topic.id.clone(),
                    pattern: pattern.clone(),
                });
            }
        }
    }

    if !issues.is_empty() {
        warn!(count = issues.len(), "catalog integrity issues found");
    }
    issues
}

fn check_duplicate_ids(catalog: &Catalog, issues: &mut Vec<CatalogIssue>) {
    let mut seen = HashSet::new();
    for service in catalog.services() {
        if !seen.insert(service.id.as_str()) {
            issues.push(CatalogIssue::DuplicateServiceId(service.id.clone()));
        }
    }

    let mut seen = HashSet::new();
    for pattern in catalog.patterns() {
        if !seen.insert(pattern.id.as_str()) {
            issues.push(CatalogIssue::DuplicatePatternId(pattern.id.clone()));
        }
    }
}

fn check_categories(catalog: &Catalog, issues: &mut Vec<CatalogIssue>) {
    let declared: HashSet<&str> = catalog.categories().iter().map(String::as_str).collect();
    let used: HashSet<&str> = catalog
        .services()
        .iter()
        .map(|s| s.category.as_str())
        .collect();

    for category in catalog.categories() {
        if !used.contains(category.as_str()) {
            issues.push(CatalogIssue::EmptyCategory(category.clone()));
        }
    }

    for service in catalog.services() {
        if !declared.contains(service.category.as_str()) {
            issues.push(CatalogIssue::UndeclaredCategory {
                service: service.id.clone(),
                category: service.category.clone(),
            });
        }
    }
}

fn check_service_fields(service: &Service, issues: &mut Vec<CatalogIssue>) {
    let present = [
        ("icon", service.icon.is_some()),
        ("shortDescription", service.short_description.is_some()),
        ("documentation", service.documentation.is_some()),
        ("billingModel", service.billing_model.is_some()),
        ("costHint", service.cost_hint.is_some()),
        ("hasFreeTier", service.has_free_tier.is_some()),
    ];
    for (field, _) in present.into_iter().filter(|(_, ok)| !ok) {
        issues.push(CatalogIssue::MissingServiceField {
            service: service.id.clone(),
            field,
        });
    }
}

fn check_pattern_fields(pattern: &Pattern, issues: &mut Vec<CatalogIssue>) {
    let present = [
        ("summary", pattern.summary.is_some()),
        ("workflowDiagram", pattern.workflow_diagram.is_some()),
        ("popularityScore", pattern.popularity_score.is_some()),
        ("difficultyLevel", pattern.difficulty_level.is_some()),
        ("estimatedBuildTime", pattern.estimated_build_time.is_some()),
        ("prerequisiteKnowledge", pattern.prerequisite_knowledge.is_some()),
        ("learningResources", pattern.learning_resources.is_some()),
    ];
    for (field, _) in present.into_iter().filter(|(_, ok)| !ok) {
        issues.push(CatalogIssue::MissingPatternField {
            pattern: pattern.id.clone(),
            field,
        });
    }
}

fn check_pattern(catalog: &Catalog, pattern: &Pattern, issues: &mut Vec<CatalogIssue>) {
    check_pattern_fields(pattern, issues);

    let size = pattern.stack.len();
    if size == 0 || size > MAX_STACK_SIZE {
        issues.push(CatalogIssue::StackSize {
            pattern: pattern.id.clone(),
            size,
        });
    }

    if let Some(score) = pattern.popularity_score {
        if !POPULARITY_RANGE.contains(&score) {
            issues.push(CatalogIssue::PopularityOutOfRange {
                pattern: pattern.id.clone(),
                score,
            });
        }
    }

    let notes = pattern.security_notes.len();
    if notes == 0 || notes > MAX_SECURITY_NOTES {
        issues.push(CatalogIssue::SecurityNotes {
            pattern: pattern.id.clone(),
            count: notes,
        });
    }

    if pattern.intent_keywords.is_empty() {
        issues.push(CatalogIssue::NoIntentKeywords(pattern.id.clone()));
    }

    for service in &pattern.stack {
        if catalog.service(service).is_none() {
            issues.push(CatalogIssue::UnknownStackService {
                pattern: pattern.id.clone(),
                service: service.clone(),
            });
        }
    }

    let Some(diagram) = &pattern.workflow_diagram else {
        return;
    };

    let node_ids: HashSet<&str> = diagram.nodes.iter().map(|n| n.id.as_str()).collect();
    for edge in &diagram.edges {
        if !node_ids.contains(edge.from.as_str()) || !node_ids.contains(edge.to.as_str()) {
            issues.push(CatalogIssue::DanglingEdge {
                pattern: pattern.id.clone(),
                from: edge.from.clone(),
                to: edge.to.clone(),
            });
        }
    }

    for node in &diagram.nodes {
        if node.service_id == USER_NODE && node.position != 0 {
            issues.push(CatalogIssue::UserNodePosition {
                pattern: pattern.id.clone(),
                position: node.position,
            });
        }
    }
}
