//! Catalog-facing lookup and search API.
//!
//! Every operation is total: unknown ids and empty queries produce `None` or
//! an empty `Vec`, never an error. Results borrow from the catalog.

use std::cmp::{Ordering, Reverse};

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::SelectorConfig;
use crate::matching;
use crate::models::{MatchResult, Pattern, SearchOutcome, Service, TrendingTopic};

pub struct ServiceSelector<'c> {
    catalog: &'c Catalog,
    config: SelectorConfig,
}

impl<'c> ServiceSelector<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self {
            catalog,
            config: SelectorConfig::default(),
        }
    }

    pub fn with_config(catalog: &'c Catalog, config: SelectorConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &'c Catalog {
        self.catalog
    }

    /// Best pattern for a free-text project description.
    pub fn search_by_intent(&self, query: &str) -> MatchResult<'c> {
        matching::find_best_match(query, self.catalog.patterns())
    }

    /// Services whose name, id, or any tag contains the query, case-insensitively.
    /// A blank query matches nothing.
    pub fn search_by_service_name(&self, query: &str) -> Vec<&'c Service> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        self.catalog
            .services()
            .iter()
            .filter(|service| {
                service.name.to_lowercase().contains(&needle)
                    || service.id.to_lowercase().contains(&needle)
                    || service
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Intent match first; if nothing matches, services found by name.
    pub fn search(&self, query: &str) -> SearchOutcome<'c> {
        let result = self.search_by_intent(query);
        if !result.no_match || !self.config.fallback_to_service_search {
            return SearchOutcome::Pattern(result);
        }

        let services = self.search_by_service_name(query);
        if services.is_empty() {
            return SearchOutcome::Pattern(result);
        }
        debug!(
            query,
            services = services.len(),
            "no pattern matched, falling back to service search"
        );
        SearchOutcome::Services(services)
    }

    /// Services in exactly `category` (case-sensitive). An empty category means
    /// no filter and returns every service.
    pub fn filter_by_category(&self, category: &str) -> Vec<&'c Service> {
        let services = self.catalog.services().iter();
        if category.is_empty() {
            return services.collect();
        }
        services.filter(|s| s.category == category).collect()
    }

    pub fn get_service_by_id(&self, id: &str) -> Option<&'c Service> {
        self.catalog.service(id)
    }

    pub fn get_pattern_by_id(&self, id: &str) -> Option<&'c Pattern> {
        self.catalog.pattern(id)
    }

    pub fn get_topic_by_id(&self, id: &str) -> Option<&'c TrendingTopic> {
        self.catalog.topic(id)
    }

    /// The pattern's stack resolved to services; unknown ids are skipped.
    pub fn get_services_for_pattern(&self, pattern: &Pattern) -> Vec<&'c Service> {
        pattern
            .stack
            .iter()
            .filter_map(|id| self.get_service_by_id(id))
            .collect()
    }

    /// A topic's related patterns, in topic order; unknown ids are skipped.
    pub fn get_patterns_by_topic(&self, topic_id: &str) -> Vec<&'c Pattern> {
        let Some(topic) = self.catalog.topic(topic_id) else {
            return Vec::new();
        };
        topic
            .related_patterns
            .iter()
            .filter_map(|id| self.get_pattern_by_id(id))
            .collect()
    }

    /// Patterns whose stack includes `service_id`, in catalog order.
    pub fn get_patterns_using_service(&self, service_id: &str) -> Vec<&'c Pattern> {
        self.catalog
            .patterns()
            .iter()
            .filter(|p| p.stack.iter().any(|id| id == service_id))
            .collect()
    }

    /// Up to `limit` related services (the configured cap when `None`).
    /// The cap applies to ids before resolution, so unknown ids shorten the list.
    pub fn get_related_services(&self, service: &Service, limit: Option<usize>) -> Vec<&'c Service> {
        let limit = limit.unwrap_or(self.config.related_services_limit);
        service
            .related_service_ids
            .iter()
            .take(limit)
            .filter_map(|id| self.get_service_by_id(id))
            .collect()
    }

    /// All patterns, most popular first. Equal scores keep catalog order.
    pub fn get_all_patterns(&self) -> Vec<&'c Pattern> {
        let mut patterns: Vec<&Pattern> = self.catalog.patterns().iter().collect();
        patterns.sort_by_key(|p| Reverse(p.popularity()));
        patterns
    }

    /// All services ordered by display name.
    pub fn get_all_services(&self) -> Vec<&'c Service> {
        let mut services: Vec<&Service> = self.catalog.services().iter().collect();
        services.sort_by(|a, b| compare_names(&a.name, &b.name));
        services
    }

    pub fn get_categories(&self) -> &'c [String] {
        self.catalog.categories()
    }

    pub fn get_trending_topics(&self) -> &'c [TrendingTopic] {
        self.catalog.trending_topics()
    }
}

/// Collation for display names: case-insensitive first. Names that differ only
/// in case put lower case first, so the byte order is reversed for the tie.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CostLevel;

    fn bundled() -> Catalog {
        Catalog::bundled().unwrap()
    }

    fn service_ids<'a>(services: &[&'a Service]) -> Vec<&'a str> {
        services.iter().map(|s| s.id.as_str()).collect()
    }

    fn pattern_ids<'a>(patterns: &[&'a Pattern]) -> Vec<&'a str> {
        patterns.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_search_by_intent_serverless_api() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let result = selector.search_by_intent("I want a serverless REST API");
        assert_eq!(result.pattern_id(), Some("serverless-api"));
        assert_eq!(result.score, 4);
        assert_eq!(result.matched_keywords, vec!["serverless", "rest", "api"]);
    }

    #[test]
    fn test_search_by_intent_chatbot() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let result = selector.search_by_intent("build a chatbot with generative AI");
        assert_eq!(result.pattern_id(), Some("genai-chatbot"));
        assert_eq!(result.score, 4);
        assert_eq!(result.matched_keywords, vec!["chatbot", "generative", "ai"]);
    }

    #[test]
    fn test_search_by_intent_no_match() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let result = selector.search_by_intent("quantum");
        assert!(result.no_match);
        assert!(result.pattern.is_none());
        assert!(selector.search_by_intent("").no_match);
    }

    #[test]
    fn test_search_by_intent_case_insensitive() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let queries = [
            "host my portfolio blog",
            "Photo Recognition app",
            "docker microservices",
            "send email alerts",
            "zzz yyy",
            "Data Lake ANALYTICS dashboard",
        ];
        for query in queries {
            let mixed = selector.search_by_intent(query).pattern_id();
            let lower = selector.search_by_intent(&query.to_lowercase()).pattern_id();
            let upper = selector.search_by_intent(&query.to_uppercase()).pattern_id();
            assert_eq!(mixed, lower, "query {query:?}");
            assert_eq!(lower, upper, "query {query:?}");
        }
    }

    #[test]
    fn test_winner_dominates_every_pattern_score() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        for query in [
            "api",
            "serverless",
            "database",
            "static website",
            "ai image",
            "container",
            "notification",
        ] {
            let result = selector.search_by_intent(query);
            if result.no_match {
                continue;
            }
            for pattern in catalog.patterns() {
                assert!(
                    matching::score(query, pattern) <= result.score,
                    "{} beats winner for {query:?}",
                    pattern.id
                );
            }
        }
    }

    #[test]
    fn test_search_by_service_name() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let found = selector.search_by_service_name("lambda");
        assert_eq!(service_ids(&found), vec!["lambda"]);

        let found = selector.search_by_service_name("DYNAMO");
        assert_eq!(service_ids(&found), vec!["dynamodb"]);

        let found = selector.search_by_service_name("real-time");
        assert_eq!(service_ids(&found), vec!["kinesis", "appsync"]);
    }

    #[test]
    fn test_search_by_service_name_blank_is_empty() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        assert!(selector.search_by_service_name("").is_empty());
        assert!(selector.search_by_service_name("   ").is_empty());
    }

    #[test]
    fn test_search_by_service_name_substring_invariant() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        for query in ["lambda", "s3", "ec2", "dynamo", "api", "cloud", "sage"] {
            let needle = query.to_lowercase();
            let found = selector.search_by_service_name(query);
            assert!(!found.is_empty(), "{query:?} found nothing");
            for service in found {
                assert!(
                    service.name.to_lowercase().contains(&needle)
                        || service.id.to_lowercase().contains(&needle)
                        || service.tags.iter().any(|t| t.to_lowercase().contains(&needle))
                );
            }
        }
    }

    #[test]
    fn test_search_falls_back_to_services() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        match selector.search("CloudFront") {
            SearchOutcome::Services(services) => {
                assert_eq!(service_ids(&services), vec!["cloudfront"]);
            }
            other => panic!("expected services, got {other:?}"),
        }

        match selector.search("serverless api") {
            SearchOutcome::Pattern(result) => {
                assert_eq!(result.pattern_id(), Some("serverless-api"));
            }
            other => panic!("expected pattern, got {other:?}"),
        }
    }

    #[test]
    fn test_search_without_fallback() {
        let catalog = bundled();
        let config = SelectorConfig {
            fallback_to_service_search: false,
            ..SelectorConfig::default()
        };
        let selector = ServiceSelector::with_config(&catalog, config);

        let outcome = selector.search("CloudFront");
        assert!(matches!(outcome, SearchOutcome::Pattern(ref r) if r.no_match));
    }

    #[test]
    fn test_search_nothing_found_reports_no_match() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let outcome = selector.search("quantum");
        assert!(outcome.is_empty());
        assert!(matches!(outcome, SearchOutcome::Pattern(_)));
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let storage = selector.filter_by_category("Storage");
        assert_eq!(service_ids(&storage), vec!["s3"]);
        assert!(selector.filter_by_category("storage").is_empty());
        assert_eq!(
            selector.filter_by_category("").len(),
            catalog.services().len()
        );
    }

    #[test]
    fn test_every_category_filter_is_accurate_and_non_empty() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        for category in selector.get_categories() {
            let services = selector.filter_by_category(category);
            assert!(!services.is_empty(), "{category} has no services");
            assert!(services.iter().all(|s| &s.category == category));
        }
    }

    #[test]
    fn test_get_services_for_pattern_drops_unknown_ids() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let pattern = selector.get_pattern_by_id("serverless-api").unwrap();
        let services = selector.get_services_for_pattern(pattern);
        assert_eq!(
            service_ids(&services),
            vec!["api-gateway", "lambda", "dynamodb"]
        );

        let broken = Pattern::new("broken", "Broken", CostLevel::Low)
            .with_stack(vec!["s3", "does-not-exist", "lambda"]);
        let services = selector.get_services_for_pattern(&broken);
        assert_eq!(service_ids(&services), vec!["s3", "lambda"]);
    }

    #[test]
    fn test_get_patterns_by_topic() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let patterns = selector.get_patterns_by_topic("generative-ai");
        assert_eq!(
            pattern_ids(&patterns),
            vec!["genai-chatbot", "ai-image-analysis"]
        );
        assert!(selector.get_patterns_by_topic("unknown").is_empty());

        for topic in selector.get_trending_topics() {
            for pattern in selector.get_patterns_by_topic(&topic.id) {
                assert!(topic.related_patterns.contains(&pattern.id));
            }
        }
    }

    #[test]
    fn test_get_patterns_by_topic_skips_unknown_patterns() {
        let catalog = Catalog::new(
            vec![Service::new("s3", "Amazon S3", "Storage")],
            vec![Pattern::new("site", "Site", CostLevel::Low).with_stack(vec!["s3"])],
            vec!["Storage"],
            vec![TrendingTopic::new("web", vec!["gone", "site"])],
        );
        let selector = ServiceSelector::new(&catalog);
        let patterns = selector.get_patterns_by_topic("web");
        assert_eq!(pattern_ids(&patterns), vec!["site"]);
    }

    #[test]
    fn test_get_patterns_using_service() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let patterns = selector.get_patterns_using_service("lambda");
        assert_eq!(
            pattern_ids(&patterns),
            vec![
                "serverless-api",
                "ai-image-analysis",
                "genai-chatbot",
                "notification-system"
            ]
        );
        assert!(selector.get_patterns_using_service("nope").is_empty());
    }

    #[test]
    fn test_get_related_services() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let lambda = selector.get_service_by_id("lambda").unwrap();
        let related = selector.get_related_services(lambda, None);
        assert_eq!(
            service_ids(&related),
            vec!["api-gateway", "dynamodb", "eventbridge"]
        );
        assert_eq!(selector.get_related_services(lambda, Some(1)).len(), 1);

        for service in catalog.services() {
            assert!(selector.get_related_services(service, None).len() <= 3);
        }
    }

    #[test]
    fn test_related_limit_applies_before_resolution() {
        let catalog = Catalog::new(
            vec![
                Service::new("a", "A", "Compute").with_related(vec!["missing", "b", "c"]),
                Service::new("b", "B", "Compute"),
                Service::new("c", "C", "Compute"),
            ],
            vec![],
            vec!["Compute"],
            vec![],
        );
        let selector = ServiceSelector::new(&catalog);
        let a = selector.get_service_by_id("a").unwrap();
        let related = selector.get_related_services(a, Some(2));
        assert_eq!(service_ids(&related), vec!["b"]);
    }

    #[test]
    fn test_get_all_patterns_sorted_by_popularity() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let patterns = selector.get_all_patterns();
        assert_eq!(patterns.len(), catalog.patterns().len());
        for pair in patterns.windows(2) {
            assert!(pair[0].popularity() >= pair[1].popularity());
        }
        assert_eq!(patterns[0].id, "genai-chatbot");

        // notification-system and data-analytics share a score; catalog order holds
        let tail = pattern_ids(&patterns[patterns.len() - 2..]);
        assert_eq!(tail, vec!["notification-system", "data-analytics"]);
    }

    #[test]
    fn test_get_all_services_sorted_by_name() {
        let catalog = bundled();
        let selector = ServiceSelector::new(&catalog);

        let services = selector.get_all_services();
        assert_eq!(services.len(), catalog.services().len());
        for pair in services.windows(2) {
            assert_ne!(compare_names(&pair[0].name, &pair[1].name), Ordering::Greater);
        }
        assert_eq!(services[0].name, "Amazon API Gateway");
        assert_eq!(services[services.len() - 1].name, "Elastic Load Balancing");
    }

    #[test]
    fn test_compare_names_ignores_case_first() {
        assert_eq!(compare_names("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_names("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare_names("aws", "AWS"), Ordering::Less);
        assert_eq!(compare_names("AWS", "aws"), Ordering::Greater);
        assert_eq!(compare_names("Amazon s3", "Amazon S3"), Ordering::Less);
        assert_eq!(compare_names("AWS", "AWS"), Ordering::Equal);
    }

    #[test]
    fn test_get_all_services_lower_case_first_on_case_tie() {
        let catalog = Catalog::new(
            vec![
                Service::new("upper", "AWS", "Compute"),
                Service::new("lower", "aws", "Compute"),
                Service::new("batch", "Batch", "Compute"),
            ],
            vec![],
            vec!["Compute"],
            vec![],
        );
        let selector = ServiceSelector::new(&catalog);
        assert_eq!(
            service_ids(&selector.get_all_services()),
            vec!["lower", "upper", "batch"]
        );
    }

    #[test]
    fn test_get_all_patterns_unscored_sort_last() {
        let catalog = Catalog::new(
            vec![Service::new("s3", "Amazon S3", "Storage")],
            vec![
                Pattern::new("unscored", "Unscored", CostLevel::Low).with_stack(vec!["s3"]),
                Pattern::new("scored", "Scored", CostLevel::Low)
                    .with_stack(vec!["s3"])
                    .with_popularity(10),
            ],
            vec!["Storage"],
            vec![],
        );
        let selector = ServiceSelector::new(&catalog);
        assert_eq!(
            pattern_ids(&selector.get_all_patterns()),
            vec!["scored", "unscored"]
        );
    }

    #[test]
    fn test_empty_catalog_is_total() {
        let catalog = Catalog::new(vec![], vec![], vec![], vec![]);
        let selector = ServiceSelector::new(&catalog);

        assert!(selector.search_by_intent("serverless api").no_match);
        assert!(selector.search_by_service_name("s3").is_empty());
        assert!(selector.filter_by_category("").is_empty());
        assert!(selector.get_service_by_id("s3").is_none());
        assert!(selector.get_all_patterns().is_empty());
        assert!(selector.get_all_services().is_empty());
    }
}
