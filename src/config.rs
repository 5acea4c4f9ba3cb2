use serde::Deserialize;

/// Tunables for [`ServiceSelector`](crate::search::ServiceSelector).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Cap applied by `get_related_services` when the caller passes no limit
    pub related_services_limit: usize,
    /// When intent matching finds nothing, `search` retries as a service-name search
    pub fallback_to_service_search: bool,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            related_services_limit: 3,
            fallback_to_service_search: true,
        }
    }
}
