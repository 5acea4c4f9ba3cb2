pub mod catalog;
pub mod config;
pub mod error;
pub mod matching;
pub mod models;
pub mod search;
pub mod validation;

pub use catalog::{Catalog, CatalogSummary};
pub use config::SelectorConfig;
pub use error::{CatalogError, Result};
pub use models::{CostLevel, MatchResult, Pattern, SearchOutcome, Service, TrendingTopic};
pub use search::ServiceSelector;
pub use validation::{validate, CatalogIssue};

#[cfg(feature = "python")]
mod python {
    use pyo3::prelude::*;
    use pyo3::types::{PyDict, PyList};

    use crate::catalog::Catalog;
    use crate::matching;
    use crate::models::{MatchResult, Pattern, SearchOutcome, Service};
    use crate::search::ServiceSelector;
    use crate::validation;

    /// Python-facing service selector. Owns its catalog; every call borrows it
    /// through a short-lived `ServiceSelector`.
    #[pyclass(name = "ServiceSelector")]
    struct PyServiceSelector {
        catalog: Catalog,
    }

    impl PyServiceSelector {
        fn selector(&self) -> ServiceSelector<'_> {
            ServiceSelector::new(&self.catalog)
        }
    }

    #[pymethods]
    impl PyServiceSelector {
        /// Load a catalog file, or the bundled catalog when no path is given.
        #[new]
        #[pyo3(signature = (path=None))]
        fn new(path: Option<&str>) -> PyResult<Self> {
            let catalog = match path {
                Some(p) => Catalog::from_path(p),
                None => Catalog::bundled(),
            };
            catalog
                .map(|catalog| PyServiceSelector { catalog })
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        }

        #[staticmethod]
        fn from_json(json: &str) -> PyResult<Self> {
            Catalog::from_json(json)
                .map(|catalog| PyServiceSelector { catalog })
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        }

        /// Serialize the catalog back to its JSON load format.
        fn to_json(&self) -> PyResult<String> {
            self.catalog
                .to_json()
                .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
        }

        /// Best pattern for a project description. `None` is treated as empty.
        #[pyo3(signature = (query=None))]
        fn search_by_intent(&self, py: Python, query: Option<&str>) -> PyResult<Py<PyAny>> {
            let result = self.selector().search_by_intent(query.unwrap_or_default());
            Ok(match_result_to_dict(py, &result)?.into())
        }

        /// Intent match with service-name fallback.
        #[pyo3(signature = (query=None))]
        fn search(&self, py: Python, query: Option<&str>) -> PyResult<Py<PyAny>> {
            let dict = PyDict::new(py);
            match self.selector().search(query.unwrap_or_default()) {
                SearchOutcome::Pattern(result) => {
                    dict.set_item("kind", "pattern")?;
                    dict.set_item("result", match_result_to_dict(py, &result)?)?;
                }
                SearchOutcome::Services(services) => {
                    dict.set_item("kind", "services")?;
                    dict.set_item("result", services_to_list(py, &services)?)?;
                }
            }
            Ok(dict.into())
        }

        #[pyo3(signature = (query=None))]
        fn search_by_service_name(&self, py: Python, query: Option<&str>) -> PyResult<Py<PyAny>> {
            let services = self
                .selector()
                .search_by_service_name(query.unwrap_or_default());
            Ok(services_to_list(py, &services)?.into())
        }

        /// `None` or an empty string returns every service.
        #[pyo3(signature = (category=None))]
        fn filter_by_category(&self, py: Python, category: Option<&str>) -> PyResult<Py<PyAny>> {
            let services = self
                .selector()
                .filter_by_category(category.unwrap_or_default());
            Ok(services_to_list(py, &services)?.into())
        }

        fn get_service_by_id<'py>(
            &self,
            py: Python<'py>,
            service_id: &str,
        ) -> PyResult<Option<Bound<'py, PyDict>>> {
            self.selector()
                .get_service_by_id(service_id)
                .map(|s| service_to_dict(py, s))
                .transpose()
        }

        fn get_pattern_by_id<'py>(
            &self,
            py: Python<'py>,
            pattern_id: &str,
        ) -> PyResult<Option<Bound<'py, PyDict>>> {
            self.selector()
                .get_pattern_by_id(pattern_id)
                .map(|p| pattern_to_dict(py, p))
                .transpose()
        }

        /// Stack services of a pattern, looked up by pattern id.
        fn get_services_for_pattern(&self, py: Python, pattern_id: &str) -> PyResult<Py<PyAny>> {
            let selector = self.selector();
            let services = selector
                .get_pattern_by_id(pattern_id)
                .map(|p| selector.get_services_for_pattern(p))
                .unwrap_or_default();
            Ok(services_to_list(py, &services)?.into())
        }

        #[pyo3(signature = (service_id, limit=None))]
        fn get_related_services(
            &self,
            py: Python,
            service_id: &str,
            limit: Option<usize>,
        ) -> PyResult<Py<PyAny>> {
            let selector = self.selector();
            let services = selector
                .get_service_by_id(service_id)
                .map(|s| selector.get_related_services(s, limit))
                .unwrap_or_default();
            Ok(services_to_list(py, &services)?.into())
        }

        fn get_patterns_by_topic(&self, py: Python, topic_id: &str) -> PyResult<Py<PyAny>> {
            let patterns = self.selector().get_patterns_by_topic(topic_id);
            Ok(patterns_to_list(py, &patterns)?.into())
        }

        fn get_patterns_using_service(&self, py: Python, service_id: &str) -> PyResult<Py<PyAny>> {
            let patterns = self.selector().get_patterns_using_service(service_id);
            Ok(patterns_to_list(py, &patterns)?.into())
        }

        fn get_all_patterns(&self, py: Python) -> PyResult<Py<PyAny>> {
            let patterns = self.selector().get_all_patterns();
            Ok(patterns_to_list(py, &patterns)?.into())
        }

        fn get_all_services(&self, py: Python) -> PyResult<Py<PyAny>> {
            let services = self.selector().get_all_services();
            Ok(services_to_list(py, &services)?.into())
        }

        fn get_categories(&self) -> Vec<String> {
            self.catalog.categories().to_vec()
        }

        /// Trending topic ids with their related pattern ids.
        fn get_trending_topics(&self, py: Python) -> PyResult<Py<PyAny>> {
            let list = PyList::empty(py);
            for topic in self.catalog.trending_topics() {
                let d = PyDict::new(py);
                d.set_item("id", &topic.id)?;
                d.set_item("related_patterns", &topic.related_patterns)?;
                list.append(d)?;
            }
            Ok(list.into())
        }

        /// Score a query against one pattern; unknown ids score 0.
        fn score(&self, query: &str, pattern_id: &str) -> usize {
            self.catalog
                .pattern(pattern_id)
                .map(|p| matching::score(query, p))
                .unwrap_or(0)
        }

        /// Integrity findings as human-readable messages.
        fn validate(&self) -> Vec<String> {
            validation::validate(&self.catalog)
                .iter()
                .map(|issue| issue.to_string())
                .collect()
        }
    }

    /// Tokenize free text the way the matcher does.
    #[pyfunction]
    #[pyo3(name = "normalize", signature = (text=None))]
    fn py_normalize(text: Option<&str>) -> Vec<String> {
        matching::normalize(text.unwrap_or_default())
    }

    // ── Conversion helpers ──────────────────────────────────────────────

    fn match_result_to_dict<'py>(
        py: Python<'py>,
        result: &MatchResult<'_>,
    ) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        match result.pattern {
            Some(pattern) => dict.set_item("pattern", pattern_to_dict(py, pattern)?)?,
            None => dict.set_item("pattern", py.None())?,
        }
        dict.set_item("score", result.score)?;
        dict.set_item("matched_keywords", &result.matched_keywords)?;
        dict.set_item("no_match", result.no_match)?;
        Ok(dict)
    }

    fn service_to_dict<'py>(py: Python<'py>, service: &Service) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("id", &service.id)?;
        dict.set_item("name", &service.name)?;
        dict.set_item("category", &service.category)?;
        dict.set_item("tags", &service.tags)?;
        dict.set_item("related_service_ids", &service.related_service_ids)?;
        dict.set_item("icon", &service.icon)?;
        dict.set_item("short_description", &service.short_description)?;
        dict.set_item("documentation", &service.documentation)?;
        dict.set_item("billing_model", &service.billing_model)?;
        dict.set_item("cost_hint", &service.cost_hint)?;
        dict.set_item("has_free_tier", service.has_free_tier)?;
        Ok(dict)
    }

    fn pattern_to_dict<'py>(py: Python<'py>, pattern: &Pattern) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new(py);
        dict.set_item("id", &pattern.id)?;
        dict.set_item("label", &pattern.label)?;
        dict.set_item("summary", &pattern.summary)?;
        dict.set_item("intent_keywords", &pattern.intent_keywords)?;
        dict.set_item("stack", &pattern.stack)?;
        dict.set_item("trend_tags", &pattern.trend_tags)?;
        dict.set_item("popularity_score", pattern.popularity_score)?;
        dict.set_item("cost_level", pattern.cost_level.as_str())?;
        dict.set_item("difficulty_level", &pattern.difficulty_level)?;
        dict.set_item("estimated_build_time", &pattern.estimated_build_time)?;
        dict.set_item("prerequisite_knowledge", &pattern.prerequisite_knowledge)?;
        dict.set_item("security_notes", &pattern.security_notes)?;
        dict.set_item("has_comparison", pattern.has_comparison())?;
        Ok(dict)
    }

    fn services_to_list<'py>(
        py: Python<'py>,
        services: &[&Service],
    ) -> PyResult<Bound<'py, PyList>> {
        let list = PyList::empty(py);
        for service in services {
            list.append(service_to_dict(py, service)?)?;
        }
        Ok(list)
    }

    fn patterns_to_list<'py>(
        py: Python<'py>,
        patterns: &[&Pattern],
    ) -> PyResult<Bound<'py, PyList>> {
        let list = PyList::empty(py);
        for pattern in patterns {
            list.append(pattern_to_dict(py, pattern)?)?;
        }
        Ok(list)
    }

    /// Python module definition
    #[pymodule]
    fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PyServiceSelector>()?;
        m.add_function(wrap_pyfunction!(py_normalize, m)?)?;
        Ok(())
    }
}
