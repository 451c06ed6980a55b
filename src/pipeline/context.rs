use std::sync::Arc;
use uuid::Uuid;
use crate::config::{DEFAULT_CONCURRENCY, DEFAULT_TEST_TARGET};
use crate::detection::RedirectHeuristic;
use crate::reporting::VerdictSink;

/// Everything one classification pass needs, passed explicitly to the orchestrator.
#[derive(Clone)]
pub struct ScanContext {
    pub scan_id: String,
    /// Apex domain, trimmed and lowercased.
    pub target_domain: String,
    pub test_target: String,
    pub heuristic: RedirectHeuristic,
    /// Maximum number of candidates (and so probes) in flight.
    pub concurrency: usize,
    pub sink: Arc<dyn VerdictSink>,
}

impl ScanContext {
    pub fn new(target_domain: &str, sink: Arc<dyn VerdictSink>) -> Self {
        Self {
            scan_id: Uuid::new_v4().to_string(),
            target_domain: normalize_target(target_domain),
            test_target: DEFAULT_TEST_TARGET.to_string(),
            heuristic: RedirectHeuristic::default(),
            concurrency: DEFAULT_CONCURRENCY,
            sink,
        }
    }

    pub fn with_test_target(mut self, test_target: impl Into<String>) -> Self {
        self.test_target = test_target.into();
        self
    }

    pub fn with_heuristic(mut self, heuristic: RedirectHeuristic) -> Self {
        self.heuristic = heuristic;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }
}

fn normalize_target(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}
