use std::sync::Arc;
use tokio::sync::Mutex;
use crate::models::finding::Finding;

/// Append-only accumulator of confirmed findings. Clones share the same list.
#[derive(Debug, Clone, Default)]
pub struct FindingCollector {
    findings: Arc<Mutex<Vec<Finding>>>,
}

impl FindingCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn extend(&self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.lock().await.extend(findings);
    }

    /// Copy of the findings in discovery order.
    pub async fn snapshot(&self) -> Vec<Finding> {
        self.findings.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.findings.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
