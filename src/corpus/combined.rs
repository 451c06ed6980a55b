use std::collections::HashSet;
use async_trait::async_trait;
use crate::errors::ScanError;
use super::CorpusProvider;
use tracing::{info, warn};

struct Source {
    provider: Box<dyn CorpusProvider>,
    required: bool,
}

/// Concatenates several providers and deduplicates, keeping first-seen order.
///
/// A failing optional provider is logged and skipped; a failing required one
/// aborts the fetch.
#[derive(Default)]
pub struct CombinedCorpus {
    sources: Vec<Source>,
}

impl CombinedCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_provider(mut self, provider: Box<dyn CorpusProvider>, required: bool) -> Self {
        self.sources.push(Source { provider, required });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl CorpusProvider for CombinedCorpus {
    async fn fetch(&self, domain: &str) -> Result<Vec<String>, ScanError> {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();

        for source in &self.sources {
            let name = source.provider.describe();
            match source.provider.fetch(domain).await {
                Ok(lines) => {
                    let before = urls.len();
                    for line in lines {
                        if seen.insert(line.clone()) {
                            urls.push(line);
                        }
                    }
                    info!(source = %name, new_urls = urls.len() - before, "Corpus source loaded");
                }
                Err(e) if !source.required => {
                    warn!(source = %name, error = %e, "Optional corpus source failed, continuing");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(urls)
    }

    fn describe(&self) -> String {
        let names: Vec<String> = self.sources.iter().map(|s| s.provider.describe()).collect();
        format!("combined[{}]", names.join(", "))
    }
}
