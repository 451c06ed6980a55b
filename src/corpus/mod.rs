pub mod file;
pub mod command;
pub mod combined;

pub use file::FileCorpus;
pub use command::{default_harvesters, CommandCorpus};
pub use combined::CombinedCorpus;

use async_trait::async_trait;
use crate::errors::ScanError;

/// Source of raw harvested URLs for a domain.
///
/// Harvesting itself (subdomain enumeration, archives, parameter spiders)
/// lives behind this trait; the scanner only consumes the resulting lines.
#[async_trait]
pub trait CorpusProvider: Send + Sync {
    async fn fetch(&self, domain: &str) -> Result<Vec<String>, ScanError>;

    /// Short label for logs.
    fn describe(&self) -> String;
}

/// Split provider output into trimmed, non-empty lines.
pub(crate) fn collect_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
