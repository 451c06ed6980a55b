use std::path::PathBuf;
use async_trait::async_trait;
use tokio::io::AsyncReadExt;
use crate::errors::ScanError;
use super::{collect_lines, CorpusProvider};

/// One URL per line from a file, or from stdin when the path is `-`.
pub struct FileCorpus {
    path: PathBuf,
}

impl FileCorpus {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn is_stdin(&self) -> bool {
        self.path.as_os_str() == "-"
    }
}

#[async_trait]
impl CorpusProvider for FileCorpus {
    async fn fetch(&self, _domain: &str) -> Result<Vec<String>, ScanError> {
        let content = if self.is_stdin() {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            buf
        } else {
            tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                ScanError::Corpus(format!("Cannot read {}: {}", self.path.display(), e))
            })?
        };
        Ok(collect_lines(&content))
    }

    fn describe(&self) -> String {
        if self.is_stdin() {
            "stdin".to_string()
        } else {
            format!("file:{}", self.path.display())
        }
    }
}
