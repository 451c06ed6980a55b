use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use crate::errors::ScanError;
use crate::models::verdict::VerdictRecord;
use super::formatter::format_verdict_line;

/// Destination for verdict records as the orchestrator produces them.
#[async_trait]
pub trait VerdictSink: Send + Sync {
    async fn record(&self, record: &VerdictRecord) -> Result<(), ScanError>;
}

/// Keeps verdicts in memory.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<VerdictRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn records(&self) -> Vec<VerdictRecord> {
        self.records.lock().await.clone()
    }
}

#[async_trait]
impl VerdictSink for MemorySink {
    async fn record(&self, record: &VerdictRecord) -> Result<(), ScanError> {
        self.records.lock().await.push(record.clone());
        Ok(())
    }
}

/// Appends one formatted line per verdict. The file is truncated on creation.
pub struct FileVerdictSink {
    path: PathBuf,
    file: Mutex<tokio::fs::File>,
}

impl FileVerdictSink {
    pub async fn create(path: &Path) -> Result<Self, ScanError> {
        let file = tokio::fs::File::create(path).await.map_err(|e| {
            ScanError::Io(std::io::Error::new(
                e.kind(),
                format!("Cannot create verdict file {}: {}", path.display(), e),
            ))
        })?;
        Ok(Self { path: path.to_path_buf(), file: Mutex::new(file) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn flush(&self) -> Result<(), ScanError> {
        self.file.lock().await.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl VerdictSink for FileVerdictSink {
    async fn record(&self, record: &VerdictRecord) -> Result<(), ScanError> {
        let line = format!("{}\n", format_verdict_line(record));
        let mut file = self.file.lock().await;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
