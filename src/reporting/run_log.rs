use std::path::{Path, PathBuf};
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use crate::errors::ScanError;

/// Plain-text, timestamped log of one scan run.
pub struct RunLog {
    path: PathBuf,
}

impl RunLog {
    pub async fn initialize(path: &Path, scan_id: &str, domain: &str) -> Result<Self, ScanError> {
        let header = format!(
            "# redirect-scout run log\n# Scan: {}\n# Domain: {}\n# Started: {}\n\n",
            scan_id,
            domain,
            Utc::now().to_rfc3339()
        );
        tokio::fs::write(path, &header).await?;
        Ok(Self { path: path.to_path_buf() })
    }

    pub async fn log_event(&self, message: &str) -> Result<(), ScanError> {
        let line = format!("[{}] {}\n", Utc::now().format("%H:%M:%S"), message);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true).append(true).open(&self.path).await?;
        file.write_all(line.as_bytes()).await?;
        Ok(())
    }
}
