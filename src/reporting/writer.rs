use std::path::Path;
use crate::errors::ScanError;
use crate::models::finding::Finding;
use tracing::info;

/// Atomic file write: write to temp, then rename
pub async fn atomic_write(path: &Path, content: &str) -> Result<(), ScanError> {
    let tmp = path.with_extension("tmp");
    tokio::fs::write(&tmp, content).await?;
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

/// Write the confirmed findings as a pretty-printed JSON array.
pub async fn write_findings_json(path: &Path, findings: &[Finding]) -> Result<(), ScanError> {
    let json = serde_json::to_string_pretty(findings)?;
    atomic_write(path, &json).await?;
    info!(path = %path.display(), count = findings.len(), "Wrote findings JSON");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::verdict::VerificationResult;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_empty_findings_written_as_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("findings.json");
        write_findings_json(&path, &[]).await.unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert!(!path.with_extension("tmp").exists());
    }

    #[tokio::test]
    async fn test_findings_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("findings.json");
        let result = VerificationResult::Confirmed {
            http_status: 301,
            location_header: "https://attacker.test/unique".into(),
        };
        let finding = Finding::from_verification(
            "https://shop.example.com/go?redirect=x",
            "redirect",
            "https://attacker.test/unique",
            &result,
        ).unwrap();
        write_findings_json(&path, &[finding]).await.unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let entry = &parsed[0];
        assert_eq!(entry["parameter"], "redirect");
        assert_eq!(entry["http_status"], 301);
        assert_eq!(entry["location_header"], "https://attacker.test/unique");
        assert!(entry["discovered_at"].is_string());
    }
}
