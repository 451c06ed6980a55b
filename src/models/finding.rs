use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::verdict::VerificationResult;

/// A confirmed open redirect. The accumulated list is the final artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub original_url: String,
    pub parameter: String,
    /// The externally-controlled value injected into the parameter.
    pub test_target: String,
    pub http_status: u16,
    pub location_header: String,
    pub discovered_at: DateTime<Utc>,
}

impl Finding {
    /// Build a finding from a verification result; only `Confirmed` yields one.
    pub fn from_verification(
        original_url: &str,
        parameter: &str,
        test_target: &str,
        result: &VerificationResult,
    ) -> Option<Self> {
        match result {
            VerificationResult::Confirmed { http_status, location_header } => Some(Self {
                original_url: original_url.to_string(),
                parameter: parameter.to_string(),
                test_target: test_target.to_string(),
                http_status: *http_status,
                location_header: location_header.clone(),
                discovered_at: Utc::now(),
            }),
            _ => None,
        }
    }
}
