use serde::{Deserialize, Serialize};

/// Outcome of verifying one (URL, parameter) pair. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum VerificationResult {
    /// The probe was answered with a 3xx whose Location carries the test target.
    Confirmed {
        http_status: u16,
        location_header: String,
    },
    /// A probe was attempted (or failed in transport) without confirming.
    NotConfirmed { reason: String },
    /// No probe was sent.
    Skipped { reason: String },
}

impl VerificationResult {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, VerificationResult::Confirmed { .. })
    }

    /// True when a network request was issued to reach this result.
    pub fn probed(&self) -> bool {
        !matches!(self, VerificationResult::Skipped { .. })
    }

    pub fn reason(&self) -> String {
        match self {
            Self::Confirmed { http_status, location_header } => {
                format!("{} redirect to test target (Location={})", http_status, location_header)
            }
            Self::NotConfirmed { reason } => reason.clone(),
            Self::Skipped { reason } => format!("skipped: {}", reason),
        }
    }
}

/// Tag carried by every verdict line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictTag {
    #[serde(rename = "Internal?")]
    Internal,
    Confirmed,
    NotConfirmed,
    NoFlaggedParam,
}

impl VerdictTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "Internal?",
            Self::Confirmed => "Confirmed",
            Self::NotConfirmed => "NotConfirmed",
            Self::NoFlaggedParam => "NoFlaggedParam",
        }
    }
}

impl std::fmt::Display for VerdictTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-URL (or per-parameter) classification line handed to the verdict sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictRecord {
    pub tag: VerdictTag,
    pub url: String,
    /// Absent for verdicts covering the whole URL (`NoFlaggedParam`, unparseable input).
    pub parameter: Option<String>,
    /// Decoded canonical value, recorded for `Internal?` verdicts.
    pub value: Option<String>,
    pub reason: String,
}

impl VerdictRecord {
    pub fn internal(url: &str, parameter: &str, decoded_value: &str) -> Self {
        Self {
            tag: VerdictTag::Internal,
            url: url.to_string(),
            parameter: Some(parameter.to_string()),
            value: Some(decoded_value.to_string()),
            reason: "redirect value stays on the target domain".to_string(),
        }
    }

    pub fn no_flagged_param(url: &str, reason: impl Into<String>) -> Self {
        Self {
            tag: VerdictTag::NoFlaggedParam,
            url: url.to_string(),
            parameter: None,
            value: None,
            reason: reason.into(),
        }
    }

    /// A corpus line that could not be parsed as a URL. No probe is sent.
    pub fn invalid_url(url: &str, error: impl std::fmt::Display) -> Self {
        Self {
            tag: VerdictTag::NotConfirmed,
            url: url.to_string(),
            parameter: None,
            value: None,
            reason: format!("skipped: {}", error),
        }
    }

    /// Verdict for a parameter that went through the active verifier.
    /// `Skipped` results are reported as `NotConfirmed`.
    pub fn from_verification(url: &str, parameter: &str, result: &VerificationResult) -> Self {
        let tag = if result.is_confirmed() {
            VerdictTag::Confirmed
        } else {
            VerdictTag::NotConfirmed
        };
        Self {
            tag,
            url: url.to_string(),
            parameter: Some(parameter.to_string()),
            value: None,
            reason: result.reason(),
        }
    }
}
