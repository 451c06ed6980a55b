use super::types::ScanError;

#[derive(Debug, Clone)]
pub struct ErrorClassification {
    pub error_type: &'static str,
    /// Fatal errors end the whole pass; everything else stays local to one
    /// candidate and is folded into its verdict.
    pub fatal: bool,
}

impl ScanError {
    /// Classify this error to determine its type and whether it aborts the pass.
    pub fn classify(&self) -> ErrorClassification {
        match self {
            // Per-candidate errors
            ScanError::InvalidUrl(_) => ErrorClassification {
                error_type: "InvalidUrlError",
                fatal: false,
            },
            ScanError::Network(_) => ErrorClassification {
                error_type: "NetworkError",
                fatal: false,
            },
            ScanError::Timeout(_) => ErrorClassification {
                error_type: "TimeoutError",
                fatal: false,
            },

            // Orchestration-level errors
            ScanError::Config(_) => ErrorClassification {
                error_type: "ConfigError",
                fatal: true,
            },
            ScanError::Corpus(_) => ErrorClassification {
                error_type: "CorpusError",
                fatal: true,
            },
            ScanError::NoInput(_) => ErrorClassification {
                error_type: "NoInputError",
                fatal: true,
            },
            ScanError::Cancelled => ErrorClassification {
                error_type: "Cancelled",
                fatal: true,
            },
            ScanError::Io(_) => ErrorClassification {
                error_type: "IoError",
                fatal: true,
            },
            ScanError::Json(_) => ErrorClassification {
                error_type: "JsonError",
                fatal: true,
            },
            ScanError::Yaml(_) => ErrorClassification {
                error_type: "YamlError",
                fatal: true,
            },
            ScanError::Internal(_) => ErrorClassification {
                error_type: "InternalError",
                fatal: true,
            },
        }
    }

    /// Process exit code used by the binary when this error ends a command.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScanError::Config(_) | ScanError::Yaml(_) => 2,
            ScanError::NoInput(_) => 3,
            ScanError::Corpus(_) => 4,
            ScanError::Cancelled => 130,
            _ => 1,
        }
    }
}
