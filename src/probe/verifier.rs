use std::sync::Arc;
use std::time::Duration;
use crate::models::{CandidateUrl, VerificationResult};
use super::mutate::substitute_first_value;
use super::transport::{ProbeResponse, ProbeTransport};
use tracing::{debug, warn};

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Mutates one parameter, sends one probe, and interprets the answer.
///
/// There are no retries: one probe per (URL, parameter) is the whole attempt,
/// which bounds the traffic sent to the target.
pub struct ActiveVerifier {
    transport: Arc<dyn ProbeTransport>,
    timeout: Duration,
}

impl ActiveVerifier {
    pub fn new(transport: Arc<dyn ProbeTransport>) -> Self {
        Self {
            transport,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Upper bound on a single probe, enforced on top of the transport's own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn verify(
        &self,
        url: &CandidateUrl,
        param_name: &str,
        test_target: &str,
    ) -> VerificationResult {
        if !url.has_query() {
            return VerificationResult::Skipped {
                reason: "No query string present".to_string(),
            };
        }

        let Some(mutated) = substitute_first_value(url, param_name, test_target) else {
            return VerificationResult::Skipped {
                reason: format!("Parameter {} not found", param_name),
            };
        };

        debug!(probe = %mutated, param = %param_name, "Testing redirect");

        let response = match tokio::time::timeout(self.timeout, self.transport.get(&mutated)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                let class = e.classify();
                if class.fatal {
                    // Still local to this pair, but not a network condition.
                    warn!(probe = %mutated, error_type = class.error_type, error = %e, "Probe failed unexpectedly");
                    return VerificationResult::NotConfirmed {
                        reason: format!("probe error ({}): {}", class.error_type, e),
                    };
                }
                debug!(probe = %mutated, error_type = class.error_type, error = %e, "Probe failed");
                return VerificationResult::NotConfirmed {
                    reason: format!("HTTP error: {}", e),
                };
            }
            Err(_) => {
                return VerificationResult::NotConfirmed {
                    reason: format!("HTTP error: probe timed out after {}s", self.timeout.as_secs_f64()),
                };
            }
        };

        interpret_response(&response, test_target)
    }
}

/// Classify a probe response against the injected test target.
pub fn interpret_response(response: &ProbeResponse, test_target: &str) -> VerificationResult {
    if !(300..400).contains(&response.status) {
        return VerificationResult::NotConfirmed {
            reason: format!("Status={}, not a redirect", response.status),
        };
    }

    let location = response.location.clone().unwrap_or_default();
    if !test_target.is_empty() && location.contains(test_target) {
        VerificationResult::Confirmed {
            http_status: response.status,
            location_header: location,
        }
    } else {
        VerificationResult::NotConfirmed {
            reason: format!("Redirected, but not to {} (Location={})", test_target, location),
        }
    }
}
