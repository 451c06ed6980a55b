use serde::{Deserialize, Serialize};
use crate::models::verdict::{VerdictRecord, VerdictTag};

/// Counters for one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassSummary {
    pub candidates: usize,
    /// Parameters that went through domain classification (internal or probed).
    pub flagged_params: usize,
    pub internal: usize,
    pub confirmed: usize,
    pub not_confirmed: usize,
    pub no_flagged_param: usize,
    pub probes_sent: usize,
    pub cancelled: bool,
    pub duration_ms: u64,
}

impl PassSummary {
    pub fn record(&mut self, verdict: &VerdictRecord) {
        if verdict.parameter.is_some() {
            self.flagged_params += 1;
        }
        match verdict.tag {
            VerdictTag::Internal => self.internal += 1,
            VerdictTag::Confirmed => self.confirmed += 1,
            VerdictTag::NotConfirmed => self.not_confirmed += 1,
            VerdictTag::NoFlaggedParam => self.no_flagged_param += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_tags() {
        let mut summary = PassSummary::default();
        summary.record(&VerdictRecord::internal("https://a.test/?r=/", "r", "/"));
        summary.record(&VerdictRecord::no_flagged_param("https://b.test/", "none"));
        assert_eq!(summary.flagged_params, 1);
        assert_eq!(summary.internal, 1);
        assert_eq!(summary.no_flagged_param, 1);
        assert_eq!(summary.confirmed, 0);
    }

    #[test]
    fn test_invalid_url_not_counted_as_flagged() {
        let mut summary = PassSummary::default();
        summary.record(&VerdictRecord::invalid_url("not a url", "Invalid URL: bad"));
        assert_eq!(summary.not_confirmed, 1);
        assert_eq!(summary.flagged_params, 0);
    }
}
