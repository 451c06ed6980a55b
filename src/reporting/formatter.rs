use crate::models::verdict::{VerdictRecord, VerdictTag};
use crate::pipeline::state::PassSummary;
use crate::utils::formatting::format_duration;

/// Render one verdict as a line of the verdict file (no trailing newline).
///
/// Control characters in harvested text are escaped so one verdict is
/// always exactly one physical line.
pub fn format_verdict_line(record: &VerdictRecord) -> String {
    let url = escape_controls(&record.url);
    let reason = escape_controls(&record.reason);
    let param = escape_controls(record.parameter.as_deref().unwrap_or(""));
    match record.tag {
        VerdictTag::Internal => format!(
            "[{}] {} (param={} value={})",
            record.tag,
            url,
            param,
            escape_controls(record.value.as_deref().unwrap_or(""))
        ),
        VerdictTag::Confirmed => format!("[{}] {} param={}", record.tag, url, param),
        VerdictTag::NotConfirmed if record.parameter.is_none() => {
            format!("[{}] {} => {}", record.tag, url, reason)
        }
        VerdictTag::NotConfirmed => format!("[{}] {} param={} => {}", record.tag, url, param, reason),
        VerdictTag::NoFlaggedParam => format!("[{}] {}", record.tag, url),
    }
}

fn escape_controls(text: &str) -> String {
    if !text.chars().any(char::is_control) {
        return text.to_string();
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        if c.is_control() {
            escaped.extend(c.escape_default());
        } else {
            escaped.push(c);
        }
    }
    escaped
}

pub fn format_summary(summary: &PassSummary) -> String {
    format!(
        "{} candidates, {} flagged params: {} confirmed, {} not confirmed, {} internal, {} without flagged params ({} probes, {})",
        summary.candidates,
        summary.flagged_params,
        summary.confirmed,
        summary.not_confirmed,
        summary.internal,
        summary.no_flagged_param,
        summary.probes_sent,
        format_duration(summary.duration_ms),
    )
}
