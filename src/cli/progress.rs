use std::time::Duration;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use crate::pipeline::PassEvent;
use crate::utils::formatting::format_duration;

/// Progress bar over candidates, fed by orchestrator events.
pub struct ScanProgress {
    bar: ProgressBar,
    findings_count: usize,
    probes: usize,
}

impl ScanProgress {
    pub fn new() -> Self {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "  {spinner:.cyan} {bar:30.cyan/dim} {pos}/{len} candidates | {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓░");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar, findings_count: 0, probes: 0 }
    }

    pub fn handle_event(&mut self, event: &PassEvent) {
        match event {
            PassEvent::PassStarted { target, total, .. } => {
                self.bar.set_length(*total as u64);
                self.bar.set_message(format!("Verifying {}", target));
            }
            PassEvent::CandidateCompleted { probes, .. } => {
                self.probes += probes;
                self.bar.inc(1);
                self.update_status();
            }
            PassEvent::FindingConfirmed { url, parameter } => {
                self.findings_count += 1;
                self.bar.println(format!("  [Confirmed] {} param={}", url, parameter));
                self.update_status();
            }
            PassEvent::PassCompleted { confirmed, duration_ms, cancelled } => {
                let verb = if *cancelled { "Cancelled" } else { "Done" };
                self.bar.finish_with_message(format!(
                    "{}: {} confirmed in {}",
                    verb,
                    confirmed,
                    format_duration(*duration_ms)
                ));
            }
        }
    }

    pub fn findings_count(&self) -> usize {
        self.findings_count
    }

    fn update_status(&self) {
        self.bar.set_message(format!("{} probes | {} confirmed", self.probes, self.findings_count));
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain events until the orchestrator drops its sender.
pub async fn drive(mut rx: mpsc::UnboundedReceiver<PassEvent>) {
    let mut progress = ScanProgress::new();
    while let Some(event) = rx.recv().await {
        progress.handle_event(&event);
    }
}
