/// Messages sent from the orchestrator to a progress display.
#[derive(Debug, Clone)]
pub enum PassEvent {
    /// Classification started over `total` candidates
    PassStarted {
        scan_id: String,
        target: String,
        total: usize,
    },
    /// A candidate has all of its verdicts
    CandidateCompleted {
        url: String,
        probes: usize,
    },
    /// An open redirect was confirmed
    FindingConfirmed {
        url: String,
        parameter: String,
    },
    /// Pass finished (or was cancelled)
    PassCompleted {
        confirmed: usize,
        duration_ms: u64,
        cancelled: bool,
    },
}
