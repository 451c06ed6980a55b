use std::time::Instant;
use futures::{future, stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use crate::detection::{decode, is_internal};
use crate::errors::ScanError;
use crate::models::{CandidateUrl, Finding, VerdictRecord, VerdictTag};
use crate::probe::ActiveVerifier;
use super::collector::FindingCollector;
use super::context::ScanContext;
use super::events::PassEvent;
use super::state::PassSummary;
use tracing::{debug, info, warn};

/// Everything classifying one candidate produced. Applied to the sink and
/// collector only once the candidate is complete.
#[derive(Debug, Clone, Default)]
pub struct CandidateOutcome {
    pub url: String,
    pub verdicts: Vec<VerdictRecord>,
    pub findings: Vec<Finding>,
    pub probes: usize,
}

pub struct ClassificationOrchestrator {
    context: ScanContext,
    verifier: ActiveVerifier,
    collector: FindingCollector,
    cancel_token: CancellationToken,
    event_tx: Option<mpsc::UnboundedSender<PassEvent>>,
}

impl ClassificationOrchestrator {
    pub fn new(context: ScanContext, verifier: ActiveVerifier) -> Self {
        Self {
            context,
            verifier,
            collector: FindingCollector::new(),
            cancel_token: CancellationToken::new(),
            event_tx: None,
        }
    }

    /// Use an external token so a signal handler can stop the pass between candidates.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<PassEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Shared handle to the confirmed findings.
    pub fn collector(&self) -> FindingCollector {
        self.collector.clone()
    }

    fn emit(&self, event: PassEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Classify every parameter of one candidate URL.
    ///
    /// Unflagged parameters are ignored, internal values are reported without
    /// a probe, and everything else goes through the verifier exactly once.
    pub async fn classify_candidate(&self, raw: &str) -> CandidateOutcome {
        let mut outcome = CandidateOutcome { url: raw.to_string(), ..Default::default() };

        let url = match CandidateUrl::parse(raw) {
            Ok(url) => url,
            Err(e) => {
                debug!(url = %raw, error = %e, "Skipping unparseable candidate");
                outcome.verdicts.push(VerdictRecord::invalid_url(raw, &e));
                return outcome;
            }
        };

        let ctx = &self.context;
        for param in url.parameters() {
            if !ctx.heuristic.is_flagged(param) {
                continue;
            }

            let decoded = decode(param.canonical_value());
            if is_internal(&ctx.target_domain, &decoded) {
                outcome.verdicts.push(VerdictRecord::internal(url.as_str(), &param.name, &decoded));
                continue;
            }

            let result = self.verifier.verify(&url, &param.name, &ctx.test_target).await;
            if result.probed() {
                outcome.probes += 1;
            }
            if let Some(finding) =
                Finding::from_verification(url.as_str(), &param.name, &ctx.test_target, &result)
            {
                outcome.findings.push(finding);
            }
            outcome.verdicts.push(VerdictRecord::from_verification(url.as_str(), &param.name, &result));
        }

        if outcome.verdicts.is_empty() {
            outcome.verdicts.push(VerdictRecord::no_flagged_param(
                url.as_str(),
                "no redirect-like parameter",
            ));
        }
        outcome
    }

    /// Run the pass over all candidates with at most `concurrency` in flight.
    ///
    /// Cancellation stops new candidates from starting; the ones already in
    /// flight complete and are recorded. The returned summary has
    /// `cancelled` set in that case.
    pub async fn run<S: AsRef<str> + Sync>(&self, candidates: &[S]) -> Result<PassSummary, ScanError> {
        let start = Instant::now();
        let mut summary = PassSummary::default();

        info!(
            scan_id = %self.context.scan_id,
            target = %self.context.target_domain,
            candidates = candidates.len(),
            concurrency = self.context.concurrency,
            "Classification pass started"
        );
        self.emit(PassEvent::PassStarted {
            scan_id: self.context.scan_id.clone(),
            target: self.context.target_domain.clone(),
            total: candidates.len(),
        });

        let token = self.cancel_token.clone();
        let outcomes = stream::iter(candidates.iter())
            .take_while(move |_| future::ready(!token.is_cancelled()))
            .map(|raw| self.classify_candidate(raw.as_ref()))
            .buffered(self.context.concurrency);
        futures::pin_mut!(outcomes);

        while let Some(outcome) = outcomes.next().await {
            self.accumulate(outcome, &mut summary).await?;
        }

        summary.cancelled = self.cancel_token.is_cancelled();
        summary.duration_ms = start.elapsed().as_millis() as u64;

        if summary.cancelled {
            warn!(
                processed = summary.candidates,
                total = candidates.len(),
                "Classification pass cancelled"
            );
        }
        info!(
            scan_id = %self.context.scan_id,
            confirmed = summary.confirmed,
            not_confirmed = summary.not_confirmed,
            internal = summary.internal,
            probes = summary.probes_sent,
            duration_ms = summary.duration_ms,
            "Classification pass complete"
        );
        self.emit(PassEvent::PassCompleted {
            confirmed: summary.confirmed,
            duration_ms: summary.duration_ms,
            cancelled: summary.cancelled,
        });

        Ok(summary)
    }

    /// Single accumulation point for verdicts and findings.
    async fn accumulate(&self, outcome: CandidateOutcome, summary: &mut PassSummary) -> Result<(), ScanError> {
        summary.candidates += 1;
        summary.probes_sent += outcome.probes;

        for verdict in &outcome.verdicts {
            log_verdict(verdict);
            self.context.sink.record(verdict).await?;
            summary.record(verdict);
        }

        for finding in &outcome.findings {
            self.emit(PassEvent::FindingConfirmed {
                url: finding.original_url.clone(),
                parameter: finding.parameter.clone(),
            });
        }
        self.collector.extend(outcome.findings).await;

        self.emit(PassEvent::CandidateCompleted { url: outcome.url, probes: outcome.probes });
        Ok(())
    }
}

fn log_verdict(verdict: &VerdictRecord) {
    let param = verdict.parameter.as_deref().unwrap_or("-");
    match verdict.tag {
        VerdictTag::Confirmed => {
            warn!(url = %verdict.url, param = %param, "Open redirect confirmed");
        }
        VerdictTag::NotConfirmed => {
            info!(url = %verdict.url, param = %param, reason = %verdict.reason, "Not confirmed");
        }
        VerdictTag::Internal => {
            debug!(url = %verdict.url, param = %param, value = ?verdict.value, "Internal redirect value");
        }
        VerdictTag::NoFlaggedParam => {
            debug!(url = %verdict.url, reason = %verdict.reason, "No flagged parameter");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use async_trait::async_trait;
    use crate::probe::{ProbeResponse, ProbeTransport};
    use crate::reporting::MemorySink;

    const ATTACKER: &str = "https://attacker.test/unique";

    struct MockTransport {
        status: u16,
        location: Option<String>,
        calls: AtomicUsize,
        urls: Mutex<Vec<String>>,
    }

    impl MockTransport {
        fn new(status: u16, location: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                status,
                location: location.map(str::to_string),
                calls: AtomicUsize::new(0),
                urls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ProbeTransport for MockTransport {
        async fn get(&self, url: &str) -> Result<ProbeResponse, ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.urls.lock().unwrap().push(url.to_string());
            Ok(ProbeResponse { status: self.status, location: self.location.clone() })
        }
    }

    struct RefusingTransport;

    #[async_trait]
    impl ProbeTransport for RefusingTransport {
        async fn get(&self, _url: &str) -> Result<ProbeResponse, ScanError> {
            Err(ScanError::Network("connection failed: refused".into()))
        }
    }

    fn orchestrator(transport: Arc<dyn ProbeTransport>) -> (ClassificationOrchestrator, Arc<MemorySink>) {
        let sink = Arc::new(MemorySink::new());
        let ctx = ScanContext::new("example.com", sink.clone())
            .with_test_target(ATTACKER)
            .with_concurrency(4);
        (ClassificationOrchestrator::new(ctx, ActiveVerifier::new(transport)), sink)
    }

    #[tokio::test]
    async fn test_internal_value_not_probed() {
        let transport = MockTransport::new(302, Some(ATTACKER));
        let (orch, _) = orchestrator(transport.clone());

        let outcome = orch
            .classify_candidate("https://shop.example.com/go?redirect=https%3A%2F%2Fexample.com%2Fhome&id=5")
            .await;

        assert_eq!(outcome.verdicts.len(), 1);
        let verdict = &outcome.verdicts[0];
        assert_eq!(verdict.tag, VerdictTag::Internal);
        assert_eq!(verdict.parameter.as_deref(), Some("redirect"));
        assert_eq!(verdict.value.as_deref(), Some("https://example.com/home"));
        assert_eq!(transport.calls(), 0);
        assert!(outcome.findings.is_empty());
    }

    #[tokio::test]
    async fn test_external_value_confirmed() {
        let transport = MockTransport::new(301, Some(ATTACKER));
        let (orch, sink) = orchestrator(transport.clone());

        let summary = orch
            .run(&["https://shop.example.com/go?redirect=https%3A%2F%2Fother.com%2F"])
            .await
            .unwrap();

        assert_eq!(summary.confirmed, 1);
        assert_eq!(summary.probes_sent, 1);
        assert_eq!(transport.calls(), 1);
        assert_eq!(
            transport.urls.lock().unwrap()[0],
            "https://shop.example.com/go?redirect=https://attacker.test/unique"
        );

        let findings = orch.collector().snapshot().await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].http_status, 301);
        assert_eq!(findings[0].parameter, "redirect");
        assert_eq!(findings[0].test_target, ATTACKER);

        let records = sink.records().await;
        assert_eq!(records[0].tag, VerdictTag::Confirmed);
    }

    #[tokio::test]
    async fn test_mismatched_location_not_confirmed() {
        let transport = MockTransport::new(302, Some("https://shop.example.com/login"));
        let (orch, _) = orchestrator(transport.clone());

        let outcome = orch.classify_candidate("https://shop.example.com/go?next=//evil.test/").await;
        assert_eq!(outcome.verdicts[0].tag, VerdictTag::NotConfirmed);
        assert!(outcome.verdicts[0].reason.contains("Location=https://shop.example.com/login"));
        assert!(outcome.findings.is_empty());
    }

    #[tokio::test]
    async fn test_no_flagged_param_single_verdict() {
        let transport = MockTransport::new(302, Some(ATTACKER));
        let (orch, _) = orchestrator(transport.clone());

        let outcome = orch.classify_candidate("https://shop.example.com/item?id=5&sort=asc").await;
        assert_eq!(outcome.verdicts.len(), 1);
        assert_eq!(outcome.verdicts[0].tag, VerdictTag::NoFlaggedParam);
        assert!(outcome.verdicts[0].parameter.is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_value_shape_flags_unknown_name() {
        let transport = MockTransport::new(302, Some(ATTACKER));
        let (orch, _) = orchestrator(transport.clone());

        let outcome = orch.classify_candidate("https://shop.example.com/x?foo=https://other.com/").await;
        assert_eq!(outcome.verdicts[0].parameter.as_deref(), Some("foo"));
        assert_eq!(outcome.verdicts[0].tag, VerdictTag::Confirmed);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_parameter_probed_once() {
        let transport = MockTransport::new(200, None);
        let (orch, _) = orchestrator(transport.clone());

        let outcome = orch
            .classify_candidate("https://shop.example.com/go?next=//a.test/&next=//b.test/")
            .await;
        assert_eq!(outcome.verdicts.len(), 1);
        assert_eq!(outcome.probes, 1);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_network_error_is_per_candidate() {
        let (orch, sink) = orchestrator(Arc::new(RefusingTransport));

        let summary = orch
            .run(&[
                "https://shop.example.com/go?next=https://evil.test/",
                "https://shop.example.com/item?id=5",
            ])
            .await
            .unwrap();

        assert_eq!(summary.candidates, 2);
        assert_eq!(summary.not_confirmed, 1);
        assert_eq!(summary.no_flagged_param, 1);
        assert!(orch.collector().is_empty().await);

        let records = sink.records().await;
        assert!(records[0].reason.starts_with("HTTP error:"));
    }

    #[tokio::test]
    async fn test_unparseable_candidate_reported() {
        let transport = MockTransport::new(302, Some(ATTACKER));
        let (orch, _) = orchestrator(transport.clone());

        let outcome = orch.classify_candidate("not a url ?next=//evil.test").await;
        assert_eq!(outcome.verdicts.len(), 1);
        assert_eq!(outcome.verdicts[0].tag, VerdictTag::NotConfirmed);
        assert!(outcome.verdicts[0].parameter.is_none());
        assert!(outcome.verdicts[0].reason.starts_with("skipped: Invalid URL"));
        assert_eq!(outcome.probes, 0);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_findings_keep_candidate_order() {
        let transport = MockTransport::new(302, Some(ATTACKER));
        let (orch, _) = orchestrator(transport.clone());

        let candidates: Vec<String> = (0..10)
            .map(|i| format!("https://shop.example.com/{}?url=https://other.com/", i))
            .collect();
        let summary = orch.run(&candidates).await.unwrap();

        assert_eq!(summary.confirmed, 10);
        let findings = orch.collector().snapshot().await;
        let urls: Vec<&str> = findings.iter().map(|f| f.original_url.as_str()).collect();
        let expected: Vec<&str> = candidates.iter().map(String::as_str).collect();
        assert_eq!(urls, expected);
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let transport = MockTransport::new(302, Some(ATTACKER));
        let token = CancellationToken::new();
        token.cancel();
        let (orch, sink) = orchestrator(transport.clone());
        let orch = orch.with_cancel_token(token);

        let summary = orch.run(&["https://shop.example.com/go?next=//evil.test/"]).await.unwrap();
        assert!(summary.cancelled);
        assert_eq!(summary.candidates, 0);
        assert_eq!(transport.calls(), 0);
        assert!(sink.records().await.is_empty());
    }

    /// Cancels the shared token while answering the first request.
    struct CancellingTransport {
        token: CancellationToken,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ProbeTransport for CancellingTransport {
        async fn get(&self, _url: &str) -> Result<ProbeResponse, ScanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.token.cancel();
            tokio::task::yield_now().await;
            Ok(ProbeResponse { status: 302, location: Some(ATTACKER.to_string()) })
        }
    }

    #[tokio::test]
    async fn test_cancel_mid_pass_finishes_in_flight_only() {
        let token = CancellationToken::new();
        let transport = Arc::new(CancellingTransport {
            token: token.clone(),
            calls: AtomicUsize::new(0),
        });
        let sink = Arc::new(MemorySink::new());
        let ctx = ScanContext::new("example.com", sink.clone())
            .with_test_target(ATTACKER)
            .with_concurrency(1);
        let orch = ClassificationOrchestrator::new(ctx, ActiveVerifier::new(transport.clone()))
            .with_cancel_token(token);

        let candidates: Vec<String> = (0..5)
            .map(|i| format!("https://shop.example.com/{}?next=https://other.com/", i))
            .collect();
        let summary = orch.run(&candidates).await.unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.candidates, 1);
        assert_eq!(summary.confirmed, 1);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);

        let findings = orch.collector().snapshot().await;
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].original_url, candidates[0]);
        assert_eq!(sink.records().await.len(), 1);
    }

    #[tokio::test]
    async fn test_events_emitted() {
        let transport = MockTransport::new(302, Some(ATTACKER));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (orch, _) = orchestrator(transport);
        let orch = orch.with_event_channel(tx);

        orch.run(&["https://shop.example.com/go?next=//evil.test/"]).await.unwrap();

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert!(matches!(events.first(), Some(PassEvent::PassStarted { total: 1, .. })));
        assert!(events.iter().any(|e| matches!(e, PassEvent::FindingConfirmed { .. })));
        assert!(matches!(events.last(), Some(PassEvent::PassCompleted { confirmed: 1, .. })));
    }
}
