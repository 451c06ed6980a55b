use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use crate::cli::commands::ScanArgs;
use crate::cli::progress;
use crate::config::{self, ScoutConfig, DEFAULT_VERDICTS_FILE};
use crate::corpus::{default_harvesters, CombinedCorpus, CommandCorpus, CorpusProvider, FileCorpus};
use crate::detection::{CandidateFilter, RedirectHeuristic};
use crate::errors::ScanError;
use crate::pipeline::{ClassificationOrchestrator, ScanContext};
use crate::probe::{ActiveVerifier, ReqwestTransport};
use crate::reporting::{format_summary, write_findings_json, FileVerdictSink, RunLog};
use tracing::{info, warn};

/// Scan settings after applying CLI > config file > default precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSettings {
    pub domain: String,
    pub test_target: String,
    pub concurrency: usize,
    pub timeout: Duration,
    pub user_agent: Option<String>,
    pub accept_invalid_certs: bool,
    pub verdicts_path: PathBuf,
    pub findings_path: Option<PathBuf>,
}

impl ScanSettings {
    pub fn resolve(args: &ScanArgs, config: &ScoutConfig) -> Result<Self, ScanError> {
        let probe = config.probe.clone().unwrap_or_default();
        let output = config.output.clone().unwrap_or_default();

        let domain = args.domain.trim().to_string();
        if domain.is_empty() {
            return Err(ScanError::Config("Domain must not be empty".into()));
        }

        let test_target = args.test_target.clone()
            .unwrap_or_else(|| probe.test_target().to_string());
        if test_target.trim().is_empty() {
            return Err(ScanError::Config("Test target must not be empty".into()));
        }

        let concurrency = args.concurrency.unwrap_or_else(|| probe.concurrency());
        if concurrency == 0 {
            return Err(ScanError::Config("Concurrency must be at least 1".into()));
        }

        let timeout_secs = args.timeout.unwrap_or_else(|| probe.timeout_secs());
        if timeout_secs == 0 {
            return Err(ScanError::Config("Timeout must be at least 1 second".into()));
        }

        let verdicts_path = args.output.clone()
            .or(output.verdicts)
            .unwrap_or_else(|| DEFAULT_VERDICTS_FILE.to_string());
        let findings_path = args.json_out.clone().or(output.findings_json);

        Ok(Self {
            domain,
            test_target,
            concurrency,
            timeout: Duration::from_secs(timeout_secs),
            user_agent: probe.user_agent,
            accept_invalid_certs: probe.accept_invalid_certs.unwrap_or(false),
            verdicts_path: PathBuf::from(verdicts_path),
            findings_path: findings_path.map(PathBuf::from),
        })
    }
}

/// Input files first, then configured harvester commands. With neither,
/// the built-in harvesters run against the domain.
pub fn build_corpus(inputs: &[String], config: &ScoutConfig) -> CombinedCorpus {
    let mut corpus = CombinedCorpus::new();
    for input in inputs {
        corpus = corpus.with_provider(Box::new(FileCorpus::new(input)), true);
    }

    let configured = config.corpus.as_ref().and_then(|c| c.commands.clone());
    let commands = match configured {
        Some(commands) => commands,
        None if inputs.is_empty() => {
            info!("No corpus source configured, using built-in harvesters");
            default_harvesters()
        }
        None => Vec::new(),
    };
    for spec in &commands {
        corpus = corpus.with_provider(Box::new(CommandCorpus::from_spec(spec)), spec.required);
    }
    corpus
}

pub async fn handle_scan(args: ScanArgs, quiet: bool) -> Result<(), ScanError> {
    let file_config = match &args.config {
        Some(path) => config::parse_config(&PathBuf::from(path)).await?,
        None => ScoutConfig::default(),
    };
    let settings = ScanSettings::resolve(&args, &file_config)?;
    let heuristic = RedirectHeuristic::from_config(file_config.heuristics.as_ref());
    let filter = CandidateFilter::new(&heuristic)?;
    let corpus = build_corpus(&args.input, &file_config);

    info!(
        domain = %settings.domain,
        test_target = %settings.test_target,
        version = env!("CARGO_PKG_VERSION"),
        "Starting redirect scan"
    );

    let sink = Arc::new(FileVerdictSink::create(&settings.verdicts_path).await?);
    let context = ScanContext::new(&settings.domain, sink.clone())
        .with_test_target(settings.test_target.clone())
        .with_heuristic(heuristic)
        .with_concurrency(settings.concurrency);

    let run_log = match &args.log_file {
        Some(path) => Some(RunLog::initialize(Path::new(path), &context.scan_id, &settings.domain).await?),
        None => None,
    };

    info!(sources = %corpus.describe(), "Loading corpus");
    let urls = corpus.fetch(&settings.domain).await?;
    if urls.is_empty() {
        return Err(ScanError::NoInput(format!("No URLs collected for {}", settings.domain)));
    }
    log_run(&run_log, &format!("Corpus loaded: {} URLs", urls.len())).await;

    let candidates = filter.filter(&urls);
    info!(corpus = urls.len(), candidates = candidates.len(), "Candidate filter complete");
    log_run(&run_log, &format!("Candidates: {}", candidates.len())).await;

    if candidates.is_empty() {
        sink.flush().await?;
        if let Some(path) = &settings.findings_path {
            write_findings_json(path, &[]).await?;
        }
        info!(path = %settings.verdicts_path.display(), "No redirect candidates, nothing to verify");
        log_run(&run_log, "No candidates; finished").await;
        return Ok(());
    }

    let transport = ReqwestTransport::new(
        settings.timeout,
        settings.user_agent.as_deref(),
        settings.accept_invalid_certs,
    )?;
    let verifier = ActiveVerifier::new(Arc::new(transport)).with_timeout(settings.timeout);

    let cancel_token = CancellationToken::new();
    let signal_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, finishing in-flight candidates");
            signal_token.cancel();
        }
    });

    let orchestrator = ClassificationOrchestrator::new(context, verifier)
        .with_cancel_token(cancel_token);
    let (orchestrator, progress_task) = if quiet {
        (orchestrator, None)
    } else {
        let (tx, rx) = mpsc::unbounded_channel();
        (orchestrator.with_event_channel(tx), Some(tokio::spawn(progress::drive(rx))))
    };

    let collector = orchestrator.collector();
    let result = orchestrator.run(&candidates).await;
    drop(orchestrator);
    if let Some(task) = progress_task {
        let _ = task.await;
    }

    sink.flush().await?;
    let findings = collector.snapshot().await;
    if let Some(path) = &settings.findings_path {
        write_findings_json(path, &findings).await?;
    }

    let summary = result?;
    let line = format_summary(&summary);
    info!(path = %settings.verdicts_path.display(), "{}", line);
    log_run(&run_log, &format!("Finished: {}", line)).await;
    if !quiet {
        println!("{}", line);
    }

    if summary.cancelled {
        return Err(ScanError::Cancelled);
    }
    Ok(())
}

async fn log_run(run_log: &Option<RunLog>, message: &str) {
    if let Some(log) = run_log {
        if let Err(e) = log.log_event(message).await {
            warn!(error = %e, "Failed to write run log");
        }
    }
}
