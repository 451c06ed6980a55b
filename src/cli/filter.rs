use std::path::PathBuf;
use crate::cli::commands::FilterArgs;
use crate::config::{self, ScoutConfig};
use crate::corpus::{CombinedCorpus, CorpusProvider, FileCorpus};
use crate::detection::{CandidateFilter, RedirectHeuristic};
use crate::errors::ScanError;
use tracing::info;

pub async fn handle_filter(args: FilterArgs) -> Result<(), ScanError> {
    let config = match &args.config {
        Some(path) => config::parse_config(&PathBuf::from(path)).await?,
        None => ScoutConfig::default(),
    };
    let heuristic = RedirectHeuristic::from_config(config.heuristics.as_ref());
    let filter = CandidateFilter::new(&heuristic)?;

    let inputs = if args.input.is_empty() { vec!["-".to_string()] } else { args.input.clone() };
    let mut corpus = CombinedCorpus::new();
    for input in &inputs {
        corpus = corpus.with_provider(Box::new(FileCorpus::new(input)), true);
    }

    let urls = corpus.fetch("").await?;
    if urls.is_empty() {
        return Err(ScanError::NoInput(format!("No URLs read from {}", inputs.join(", "))));
    }

    let candidates = filter.filter(&urls);
    info!(corpus = urls.len(), candidates = candidates.len(), "Candidate filter complete");
    for candidate in &candidates {
        println!("{}", candidate);
    }
    Ok(())
}
