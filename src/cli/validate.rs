use std::path::PathBuf;
use crate::cli::commands::ValidateArgs;
use crate::config;
use crate::detection::RedirectHeuristic;
use crate::errors::ScanError;

pub async fn handle_validate(args: ValidateArgs) -> Result<(), ScanError> {
    let path = PathBuf::from(&args.config);
    let config = config::parse_config(&path).await?;
    let heuristic = RedirectHeuristic::from_config(config.heuristics.as_ref());
    heuristic.candidate_pattern()?;

    let commands = config.corpus.as_ref()
        .and_then(|c| c.commands.as_ref())
        .map(|c| c.len())
        .unwrap_or(0);
    println!("Configuration is valid: {}", args.config);
    println!(
        "  {} redirect parameter names, {} value shapes, {} harvester commands",
        heuristic.param_names().count(),
        heuristic.value_shapes().len(),
        commands
    );
    Ok(())
}
