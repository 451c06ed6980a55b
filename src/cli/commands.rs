use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "redirect-scout", version, about = "Open redirect triage and active verification")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Classify a URL corpus and probe redirect candidates
    Scan(ScanArgs),
    /// Print candidate URLs without sending any request
    Filter(FilterArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ScanArgs {
    /// Apex domain under scan
    #[arg(short, long)]
    pub domain: String,

    /// URL list, one per line ("-" for stdin); repeatable
    #[arg(short, long)]
    pub input: Vec<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Verdict file
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write confirmed findings as JSON
    #[arg(long)]
    pub json_out: Option<String>,

    /// Value injected into redirect parameters
    #[arg(long)]
    pub test_target: Option<String>,

    /// Candidates verified concurrently
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Probe timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Plain-text run log
    #[arg(long)]
    pub log_file: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct FilterArgs {
    /// URL list, one per line ("-" for stdin, the default); repeatable
    #[arg(short, long)]
    pub input: Vec<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Path to YAML config file
    pub config: String,
}
