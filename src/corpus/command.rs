use std::process::Stdio;
use async_trait::async_trait;
use tokio::process::Command;
use crate::config::CommandSpec;
use crate::errors::ScanError;
use super::{collect_lines, CorpusProvider};
use tracing::{debug, info};

const STDERR_TAIL: usize = 500;

/// Harvesters run when neither input files nor `corpus.commands` are given.
/// `waybackurls` is required; `gau` is used when installed.
pub fn default_harvesters() -> Vec<CommandSpec> {
    vec![
        CommandSpec {
            program: "waybackurls".to_string(),
            args: vec!["{domain}".to_string()],
            required: true,
        },
        CommandSpec {
            program: "gau".to_string(),
            args: vec!["{domain}".to_string()],
            required: false,
        },
    ]
}

/// Runs an external harvester (no shell) and reads URLs from its stdout.
pub struct CommandCorpus {
    program: String,
    args: Vec<String>,
}

impl CommandCorpus {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self { program: program.into(), args }
    }

    pub fn from_spec(spec: &CommandSpec) -> Self {
        Self::new(spec.program.clone(), spec.args.clone())
    }

    fn resolved_args(&self, domain: &str) -> Vec<String> {
        self.args.iter().map(|a| a.replace("{domain}", domain)).collect()
    }
}

#[async_trait]
impl CorpusProvider for CommandCorpus {
    async fn fetch(&self, domain: &str) -> Result<Vec<String>, ScanError> {
        let binary = which::which(&self.program).map_err(|_| {
            ScanError::Corpus(format!("{} not found on PATH", self.program))
        })?;
        let args = self.resolved_args(domain);

        info!(program = %self.program, args = ?args, "Running harvester");

        let output = Command::new(&binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ScanError::Corpus(format!("Failed to spawn {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: String = stderr.chars().rev().take(STDERR_TAIL).collect::<Vec<_>>()
                .into_iter().rev().collect();
            return Err(ScanError::Corpus(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                tail.trim()
            )));
        }

        let urls = collect_lines(&String::from_utf8_lossy(&output.stdout));
        debug!(program = %self.program, lines = urls.len(), "Harvester finished");
        Ok(urls)
    }

    fn describe(&self) -> String {
        format!("command:{}", self.program)
    }
}
