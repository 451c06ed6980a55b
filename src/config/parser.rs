use std::path::Path;
use crate::errors::ScanError;
use super::types::ScoutConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<ScoutConfig, ScanError> {
    if !path.exists() {
        return Err(ScanError::Config(format!("Config file not found: {}", path.display())));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > 1_048_576 {
        return Err(ScanError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<ScoutConfig, ScanError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // An empty file parses to null; treat it as an empty mapping.
    if yaml.is_null() {
        return Ok(ScoutConfig::default());
    }

    validate_schema(&yaml)?;

    let config: ScoutConfig = serde_yaml::from_value(yaml)?;
    validate_semantics(&config)?;

    Ok(config)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ScanError> {
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| ScanError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ScanError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory: typed deserialization and the semantic checks decide.
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

/// Reject values that would make a scan meaningless or unbounded.
fn validate_semantics(config: &ScoutConfig) -> Result<(), ScanError> {
    if let Some(probe) = &config.probe {
        if probe.concurrency == Some(0) {
            return Err(ScanError::Config("probe.concurrency must be at least 1".into()));
        }
        if probe.timeout_secs == Some(0) {
            return Err(ScanError::Config("probe.timeout_secs must be at least 1".into()));
        }
        if let Some(target) = &probe.test_target {
            if target.trim().is_empty() {
                return Err(ScanError::Config("probe.test_target must not be empty".into()));
            }
        }
    }

    if let Some(heuristics) = &config.heuristics {
        let names = heuristics.param_names.iter().flatten()
            .chain(heuristics.extra_param_names.iter().flatten());
        for name in names {
            if name.trim().is_empty() {
                return Err(ScanError::Config("Empty redirect parameter name in heuristics".into()));
            }
        }
        if let Some(shapes) = &heuristics.value_shapes {
            if shapes.iter().all(|s| s.trim().is_empty()) {
                return Err(ScanError::Config("heuristics.value_shapes must list at least one shape".into()));
            }
        }
        if let Some(names) = &heuristics.param_names {
            if names.is_empty() && heuristics.extra_param_names.as_ref().map_or(true, |e| e.is_empty()) {
                return Err(ScanError::Config("heuristics.param_names must list at least one name".into()));
            }
        }
    }

    if let Some(commands) = config.corpus.as_ref().and_then(|c| c.commands.as_ref()) {
        for command in commands {
            if command.program.trim().is_empty() {
                return Err(ScanError::Config("corpus command with empty program".into()));
            }
        }
    }

    Ok(())
}
