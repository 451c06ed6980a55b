use serde::{Deserialize, Serialize};

pub const DEFAULT_TEST_TARGET: &str = "https://attacker.com/unique-test";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_CONCURRENCY: usize = 10;
pub const DEFAULT_VERDICTS_FILE: &str = "open_redirects.txt";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScoutConfig {
    pub heuristics: Option<HeuristicsConfig>,
    pub probe: Option<ProbeConfig>,
    pub output: Option<OutputConfig>,
    pub corpus: Option<CorpusConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HeuristicsConfig {
    /// Replaces the built-in redirect parameter list.
    pub param_names: Option<Vec<String>>,
    /// Added on top of the (built-in or replaced) list.
    pub extra_param_names: Option<Vec<String>>,
    pub value_shapes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ProbeConfig {
    pub test_target: Option<String>,
    pub timeout_secs: Option<u64>,
    pub concurrency: Option<usize>,
    pub user_agent: Option<String>,
    pub accept_invalid_certs: Option<bool>,
}

impl ProbeConfig {
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    pub fn test_target(&self) -> &str {
        self.test_target.as_deref().unwrap_or(DEFAULT_TEST_TARGET)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    pub verdicts: Option<String>,
    pub findings_json: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CorpusConfig {
    pub commands: Option<Vec<CommandSpec>>,
}

/// An external URL harvester. `{domain}` in `args` is replaced at run time.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scout_config_default() {
        let config = ScoutConfig::default();
        assert!(config.heuristics.is_none());
        assert!(config.probe.is_none());
        assert!(config.corpus.is_none());
    }

    #[test]
    fn test_probe_config_defaults() {
        let probe = ProbeConfig::default();
        assert_eq!(probe.timeout_secs(), 10);
        assert_eq!(probe.concurrency(), 10);
        assert_eq!(probe.test_target(), DEFAULT_TEST_TARGET);
    }

    #[test]
    fn test_command_spec_defaults() {
        let spec: CommandSpec = serde_yaml::from_str("program: waybackurls").unwrap();
        assert_eq!(spec.program, "waybackurls");
        assert!(spec.args.is_empty());
        assert!(spec.required);
    }

    #[test]
    fn test_full_config_deserialize() {
        let yaml = r#"
heuristics:
  extra_param_names: [returnTo]
probe:
  test_target: https://canary.test/x
  timeout_secs: 5
  concurrency: 4
output:
  findings_json: confirmed.json
corpus:
  commands:
    - program: gau
      args: ["{domain}"]
      required: false
"#;
        let config: ScoutConfig = serde_yaml::from_str(yaml).unwrap();
        let probe = config.probe.unwrap();
        assert_eq!(probe.timeout_secs(), 5);
        assert_eq!(probe.concurrency(), 4);
        assert_eq!(probe.test_target(), "https://canary.test/x");
        let commands = config.corpus.unwrap().commands.unwrap();
        assert!(!commands[0].required);
        assert_eq!(commands[0].args, vec!["{domain}".to_string()]);
    }
}
