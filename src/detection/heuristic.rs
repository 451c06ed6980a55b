use std::collections::BTreeSet;
use regex::Regex;
use crate::config::HeuristicsConfig;
use crate::errors::ScanError;
use crate::models::QueryParameter;

/// Parameter names that commonly carry a redirect destination.
pub const DEFAULT_PARAM_NAMES: &[&str] = &[
    "url",
    "redirect",
    "redirect_uri",
    "redirecturl",
    "return",
    "next",
    "dest",
    "destination",
    "out",
    "go",
    "target",
    "continue",
    "forward",
];

/// Value prefixes that look like an absolute or scheme-relative URL,
/// plain or percent-encoded.
pub const DEFAULT_VALUE_SHAPES: &[&str] = &[
    "http%3a",
    "https%3a",
    "http://",
    "https://",
    "//",
    "%2f%2f",
];

/// Declarative redirect-parameter table: a name set plus value-shape tokens.
#[derive(Debug, Clone)]
pub struct RedirectHeuristic {
    param_names: BTreeSet<String>,
    value_shapes: Vec<String>,
}

impl Default for RedirectHeuristic {
    fn default() -> Self {
        Self::new(DEFAULT_PARAM_NAMES.iter().copied(), DEFAULT_VALUE_SHAPES.iter().copied())
    }
}

impl RedirectHeuristic {
    pub fn new<N, S>(param_names: N, value_shapes: S) -> Self
    where
        N: IntoIterator,
        N::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        let param_names = param_names
            .into_iter()
            .map(|n| n.as_ref().trim().to_lowercase())
            .filter(|n| !n.is_empty())
            .collect();
        let mut shapes: Vec<String> = Vec::new();
        for shape in value_shapes {
            let shape = shape.as_ref().trim().to_lowercase();
            if !shape.is_empty() && !shapes.contains(&shape) {
                shapes.push(shape);
            }
        }
        Self { param_names, value_shapes: shapes }
    }

    /// Build the table from the optional `heuristics` config section.
    pub fn from_config(config: Option<&HeuristicsConfig>) -> Self {
        let Some(config) = config else {
            return Self::default();
        };

        let mut names: Vec<String> = match &config.param_names {
            Some(names) => names.clone(),
            None => DEFAULT_PARAM_NAMES.iter().map(|s| s.to_string()).collect(),
        };
        if let Some(extra) = &config.extra_param_names {
            names.extend(extra.iter().cloned());
        }

        let shapes: Vec<String> = match &config.value_shapes {
            Some(shapes) => shapes.clone(),
            None => DEFAULT_VALUE_SHAPES.iter().map(|s| s.to_string()).collect(),
        };

        Self::new(names, shapes)
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.param_names.iter().map(String::as_str)
    }

    pub fn value_shapes(&self) -> &[String] {
        &self.value_shapes
    }

    pub fn is_redirect_name(&self, name: &str) -> bool {
        self.param_names.contains(&name.to_lowercase())
    }

    /// Unanchored, case-insensitive search for any value-shape token.
    pub fn value_has_shape(&self, value: &str) -> bool {
        let lower = value.to_lowercase();
        self.value_shapes.iter().any(|shape| lower.contains(shape.as_str()))
    }

    /// A parameter is flagged when its name is known or any value looks like a URL.
    pub fn is_flagged(&self, parameter: &QueryParameter) -> bool {
        self.is_redirect_name(&parameter.name)
            || parameter.values.iter().any(|v| self.value_has_shape(v))
    }

    /// `name=` immediately followed by a value-shape token, case-insensitive.
    pub fn candidate_pattern(&self) -> Result<Regex, ScanError> {
        if self.param_names.is_empty() || self.value_shapes.is_empty() {
            return Err(ScanError::Config(
                "Redirect heuristic needs at least one parameter name and one value shape".into(),
            ));
        }
        let names = self.param_names
            .iter()
            .map(|n| regex::escape(n))
            .collect::<Vec<_>>()
            .join("|");
        let shapes = self.value_shapes
            .iter()
            .map(|s| regex::escape(s))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!("(?i)(?:{})=(?:{})", names, shapes))
            .map_err(|e| ScanError::Config(format!("Invalid heuristic pattern: {}", e)))
    }
}
