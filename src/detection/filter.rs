use std::collections::HashSet;
use regex::Regex;
use crate::errors::ScanError;
use super::heuristic::RedirectHeuristic;

/// Coarse, high-recall pre-filter over a raw URL corpus.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    pattern: Regex,
}

impl CandidateFilter {
    pub fn new(heuristic: &RedirectHeuristic) -> Result<Self, ScanError> {
        Ok(Self { pattern: heuristic.candidate_pattern()? })
    }

    /// True when the query string has a redirect-named parameter whose value
    /// starts like a URL.
    pub fn is_candidate(&self, url: &str) -> bool {
        match url.split_once('?') {
            Some((_, query)) => self.pattern.is_match(query),
            None => false,
        }
    }

    /// Trimmed, deduplicated candidates in first-seen order.
    pub fn filter<I, S>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for url in urls {
            let url = url.as_ref().trim();
            if url.is_empty() || !self.is_candidate(url) {
                continue;
            }
            if seen.insert(url.to_string()) {
                candidates.push(url.to_string());
            }
        }
        candidates
    }
}

/// Filter with the built-in redirect heuristic.
pub fn filter_candidates<S: AsRef<str>>(urls: &[S]) -> Result<Vec<String>, ScanError> {
    let filter = CandidateFilter::new(&RedirectHeuristic::default())?;
    Ok(filter.filter(urls))
}
