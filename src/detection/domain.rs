use url::Url;

/// Whether `candidate` points inside `target_domain` (the apex itself or any
/// subdomain of it).
///
/// Values with no recognizable host (relative paths, bare words, unparseable
/// input) are internal: they cannot send a browser off-site. The suffix match
/// only accepts a `.`-delimited boundary and consults no public-suffix list,
/// so `a.co.uk` scanned as `co.uk` still counts `b.co.uk` as internal.
pub fn is_internal(target_domain: &str, candidate: &str) -> bool {
    let Some(host) = extract_host(candidate) else {
        return true;
    };
    let target = normalize_domain(target_domain);
    host == target || host.ends_with(&format!(".{}", target))
}

/// Case-folded host of an absolute or scheme-relative (`//host/...`) URL.
pub fn extract_host(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    let parsed = if trimmed.starts_with("//") {
        Url::parse(&format!("http:{}", trimmed))
    } else {
        Url::parse(trimmed)
    };
    parsed
        .ok()?
        .host_str()
        .map(normalize_domain)
        .filter(|h| !h.is_empty())
}

fn normalize_domain(domain: &str) -> String {
    domain.trim().trim_end_matches('.').to_ascii_lowercase()
}
