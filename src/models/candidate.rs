use url::Url;
use crate::errors::ScanError;

/// One query parameter of a candidate URL, grouped by its decoded name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    pub name: String,
    /// Form-decoded values in the order they appear in the query string.
    pub values: Vec<String>,
}

impl QueryParameter {
    /// The first value; this is what single-valued servers act on.
    pub fn canonical_value(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }
}

/// A raw `name=value` pair exactly as it appears in the query string.
#[derive(Debug, Clone)]
pub(crate) struct QuerySegment {
    pub raw_name: String,
    pub raw_value: Option<String>,
    pub name: String,
}

impl QuerySegment {
    pub fn to_raw(&self) -> String {
        match &self.raw_value {
            Some(value) => format!("{}={}", self.raw_name, value),
            None => self.raw_name.clone(),
        }
    }
}

/// A harvested URL, parsed once. Never mutated; probes are built from copies.
#[derive(Debug, Clone)]
pub struct CandidateUrl {
    raw: String,
    url: Url,
    segments: Vec<QuerySegment>,
    parameters: Vec<QueryParameter>,
}

impl CandidateUrl {
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let raw = raw.trim();
        let url = Url::parse(raw)
            .map_err(|e| ScanError::InvalidUrl(format!("{}: {}", raw, e)))?;

        let segments = url.query().map(split_query).unwrap_or_default();

        let mut parameters: Vec<QueryParameter> = Vec::new();
        for segment in &segments {
            let value = segment.raw_value.as_deref().map(form_decode).unwrap_or_default();
            match parameters.iter_mut().find(|p| p.name == segment.name) {
                Some(existing) => existing.values.push(value),
                None => parameters.push(QueryParameter {
                    name: segment.name.clone(),
                    values: vec![value],
                }),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            url,
            segments,
            parameters,
        })
    }

    /// The URL exactly as it was read from the corpus.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.query()
    }

    pub fn has_query(&self) -> bool {
        self.url.query().is_some_and(|q| !q.is_empty())
    }

    pub fn parameters(&self) -> &[QueryParameter] {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&QueryParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    pub(crate) fn segments(&self) -> &[QuerySegment] {
        &self.segments
    }
}

impl std::fmt::Display for CandidateUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn split_query(query: &str) -> Vec<QuerySegment> {
    query
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let (raw_name, raw_value) = match segment.split_once('=') {
                Some((n, v)) => (n.to_string(), Some(v.to_string())),
                None => (segment.to_string(), None),
            };
            let name = form_decode(&raw_name);
            QuerySegment { raw_name, raw_value, name }
        })
        .collect()
}

/// application/x-www-form-urlencoded component decoding (`+` is a space).
fn form_decode(component: &str) -> String {
    let spaced = component.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        let c = CandidateUrl::parse("https://Shop.Example.com/go?redirect=https%3A%2F%2Fother.com%2F&id=5").unwrap();
        assert_eq!(c.scheme(), "https");
        assert_eq!(c.host(), Some("shop.example.com"));
        assert_eq!(c.path(), "/go");
        assert_eq!(c.query(), Some("redirect=https%3A%2F%2Fother.com%2F&id=5"));
        assert_eq!(c.parameters().len(), 2);
        assert_eq!(c.parameter("redirect").unwrap().canonical_value(), "https://other.com/");
    }

    #[test]
    fn test_repeated_names_grouped_in_order() {
        let c = CandidateUrl::parse("https://a.test/?next=/one&x=1&next=/two").unwrap();
        let next = c.parameter("next").unwrap();
        assert_eq!(next.values, vec!["/one".to_string(), "/two".to_string()]);
        assert_eq!(next.canonical_value(), "/one");
        assert_eq!(c.parameters()[0].name, "next");
        assert_eq!(c.parameters()[1].name, "x");
    }

    #[test]
    fn test_blank_values_kept() {
        let c = CandidateUrl::parse("https://a.test/?flag&empty=&&url=x+y").unwrap();
        assert_eq!(c.parameter("flag").unwrap().canonical_value(), "");
        assert_eq!(c.parameter("empty").unwrap().canonical_value(), "");
        assert_eq!(c.parameter("url").unwrap().canonical_value(), "x y");
        assert_eq!(c.parameters().len(), 3);
    }

    #[test]
    fn test_no_query() {
        let c = CandidateUrl::parse("https://a.test/path").unwrap();
        assert!(!c.has_query());
        assert!(c.parameters().is_empty());
    }

    #[test]
    fn test_unparseable_url_rejected() {
        let err = CandidateUrl::parse("not a url").unwrap_err();
        assert!(matches!(err, ScanError::InvalidUrl(_)));
    }

    #[test]
    fn test_raw_text_preserved() {
        let raw = "https://a.test/go?u=%2F%2Fevil.test";
        let c = CandidateUrl::parse(&format!("  {}\n", raw)).unwrap();
        assert_eq!(c.as_str(), raw);
        assert_eq!(c.to_string(), raw);
    }
}
