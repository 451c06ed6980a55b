use std::time::Duration;
use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use crate::errors::ScanError;

/// What the verifier needs to know about a probe response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub location: Option<String>,
}

/// Issues a single GET without following redirects.
#[async_trait]
pub trait ProbeTransport: Send + Sync {
    async fn get(&self, url: &str) -> Result<ProbeResponse, ScanError>;
}

pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(
        timeout: Duration,
        user_agent: Option<&str>,
        accept_invalid_certs: bool,
    ) -> Result<Self, ScanError> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs);
        if let Some(ua) = user_agent {
            builder = builder.user_agent(ua);
        }
        let client = builder
            .build()
            .map_err(|e| ScanError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProbeTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<ProbeResponse, ScanError> {
        let response = self.client.get(url).send().await.map_err(classify_request_error)?;
        let location = response
            .headers()
            .get(LOCATION)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());
        Ok(ProbeResponse {
            status: response.status().as_u16(),
            location,
        })
    }
}

fn classify_request_error(err: reqwest::Error) -> ScanError {
    let detail = error_chain(&err);
    if err.is_timeout() {
        ScanError::Timeout(detail)
    } else if err.is_builder() {
        ScanError::InvalidUrl(detail)
    } else if err.is_connect() {
        ScanError::Network(format!("connection failed: {}", detail))
    } else {
        ScanError::Network(detail)
    }
}

/// reqwest's Display hides the cause (DNS, TLS, refused); walk the sources.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
