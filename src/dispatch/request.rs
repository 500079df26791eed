//! Single-endpoint requests.
//!
//! # Responsibilities
//! - Represent a replica endpoint and the request sent to it
//! - Perform one bounded GET-style request and read its body
//! - Classify every way an attempt can fail

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, Method, StatusCode};
use thiserror::Error;
use url::Url;

/// Why a string or URL is not a usable replica address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("not a URL: {0}")]
    Parse(#[from] url::ParseError),

    #[error("unsupported scheme {0:?}, expected http or https")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,
}

/// Network address of one replica: an absolute `http` or `https` URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint(Url);

impl Endpoint {
    pub fn new(url: Url) -> Result<Self, EndpointError> {
        // "localhost:8080" parses with scheme "localhost".
        if !matches!(url.scheme(), "http" | "https") {
            return Err(EndpointError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost);
        }
        Ok(Self(url))
    }

    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(Url::parse(s)?)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What to ask every endpoint for.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: Method,
    pub path: String,
}

impl RequestSpec {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
        }
    }
}

impl Default for RequestSpec {
    fn default() -> Self {
        Self::get("/")
    }
}

/// Why one endpoint did not produce a usable answer.
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Connection refused, reset, DNS failure and the like.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The endpoint answered, but not with 200.
    #[error("upstream answered {status}")]
    Unavailable { status: StatusCode },

    /// Status was 200 but the body could not be read.
    #[error("failed to read response body: {0}")]
    ResponseRead(#[source] reqwest::Error),

    /// No answer within the attempt's deadline.
    #[error("no answer within {0:?}")]
    TimedOut(Duration),

    #[error("cannot build request URL: {0}")]
    Url(#[from] url::ParseError),
}

impl AttemptError {
    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptError::Network(_) => "network",
            AttemptError::Unavailable { .. } => "unavailable",
            AttemptError::ResponseRead(_) => "response_read",
            AttemptError::TimedOut(_) => "timeout",
            AttemptError::Url(_) => "url",
        }
    }
}

/// Make one request to `endpoint` and return its body if it answered 200.
pub async fn fetch_one(
    client: &Client,
    spec: &RequestSpec,
    endpoint: &Endpoint,
    timeout: Duration,
) -> Result<String, AttemptError> {
    bounded(client, spec, endpoint, timeout, |status| status == StatusCode::OK)
        .await
        .map(|(_, body)| body)
}

/// Make one request to `endpoint` and return whatever it answered.
///
/// Unlike [`fetch_one`], a non-200 status is not an error; its body is kept.
pub async fn fetch_raw(
    client: &Client,
    spec: &RequestSpec,
    endpoint: &Endpoint,
    timeout: Duration,
) -> Result<(StatusCode, String), AttemptError> {
    bounded(client, spec, endpoint, timeout, |_| true).await
}

async fn bounded(
    client: &Client,
    spec: &RequestSpec,
    endpoint: &Endpoint,
    timeout: Duration,
    accept: impl Fn(StatusCode) -> bool,
) -> Result<(StatusCode, String), AttemptError> {
    let url = endpoint.url().join(&spec.path)?;
    let request = client.request(spec.method.clone(), url).send();

    let attempt = async {
        let response = request.await.map_err(AttemptError::Network)?;
        let status = response.status();
        if !accept(status) {
            return Err(AttemptError::Unavailable { status });
        }
        let body = response.text().await.map_err(AttemptError::ResponseRead)?;
        Ok((status, body))
    };

    match tokio::time::timeout(timeout, attempt).await {
        Ok(result) => result,
        Err(_) => Err(AttemptError::TimedOut(timeout)),
    }
}
