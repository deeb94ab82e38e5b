use crate::Result;
use std::time::Duration;
use tracing::warn;

/// One outbound POST with a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: serde_json::Value,
    pub timeout: Duration,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and raw body of a received response, whatever the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Synchronous request/response seam between the engine and the network.
///
/// Implementations return `Err` only when no usable response was received;
/// non-2xx responses come back as `Ok` so the caller can inspect status and
/// body. A non-2xx whose body cannot be read keeps its status with an empty
/// body; a 2xx whose body cannot be read is an `Err`.
pub trait Transport: Send + Sync {
    fn post_json(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError>;
}

/// Blocking reqwest client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn post_json(&self, request: &HttpRequest) -> std::result::Result<HttpResponse, TransportError> {
        let mut req = self.client.post(&request.url).timeout(request.timeout);
        for (k, v) in &request.headers {
            req = req.header(k.as_str(), v.as_str());
        }

        // Content-Type is already set above; json() keeps it.
        let resp = req.json(&request.body).send()?;
        let status = resp.status().as_u16();
        match resp.text() {
            Ok(body) => Ok(HttpResponse { status, body }),
            // A failure status is still a failure status without its body.
            Err(e) if !(200..300).contains(&status) => {
                warn!(status, error = %e, "response body unreadable");
                Ok(HttpResponse {
                    status,
                    body: String::new(),
                })
            }
            Err(e) => Err(TransportError::Http(e)),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Other(String),
}
