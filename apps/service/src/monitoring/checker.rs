use anyhow::{Result, anyhow};
use std::time::{Duration, Instant};

/// Default bound for a single probe
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport-level facts about a response that was received
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResponse {
    /// Wall-clock milliseconds from just before sending to receiving the response head
    pub latency_ms: f64,
    pub status_code: u16,
}

/// Checker trait for issuing one reachability request
///
/// Implementations report what happened on the wire and leave the UP/DOWN
/// classification to the caller. An `Err` means no response was received at all.
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    async fn check(&self, target: &str) -> Result<ProbeResponse>;
}

/// HTTP/HTTPS checker issuing a single GET with no retries
pub struct HttpChecker {
    client: reqwest::Client,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> Result<Self> {
        // A 3xx is itself the answer; following it would issue more than one GET.
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn check(&self, target: &str) -> Result<ProbeResponse> {
        let start = Instant::now();

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(ProbeResponse { latency_ms, status_code: response.status().as_u16() })
    }
}
