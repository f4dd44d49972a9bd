use crate::error::Result;
use crate::ports::Transport;
use std::time::Duration;

/// reqwest-backed transport
pub struct HttpTransport {
    /// HTTP client
    client: reqwest::Client,

    /// Per-request timeout
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport that gives up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("irsa-query/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self { client, timeout })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, params: &[(&str, String)]) -> Result<String> {
        // Use tokio runtime to execute async request
        let runtime = tokio::runtime::Runtime::new()?;

        runtime.block_on(async {
            tracing::debug!(url, ?params, "Sending IRSA request");

            let response = self.client.get(url).query(params).send().await?;
            let response = response.error_for_status()?;
            let body = response.text().await?;

            tracing::debug!(bytes = body.len(), "Received IRSA response");
            Ok(body)
        })
    }
}
