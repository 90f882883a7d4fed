use std::time::Duration;

use reqwest::Client;

use crate::error::DnsError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP seam used by the API client and the IP lookup.
///
/// Implementations return the raw response body; interpreting it is the
/// caller's job.
pub trait DnsHttpClient: Send + Sync {
    fn post_form(
        &self,
        url: &str,
        form: &[(String, String)],
    ) -> impl Future<Output = Result<String, DnsError>> + Send;

    fn get_text(&self, url: &str) -> impl Future<Output = Result<String, DnsError>> + Send;
}

pub struct DefaultDnsClient {
    inner: Client,
}

impl DefaultDnsClient {
    /// Builds a client whose every request is bounded by `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, DnsError> {
        let inner = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DnsError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { inner })
    }
}

impl DnsHttpClient for DefaultDnsClient {
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> Result<String, DnsError> {
        tracing::debug!(url, fields = form.len(), "POST");
        let response = self.inner.post(url).form(form).send().await?;
        tracing::debug!(status = response.status().as_u16(), "response received");
        Ok(response.text().await?)
    }

    async fn get_text(&self, url: &str) -> Result<String, DnsError> {
        tracing::debug!(url, "GET");
        let response = self.inner.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
