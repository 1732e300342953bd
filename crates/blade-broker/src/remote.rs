use async_trait::async_trait;
use blade_config::schema::RemoteConfig;
use blade_core::{BladeError, BladeMsg, Result};
use parking_lot::RwLock;
use std::time::Duration;
use tracing::debug;

/// The coordination service, as seen by one blade.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Every pending request, for every blade.
    async fn fetch_requests(&self) -> Result<Vec<BladeMsg>>;

    /// Every pending response, for every blade.
    async fn fetch_responses(&self) -> Result<Vec<BladeMsg>>;

    /// Submit one response.
    async fn post_response(&self, msg: &BladeMsg) -> Result<()>;

    /// Release the underlying connection. Calls made afterwards fail.
    fn close(&self) {}
}

/// HTTP client for the coordination service.
pub struct HttpRemote {
    client: RwLock<Option<reqwest::Client>>,
    requests_url: String,
    responses_url: String,
}

impl HttpRemote {
    pub fn new(
        requests_url: impl Into<String>,
        responses_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let client = builder
            .build()
            .map_err(|e| BladeError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client: RwLock::new(Some(client)),
            requests_url: requests_url.into(),
            responses_url: responses_url.into(),
        })
    }

    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        let timeout = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));
        Self::new(&config.requests_url, &config.responses_url, timeout)
    }

    fn client(&self) -> Result<reqwest::Client> {
        self.client.read().clone().ok_or(BladeError::RemoteClosed)
    }

    async fn fetch(&self, url: &str) -> Result<Vec<BladeMsg>> {
        let resp = self
            .client()?
            .get(url)
            .send()
            .await
            .map_err(|e| BladeError::Remote {
                endpoint: url.to_string(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(BladeError::RemoteStatus {
                endpoint: url.to_string(),
                status: resp.status().as_u16(),
            });
        }

        // The service answers `null` when nothing is pending.
        let list: Option<Vec<BladeMsg>> = resp.json().await.map_err(|e| BladeError::Remote {
            endpoint: url.to_string(),
            reason: format!("invalid body: {e}"),
        })?;
        let list = list.unwrap_or_default();
        debug!(url, count = list.len(), "fetched messages");
        Ok(list)
    }
}

#[async_trait]
impl RemoteStore for HttpRemote {
    async fn fetch_requests(&self) -> Result<Vec<BladeMsg>> {
        self.fetch(&self.requests_url).await
    }

    async fn fetch_responses(&self) -> Result<Vec<BladeMsg>> {
        self.fetch(&self.responses_url).await
    }

    async fn post_response(&self, msg: &BladeMsg) -> Result<()> {
        let url = &self.responses_url;
        let resp = self
            .client()?
            .post(url)
            .json(msg)
            .send()
            .await
            .map_err(|e| BladeError::Remote {
                endpoint: url.clone(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(BladeError::RemoteStatus {
                endpoint: url.clone(),
                status: resp.status().as_u16(),
            });
        }
        Ok(())
    }

    fn close(&self) {
        self.client.write().take();
    }
}
