use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub body: String,
    pub content_type: String,
}

/// Plain HTTP GET of a server-rendered page.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult>;
}

/// Script-executing page load. Each call owns its own automation session and
/// releases it before returning, on success and on every error path.
#[async_trait]
pub trait PageRendererPort: Send + Sync {
    /// Loads `url`, waits up to `timeout` for `wait_selector` and returns the
    /// rendered DOM as HTML. Fails with `EnrichError::RenderTimeout` when the
    /// selector never appears.
    async fn render(&self, url: &str, wait_selector: &str, timeout: Duration) -> Result<String>;
}

/// Paces outgoing registry requests.
#[async_trait]
pub trait PacerPort: Send + Sync {
    async fn wait_turn(&self);
}
