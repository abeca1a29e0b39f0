use crate::app::ports::{HttpClientPort, HttpGetResult};
use crate::error::{EnrichError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::warn;

pub struct ReqwestHttp {
    client: reqwest::Client,
}

impl ReqwestHttp {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClientPort for ReqwestHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult> {
        let fetch_error = |e: reqwest::Error| EnrichError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let resp = self.client.get(url).send().await.map_err(fetch_error)?;
        let status = resp.status().as_u16();
        // Error pages are still parsed; they simply yield "Not found" fields.
        if !resp.status().is_success() {
            warn!("Registry responded with status {} for {}", status, url);
        }
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("text/html")
            .to_string();
        let body = resp.text().await.map_err(fetch_error)?;
        Ok(HttpGetResult { status, body, content_type })
    }
}
