//! Access to the business registry's public company profile pages.

use crate::app::ports::{HttpClientPort, PageRendererPort};
use crate::config::Config;
use crate::constants::{EMPLOYEES_LABEL_SELECTOR, REGISTRY_CODE_PREFIX};
use crate::error::Result;
use crate::infra::{HeadlessChromeRenderer, ReqwestHttp};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

/// Drops the `EE` country prefix a registry code may carry.
pub fn strip_country_prefix(code: &str) -> &str {
    code.strip_prefix(REGISTRY_CODE_PREFIX).unwrap_or(code)
}

pub struct RegistryClient {
    http: Arc<dyn HttpClientPort>,
    renderer: Arc<dyn PageRendererPort>,
    base_url: String,
    locale: String,
    render_timeout: Duration,
}

impl RegistryClient {
    pub fn new(
        http: Arc<dyn HttpClientPort>,
        renderer: Arc<dyn PageRendererPort>,
        base_url: impl Into<String>,
        locale: impl Into<String>,
        render_timeout: Duration,
    ) -> Self {
        Self {
            http,
            renderer,
            base_url: base_url.into(),
            locale: locale.into(),
            render_timeout,
        }
    }

    /// Client backed by reqwest and a headless Chrome renderer.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = ReqwestHttp::new(config.request_timeout(), &config.registry.user_agent)?;
        let renderer = HeadlessChromeRenderer::new(config.render.headless, config.render.sandbox);
        Ok(Self::new(
            Arc::new(http),
            Arc::new(renderer),
            config.registry.base_url.clone(),
            config.registry.locale.clone(),
            config.render_timeout(),
        ))
    }

    pub fn profile_url(&self, registry_code: &str) -> String {
        format!(
            "{}/{}/company/{}",
            self.base_url.trim_end_matches('/'),
            self.locale,
            registry_code
        )
    }

    /// Raw server-rendered HTML of the profile page.
    #[instrument(skip(self))]
    pub async fn fetch_static(&self, url: &str) -> Result<String> {
        let page = self.http.get(url).await?;
        debug!(
            "Fetched {} bytes ({}, status {})",
            page.body.len(),
            page.content_type,
            page.status
        );
        Ok(page.body)
    }

    /// Script-executed DOM of the profile page, once the employee block exists.
    #[instrument(skip(self))]
    pub async fn fetch_rendered(&self, url: &str) -> Result<String> {
        self.renderer
            .render(url, EMPLOYEES_LABEL_SELECTOR, self.render_timeout)
            .await
    }
}
