use crate::app::ports::PageRendererPort;
use crate::error::{EnrichError, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use std::time::Duration;
use tracing::{debug, warn};

/// Renders profile pages in a fresh headless Chrome per call. The browser is
/// owned by the blocking task and dropped (process killed) when it returns.
#[derive(Debug, Clone)]
pub struct HeadlessChromeRenderer {
    headless: bool,
    sandbox: bool,
}

impl HeadlessChromeRenderer {
    pub fn new(headless: bool, sandbox: bool) -> Self {
        Self { headless, sandbox }
    }

    fn launch(&self) -> Result<Browser> {
        let options = LaunchOptions::default_builder()
            .headless(self.headless)
            .sandbox(self.sandbox)
            .build()
            .map_err(|e| EnrichError::Browser(format!("Invalid launch options: {}", e)))?;
        Browser::new(options).map_err(|e| EnrichError::Browser(format!("Failed to launch browser: {}", e)))
    }

    fn render_blocking(&self, url: &str, wait_selector: &str, timeout: Duration) -> Result<String> {
        let browser = self.launch()?;
        let tab = browser
            .new_tab()
            .map_err(|e| EnrichError::Browser(format!("Failed to create tab: {}", e)))?;

        tab.navigate_to(url)
            .map_err(|e| EnrichError::Browser(format!("Navigation to {} failed: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| EnrichError::Browser(format!("Page load failed for {}: {}", url, e)))?;
        debug!("Page opened: {}", url);

        if let Err(e) = tab.wait_for_element_with_custom_timeout(wait_selector, timeout) {
            warn!("Element '{}' not found on {}: {}", wait_selector, url, e);
            return Err(EnrichError::RenderTimeout {
                selector: wait_selector.to_string(),
                timeout_secs: timeout.as_secs(),
            });
        }
        debug!("Element '{}' found on {}", wait_selector, url);

        tab.get_content()
            .map_err(|e| EnrichError::Browser(format!("Failed to read rendered content: {}", e)))
    }
}

#[async_trait]
impl PageRendererPort for HeadlessChromeRenderer {
    async fn render(&self, url: &str, wait_selector: &str, timeout: Duration) -> Result<String> {
        let renderer = self.clone();
        let url = url.to_string();
        let wait_selector = wait_selector.to_string();
        tokio::task::spawn_blocking(move || renderer.render_blocking(&url, &wait_selector, timeout)).await?
    }
}
