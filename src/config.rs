use crate::constants::{
    DEFAULT_RENDER_TIMEOUT_SECS, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_ROW_DELAY_MS,
    EMPLOYEE_COUNT_MAX, EMPLOYEE_COUNT_MIN, REGISTRY_BASE_URL, REGISTRY_LOCALE,
};
use crate::error::{EnrichError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "EMTAK_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub registry: RegistryConfig,
    pub pacing: PacingConfig,
    pub render: RenderConfig,
    pub classification: ClassificationConfig,
    pub counties: HashMap<String, String>,
    pub employees: EmployeesConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub base_url: String,
    pub locale: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: REGISTRY_BASE_URL.to_string(),
            locale: REGISTRY_LOCALE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: concat!("emtak-enricher/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            delay_ms: DEFAULT_ROW_DELAY_MS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub timeout_secs: u64,
    pub headless: bool,
    pub sandbox: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_RENDER_TIMEOUT_SECS,
            headless: true,
            sandbox: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Replaces the built-in allow-list when set.
    pub activity_codes: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmployeesConfig {
    pub min: i64,
    pub max: i64,
}

impl Default for EmployeesConfig {
    fn default() -> Self {
        Self {
            min: EMPLOYEE_COUNT_MIN,
            max: EMPLOYEE_COUNT_MAX,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            static_dir: "public".to_string(),
        }
    }
}

impl Config {
    /// Loads from `path`, or `$EMTAK_CONFIG`, or `config.toml`. A missing
    /// default file means built-in defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let (config_path, explicit) = match (path, env_path.as_deref()) {
            (Some(p), _) => (p.to_path_buf(), true),
            (None, Some(p)) if !p.trim().is_empty() => (Path::new(p).to_path_buf(), true),
            _ => (Path::new(DEFAULT_CONFIG_PATH).to_path_buf(), false),
        };

        if !explicit && !config_path.exists() {
            debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            EnrichError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        let config = Self::from_toml(&config_content)?;
        info!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.registry.base_url.trim().is_empty() {
            return Err(EnrichError::Config("registry.base_url must not be empty".into()));
        }
        if self.employees.min > self.employees.max {
            return Err(EnrichError::Config(format!(
                "employees.min ({}) is greater than employees.max ({})",
                self.employees.min, self.employees.max
            )));
        }
        Ok(())
    }

    pub fn row_delay(&self) -> Duration {
        Duration::from_millis(self.pacing.delay_ms)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render.timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.registry.request_timeout_secs)
    }
}
