use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Fetching {url} failed: {message}")]
    Fetch { url: String, message: String },

    #[error("Rendered page did not expose '{selector}' within {timeout_secs}s")]
    RenderTimeout { selector: String, timeout_secs: u64 },

    #[error("Browser automation failed: {0}")]
    Browser(String),

    #[error("Input table has no header row")]
    EmptyInput,

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Spreadsheet write failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Spreadsheet read failed: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl EnrichError {
    /// Short machine-friendly label, used for metrics and failure summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            EnrichError::Http(_) => "http_client",
            EnrichError::Fetch { .. } => "fetch",
            EnrichError::RenderTimeout { .. } => "render_timeout",
            EnrichError::Browser(_) => "browser",
            EnrichError::EmptyInput => "empty_input",
            EnrichError::Toml(_) => "toml",
            EnrichError::Io(_) => "io",
            EnrichError::Config(_) => "config",
            EnrichError::Spreadsheet(_) => "spreadsheet",
            EnrichError::Workbook(_) => "workbook",
            EnrichError::Join(_) => "join",
        }
    }
}

pub type Result<T> = std::result::Result<T, EnrichError>;
