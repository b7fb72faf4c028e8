use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Workbook holding the `prices_usados` / `prices_novos` sheets.
    pub workbook_path: PathBuf,
    pub color_mods_path: PathBuf,
    /// JSON array of model names shown first on the featured surface.
    pub featured_path: PathBuf,
    pub public_dir: PathBuf,
    pub subscriptions_path: PathBuf,
    pub webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
    pub default_market: String,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("workbook_path", &self.workbook_path)
            .field("color_mods_path", &self.color_mods_path)
            .field("featured_path", &self.featured_path)
            .field("public_dir", &self.public_dir)
            .field("subscriptions_path", &self.subscriptions_path)
            .field(
                "webhook_url",
                &self.webhook_url.as_ref().map(|_| "[redacted]"),
            )
            .field("webhook_timeout_secs", &self.webhook_timeout_secs)
            .field("default_market", &self.default_market)
            .finish()
    }
}
