use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL for the score store
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Base URL of the internal marketplace catalog API
    #[serde(default = "default_catalog_api_url")]
    pub catalog_api_url: String,

    /// URL of the marketplace session-validation endpoint
    #[serde(default = "default_auth_api_url")]
    pub auth_api_url: String,

    /// Directory holding the pre-trained collaborative model dumps
    #[serde(default = "default_model_dir")]
    pub model_dir: String,

    /// Organization whose ranking is served when the requested one is unknown
    #[serde(default = "default_fallback_org_id")]
    pub fallback_org_id: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_catalog_api_url() -> String {
    "http://localhost:8080/internal".to_string()
}

fn default_auth_api_url() -> String {
    "http://localhost:8080/api/session".to_string()
}

fn default_model_dir() -> String {
    "./models".to_string()
}

fn default_fallback_org_id() -> String {
    "1".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }
}
