use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
    pub billing: BillingConfig,
    pub tracing: TracingConfig,
    pub storage: StorageConfig,
    pub prospects: ProspectsConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub stripe_secret_key: Option<String>,
    #[serde(default)]
    pub langfuse_public_key: Option<String>,
    #[serde(default)]
    pub langfuse_secret_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_upload")]
    pub max_upload_bytes: usize,
}

fn default_request_timeout() -> u64 {
    300
}

fn default_max_upload() -> usize {
    20 * 1024 * 1024
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    /// Model for the short side tasks (titles, summaries); falls back to `model`
    #[serde(default)]
    pub utility_model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Used when a chat request carries no seed of its own
    #[serde(default)]
    pub seed: Option<i64>,
    #[serde(default)]
    pub base_url: Option<String>,
}

impl LlmConfig {
    pub fn utility_model(&self) -> &str {
        self.utility_model.as_deref().unwrap_or(&self.model)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Override for the Stripe API base (tests, proxies)
    #[serde(default)]
    pub base_url: Option<String>,
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    pub enabled: bool,
    pub host: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProspectsConfig {
    pub max_page_chars: usize,
    pub fetch_timeout_secs: u64,
    /// Permit fetching loopback and private-network hosts
    #[serde(default)]
    pub allow_private_hosts: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables such as `BRIEFCASE_SERVER__PORT=9000`
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BRIEFCASE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build()?;

        let mut cfg: Config = config.try_deserialize()?;
        cfg.load_secrets()?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    fn load_secrets(&mut self) -> Result<(), ConfigError> {
        self.openai_api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;
        self.stripe_secret_key = optional_env("STRIPE_SECRET_KEY");
        self.langfuse_public_key = optional_env("LANGFUSE_PUBLIC_KEY");
        self.langfuse_secret_key = optional_env("LANGFUSE_SECRET_KEY");
        Ok(())
    }

    /// Both Langfuse keys, when tracing is enabled and configured
    pub fn langfuse_keys(&self) -> Option<(String, String)> {
        if !self.tracing.enabled {
            return None;
        }
        match (&self.langfuse_public_key, &self.langfuse_secret_key) {
            (Some(pk), Some(sk)) => Some((pk.clone(), sk.clone())),
            _ => None,
        }
    }
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
