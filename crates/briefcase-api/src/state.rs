use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use briefcase_billing::{BillingGateway, CheckoutConfig, StripeClient};
use briefcase_llm::{ChatClient, ChatOptions, OpenAIClient, OpenAIConfig};
use briefcase_observability::{LangfuseObserver, NoopObserver, Observer};
use briefcase_persist::{
    ConversationStore, CounterService, JsonFileConversationStore, MemoryConversationStore,
    MemoryTagCache, TagCache, UserDataService,
};

use crate::config::{Config, StorageBackend};
use crate::error::{ApiError, ApiResult};
use crate::scraper::{HttpScraper, Scraper};

/// Shared application state passed to all handlers
///
/// All collaborators sit behind `Arc` so handlers and spawned tasks can
/// share them.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm_client: Arc<dyn ChatClient>,
    /// Endpoint settings reused for caller-supplied API keys
    pub llm_config: OpenAIConfig,
    pub observer: Arc<dyn Observer>,
    pub billing: Option<BillingGateway>,
    pub conversations: Arc<dyn ConversationStore>,
    pub cache: Arc<dyn TagCache>,
    pub counters: Arc<CounterService>,
    pub users: Arc<UserDataService>,
    pub scraper: Arc<dyn Scraper>,
}

impl AppState {
    /// Wire every collaborator from configuration
    pub async fn from_config(config: Config) -> anyhow::Result<Self> {
        let mut llm_config = OpenAIConfig::new(config.openai_api_key.clone());
        if let Some(base_url) = &config.llm.base_url {
            llm_config = llm_config.with_base_url(base_url.clone());
        }
        let llm_client: Arc<dyn ChatClient> = Arc::new(OpenAIClient::from_config(&llm_config)?);

        let observer: Arc<dyn Observer> = match config.langfuse_keys() {
            Some((public_key, secret_key)) => {
                tracing::info!(host = %config.tracing.host, "Langfuse tracing enabled");
                Arc::new(LangfuseObserver::new(public_key, secret_key, config.tracing.host.clone())?)
            }
            None => {
                tracing::info!("Langfuse keys not set, tracing disabled");
                Arc::new(NoopObserver)
            }
        };

        let billing = match &config.stripe_secret_key {
            Some(secret_key) => {
                let client = StripeClient::new(secret_key.clone(), config.billing.base_url.clone())
                    .context("Failed to create Stripe client")?;
                Some(BillingGateway::new(
                    Arc::new(client),
                    CheckoutConfig {
                        price_id: config.billing.price_id.clone(),
                        success_url: config.billing.success_url.clone(),
                        cancel_url: config.billing.cancel_url.clone(),
                    },
                ))
            }
            None => {
                tracing::warn!("STRIPE_SECRET_KEY not set, billing routes disabled");
                None
            }
        };

        let conversations: Arc<dyn ConversationStore> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(MemoryConversationStore::new()),
            StorageBackend::File => Arc::new(
                JsonFileConversationStore::open(&config.storage.path)
                    .await
                    .with_context(|| {
                        format!("Failed to open conversation store at {}", config.storage.path)
                    })?,
            ),
        };

        let cache: Arc<dyn TagCache> = Arc::new(MemoryTagCache::new());
        let scraper: Arc<dyn Scraper> = Arc::new(
            HttpScraper::new(
                config.prospects.max_page_chars,
                Duration::from_secs(config.prospects.fetch_timeout_secs),
            )?
            .with_private_hosts(config.prospects.allow_private_hosts),
        );

        Ok(Self {
            counters: Arc::new(CounterService::new(cache.clone())),
            users: Arc::new(UserDataService::new(cache.clone())),
            config: Arc::new(config),
            llm_client,
            llm_config,
            observer,
            billing,
            conversations,
            cache,
            scraper,
        })
    }

    /// The shared client, or a one-off client for a caller-supplied key
    pub fn chat_client(&self, user_api_key: Option<&str>) -> ApiResult<Arc<dyn ChatClient>> {
        match user_api_key.map(str::trim).filter(|k| !k.is_empty()) {
            Some(key) => {
                let client = OpenAIClient::from_config(&self.llm_config.with_api_key(key))
                    .map_err(|e| ApiError::Validation(format!("{:#}", e)))?;
                Ok(Arc::new(client))
            }
            None => Ok(self.llm_client.clone()),
        }
    }

    /// Options from configuration; `seed` overrides the configured default
    pub fn chat_options(&self, seed: Option<i64>) -> ChatOptions {
        let llm = &self.config.llm;
        ChatOptions {
            temperature: llm.temperature,
            max_tokens: llm.max_tokens,
            seed: seed.or(llm.seed),
            ..Default::default()
        }
    }

    pub fn billing(&self) -> ApiResult<&BillingGateway> {
        self.billing
            .as_ref()
            .ok_or_else(|| ApiError::Config("billing not configured".to_string()))
    }

    /// Run an observer call in the background; failures are only logged
    pub fn observe<F>(&self, what: &'static str, call: F)
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        tokio::spawn(async move {
            if let Err(e) = call.await {
                tracing::warn!("Failed to record {}: {:#}", what, e);
            }
        });
    }
}
