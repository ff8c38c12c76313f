use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::{CheckoutSession, CheckoutSessionParams, ErrorEnvelope, Subscription};
use crate::error::{BillingError, Result};
use crate::gateway::PaymentProcessor;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Minimal Stripe REST client (form-encoded requests, bearer secret key)
pub struct StripeClient {
    client: Client,
    base_url: String,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: impl Into<String>, base_url: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url
                .as_deref()
                .unwrap_or(STRIPE_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            secret_key: secret_key.into(),
        })
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .ok()
            .and_then(|e| e.error.message)
            .unwrap_or(body);

        tracing::error!(status = %status, "Stripe request failed: {}", message);
        Err(BillingError::Processor {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PaymentProcessor for StripeClient {
    async fn create_checkout_session(&self, params: CheckoutSessionParams) -> Result<CheckoutSession> {
        let response = self
            .client
            .post(format!("{}/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&params.to_form())
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession> {
        let response = self
            .client
            .get(format!("{}/checkout/sessions/{}", self.base_url, session_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        let response = self
            .client
            .delete(format!("{}/subscriptions/{}", self.base_url, subscription_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;

        Self::parse(response).await
    }
}
