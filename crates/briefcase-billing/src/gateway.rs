use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{BillingError, Result};
use crate::stripe::{CheckoutSession, CheckoutSessionParams, Subscription};

/// Hosted payment API used by the gateway
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn create_checkout_session(&self, params: CheckoutSessionParams) -> Result<CheckoutSession>;

    async fn retrieve_checkout_session(&self, session_id: &str) -> Result<CheckoutSession>;

    async fn cancel_subscription(&self, subscription_id: &str) -> Result<Subscription>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub price_id: String,
    /// `{CHECKOUT_SESSION_ID}` is substituted by the processor
    pub success_url: String,
    pub cancel_url: String,
}

/// Subscription status as reported by the processor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionStatus {
    pub is_subscribed: bool,
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
}

impl SubscriptionStatus {
    pub fn unsubscribed() -> Self {
        Self {
            is_subscribed: false,
            session_id: None,
            subscription_id: None,
        }
    }
}

/// Relays checkout, verify and cancel calls to the processor.
///
/// Holds no state of its own; the processor's record is authoritative.
#[derive(Clone)]
pub struct BillingGateway {
    processor: Arc<dyn PaymentProcessor>,
    config: CheckoutConfig,
}

impl BillingGateway {
    pub fn new(processor: Arc<dyn PaymentProcessor>, config: CheckoutConfig) -> Self {
        Self { processor, config }
    }

    pub async fn create_checkout(&self, user_id: &str, email: Option<String>) -> Result<CheckoutSession> {
        let session = self
            .processor
            .create_checkout_session(CheckoutSessionParams {
                price_id: self.config.price_id.clone(),
                success_url: self.config.success_url.clone(),
                cancel_url: self.config.cancel_url.clone(),
                client_reference_id: user_id.to_string(),
                customer_email: email,
            })
            .await?;

        tracing::info!(session_id = %session.id, user_id, "Checkout session created");
        Ok(session)
    }

    pub async fn verify(&self, session_id: &str) -> Result<SubscriptionStatus> {
        validate_session_id(session_id)?;
        let session = self.processor.retrieve_checkout_session(session_id).await?;
        Ok(status_of(session))
    }

    /// Verify a session on behalf of `user_id`, who must have started it.
    pub async fn verify_for(&self, session_id: &str, user_id: &str) -> Result<SubscriptionStatus> {
        let session = self.owned_session(session_id, user_id).await?;
        Ok(status_of(session))
    }

    /// Cancel the subscription bought through `session_id`.
    ///
    /// The session must have been created for `user_id`; a bare session id
    /// is not proof of ownership.
    pub async fn cancel(&self, session_id: &str, user_id: &str) -> Result<Subscription> {
        let session = self.owned_session(session_id, user_id).await?;

        let subscription_id = session
            .subscription
            .ok_or_else(|| BillingError::NoSubscription(session_id.to_string()))?;

        let subscription = self.processor.cancel_subscription(&subscription_id).await?;
        tracing::info!(subscription_id = %subscription.id, status = %subscription.status, "Subscription canceled");
        Ok(subscription)
    }

    async fn owned_session(&self, session_id: &str, user_id: &str) -> Result<CheckoutSession> {
        validate_session_id(session_id)?;
        let session = self.processor.retrieve_checkout_session(session_id).await?;

        if session.client_reference_id.as_deref() != Some(user_id) {
            tracing::warn!(session_id, user_id, "Rejected access to foreign session");
            return Err(BillingError::SessionOwnership(session_id.to_string()));
        }
        Ok(session)
    }
}

fn status_of(session: CheckoutSession) -> SubscriptionStatus {
    SubscriptionStatus {
        is_subscribed: session.is_paid(),
        session_id: Some(session.id),
        subscription_id: session.subscription,
    }
}

fn validate_session_id(session_id: &str) -> Result<()> {
    let valid = !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(BillingError::InvalidSessionId(session_id.to_string()))
    }
}
