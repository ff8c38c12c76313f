use std::sync::RwLock;

use crate::error::Result;
use crate::gateway::{BillingGateway, SubscriptionStatus};
use crate::state::SubscriptionState;

/// Client-side copy of the subscription state.
///
/// May disagree with the processor until the next [`refresh`](Self::refresh).
#[derive(Debug, Default)]
pub struct StatusMirror {
    state: RwLock<SubscriptionState>,
}

impl StatusMirror {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SubscriptionState {
        self.state
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn is_subscribed(&self) -> bool {
        self.state().is_subscribed()
    }

    /// Record a freshly created checkout session
    pub fn begin_checkout(&self, session_id: &str) -> Result<()> {
        let next = self.state().begin_checkout(session_id)?;
        self.store(next);
        Ok(())
    }

    /// Record a successful cancellation
    pub fn cancelled(&self) -> Result<()> {
        let next = self.state().cancel()?;
        self.store(next);
        Ok(())
    }

    /// Overwrite the cached state from the processor's answer
    pub fn apply(&self, status: &SubscriptionStatus) {
        let current = self.state();
        let next = match (&current, status.is_subscribed, status.session_id.as_deref()) {
            (_, true, Some(session_id)) => current
                .confirm(session_id)
                .unwrap_or_else(|_| SubscriptionState::Subscribed {
                    session_id: session_id.to_string(),
                }),
            (SubscriptionState::Subscribed { .. }, false, _) => SubscriptionState::Unsubscribed,
            _ => current,
        };
        self.store(next);
    }

    /// Verify the current session with the processor and apply the result
    pub async fn refresh(&self, gateway: &BillingGateway) -> Result<SubscriptionStatus> {
        let Some(session_id) = self.state().session_id().map(str::to_string) else {
            return Ok(SubscriptionStatus::unsubscribed());
        };

        let status = gateway.verify(&session_id).await?;
        self.apply(&status);
        Ok(status)
    }

    fn store(&self, next: SubscriptionState) {
        if let Ok(mut state) = self.state.write() {
            *state = next;
        }
    }
}
