use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{BillingError, Result};

/// Per-user subscription lifecycle.
///
/// ```text
/// Unsubscribed --begin_checkout--> PendingCheckout --confirm--> Subscribed --cancel--> Unsubscribed
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SubscriptionState {
    #[default]
    Unsubscribed,
    PendingCheckout {
        session_id: String,
    },
    Subscribed {
        session_id: String,
    },
}

impl SubscriptionState {
    pub fn is_subscribed(&self) -> bool {
        matches!(self, Self::Subscribed { .. })
    }

    pub fn session_id(&self) -> Option<&str> {
        match self {
            Self::Unsubscribed => None,
            Self::PendingCheckout { session_id } | Self::Subscribed { session_id } => Some(session_id),
        }
    }

    /// A new checkout replaces an abandoned pending one
    pub fn begin_checkout(&self, session_id: impl Into<String>) -> Result<Self> {
        match self {
            Self::Unsubscribed | Self::PendingCheckout { .. } => Ok(Self::PendingCheckout {
                session_id: session_id.into(),
            }),
            Self::Subscribed { .. } => Err(self.invalid("begin checkout")),
        }
    }

    pub fn confirm(&self, session_id: &str) -> Result<Self> {
        match self {
            Self::PendingCheckout { session_id: pending } if pending == session_id => {
                Ok(Self::Subscribed {
                    session_id: session_id.to_string(),
                })
            }
            Self::Subscribed { session_id: current } if current == session_id => Ok(self.clone()),
            _ => Err(self.invalid("confirm payment")),
        }
    }

    pub fn cancel(&self) -> Result<Self> {
        match self {
            Self::Subscribed { .. } => Ok(Self::Unsubscribed),
            _ => Err(self.invalid("cancel")),
        }
    }

    fn invalid(&self, action: &'static str) -> BillingError {
        BillingError::InvalidTransition {
            state: self.to_string(),
            action,
        }
    }
}

impl fmt::Display for SubscriptionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unsubscribed => f.write_str("unsubscribed"),
            Self::PendingCheckout { .. } => f.write_str("checkout pending"),
            Self::Subscribed { .. } => f.write_str("subscribed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = SubscriptionState::default()
            .begin_checkout("cs_1")
            .unwrap();
        assert!(!state.is_subscribed());
        assert_eq!(state.session_id(), Some("cs_1"));

        let state = state.confirm("cs_1").unwrap();
        assert!(state.is_subscribed());

        let state = state.cancel().unwrap();
        assert_eq!(state, SubscriptionState::Unsubscribed);
    }

    #[test]
    fn test_confirm_requires_matching_session() {
        let state = SubscriptionState::default().begin_checkout("cs_1").unwrap();
        assert!(matches!(
            state.confirm("cs_other"),
            Err(BillingError::InvalidTransition { .. })
        ));
        assert!(SubscriptionState::Unsubscribed.confirm("cs_1").is_err());
    }

    #[test]
    fn test_cannot_cancel_unless_subscribed() {
        assert!(SubscriptionState::Unsubscribed.cancel().is_err());
        let pending = SubscriptionState::default().begin_checkout("cs_1").unwrap();
        assert!(pending.cancel().is_err());
    }

    #[test]
    fn test_restart_abandoned_checkout() {
        let state = SubscriptionState::default()
            .begin_checkout("cs_1")
            .unwrap()
            .begin_checkout("cs_2")
            .unwrap();
        assert_eq!(state.session_id(), Some("cs_2"));

        let subscribed = state.confirm("cs_2").unwrap();
        assert!(subscribed.begin_checkout("cs_3").is_err());
    }
}
