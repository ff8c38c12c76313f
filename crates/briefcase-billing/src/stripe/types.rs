use serde::{Deserialize, Serialize};

/// Inputs for a subscription-mode checkout session
#[derive(Debug, Clone)]
pub struct CheckoutSessionParams {
    pub price_id: String,
    pub success_url: String,
    pub cancel_url: String,
    pub client_reference_id: String,
    pub customer_email: Option<String>,
}

impl CheckoutSessionParams {
    /// Form fields in Stripe's bracketed encoding
    pub(crate) fn to_form(&self) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("mode", "subscription".to_string()),
            ("line_items[0][price]", self.price_id.clone()),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", self.success_url.clone()),
            ("cancel_url", self.cancel_url.clone()),
            ("client_reference_id", self.client_reference_id.clone()),
        ];
        if let Some(email) = &self.customer_email {
            form.push(("customer_email", email.clone()));
        }
        form
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
    /// `open`, `complete` or `expired`
    #[serde(default)]
    pub status: Option<String>,
    /// `paid`, `unpaid` or `no_payment_required`
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
    #[serde(default)]
    pub client_reference_id: Option<String>,
}

impl CheckoutSession {
    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some("complete") && self.payment_status.as_deref() == Some("paid")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paid_requires_complete_and_paid() {
        let mut session: CheckoutSession = serde_json::from_value(serde_json::json!({
            "id": "cs_1",
            "status": "open",
            "payment_status": "unpaid",
            "subscription": null
        }))
        .unwrap();
        assert!(!session.is_paid());

        session.status = Some("complete".to_string());
        assert!(!session.is_paid());

        session.payment_status = Some("paid".to_string());
        assert!(session.is_paid());
    }

    #[test]
    fn test_form_encoding() {
        let params = CheckoutSessionParams {
            price_id: "price_1".to_string(),
            success_url: "https://app/success".to_string(),
            cancel_url: "https://app/cancel".to_string(),
            client_reference_id: "user-1".to_string(),
            customer_email: None,
        };
        let form = params.to_form();

        assert!(form.contains(&("line_items[0][price]", "price_1".to_string())));
        assert!(form.contains(&("mode", "subscription".to_string())));
        assert!(!form.iter().any(|(k, _)| *k == "customer_email"));
    }
}
