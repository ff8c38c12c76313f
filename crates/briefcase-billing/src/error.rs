use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Payment processor error ({status}): {message}")]
    Processor { status: u16, message: String },

    #[error("Payment processor unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Cannot {action} while {state}")]
    InvalidTransition { state: String, action: &'static str },

    #[error("Session {0} does not belong to the requesting user")]
    SessionOwnership(String),

    #[error("Invalid session id: {0}")]
    InvalidSessionId(String),

    #[error("Session {0} has no subscription")]
    NoSubscription(String),
}

pub type Result<T> = std::result::Result<T, BillingError>;
