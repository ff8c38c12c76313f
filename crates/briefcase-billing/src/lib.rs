pub mod error;
pub mod gateway;
pub mod mirror;
pub mod state;
pub mod stripe;

pub use error::{BillingError, Result};
pub use gateway::{BillingGateway, CheckoutConfig, PaymentProcessor, SubscriptionStatus};
pub use mirror::StatusMirror;
pub use state::SubscriptionState;
pub use stripe::{CheckoutSession, CheckoutSessionParams, StripeClient, Subscription};
