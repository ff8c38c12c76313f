mod client;
mod types;

pub use client::{StripeClient, STRIPE_API_BASE};
pub use types::{CheckoutSession, CheckoutSessionParams, Subscription};
