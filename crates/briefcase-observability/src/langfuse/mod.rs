pub mod client;
pub mod observer;
pub mod types;

pub use client::LangfuseClient;
pub use observer::LangfuseObserver;
