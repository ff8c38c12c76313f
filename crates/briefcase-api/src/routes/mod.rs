pub mod conversations;
pub mod counters;
pub mod documents;
pub mod fee;
pub mod feedback;
pub mod health;
pub mod prospects;
pub mod subscription;
pub mod summarize;
pub mod titles;
pub mod users;
