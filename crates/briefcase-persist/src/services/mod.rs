//! Per-id state that used to live in hosted actors.
//!
//! Each service reads through the injected [`TagCache`](crate::TagCache) and
//! revalidates the entity's tag after every mutation.

mod counter;
mod user_data;

pub use counter::{Counter, CounterService};
pub use user_data::{UserData, UserDataService, UserDataUpdate};
