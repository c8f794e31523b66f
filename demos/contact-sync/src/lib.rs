pub mod config;
pub mod handler;

pub use config::SyncConfig;
pub use handler::{ContactChangeHandler, ContactCounts, ContactSummary};
