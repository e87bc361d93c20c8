//! URL Inspector engine.
//!
//! Probes URLs concurrently, records every result in an append-only log and
//! derives availability analytics and current status from that log.

pub mod analytics;
pub mod config;
pub mod database;
pub mod inspector;
pub mod latest;
pub mod monitoring;
pub mod pool;
pub mod records;

pub use analytics::UrlAnalytics;
pub use config::Config;
pub use inspector::{HISTORY_LIMIT, Inspector};
pub use monitoring::{Observation, ProbeStatus};
pub use records::{HistoryRecord, StatusRecord};
