/// Probing engine module - issues reachability checks and records them
///
/// This module is responsible for:
/// - Issuing single bounded-timeout HTTP probes
/// - Fanning batches of probes out concurrently
/// - Re-running batches on a timer for callers that want periodic checks
pub mod checker;
pub mod executor;
pub mod scheduler;
pub mod types;

pub use checker::{Checker, HttpChecker, ProbeResponse};
pub use executor::BatchProber;
pub use scheduler::BatchScheduler;
pub use types::{Observation, ProbeOutcome, ProbeStatus};
