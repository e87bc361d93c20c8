use anyhow::Result;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info};

use super::checker::Checker;
use super::types::{self, Observation, ProbeOutcome};
use crate::database::Database;

/// Default number of probes a single batch keeps in flight
pub const DEFAULT_MAX_IN_FLIGHT: usize = 256;

/// Batch prober - fans a URL list out to the checker and records the results
pub struct BatchProber {
    checker: Arc<dyn Checker>,
    database: Arc<dyn Database>,
    max_in_flight: usize,
}

impl BatchProber {
    /// Create a new batch prober
    pub fn new(checker: Arc<dyn Checker>, database: Arc<dyn Database>) -> Self {
        Self { checker, database, max_in_flight: DEFAULT_MAX_IN_FLIGHT }
    }

    /// Bound how many probes of one batch run at the same time
    pub fn with_max_in_flight(mut self, max_in_flight: usize) -> Self {
        self.max_in_flight = max_in_flight.max(1);
        self
    }

    /// Probe one URL. Never fails: transport errors classify as down.
    pub async fn probe(&self, url: &str) -> ProbeOutcome {
        match self.checker.check(url).await {
            Ok(response) => {
                debug!(
                    url,
                    status_code = response.status_code,
                    latency_ms = response.latency_ms,
                    "probe answered"
                );
                ProbeOutcome::responded(response.latency_ms, response.status_code)
            }
            Err(e) => {
                debug!(url, error = %e, "probe failed");
                ProbeOutcome::unreachable()
            }
        }
    }

    /// Probe every URL concurrently and persist the batch.
    ///
    /// `result[i]` always belongs to `urls[i]`; duplicates are probed independently.
    /// The whole call fails if the store rejects the batch.
    pub async fn check_urls(&self, urls: &[String]) -> Result<Vec<Observation>> {
        if urls.is_empty() {
            return Ok(Vec::new());
        }

        // Collected up front so the returned future stays Send for any borrow lifetime.
        let probes: Vec<_> = urls.iter().map(|url| self.probe(url)).collect();
        let outcomes: Vec<ProbeOutcome> =
            stream::iter(probes).buffered(self.max_in_flight).collect().await;

        let checked_at = types::now();
        let observations: Vec<Observation> = urls
            .iter()
            .zip(outcomes)
            .map(|(url, outcome)| Observation::new(url.as_str(), outcome, checked_at))
            .collect();

        self.database.append(&observations).await?;

        let up = observations.iter().filter(|o| o.is_up()).count();
        info!("Checked {} URLs: {} up, {} down", observations.len(), up, observations.len() - up);

        Ok(observations)
    }
}
