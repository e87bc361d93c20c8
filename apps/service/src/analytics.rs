//! Rolling availability and latency statistics per URL.
//!
//! Each URL is summarised over its most recent observations only, so old outages
//! age out as new checks are recorded.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::database::Database;
use crate::monitoring::types::Observation;

/// Number of most recent observations considered per URL
pub const ANALYTICS_WINDOW: usize = 100;

/// Summary of one URL over its analytics window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlAnalytics {
    pub url: String,

    /// Share of UP observations, 0 to 100; 0 when nothing was recorded
    pub uptime_percent: f64,

    /// Mean latency over observations that have one; `None` when none do
    #[serde(rename = "avg_response")]
    pub avg_response_time: Option<f64>,
}

impl UrlAnalytics {
    /// Summarise observations already fetched for `url`
    pub fn from_observations(url: impl Into<String>, observations: &[Observation]) -> Self {
        let url = url.into();
        if observations.is_empty() {
            return Self { url, uptime_percent: 0.0, avg_response_time: None };
        }

        let up = observations.iter().filter(|o| o.is_up()).count();
        let uptime_percent = 100.0 * up as f64 / observations.len() as f64;

        let latencies: Vec<f64> = observations.iter().filter_map(|o| o.response_time_ms).collect();
        let avg_response_time = if latencies.is_empty() {
            None
        } else {
            Some(latencies.iter().sum::<f64>() / latencies.len() as f64)
        };

        Self { url, uptime_percent, avg_response_time }
    }
}

/// Analytics aggregator reading from the result store
pub struct AnalyticsAggregator {
    database: Arc<dyn Database>,
    window: usize,
}

impl AnalyticsAggregator {
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self { database, window: ANALYTICS_WINDOW }
    }

    /// One summary per requested URL, in request order
    pub async fn analytics(&self, urls: &[String]) -> Result<Vec<UrlAnalytics>> {
        let mut summaries = Vec::with_capacity(urls.len());

        for url in urls {
            let recent = self.database.history(url, self.window).await?;
            summaries.push(UrlAnalytics::from_observations(url.as_str(), &recent));
        }

        Ok(summaries)
    }
}
