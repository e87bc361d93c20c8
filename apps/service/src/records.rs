//! Serialized shapes of observations as handed to external callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::monitoring::types::{Observation, ProbeStatus};

/// Current state of a URL, as returned by a batch or the latest-status view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRecord {
    pub url: String,
    pub status: ProbeStatus,
    pub response_time: Option<f64>,
    pub last_checked: DateTime<Utc>,
}

/// One entry of a URL's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub url: String,
    pub status: ProbeStatus,
    pub response_time: Option<f64>,
    pub checked_at: DateTime<Utc>,
}

impl From<Observation> for StatusRecord {
    fn from(observation: Observation) -> Self {
        Self {
            url: observation.url,
            status: observation.status,
            response_time: observation.response_time_ms,
            last_checked: observation.checked_at,
        }
    }
}

impl From<Observation> for HistoryRecord {
    fn from(observation: Observation) -> Self {
        Self {
            url: observation.url,
            status: observation.status,
            response_time: observation.response_time_ms,
            checked_at: observation.checked_at,
        }
    }
}
