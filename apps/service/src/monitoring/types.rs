use std::fmt;
use std::str::FromStr;

use anyhow::{Error, anyhow};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Reachability classification of one probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeStatus {
    Up,
    Down,
}

impl ProbeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Up => "UP",
            ProbeStatus::Down => "DOWN",
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProbeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(ProbeStatus::Up),
            "DOWN" => Ok(ProbeStatus::Down),
            other => Err(anyhow!("Unknown probe status: {}", other)),
        }
    }
}

/// What a single probe learned about a URL, before it is stamped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeOutcome {
    pub status: ProbeStatus,

    /// Present only when a response was actually received
    pub response_time_ms: Option<f64>,
}

impl ProbeOutcome {
    /// A response came back; anything at or above 400 counts as down.
    pub fn responded(latency_ms: f64, status_code: u16) -> Self {
        let status = if status_code < 400 { ProbeStatus::Up } else { ProbeStatus::Down };
        Self { status, response_time_ms: Some(latency_ms.max(0.0)) }
    }

    /// The request failed outright (connect, DNS, TLS, timeout).
    pub fn unreachable() -> Self {
        Self { status: ProbeStatus::Down, response_time_ms: None }
    }
}

/// One persisted probe result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// URL that was probed, used verbatim as the lookup key
    pub url: String,

    pub status: ProbeStatus,

    /// Round trip in milliseconds; `None` when no response was received
    pub response_time_ms: Option<f64>,

    /// UTC completion time of the batch that produced this observation
    pub checked_at: DateTime<Utc>,
}

impl Observation {
    pub fn new(url: impl Into<String>, outcome: ProbeOutcome, checked_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            status: outcome.status,
            response_time_ms: outcome.response_time_ms,
            checked_at,
        }
    }

    pub fn is_up(&self) -> bool {
        self.status == ProbeStatus::Up
    }
}

/// Current UTC time at the precision the store keeps (microseconds).
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
