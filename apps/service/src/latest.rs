use anyhow::Result;
use std::sync::Arc;

use crate::database::Database;
use crate::monitoring::types::Observation;

/// Current-state projection: the newest observation of every URL ever checked.
///
/// Kept apart from raw history so consumers of "what is up right now" do not
/// depend on how the log is queried.
pub struct LatestStatusView {
    database: Arc<dyn Database>,
}

impl LatestStatusView {
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self { database }
    }

    pub async fn latest_statuses(&self) -> Result<Vec<Observation>> {
        self.database.latest_per_url().await
    }
}
