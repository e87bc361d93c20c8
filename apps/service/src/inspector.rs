//! The inspector - one handle over every engine operation.
//!
//! Built once at process start with its storage and HTTP client, shared by reference
//! with whatever transport drives it, and shut down explicitly at exit.

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::analytics::{AnalyticsAggregator, UrlAnalytics};
use crate::config::Config;
use crate::database::{Database, DatabaseImpl, initialize_database};
use crate::latest::LatestStatusView;
use crate::monitoring::{BatchProber, Checker, HttpChecker, Observation};
use crate::pool::{LibsqlPool, open_pool};

/// Maximum number of observations returned by [`Inspector::history`]
pub const HISTORY_LIMIT: usize = 100;

pub struct Inspector {
    database: Arc<dyn Database>,
    prober: Arc<BatchProber>,
    analytics: AnalyticsAggregator,
    latest: LatestStatusView,
    pool: Option<LibsqlPool>,
}

impl Inspector {
    /// Open the configured store, run migrations and build the HTTP checker
    pub async fn open(config: &Config) -> Result<Self> {
        info!("Opening result store at {}", config.database.path);
        let pool = open_pool(&config.database.path, config.database.max_connections).await?;

        let conn = pool.get().await?;
        initialize_database(&conn).await?;
        drop(conn);

        let database: Arc<dyn Database> = Arc::new(DatabaseImpl::new_from_pool(pool.clone()));
        let checker: Arc<dyn Checker> = Arc::new(HttpChecker::new(config.probe.timeout())?);

        let mut inspector = Self::with_parts(database, checker, config.probe.max_in_flight);
        inspector.pool = Some(pool);
        Ok(inspector)
    }

    /// Assemble an inspector from an existing store and checker
    pub fn new(database: Arc<dyn Database>, checker: Arc<dyn Checker>) -> Self {
        Self::with_parts(database, checker, crate::monitoring::executor::DEFAULT_MAX_IN_FLIGHT)
    }

    fn with_parts(database: Arc<dyn Database>, checker: Arc<dyn Checker>, max_in_flight: usize) -> Self {
        let prober = BatchProber::new(checker, database.clone()).with_max_in_flight(max_in_flight);

        Self {
            prober: Arc::new(prober),
            analytics: AnalyticsAggregator::new(database.clone()),
            latest: LatestStatusView::new(database.clone()),
            database,
            pool: None,
        }
    }

    /// Shared prober, for callers that schedule their own batches
    pub fn prober(&self) -> Arc<BatchProber> {
        self.prober.clone()
    }

    /// Probe and record a batch; output order follows `urls`
    pub async fn check_urls(&self, urls: &[String]) -> Result<Vec<Observation>> {
        self.prober.check_urls(urls).await
    }

    /// Up to [`HISTORY_LIMIT`] observations for `url`, newest first
    pub async fn history(&self, url: &str) -> Result<Vec<Observation>> {
        self.database.history(url, HISTORY_LIMIT).await
    }

    pub async fn analytics(&self, urls: &[String]) -> Result<Vec<UrlAnalytics>> {
        self.analytics.analytics(urls).await
    }

    pub async fn latest_statuses(&self) -> Result<Vec<Observation>> {
        self.latest.latest_statuses().await
    }

    /// Irrecoverably delete every observation
    pub async fn purge_all(&self) -> Result<u64> {
        self.database.purge_all().await
    }

    /// Close the store's pool; later store calls fail
    pub fn shutdown(&self) {
        if let Some(pool) = &self.pool {
            pool.close();
            info!("Result store closed");
        }
    }
}
