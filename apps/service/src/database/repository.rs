use anyhow::Result;
use async_trait::async_trait;
use libsql::{TransactionBehavior, params};

use super::models::{OBSERVATION_COLUMNS, observation_from_row, timestamp_to_i64};
use crate::monitoring::types::Observation;
use crate::pool::LibsqlPool;

/// Result store - exclusive owner of the observation log
///
/// The log is append-only; the only removal is the full purge.
#[async_trait]
pub trait Database: Send + Sync {
    /// Record every observation or none of them
    async fn append(&self, observations: &[Observation]) -> Result<()>;

    /// Most recent observations for one URL, newest first, at most `limit`
    async fn history(&self, url: &str, limit: usize) -> Result<Vec<Observation>>;

    /// Newest observation of every distinct URL, ordered by URL
    async fn latest_per_url(&self) -> Result<Vec<Observation>>;

    /// Delete the whole log, returning how many observations were removed
    async fn purge_all(&self) -> Result<u64>;
}

/// LibSQL database implementation
pub struct DatabaseImpl {
    pool: LibsqlPool,
}

impl DatabaseImpl {
    /// Create a new database instance from a pool
    pub fn new_from_pool(pool: LibsqlPool) -> Self {
        Self { pool }
    }

    /// Get a connection from the pool
    async fn get_conn(&self) -> Result<deadpool::managed::Object<crate::pool::LibsqlManager>> {
        Ok(self.pool.get().await?)
    }
}

#[async_trait]
impl Database for DatabaseImpl {
    async fn append(&self, observations: &[Observation]) -> Result<()> {
        if observations.is_empty() {
            return Ok(());
        }

        let conn = self.get_conn().await?;
        // Dropping the transaction before commit rolls the whole batch back.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate).await?;

        for observation in observations {
            tx.execute(
                "INSERT INTO observations (url, status, response_time_ms, checked_at) VALUES (?, ?, ?, ?)",
                params![
                    observation.url.clone(),
                    observation.status.as_str(),
                    observation.response_time_ms,
                    timestamp_to_i64(observation.checked_at)
                ],
            )
            .await?;
        }

        tx.commit().await?;
        tracing::debug!("Appended {} observations", observations.len());
        Ok(())
    }

    async fn history(&self, url: &str, limit: usize) -> Result<Vec<Observation>> {
        let conn = self.get_conn().await?;
        let sql = format!(
            "SELECT {OBSERVATION_COLUMNS} FROM observations WHERE url = ? ORDER BY checked_at DESC, id DESC LIMIT ?"
        );

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut rows = conn.query(&sql, params![url, limit]).await?;
        let mut results = Vec::new();

        while let Some(row) = rows.next().await? {
            results.push(observation_from_row(&row)?);
        }

        Ok(results)
    }

    async fn latest_per_url(&self) -> Result<Vec<Observation>> {
        let conn = self.get_conn().await?;
        // Ties on checked_at go to the row inserted last, so each URL yields exactly one row.
        let sql = format!(
            "SELECT {OBSERVATION_COLUMNS} FROM (
                SELECT id, url, status, response_time_ms, checked_at,
                       ROW_NUMBER() OVER (PARTITION BY url ORDER BY checked_at DESC, id DESC) AS row_rank
                FROM observations
            )
            WHERE row_rank = 1
            ORDER BY url ASC"
        );

        let mut rows = conn.query(&sql, ()).await?;
        let mut results = Vec::new();

        while let Some(row) = rows.next().await? {
            results.push(observation_from_row(&row)?);
        }

        Ok(results)
    }

    async fn purge_all(&self) -> Result<u64> {
        let conn = self.get_conn().await?;
        let deleted = conn.execute("DELETE FROM observations", ()).await?;

        tracing::info!("Purged {} observations", deleted);
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::initialize_database;
    use crate::monitoring::types::{self, ProbeOutcome, ProbeStatus};
    use crate::pool::open_pool;
    use chrono::{DateTime, Duration, Utc};
    use tempfile::{TempDir, tempdir};

    /// Helper to create a migrated store on a temporary file
    async fn create_test_database() -> Result<(DatabaseImpl, TempDir)> {
        let temp_dir = tempdir()?;
        let db_path = temp_dir.path().join("test.db");
        let pool = open_pool(&db_path.to_string_lossy(), 4).await?;

        let conn = pool.get().await?;
        initialize_database(&conn).await?;
        drop(conn);

        Ok((DatabaseImpl::new_from_pool(pool), temp_dir))
    }

    fn up(url: &str, ms: f64, at: DateTime<Utc>) -> Observation {
        Observation::new(url, ProbeOutcome::responded(ms, 200), at)
    }

    fn down(url: &str, at: DateTime<Utc>) -> Observation {
        Observation::new(url, ProbeOutcome::unreachable(), at)
    }

    #[tokio::test]
    async fn test_history_is_newest_first() -> Result<()> {
        let (db, _dir) = create_test_database().await?;
        let base = types::now();

        db.append(&[up("http://a.test/", 10.0, base), down("http://a.test/", base + Duration::seconds(2))])
            .await?;
        db.append(&[up("http://a.test/", 30.0, base + Duration::seconds(1))]).await?;
        db.append(&[up("http://b.test/", 5.0, base + Duration::seconds(9))]).await?;

        let history = db.history("http://a.test/", 100).await?;
        assert_eq!(history.len(), 3);
        assert!(history.windows(2).all(|w| w[0].checked_at >= w[1].checked_at));
        assert_eq!(history[0].status, ProbeStatus::Down);
        assert!(history[0].response_time_ms.is_none());
        assert_eq!(history[1].response_time_ms, Some(30.0));
        assert_eq!(history[2].checked_at, base);
        Ok(())
    }

    #[tokio::test]
    async fn test_history_respects_limit() -> Result<()> {
        let (db, _dir) = create_test_database().await?;
        let base = types::now();

        let batch: Vec<Observation> =
            (0..120).map(|i| up("http://a.test/", i as f64, base + Duration::milliseconds(i))).collect();
        db.append(&batch).await?;

        let history = db.history("http://a.test/", 100).await?;
        assert_eq!(history.len(), 100);
        assert_eq!(history[0].response_time_ms, Some(119.0));

        assert_eq!(db.history("http://a.test/", 5).await?.len(), 5);
        assert!(db.history("http://unknown.test/", 100).await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_latest_per_url() -> Result<()> {
        let (db, _dir) = create_test_database().await?;
        let base = types::now();

        db.append(&[
            up("http://b.test/", 1.0, base),
            down("http://b.test/", base + Duration::seconds(5)),
            up("http://a.test/", 2.0, base + Duration::seconds(3)),
            up("http://a.test/", 3.0, base + Duration::seconds(1)),
        ])
        .await?;

        let latest = db.latest_per_url().await?;
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].url, "http://a.test/");
        assert_eq!(latest[0].response_time_ms, Some(2.0));
        assert_eq!(latest[1].url, "http://b.test/");
        assert_eq!(latest[1].status, ProbeStatus::Down);
        Ok(())
    }

    #[tokio::test]
    async fn test_latest_breaks_ties_by_insertion() -> Result<()> {
        let (db, _dir) = create_test_database().await?;
        let at = types::now();

        db.append(&[up("http://a.test/", 1.0, at), up("http://a.test/", 2.0, at)]).await?;

        let latest = db.latest_per_url().await?;
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].response_time_ms, Some(2.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_purge_all() -> Result<()> {
        let (db, _dir) = create_test_database().await?;
        let at = types::now();

        db.append(&[up("http://a.test/", 1.0, at), down("http://b.test/", at)]).await?;
        assert_eq!(db.purge_all().await?, 2);

        assert!(db.history("http://a.test/", 100).await?.is_empty());
        assert!(db.latest_per_url().await?.is_empty());
        assert_eq!(db.purge_all().await?, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_append_is_all_or_nothing() -> Result<()> {
        let (db, _dir) = create_test_database().await?;
        let at = types::now();
        db.append(&[up("http://a.test/", 1.0, at)]).await?;

        // The trigger rejects the second row of the next batch.
        let conn = db.get_conn().await?;
        conn.execute(
            "CREATE TRIGGER reject_poison BEFORE INSERT ON observations
             WHEN NEW.url = 'poison' BEGIN SELECT RAISE(ABORT, 'rejected'); END",
            (),
        )
        .await?;
        drop(conn);

        let result = db
            .append(&[up("http://a.test/", 2.0, at), down("poison", at), up("http://c.test/", 3.0, at)])
            .await;
        assert!(result.is_err());

        assert_eq!(db.history("http://a.test/", 100).await?.len(), 1);
        assert!(db.history("http://c.test/", 100).await?.is_empty());
        Ok(())
    }
}
