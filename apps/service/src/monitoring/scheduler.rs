use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{MissedTickBehavior, interval};

use super::executor::BatchProber;
use super::types::Observation;

/// Batch scheduler - re-runs one URL batch on a fixed interval
///
/// This is a caller of the engine like any other: every tick submits the batch to
/// the prober and forwards the recorded observations. A failed batch is logged and
/// the next tick proceeds.
pub struct BatchScheduler {
    prober: Arc<BatchProber>,
    result_tx: mpsc::Sender<Vec<Observation>>,
}

impl BatchScheduler {
    /// Create a new batch scheduler
    pub fn new(prober: Arc<BatchProber>, result_tx: mpsc::Sender<Vec<Observation>>) -> Self {
        Self { prober, result_tx }
    }

    /// Spawn the periodic task. It stops once the receiving side is dropped.
    pub fn schedule(&self, urls: Vec<String>, every: Duration) -> tokio::task::JoinHandle<()> {
        let prober = self.prober.clone();
        let result_tx = self.result_tx.clone();

        tokio::spawn(async move {
            if urls.is_empty() {
                tracing::warn!("No URLs to schedule, periodic checks not started");
                return;
            }

            let mut timer = interval(every);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                timer.tick().await;

                let observations = match prober.check_urls(&urls).await {
                    Ok(observations) => observations,
                    Err(e) => {
                        tracing::error!("Scheduled batch failed: {:#}", e);
                        continue;
                    }
                };

                if let Err(e) = result_tx.send(observations).await {
                    tracing::debug!("Scheduled batch receiver gone, stopping: {}", e);
                    break;
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::monitoring::checker::{Checker, ProbeResponse};
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct AlwaysUp;

    #[async_trait]
    impl Checker for AlwaysUp {
        async fn check(&self, _target: &str) -> Result<ProbeResponse> {
            Ok(ProbeResponse { latency_ms: 1.0, status_code: 204 })
        }
    }

    /// Rejects the first append, accepts the rest.
    #[derive(Default)]
    struct FlakyDatabase {
        appends: AtomicUsize,
    }

    #[async_trait]
    impl Database for FlakyDatabase {
        async fn append(&self, _observations: &[Observation]) -> Result<()> {
            if self.appends.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(anyhow!("write rejected"))
            } else {
                Ok(())
            }
        }

        async fn history(&self, _url: &str, _limit: usize) -> Result<Vec<Observation>> {
            Ok(Vec::new())
        }

        async fn latest_per_url(&self) -> Result<Vec<Observation>> {
            Ok(Vec::new())
        }

        async fn purge_all(&self) -> Result<u64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_scheduler_recovers_from_failed_batch() {
        let prober = Arc::new(BatchProber::new(Arc::new(AlwaysUp), Arc::new(FlakyDatabase::default())));
        let (tx, mut rx) = mpsc::channel(4);
        let scheduler = BatchScheduler::new(prober, tx);

        let handle =
            scheduler.schedule(vec!["http://a.test/".to_string()], Duration::from_millis(20));

        let batch = tokio::time::timeout(Duration::from_secs(3), rx.recv())
            .await
            .expect("Timeout waiting for batch")
            .expect("Channel closed");

        assert_eq!(batch.len(), 1);
        assert!(batch[0].is_up());

        drop(rx);
        tokio::time::timeout(Duration::from_secs(3), handle)
            .await
            .expect("scheduler did not stop")
            .unwrap();
    }

    #[tokio::test]
    async fn test_empty_schedule_returns_immediately() {
        let prober = Arc::new(BatchProber::new(Arc::new(AlwaysUp), Arc::new(FlakyDatabase::default())));
        let (tx, _rx) = mpsc::channel(1);
        let scheduler = BatchScheduler::new(prober, tx);

        let handle = scheduler.schedule(Vec::new(), Duration::from_millis(10));
        tokio::time::timeout(Duration::from_secs(1), handle).await.unwrap().unwrap();
    }
}
