/// Fixed-interval ingestion: fetch -> normalize -> ingest -> prune -> persist
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::data::{SharedHistory, SnapshotFile};
use crate::error::{Result, TrackerError};
use crate::feed::{normalize, ResultFeed};
use crate::time::CivilZone;
use crate::types::RouletteResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Fetching,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new result was stored and the snapshot rewritten
    Ingested { result: RouletteResult, pruned: usize },
    /// The feed's latest result is already the head of the history
    Duplicate,
    /// Another cycle was still in flight; nothing was done
    Busy,
}

/// Resets the scheduler to `Idle` on every exit path of a cycle
struct FetchGuard<'a>(&'a AtomicBool);

impl Drop for FetchGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sole writer of the history
pub struct IngestionScheduler<F: ResultFeed> {
    feed: F,
    history: SharedHistory,
    snapshot: SnapshotFile,
    zone: CivilZone,
    retention_days: u32,
    interval: Duration,
    fetching: AtomicBool,
}

impl<F: ResultFeed + 'static> IngestionScheduler<F> {
    pub fn new(
        feed: F,
        history: SharedHistory,
        snapshot: SnapshotFile,
        zone: CivilZone,
        retention_days: u32,
        interval: Duration,
    ) -> Self {
        IngestionScheduler {
            feed,
            history,
            snapshot,
            zone,
            retention_days,
            interval,
            fetching: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.fetching.load(Ordering::Acquire) {
            SchedulerState::Fetching
        } else {
            SchedulerState::Idle
        }
    }

    fn try_begin(&self) -> Option<FetchGuard<'_>> {
        self.fetching
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FetchGuard(&self.fetching))
    }

    /// Run one ingestion cycle as of `now`.
    ///
    /// Ingest and prune are applied together under one write lock. A
    /// persistence failure is reported after the in-memory history has
    /// already been updated.
    pub async fn run_cycle(&self, now: DateTime<Utc>) -> Result<CycleOutcome> {
        let Some(_guard) = self.try_begin() else {
            debug!("Previous cycle still running, skipping tick");
            return Ok(CycleOutcome::Busy);
        };

        let games = self.feed.fetch_latest().await.map_err(|e| match e {
            unavailable @ TrackerError::FeedUnavailable(_) => unavailable,
            other => TrackerError::FeedUnavailable(other.to_string()),
        })?;

        let latest = games
            .first()
            .ok_or_else(|| TrackerError::FeedUnavailable("Feed returned no games".to_string()))?;

        let result = normalize(latest, &self.zone)?;
        let cutoff = self.zone.retention_cutoff(now, self.retention_days);

        let report = self.history.ingest_and_prune(result.clone(), cutoff).await;
        if !report.accepted {
            debug!("Latest result {} already stored", result.id);
            return Ok(CycleOutcome::Duplicate);
        }

        info!(
            id = %result.id,
            color = result.color.as_str(),
            pruned = report.pruned,
            "New result added: {} Date: {}",
            result.timestamp.format("%H:%M"),
            result.iso_date
        );

        let persisted = self
            .history
            .serialize()
            .await
            .map_err(|e| TrackerError::PersistenceFailure(e.to_string()))?;
        self.snapshot.save(&persisted).await?;

        Ok(CycleOutcome::Ingested {
            result,
            pruned: report.pruned,
        })
    }

    /// Run one cycle now, logging instead of returning errors
    pub async fn tick(&self) -> Option<CycleOutcome> {
        match self.run_cycle(Utc::now()).await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                if e.is_transient() {
                    warn!(code = e.error_code(), "Ingestion cycle skipped: {}", e);
                } else {
                    error!(code = e.error_code(), "Ingestion cycle failed: {}", e);
                }
                None
            }
        }
    }

    /// Tick every `interval` until `shutdown` flips. Each cycle runs on its
    /// own task so a slow fetch never delays the timer; overlapping ticks
    /// are dropped by the state check in `run_cycle`. Returns only after
    /// every in-flight cycle has finished, so a stored result is always
    /// persisted before shutdown completes.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            "Ingestion scheduler started: every {}s, keeping {} days",
            self.interval.as_secs(),
            self.retention_days
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut cycles = JoinSet::new();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    // Reap finished cycles
                    while cycles.try_join_next().is_some() {}

                    let scheduler = Arc::clone(&self);
                    cycles.spawn(async move {
                        scheduler.tick().await;
                    });
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        info!("Ingestion scheduler stopping");
                        break;
                    }
                }
            }
        }

        if !cycles.is_empty() {
            info!("Waiting for {} in-flight cycle(s)", cycles.len());
        }
        while let Some(joined) = cycles.join_next().await {
            if let Err(e) = joined {
                error!("Ingestion cycle task failed: {}", e);
            }
        }
        info!("Ingestion scheduler stopped");
    }
}
