// tests/pipeline.rs
// End-to-end: feed -> scheduler -> history -> stats -> snapshot reload

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use roulette_tracker::data::{HistoryStore, SharedHistory, SnapshotFile};
use roulette_tracker::feed::ResultFeed;
use roulette_tracker::ingest::{CycleOutcome, IngestionScheduler};
use roulette_tracker::stats::{hourly_distribution, white_streak_stats, ColorCounts};
use roulette_tracker::time::CivilZone;
use roulette_tracker::{RawGame, Result};

struct ScriptedFeed {
    batches: Mutex<VecDeque<Vec<RawGame>>>,
}

impl ScriptedFeed {
    fn new(batches: Vec<Vec<RawGame>>) -> Self {
        ScriptedFeed {
            batches: Mutex::new(batches.into()),
        }
    }
}

impl ResultFeed for ScriptedFeed {
    async fn fetch_latest(&self) -> Result<Vec<RawGame>> {
        Ok(self.batches.lock().unwrap().pop_front().unwrap_or_default())
    }
}

fn game(id: &str, roll: i64, color: i64, created_at: &str) -> RawGame {
    RawGame {
        id: json!(id),
        roll: json!(roll),
        color: json!(color),
        created_at: json!(created_at),
    }
}

fn at(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

#[tokio::test]
async fn test_full_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("historico.json");

    let white = game("g1", 0, 0, "2024-01-10T01:30:00.000Z"); // 22:30 on Jan 9 locally
    let red = game("g2", 4, 1, "2024-01-10T11:50:10.000Z"); // 08:50 on Jan 10
    let black = game("g3", 11, 2, "2024-01-10T11:59:40.000Z"); // 08:59 on Jan 10

    let feed = ScriptedFeed::new(vec![
        vec![white],
        vec![red.clone()],
        vec![red.clone(), game("g1", 0, 0, "2024-01-10T01:30:00.000Z")],
        vec![black, red],
    ]);

    let shared = SharedHistory::new(HistoryStore::new());
    let zone = CivilZone::default();
    let scheduler = IngestionScheduler::new(
        feed,
        shared.clone(),
        SnapshotFile::new(&path),
        zone,
        4,
        Duration::from_secs(15),
    );

    let now = at("2024-01-10T12:00:30Z"); // 09:00:30 on Jan 10 locally
    let mut outcomes = Vec::new();
    for _ in 0..4 {
        outcomes.push(scheduler.run_cycle(now).await.unwrap());
    }

    assert!(matches!(outcomes[0], CycleOutcome::Ingested { .. }));
    assert!(matches!(outcomes[1], CycleOutcome::Ingested { .. }));
    assert_eq!(outcomes[2], CycleOutcome::Duplicate);
    assert!(matches!(outcomes[3], CycleOutcome::Ingested { .. }));

    let history = shared.snapshot(None).await;
    let ids: Vec<&str> = history.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["g3", "g2", "g1"]);
    assert_eq!(history[2].value, "00");
    assert_eq!(history[2].iso_date, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());

    let streak = white_streak_stats(&history, now, &zone);
    assert_eq!(streak.rounds_since_white, 2);
    assert_eq!(streak.minutes_since_white, 10 * 60 + 30);
    assert_eq!(streak.max_rounds_between_whites, 2);

    let today = hourly_distribution(&history, zone.today(now));
    assert_eq!(today["08"], ColorCounts { red: 1, black: 1, white: 0 });
    assert_eq!(today["22"], ColorCounts::default());

    let yesterday = hourly_distribution(&history, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap());
    assert_eq!(yesterday["22"], ColorCounts { red: 0, black: 0, white: 1 });

    // A restart rehydrates exactly what was in memory
    let reloaded = SnapshotFile::new(&path).load_history().await;
    assert_eq!(reloaded.snapshot(None), history);
}

#[tokio::test]
async fn test_retention_window_moves_with_civil_date() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("historico.json");

    let feed = ScriptedFeed::new(vec![
        vec![game("d1", 1, 1, "2024-01-01T15:00:00Z")],
        vec![game("d5", 2, 2, "2024-01-05T15:00:00Z")],
        vec![game("d6", 3, 1, "2024-01-06T02:59:00Z")], // still Jan 5 locally
    ]);

    let shared = SharedHistory::new(HistoryStore::new());
    let scheduler = IngestionScheduler::new(
        feed,
        shared.clone(),
        SnapshotFile::new(&path),
        CivilZone::default(),
        4,
        Duration::from_secs(15),
    );

    scheduler.run_cycle(at("2024-01-01T15:00:30Z")).await.unwrap();
    // Jan 5 locally: cutoff Jan 1, d1 survives
    scheduler.run_cycle(at("2024-01-05T15:00:30Z")).await.unwrap();
    assert_eq!(shared.len().await, 2);

    // 03:00 UTC on Jan 6 is midnight locally: cutoff Jan 2, d1 expires
    let outcome = scheduler.run_cycle(at("2024-01-06T03:00:00Z")).await.unwrap();
    assert!(matches!(outcome, CycleOutcome::Ingested { pruned: 1, .. }));

    let ids: Vec<String> = shared.snapshot(None).await.into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["d6", "d5"]);
}
