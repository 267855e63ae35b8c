/// Read-only handlers over the result history
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{Result, TrackerError};
use crate::server::AppState;
use crate::stats::{hourly_distribution, white_streak_stats, HourlyDistribution, WhiteStreakStats};
use crate::types::RouletteResult;

/// GET /api/results - most recent results, newest first
#[instrument(skip(state))]
pub async fn results_handler(State(state): State<AppState>) -> Json<Vec<RouletteResult>> {
    let results = state.history.snapshot(Some(state.results_limit)).await;
    debug!("Returning {} results", results.len());
    Json(results)
}

/// GET /api/stats - white streak statistics
#[instrument(skip(state))]
pub async fn stats_handler(State(state): State<AppState>) -> Json<WhiteStreakStats> {
    let history = state.history.snapshot(None).await;
    Json(white_streak_stats(&history, Utc::now(), &state.zone))
}

/// Query parameters for /api/hourly-stats
#[derive(Debug, Deserialize)]
pub struct HourlyQuery {
    pub date: Option<String>,
}

/// GET /api/hourly-stats?date=YYYY-MM-DD - color counts per hour
#[instrument(skip(state))]
pub async fn hourly_stats_handler(
    State(state): State<AppState>,
    Query(params): Query<HourlyQuery>,
) -> Response {
    let date = match parse_date_param(params.date.as_deref()) {
        Ok(Some(date)) => date,
        Ok(None) => state.zone.today(Utc::now()),
        Err(e) => {
            debug!("Rejected hourly-stats query: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "code": e.error_code(),
                })),
            )
                .into_response();
        }
    };

    let history = state.history.snapshot(None).await;
    let distribution: HourlyDistribution = hourly_distribution(&history, date);
    (StatusCode::OK, Json(distribution)).into_response()
}

/// Absent or blank means "today"
fn parse_date_param(raw: Option<&str>) -> Result<Option<NaiveDate>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                TrackerError::InvalidParameter(format!("date '{}', expected YYYY-MM-DD", raw))
            }),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub history_size: usize,
    pub last_result_id: Option<String>,
}

/// GET /api/health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        history_size: state.history.len().await,
        last_result_id: state.history.head().await.map(|r| r.id),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{HistoryStore, SharedHistory};
    use crate::time::CivilZone;
    use crate::types::Color;
    use chrono::NaiveTime;

    fn state_with(entries: Vec<RouletteResult>, results_limit: usize) -> AppState {
        AppState {
            history: SharedHistory::new(HistoryStore::from_entries(entries)),
            zone: CivilZone::default(),
            results_limit,
        }
    }

    fn entry(id: usize, color: Color, date: NaiveDate, hour: u32) -> RouletteResult {
        RouletteResult {
            id: id.to_string(),
            value: "12".to_string(),
            color,
            timestamp: NaiveTime::from_hms_opt(hour, 15, 0).unwrap(),
            iso_date: date,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_results_are_capped() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let entries = (0..20).rev().map(|i| entry(i, Color::Red, date, 10)).collect();

        let Json(results) = results_handler(State(state_with(entries, 5))).await;
        assert_eq!(results.len(), 5);
        assert_eq!(results[0].id, "19");
    }

    #[tokio::test]
    async fn test_stats_on_empty_history() {
        let Json(stats) = stats_handler(State(state_with(Vec::new(), 500))).await;
        assert_eq!(stats, WhiteStreakStats::default());
    }

    #[tokio::test]
    async fn test_hourly_stats_for_requested_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let other = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let state = state_with(
            vec![
                entry(3, Color::White, date, 9),
                entry(2, Color::Red, date, 9),
                entry(1, Color::Black, other, 9),
            ],
            500,
        );

        let query = HourlyQuery { date: Some("2024-01-01".to_string()) };
        let response = hourly_stats_handler(State(state), Query(query)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json.as_object().unwrap().len(), 24);
        assert_eq!(json["09"], serde_json::json!({"red": 1, "black": 0, "white": 1}));
    }

    #[tokio::test]
    async fn test_hourly_stats_defaults_to_today() {
        let state = state_with(Vec::new(), 500);
        let today = state.zone.today(Utc::now());
        state
            .history
            .ingest_and_prune(entry(1, Color::Red, today, 0), today)
            .await;

        let response = hourly_stats_handler(State(state), Query(HourlyQuery { date: None })).await;
        let json = body_json(response).await;
        assert_eq!(json["00"]["red"], 1);
    }

    #[tokio::test]
    async fn test_hourly_stats_rejects_malformed_date() {
        let state = state_with(Vec::new(), 500);
        let query = HourlyQuery { date: Some("01/02/2024".to_string()) };

        let response = hourly_stats_handler(State(state), Query(query)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["code"], "REQ_001");
        assert!(json["error"].as_str().unwrap().contains("01/02/2024"));
    }

    #[test]
    fn test_date_param_parsing() {
        assert_eq!(parse_date_param(None).unwrap(), None);
        assert_eq!(parse_date_param(Some("  ")).unwrap(), None);
        assert_eq!(
            parse_date_param(Some("2024-02-29")).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        for bad in ["2024-02-30", "2024/01/01", "today"] {
            assert!(matches!(
                parse_date_param(Some(bad)),
                Err(TrackerError::InvalidParameter(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_health_reports_head() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let state = state_with(vec![entry(7, Color::Red, date, 1), entry(6, Color::Red, date, 1)], 500);

        let Json(health) = health_handler(State(state)).await;
        assert_eq!(health.history_size, 2);
        assert_eq!(health.last_result_id.as_deref(), Some("7"));
    }
}
