//! Main scorecard view: quarterly KPIs, leaderboard, weekly points trend,
//! recent activity, and funnel health. Unfiltered — the dashboard endpoint
//! takes no parameters.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::filters::dashboard_request;
use crate::state::AppState;
use crate::types::DashboardPayload;
use crate::viewmodel::{map_dashboard, ScorecardView, ViewState};

use super::session::PageSession;
use super::POLLER_IDLE_SECS;

const LOADING_MESSAGE: &str = "Loading dashboard...";
const NO_DATA_MESSAGE: &str = "No data available.";

pub struct ScorecardPage {
    pub session: PageSession<ScorecardView>,
}

impl ScorecardPage {
    pub fn new() -> Self {
        let mut session = PageSession::new(LOADING_MESSAGE);
        session.begin(&dashboard_request().cache_key(), LOADING_MESSAGE);
        ScorecardPage { session }
    }
}

impl Default for ScorecardPage {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve the scorecard view through the shared cache.
pub async fn load_scorecard(state: &AppState) -> ViewState<ScorecardView> {
    let request = dashboard_request();
    let refresh = state.view_refresh(|v| v.scorecard);

    let value = match super::load_json(state, &request, refresh).await {
        Ok(value) => value,
        Err(e) => {
            log::warn!("scorecard load failed: {}", e);
            return ViewState::error(&e);
        }
    };

    if value.is_null() {
        return ViewState::empty(NO_DATA_MESSAGE);
    }

    match super::decode::<DashboardPayload>(value, request.endpoint) {
        Ok(payload) => ViewState::Ready {
            data: map_dashboard(payload),
        },
        Err(e) => {
            log::warn!("scorecard decode failed: {}", e);
            ViewState::error(&e)
        }
    }
}

/// Load and apply, honoring the page's active key.
pub async fn refresh_scorecard(state: &AppState, page: &Mutex<ScorecardPage>) {
    let key = dashboard_request().cache_key();
    let next = load_scorecard(state).await;
    let mut page = page.lock();
    page.session.apply(&key, next);
}

/// Periodic revalidation loop for the scorecard.
///
/// Reads the interval from config on every cycle; revalidation never blocks
/// rendering — the page keeps showing its last-known-good snapshot until the
/// refreshed value swaps in.
pub async fn run_scorecard_poller(state: Arc<AppState>, page: Arc<Mutex<ScorecardPage>>) {
    loop {
        let interval = state.view_refresh(|v| v.scorecard).revalidate_secs;
        if interval == 0 {
            tokio::time::sleep(Duration::from_secs(POLLER_IDLE_SECS)).await;
            continue;
        }
        tokio::time::sleep(Duration::from_secs(interval)).await;

        refresh_scorecard(&state, &page).await;
        log::debug!("scorecard revalidated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::FetchError;
    use crate::views::testing::StubLoader;
    use serde_json::json;

    fn dashboard_body() -> serde_json::Value {
        json!({
            "kpis": {
                "totalPoints": 2000.0,
                "quarterlyTarget": 4000.0,
                "dealsInPipeline": 8,
                "avgSpeedToClose": 21.0,
                "quarterName": "Q1 2025"
            },
            "leaderboard": [
                { "id": 1, "name": "Dana", "avatar": "", "points": 1200.0, "dealsWon": 2, "onStreak": true }
            ],
            "pointsOverTime": [ { "week": "W1", "points": 500.0 } ],
            "recentActivity": [
                { "id": 3, "type": "win", "text": "Dana won Villa renovation", "time": "2h ago" }
            ],
            "salesHealth": {
                "leadToContactedSameDay": 60.0,
                "qualToDesignFee": 40.0,
                "designFeeCompliance": 90.0,
                "proposalToClose": 25.0,
                "topLossReasons": [ { "reason": "Price", "value": 50.0 } ]
            }
        })
    }

    fn state_with(loader: StubLoader) -> (AppState, Arc<StubLoader>) {
        let loader = Arc::new(loader);
        let state = AppState::with_loader(
            Config::with_base_url("https://api.example.com"),
            loader.clone(),
        );
        (state, loader)
    }

    #[tokio::test]
    async fn test_ready_state_with_mapped_view() {
        let (state, _) = state_with(
            StubLoader::new().respond("/api/dashboard-data", dashboard_body()),
        );

        let view = load_scorecard(&state).await;
        match view {
            ViewState::Ready { data } => {
                assert_eq!(data.quota_attainment, "50.0");
                assert_eq!(data.leaderboard[0].rank, 1);
                assert_eq!(data.points_over_time.len(), 1);
            }
            other => panic!("expected Ready, got {:?}", serde_json::to_string(&other)),
        }
    }

    #[tokio::test]
    async fn test_network_failure_surfaces_error_state() {
        let (state, _) = state_with(StubLoader::new().fail(
            "/api/dashboard-data",
            FetchError::Network("connection refused".into()),
        ));

        let view = load_scorecard(&state).await;
        assert!(matches!(view, ViewState::Error { .. }));
    }

    #[tokio::test]
    async fn test_schema_violation_is_malformed() {
        let (state, _) = state_with(
            StubLoader::new().respond("/api/dashboard-data", serde_json::json!({ "bogus": 1 })),
        );

        let view = load_scorecard(&state).await;
        match view {
            ViewState::Error { error } => {
                assert_eq!(error.kind, crate::error::ErrorKind::Malformed)
            }
            _ => panic!("expected Error"),
        }
    }

    #[tokio::test]
    async fn test_null_body_renders_no_data() {
        let (state, _) = state_with(
            StubLoader::new().respond("/api/dashboard-data", serde_json::Value::Null),
        );

        let view = load_scorecard(&state).await;
        assert!(matches!(view, ViewState::Empty { .. }));
    }

    #[tokio::test]
    async fn test_fresh_cache_skips_second_network_call() {
        let (state, stub) = state_with(
            StubLoader::new().respond("/api/dashboard-data", dashboard_body()),
        );

        let first = load_scorecard(&state).await;
        let second = load_scorecard(&state).await;
        assert!(first.is_ready());
        assert!(second.is_ready());
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_refresh_applies_to_page_session() {
        let (state, _) = state_with(
            StubLoader::new().respond("/api/dashboard-data", dashboard_body()),
        );
        let page = Mutex::new(ScorecardPage::new());
        assert!(matches!(
            page.lock().session.current(),
            ViewState::Loading { .. }
        ));

        refresh_scorecard(&state, &page).await;
        assert!(page.lock().session.current().is_ready());
    }
}
