//! Weekly deal report: summary cards plus the expandable detail table.
//!
//! The page owns its filter state and per-row expansion state. Changing a
//! filter produces a new cache key (and therefore a fresh fetch); toggling a
//! row only reveals activities already embedded in the cached deals.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::filters::{weekly_report_request, FilterState, RequestDescriptor};
use crate::rows::ExpandableRows;
use crate::state::AppState;
use crate::types::WeeklyReportPayload;
use crate::viewmodel::{map_weekly_report, ViewState, WeeklyReportView};

use super::session::PageSession;
use super::POLLER_IDLE_SECS;

const LOADING_MESSAGE: &str = "Loading report...";
const EMPTY_MESSAGE: &str = "No deals created in the selected period.";

pub struct WeeklyReportPage {
    pub filters: FilterState,
    pub rows: ExpandableRows,
    pub session: PageSession<WeeklyReportView>,
}

impl WeeklyReportPage {
    /// Mount with the default trailing-seven-day window.
    pub fn new(today: NaiveDate) -> Self {
        let filters = FilterState::last_week(today);
        let mut session = PageSession::new(LOADING_MESSAGE);
        session.begin(&weekly_report_request(&filters).cache_key(), LOADING_MESSAGE);
        WeeklyReportPage {
            filters,
            rows: ExpandableRows::new(),
            session,
        }
    }

    pub fn request(&self) -> RequestDescriptor {
        weekly_report_request(&self.filters)
    }

    /// Replace the filter state. The new key supersedes any in-flight load
    /// and the row set it belonged to, so expansion state resets.
    pub fn set_filters(&mut self, filters: FilterState) {
        if self.filters == filters {
            return;
        }
        self.filters = filters;
        self.rows.collapse_all();
        self.session
            .begin(&self.request().cache_key(), LOADING_MESSAGE);
    }

    /// Toggle one deal row's expansion. Pure local state — no I/O.
    pub fn toggle_row(&mut self, deal_id: i64) -> bool {
        self.rows.toggle(deal_id)
    }
}

/// Resolve the weekly report for a filter state through the shared cache.
pub async fn load_weekly_report(
    state: &AppState,
    filters: &FilterState,
) -> ViewState<WeeklyReportView> {
    let request = weekly_report_request(filters);
    let refresh = state.view_refresh(|v| v.weekly_report);

    let value = match super::load_json(state, &request, refresh).await {
        Ok(value) => value,
        Err(e) => {
            log::warn!("weekly report load failed: {}", e);
            return ViewState::error(&e);
        }
    };

    match super::decode::<WeeklyReportPayload>(value, request.endpoint) {
        Ok(payload) if payload.deals.is_empty() => ViewState::empty(EMPTY_MESSAGE),
        Ok(payload) => ViewState::Ready {
            data: map_weekly_report(payload),
        },
        Err(e) => {
            log::warn!("weekly report decode failed: {}", e);
            ViewState::error(&e)
        }
    }
}

/// Load for the page's current filters and apply under the active-key guard.
pub async fn refresh_weekly_report(state: &AppState, page: &Mutex<WeeklyReportPage>) {
    let (filters, key) = {
        let page = page.lock();
        (page.filters, page.request().cache_key())
    };
    let next = load_weekly_report(state, &filters).await;
    let mut page = page.lock();
    page.session.apply(&key, next);
}

/// Periodic revalidation loop; disabled by default for this one-shot report.
pub async fn run_weekly_report_poller(state: Arc<AppState>, page: Arc<Mutex<WeeklyReportPage>>) {
    loop {
        let interval = state.view_refresh(|v| v.weekly_report).revalidate_secs;
        if interval == 0 {
            tokio::time::sleep(Duration::from_secs(POLLER_IDLE_SECS)).await;
            continue;
        }
        tokio::time::sleep(Duration::from_secs(interval)).await;
        refresh_weekly_report(&state, &page).await;
        log::debug!("weekly report revalidated");
    }
}
