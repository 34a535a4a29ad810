//! Due-activities report: scheduled actions in a date window, flat table.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use parking_lot::Mutex;

use crate::filters::{due_activities_request, FilterState, RequestDescriptor};
use crate::state::AppState;
use crate::types::DueActivity;
use crate::viewmodel::{map_due_activities, DueActivityRow, ViewState};

use super::session::PageSession;
use super::POLLER_IDLE_SECS;

const LOADING_MESSAGE: &str = "Loading activities...";
const EMPTY_MESSAGE: &str = "No due activities found for the selected filters.";

pub struct DueActivitiesPage {
    pub filters: FilterState,
    pub session: PageSession<Vec<DueActivityRow>>,
}

impl DueActivitiesPage {
    /// Mount with the default one-month window.
    pub fn new(today: NaiveDate) -> Self {
        let filters = FilterState::last_month(today);
        let mut session = PageSession::new(LOADING_MESSAGE);
        session.begin(
            &due_activities_request(&filters).cache_key(),
            LOADING_MESSAGE,
        );
        DueActivitiesPage { filters, session }
    }

    pub fn request(&self) -> RequestDescriptor {
        due_activities_request(&self.filters)
    }

    pub fn set_filters(&mut self, filters: FilterState) {
        if self.filters == filters {
            return;
        }
        self.filters = filters;
        self.session
            .begin(&self.request().cache_key(), LOADING_MESSAGE);
    }
}

/// Resolve the due-activities rows for a filter state.
pub async fn load_due_activities(
    state: &AppState,
    filters: &FilterState,
) -> ViewState<Vec<DueActivityRow>> {
    let request = due_activities_request(filters);
    let refresh = state.view_refresh(|v| v.due_activities);

    let value = match super::load_json(state, &request, refresh).await {
        Ok(value) => value,
        Err(e) => {
            log::warn!("due activities load failed: {}", e);
            return ViewState::error(&e);
        }
    };

    match super::decode::<Vec<DueActivity>>(value, request.endpoint) {
        Ok(activities) if activities.is_empty() => ViewState::empty(EMPTY_MESSAGE),
        Ok(activities) => ViewState::Ready {
            data: map_due_activities(activities),
        },
        Err(e) => {
            log::warn!("due activities decode failed: {}", e);
            ViewState::error(&e)
        }
    }
}

/// Load for the page's current filters and apply under the active-key guard.
pub async fn refresh_due_activities(state: &AppState, page: &Mutex<DueActivitiesPage>) {
    let (filters, key) = {
        let page = page.lock();
        (page.filters, page.request().cache_key())
    };
    let next = load_due_activities(state, &filters).await;
    let mut page = page.lock();
    page.session.apply(&key, next);
}

/// Periodic revalidation loop; disabled by default for this one-shot report.
pub async fn run_due_activities_poller(
    state: Arc<AppState>,
    page: Arc<Mutex<DueActivitiesPage>>,
) {
    loop {
        let interval = state.view_refresh(|v| v.due_activities).revalidate_secs;
        if interval == 0 {
            tokio::time::sleep(Duration::from_secs(POLLER_IDLE_SECS)).await;
            continue;
        }
        tokio::time::sleep(Duration::from_secs(interval)).await;
        refresh_due_activities(&state, &page).await;
        log::debug!("due activities revalidated");
    }
}
