//! Report filter state and canonical request descriptors.
//!
//! A `FilterState` is the only input a report view takes: a calendar date
//! range plus an optional salesperson. Building a `RequestDescriptor` from it
//! is deterministic — equal filter states always produce byte-identical
//! cache keys, which is what makes request de-duplication and freshness
//! checks work across independently constructed pages.

use chrono::NaiveDate;

/// Endpoint paths on the aggregation API.
pub const DASHBOARD_ENDPOINT: &str = "/api/dashboard-data";
pub const WEEKLY_REPORT_ENDPOINT: &str = "/api/weekly-report";
pub const DUE_ACTIVITIES_ENDPOINT: &str = "/api/due-activities";
pub const USERS_ENDPOINT: &str = "/api/users";

/// Salesperson filter: all reps, or one rep by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerFilter {
    All,
    Owner(i64),
}

impl Default for OwnerFilter {
    fn default() -> Self {
        OwnerFilter::All
    }
}

/// Current report parameters for a filterable view.
///
/// Dates are calendar dates with no time component. `start_date <= end_date`
/// is expected but deliberately not enforced here — a reversed range is
/// forwarded to the API unchanged and the server decides what it means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterState {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub owner: OwnerFilter,
}

impl FilterState {
    /// Default weekly-report window: the trailing seven days (today-6 … today).
    pub fn last_week(today: NaiveDate) -> Self {
        FilterState {
            start_date: today - chrono::Duration::days(6),
            end_date: today,
            owner: OwnerFilter::All,
        }
    }

    /// Default due-activities window: one month ago … today.
    pub fn last_month(today: NaiveDate) -> Self {
        FilterState {
            start_date: today
                .checked_sub_months(chrono::Months::new(1))
                .unwrap_or(today),
            end_date: today,
            owner: OwnerFilter::All,
        }
    }
}

/// A canonical request: endpoint plus ordered query parameters.
///
/// Two descriptors are equal iff the endpoint and the fully expanded query
/// string are byte-identical, so `cache_key()` doubles as the cache identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub endpoint: &'static str,
    pub params: Vec<(&'static str, String)>,
}

impl RequestDescriptor {
    fn bare(endpoint: &'static str) -> Self {
        RequestDescriptor {
            endpoint,
            params: Vec::new(),
        }
    }

    /// The stable string identity of this request, used as the cache key.
    pub fn cache_key(&self) -> String {
        if self.params.is_empty() {
            return self.endpoint.to_string();
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        format!("{}?{}", self.endpoint, query.join("&"))
    }
}

/// Build the scorecard request. Takes no parameters.
pub fn dashboard_request() -> RequestDescriptor {
    RequestDescriptor::bare(DASHBOARD_ENDPOINT)
}

/// Build the salesperson-lookup request. Takes no parameters.
pub fn users_request() -> RequestDescriptor {
    RequestDescriptor::bare(USERS_ENDPOINT)
}

/// Build the weekly deal report request for a filter state.
pub fn weekly_report_request(filters: &FilterState) -> RequestDescriptor {
    filtered_request(WEEKLY_REPORT_ENDPOINT, filters)
}

/// Build the due-activities request for a filter state.
pub fn due_activities_request(filters: &FilterState) -> RequestDescriptor {
    filtered_request(DUE_ACTIVITIES_ENDPOINT, filters)
}

/// Parameter order is fixed: start_date, end_date, then user_id.
///
/// `OwnerFilter::All` emits no user_id parameter at all — no sentinel value.
/// This keeps the cache key for "everyone" stable no matter how the filter
/// state was constructed.
fn filtered_request(endpoint: &'static str, filters: &FilterState) -> RequestDescriptor {
    let mut params: Vec<(&'static str, String)> = vec![
        ("start_date", filters.start_date.format("%Y-%m-%d").to_string()),
        ("end_date", filters.end_date.format("%Y-%m-%d").to_string()),
    ];
    if let OwnerFilter::Owner(id) = filters.owner {
        params.push(("user_id", id.to_string()));
    }
    RequestDescriptor { endpoint, params }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_builder_is_deterministic() {
        let filters = FilterState {
            start_date: date("2025-03-10"),
            end_date: date("2025-03-17"),
            owner: OwnerFilter::Owner(42),
        };
        assert_eq!(
            weekly_report_request(&filters),
            weekly_report_request(&filters)
        );
        assert_eq!(
            weekly_report_request(&filters).cache_key(),
            "/api/weekly-report?start_date=2025-03-10&end_date=2025-03-17&user_id=42"
        );
    }

    #[test]
    fn test_all_owner_omits_user_id() {
        let filters = FilterState {
            start_date: date("2025-01-01"),
            end_date: date("2025-01-07"),
            owner: OwnerFilter::All,
        };
        let request = weekly_report_request(&filters);
        assert!(request.params.iter().all(|(k, _)| *k != "user_id"));
        assert_eq!(
            request.cache_key(),
            "/api/weekly-report?start_date=2025-01-01&end_date=2025-01-07"
        );
    }

    #[test]
    fn test_independently_built_states_share_a_key() {
        let a = FilterState {
            start_date: date("2025-01-01"),
            end_date: date("2025-01-07"),
            owner: OwnerFilter::All,
        };
        let b = FilterState {
            start_date: date("2025-01-01"),
            end_date: date("2025-01-07"),
            owner: OwnerFilter::All,
        };
        assert_eq!(
            weekly_report_request(&a).cache_key(),
            weekly_report_request(&b).cache_key()
        );
    }

    #[test]
    fn test_reversed_range_is_forwarded_unchanged() {
        // Caller responsibility: no validation, no normalization.
        let filters = FilterState {
            start_date: date("2025-02-10"),
            end_date: date("2025-02-01"),
            owner: OwnerFilter::All,
        };
        assert_eq!(
            due_activities_request(&filters).cache_key(),
            "/api/due-activities?start_date=2025-02-10&end_date=2025-02-01"
        );
    }

    #[test]
    fn test_bare_endpoints_have_no_query() {
        assert_eq!(dashboard_request().cache_key(), "/api/dashboard-data");
        assert_eq!(users_request().cache_key(), "/api/users");
    }

    #[test]
    fn test_default_windows() {
        let today = date("2025-06-15");
        let week = FilterState::last_week(today);
        assert_eq!(week.start_date, date("2025-06-09"));
        assert_eq!(week.end_date, today);
        assert_eq!(week.owner, OwnerFilter::All);

        let month = FilterState::last_month(today);
        assert_eq!(month.start_date, date("2025-05-15"));
        assert_eq!(month.end_date, today);
    }
}
