//! Wire payload types for the aggregation API.
//!
//! These mirror the server's JSON exactly and carry no display logic; the
//! `viewmodel` module projects them into render-ready shapes. The dashboard
//! endpoint speaks camelCase, the report endpoints snake_case — the serde
//! attributes follow the wire, not taste.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /api/dashboard-data
// ---------------------------------------------------------------------------

/// Aggregate snapshot behind the main scorecard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPayload {
    pub kpis: KpiData,
    /// Ranked by points descending; rank is the array position.
    #[serde(default)]
    pub leaderboard: Vec<LeaderboardRep>,
    /// Chronological weekly series.
    #[serde(default)]
    pub points_over_time: Vec<WeeklyPoints>,
    /// Most-recent-first feed.
    #[serde(default)]
    pub recent_activity: Vec<FeedItem>,
    pub sales_health: SalesHealth,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiData {
    pub total_points: f64,
    pub quarterly_target: f64,
    pub deals_in_pipeline: i64,
    pub avg_speed_to_close: f64,
    pub quarter_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRep {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub points: f64,
    pub deals_won: i64,
    #[serde(default)]
    pub on_streak: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyPoints {
    pub week: String,
    pub points: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: i64,
    /// One of `win`, `stage`, `bonus`; anything else renders as `stage`.
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesHealth {
    pub lead_to_contacted_same_day: f64,
    pub qual_to_design_fee: f64,
    pub design_fee_compliance: f64,
    pub proposal_to_close: f64,
    #[serde(default)]
    pub top_loss_reasons: Vec<LossReason>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LossReason {
    pub reason: String,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// /api/weekly-report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyReportPayload {
    pub summary: ReportSummary,
    #[serde(default)]
    pub deals: Vec<WeeklyDeal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_deals_created: i64,
    #[serde(default)]
    pub stage_breakdown: Vec<StageSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageSummary {
    pub stage_name: String,
    pub deal_count: i64,
}

/// One created deal, with its recent activities fully embedded —
/// expanding a row in the detail table never issues a new fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyDeal {
    pub id: i64,
    pub title: String,
    pub owner_name: String,
    pub owner_id: i64,
    pub stage_name: String,
    /// Pre-formatted currency string from the server.
    pub value: String,
    pub stage_age_days: i64,
    pub is_stuck: bool,
    /// Opaque reason supplied by the upstream classifier.
    #[serde(default)]
    pub stuck_reason: String,
    #[serde(default)]
    pub last_activity_formatted: String,
    #[serde(default)]
    pub activities: Vec<ActivityDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDetail {
    pub id: i64,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub done: bool,
    pub add_time: String,
    pub owner_name: String,
}

// ---------------------------------------------------------------------------
// /api/due-activities
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueActivity {
    pub id: i64,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub due_date: String,
    pub owner_name: String,
    #[serde(default)]
    pub deal_id: Option<i64>,
    #[serde(default)]
    pub deal_title: Option<String>,
    pub is_overdue: bool,
}

// ---------------------------------------------------------------------------
// /api/users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesUser {
    pub id: i64,
    pub name: String,
}
