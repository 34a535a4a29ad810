//! Pure projections from wire payloads to display-ready view models.
//!
//! Nothing here performs I/O or classification: stuck and overdue flags are
//! pass-throughs of server booleans, and the only arithmetic is display
//! formatting (quota percentage, thousands separators, date labels).

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{FetchError, ViewError};
use crate::types::{
    DashboardPayload, DueActivity, LossReason, StageSummary, WeeklyPoints, WeeklyReportPayload,
};

/// How many loss reasons the scorecard shows.
const TOP_LOSS_REASONS: usize = 3;

// ---------------------------------------------------------------------------
// View state
// ---------------------------------------------------------------------------

/// Exhaustive per-view render state.
///
/// Exactly one of these holds at a time. The three user-facing messages
/// (loading, failed, no records) are distinct and must never be conflated.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ViewState<T> {
    Loading { message: String },
    Error { error: ViewError },
    Empty { message: String },
    Ready { data: T },
}

impl<T> ViewState<T> {
    pub fn loading(message: &str) -> Self {
        ViewState::Loading {
            message: message.to_string(),
        }
    }

    pub fn error(err: &FetchError) -> Self {
        ViewState::Error { error: err.into() }
    }

    pub fn empty(message: &str) -> Self {
        ViewState::Empty {
            message: message.to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready { .. })
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Quota attainment as a one-decimal percentage string.
///
/// Division-by-zero guarded; not clamped above 100.
pub fn quota_attainment(total: f64, target: f64) -> String {
    if target > 0.0 {
        format!("{:.1}", total / target * 100.0)
    } else {
        "0.0".to_string()
    }
}

/// Integer part with thousands separators: 12345.0 → "12,345".
pub fn format_thousands(value: f64) -> String {
    let negative = value < 0.0;
    let digits = format!("{}", value.abs().trunc() as i64);
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if negative {
        format!("-{}", out)
    } else {
        out
    }
}

/// Render a raw percentage number, trimming a trailing `.0`.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}%", value as i64)
    } else {
        format!("{}%", value)
    }
}

/// Format a `YYYY-MM-DD` calendar date as `M/D/YYYY`.
///
/// Parsed as a calendar date, never through a timestamp — a pure date string
/// is anchored at local midnight, so no timezone conversion can shift it by
/// a day. Unparseable input is shown verbatim.
pub fn format_calendar_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(d) => format!("{}/{}/{}", d.format("%-m"), d.format("%-d"), d.format("%Y")),
        Err(_) => date.to_string(),
    }
}

/// Format the date part of a server datetime as `M/D/YYYY`.
pub fn format_datetime_date(datetime: &str) -> String {
    let parsed = NaiveDateTime::parse_from_str(datetime, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M:%S"));
    match parsed {
        Ok(dt) => format_calendar_date(&dt.date().format("%Y-%m-%d").to_string()),
        // Fall back to the date prefix for RFC 3339-ish strings.
        Err(_) => match datetime.get(..10) {
            Some(prefix) if prefix.len() == 10 => format_calendar_date(prefix),
            _ => datetime.to_string(),
        },
    }
}

/// Activity icon classification — presentation only, no recomputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Call,
    Email,
    Task,
    Other,
}

impl ActivityKind {
    pub fn from_wire(kind: &str) -> Self {
        match kind {
            "call" => ActivityKind::Call,
            "email" => ActivityKind::Email,
            "task" => ActivityKind::Task,
            _ => ActivityKind::Other,
        }
    }
}

/// Feed entry classification for the recent-activity list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedKind {
    Win,
    Stage,
    Bonus,
}

impl FeedKind {
    /// Unknown types render with the default `stage` treatment.
    pub fn from_wire(kind: &str) -> Self {
        match kind {
            "win" => FeedKind::Win,
            "bonus" => FeedKind::Bonus,
            _ => FeedKind::Stage,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorecard view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorecardView {
    pub quarter_label: String,
    pub total_points: String,
    pub quarterly_target: String,
    pub deals_in_pipeline: i64,
    pub avg_speed_to_close: String,
    pub quota_attainment: String,
    pub leaderboard: Vec<LeaderboardRow>,
    /// Already-shaped time series, handed to charting as-is.
    pub points_over_time: Vec<WeeklyPoints>,
    pub recent_activity: Vec<FeedRow>,
    pub health: HealthView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardRow {
    /// 1-based; rank is the array position, the server orders by points.
    pub rank: usize,
    pub id: i64,
    pub name: String,
    pub avatar: String,
    pub points: String,
    pub deals_won_label: String,
    pub on_streak: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRow {
    pub id: i64,
    pub kind: FeedKind,
    pub text: String,
    pub time: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthView {
    pub same_day_contact: String,
    pub qual_to_design_fee: String,
    pub fee_compliance: String,
    pub proposal_to_close: String,
    pub top_loss_reasons: Vec<LossReasonRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LossReasonRow {
    pub reason: String,
    pub share: String,
}

/// Project the dashboard snapshot into the scorecard view.
pub fn map_dashboard(payload: DashboardPayload) -> ScorecardView {
    let kpis = &payload.kpis;
    let health = &payload.sales_health;

    let leaderboard = payload
        .leaderboard
        .iter()
        .enumerate()
        .map(|(i, rep)| LeaderboardRow {
            rank: i + 1,
            id: rep.id,
            name: rep.name.clone(),
            avatar: rep.avatar.clone(),
            points: format_thousands(rep.points),
            deals_won_label: format!(
                "{} deal{} won",
                rep.deals_won,
                if rep.deals_won == 1 { "" } else { "s" }
            ),
            on_streak: rep.on_streak,
        })
        .collect();

    let recent_activity = payload
        .recent_activity
        .iter()
        .map(|item| FeedRow {
            id: item.id,
            kind: FeedKind::from_wire(&item.kind),
            text: item.text.clone(),
            time: item.time.clone(),
        })
        .collect();

    let top_loss_reasons = health
        .top_loss_reasons
        .iter()
        .take(TOP_LOSS_REASONS)
        .map(|LossReason { reason, value }| LossReasonRow {
            reason: reason.clone(),
            share: format_percent(*value),
        })
        .collect();

    ScorecardView {
        quarter_label: format!("{} Performance Overview", kpis.quarter_name),
        total_points: format_thousands(kpis.total_points),
        quarterly_target: format_thousands(kpis.quarterly_target),
        deals_in_pipeline: kpis.deals_in_pipeline,
        avg_speed_to_close: format!("{} days", kpis.avg_speed_to_close),
        quota_attainment: quota_attainment(kpis.total_points, kpis.quarterly_target),
        leaderboard,
        points_over_time: payload.points_over_time,
        recent_activity,
        health: HealthView {
            same_day_contact: format_percent(health.lead_to_contacted_same_day),
            qual_to_design_fee: format_percent(health.qual_to_design_fee),
            fee_compliance: format_percent(health.design_fee_compliance),
            proposal_to_close: format_percent(health.proposal_to_close),
            top_loss_reasons,
        },
    }
}

// ---------------------------------------------------------------------------
// Weekly report view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportView {
    pub total_deals_created: i64,
    pub stage_breakdown: Vec<StageSummary>,
    pub deals: Vec<DealRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealRow {
    pub id: i64,
    pub title: String,
    pub owner_name: String,
    pub stage_name: String,
    pub value: String,
    pub stage_age_label: String,
    pub last_activity: String,
    /// Present iff the server flagged the deal; carries the server's reason
    /// as auxiliary text. No client-side staleness calculation.
    pub stuck: Option<StuckBadge>,
    pub activities: Vec<ActivityRow>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StuckBadge {
    pub label: String,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRow {
    pub id: i64,
    pub kind: ActivityKind,
    pub subject: String,
    pub done: bool,
    pub logged_label: String,
}

/// Project the weekly report payload into deal rows.
pub fn map_weekly_report(payload: WeeklyReportPayload) -> WeeklyReportView {
    let deals = payload
        .deals
        .into_iter()
        .map(|deal| {
            let stuck = if deal.is_stuck {
                Some(StuckBadge {
                    label: "Stuck".to_string(),
                    reason: deal.stuck_reason.clone(),
                })
            } else {
                None
            };
            let activities = deal
                .activities
                .iter()
                .map(|act| ActivityRow {
                    id: act.id,
                    kind: ActivityKind::from_wire(&act.kind),
                    subject: act.subject.clone(),
                    done: act.done,
                    logged_label: format!(
                        "{} by {}",
                        format_datetime_date(&act.add_time),
                        act.owner_name
                    ),
                })
                .collect();
            DealRow {
                id: deal.id,
                title: deal.title,
                owner_name: deal.owner_name,
                stage_name: deal.stage_name,
                value: deal.value,
                stage_age_label: format!("{} days", deal.stage_age_days),
                last_activity: deal.last_activity_formatted,
                stuck,
                activities,
            }
        })
        .collect();

    WeeklyReportView {
        total_deals_created: payload.summary.total_deals_created,
        stage_breakdown: payload.summary.stage_breakdown,
        deals,
    }
}

// ---------------------------------------------------------------------------
// Due-activities view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueActivityRow {
    pub id: i64,
    pub kind: ActivityKind,
    pub subject: String,
    pub deal_title: Option<String>,
    pub due_label: String,
    pub owner_name: String,
    /// Server-supplied flag; present iff true.
    pub overdue: Option<OverdueBadge>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverdueBadge {
    pub label: String,
}

/// Project due activities into table rows, most fields verbatim.
pub fn map_due_activities(activities: Vec<DueActivity>) -> Vec<DueActivityRow> {
    activities
        .into_iter()
        .map(|act| DueActivityRow {
            id: act.id,
            kind: ActivityKind::from_wire(&act.kind),
            subject: act.subject,
            deal_title: act.deal_title,
            due_label: format_calendar_date(&act.due_date),
            owner_name: act.owner_name,
            overdue: act.is_overdue.then(|| OverdueBadge {
                label: "Overdue".to_string(),
            }),
        })
        .collect()
}
