//! Sales scorecard reporting client.
//!
//! Read-only: turns filter state into canonical API requests, caches and
//! deduplicates the responses (stale-while-revalidate), and projects the
//! payloads into display-ready view models for three screens — the main
//! scorecard, the weekly deal report, and the due-activities report.

pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod filters;
pub mod rows;
pub mod state;
pub mod types;
pub mod viewmodel;
pub mod views;

use std::sync::Arc;

use parking_lot::Mutex;

use state::AppState;
use viewmodel::ViewState;
use views::due_activities::DueActivitiesPage;
use views::scorecard::ScorecardPage;
use views::weekly_report::WeeklyReportPage;

/// Composition root: mount the three pages, resolve them once, and print a
/// text rendition. With `--watch`, keep the revalidation pollers running.
pub fn run() -> Result<(), String> {
    let watch = std::env::args().any(|a| a == "--watch");

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| format!("Failed to start runtime: {}", e))?;

    runtime.block_on(async {
        let state = Arc::new(AppState::new()?);
        let today = chrono::Local::now().date_naive();

        let scorecard = Arc::new(Mutex::new(ScorecardPage::new()));
        let weekly = Arc::new(Mutex::new(WeeklyReportPage::new(today)));
        let due = Arc::new(Mutex::new(DueActivitiesPage::new(today)));

        views::scorecard::refresh_scorecard(&state, &scorecard).await;
        views::weekly_report::refresh_weekly_report(&state, &weekly).await;
        views::due_activities::refresh_due_activities(&state, &due).await;
        let users = views::users::load_users(&state).await;

        render_scorecard(scorecard.lock().session.current());
        render_weekly(weekly.lock().session.current());
        render_due(due.lock().session.current());
        if !users.is_empty() {
            println!(
                "Salespersons: {}",
                users
                    .iter()
                    .map(|u| u.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }

        if watch {
            log::info!("watching; revalidation pollers running");
            tokio::spawn(views::scorecard::run_scorecard_poller(
                state.clone(),
                scorecard.clone(),
            ));
            tokio::spawn(views::weekly_report::run_weekly_report_poller(
                state.clone(),
                weekly.clone(),
            ));
            tokio::spawn(views::due_activities::run_due_activities_poller(
                state.clone(),
                due.clone(),
            ));

            // Re-render whenever the scorecard interval elapses.
            let interval = state.view_refresh(|v| v.scorecard).revalidate_secs.max(1);
            loop {
                tokio::time::sleep(std::time::Duration::from_secs(interval)).await;
                render_scorecard(scorecard.lock().session.current());
            }
        }

        Ok(())
    })
}

fn render_scorecard(view: &ViewState<viewmodel::ScorecardView>) {
    match view {
        ViewState::Loading { message } | ViewState::Empty { message } => println!("{}", message),
        ViewState::Error { error } => println!("Error Loading Dashboard: {}", error.message),
        ViewState::Ready { data } => {
            println!("Sales Scorecard — {}", data.quarter_label);
            println!(
                "  Points {} / {}  ({}%)  |  {} deals in pipeline  |  {}",
                data.total_points,
                data.quarterly_target,
                data.quota_attainment,
                data.deals_in_pipeline,
                data.avg_speed_to_close
            );
            for rep in &data.leaderboard {
                println!(
                    "  #{} {} — {} pts ({})",
                    rep.rank, rep.name, rep.points, rep.deals_won_label
                );
            }
        }
    }
}

fn render_weekly(view: &ViewState<viewmodel::WeeklyReportView>) {
    match view {
        ViewState::Loading { message } | ViewState::Empty { message } => println!("{}", message),
        ViewState::Error { error } => {
            println!("Failed to load report. Please try again. ({})", error.message)
        }
        ViewState::Ready { data } => {
            println!("Deals Created Report — {} deals", data.total_deals_created);
            for deal in &data.deals {
                let status = deal
                    .stuck
                    .as_ref()
                    .map(|b| format!("  [{}: {}]", b.label, b.reason))
                    .unwrap_or_default();
                println!(
                    "  {} ({}) — {} — {} in stage{}",
                    deal.title, deal.owner_name, deal.value, deal.stage_age_label, status
                );
            }
        }
    }
}

fn render_due(view: &ViewState<Vec<viewmodel::DueActivityRow>>) {
    match view {
        ViewState::Loading { message } | ViewState::Empty { message } => println!("{}", message),
        ViewState::Error { error } => println!("Failed to load activities. ({})", error.message),
        ViewState::Ready { data } => {
            println!("Due Activities Report — {} activities", data.len());
            for row in data {
                let badge = row
                    .overdue
                    .as_ref()
                    .map(|b| format!("  [{}]", b.label))
                    .unwrap_or_default();
                println!(
                    "  {} — due {} ({}){}",
                    row.subject, row.due_label, row.owner_name, badge
                );
            }
        }
    }
}
