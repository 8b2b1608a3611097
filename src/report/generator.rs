//! Markdown and JSON rendering of the dashboard.
//!
//! This module turns the employee snapshot, the aspect catalog and the
//! directory lookups into terminal output. Tabs the gate disables are
//! listed but not rendered.

use crate::dashboard::chart;
use crate::dashboard::{EmployeeSnapshot, Tab, TabGate};
use crate::models::{
    Aspect, AspectSummary, ChartPoint, EmployeeId, EmployeeOverview, GeneralSummary, Psychotype,
    Review, MAX_SCORE,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything one dashboard render needs.
#[derive(Debug, Serialize)]
pub struct DashboardView<'a> {
    pub snapshot: &'a EmployeeSnapshot,
    pub tabs: Vec<Tab>,
    pub chartable: bool,
    pub aspects: &'a [Aspect],
}

impl<'a> DashboardView<'a> {
    pub fn new(snapshot: &'a EmployeeSnapshot, gate: TabGate, aspects: &'a [Aspect]) -> Self {
        Self {
            snapshot,
            tabs: gate.enabled_tabs(),
            chartable: chart::is_chartable(snapshot.chart.len()),
            aspects,
        }
    }

    fn is_enabled(&self, tab: Tab) -> bool {
        self.tabs.contains(&tab)
    }
}

/// Generate the full dashboard as Markdown.
pub fn generate_markdown_dashboard(view: &DashboardView<'_>) -> String {
    let mut output = String::new();

    output.push_str("# Employee Feedback Dashboard\n\n");
    output.push_str(&generate_header_section(view.snapshot));
    output.push_str(&generate_tabs_section(view));
    output.push_str(&generate_aspects_section(view.aspects));

    if view.is_enabled(Tab::Reviews) {
        output.push_str(&generate_reviews_section(view.snapshot.reviews.items()));
    }

    if view.is_enabled(Tab::Summary) {
        output.push_str(&generate_history_section(
            view.snapshot.general_summaries.items(),
        ));
        output.push_str(&generate_aspect_summaries_section(
            view.snapshot.aspect_summaries.items(),
        ));
        if view.chartable {
            output.push_str(&generate_trend_section(&view.snapshot.chart));
        }
    }

    output
}

/// Generate the dashboard as JSON.
pub fn generate_json_dashboard(view: &DashboardView<'_>) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(Into::into)
}

fn generate_header_section(snapshot: &EmployeeSnapshot) -> String {
    let mut section = String::new();

    match snapshot.employee_id {
        Some(id) => section.push_str(&format!("- **Employee:** {}\n", id)),
        None => section.push_str("- **Employee:** none selected\n"),
    }
    if snapshot.loading {
        section.push_str("- **Status:** loading…\n");
    }

    let active = snapshot.employee_id;
    let stale: Vec<String> = [
        ("reviews", snapshot.reviews.is_stale_for(active), snapshot.reviews.owner()),
        (
            "aspect summaries",
            snapshot.aspect_summaries.is_stale_for(active),
            snapshot.aspect_summaries.owner(),
        ),
        (
            "general summaries",
            snapshot.general_summaries.is_stale_for(active),
            snapshot.general_summaries.owner(),
        ),
    ]
    .into_iter()
    .filter_map(|(name, stale, owner)| match (stale, owner) {
        (true, Some(owner)) => Some(format!("{} (employee {})", name, owner)),
        _ => None,
    })
    .collect();

    if !stale.is_empty() {
        section.push_str(&format!(
            "- **Note:** showing previously loaded {}\n",
            stale.join(", ")
        ));
    }
    section.push('\n');

    section
}

fn generate_tabs_section(view: &DashboardView<'_>) -> String {
    let mut section = String::from("## Tabs\n\n");

    for tab in Tab::ALL {
        let marker = if view.is_enabled(tab) { "✅" } else { "🔒" };
        section.push_str(&format!("- {} {}\n", marker, tab));
    }
    section.push('\n');

    section
}

/// Generate the aspect catalog section.
pub fn generate_aspects_section(aspects: &[Aspect]) -> String {
    let mut section = String::from("## Aspects\n\n");

    if aspects.is_empty() {
        section.push_str("The catalog is empty.\n\n");
        return section;
    }

    section.push_str("| ID | Aspect |\n");
    section.push_str("|:---:|:---|\n");
    for aspect in aspects {
        section.push_str(&format!("| {} | {} |\n", aspect.id, aspect.text));
    }
    section.push('\n');

    section
}

fn generate_reviews_section(reviews: &[Review]) -> String {
    let mut section = String::from("## Reviews\n\n");

    for review in reviews {
        let icon = if review.is_self_review { "👤" } else { "👥" };
        section.push_str(&format!("### {} {}\n\n", icon, review.badge()));
        section.push_str(&format!("{}\n\n", review.text));
        section.push_str(&format!("*Reviewer ID: {}*\n\n", review.reviewer_id));
        section.push_str("---\n\n");
    }

    section
}

fn generate_history_section(history: &[GeneralSummary]) -> String {
    let mut section = String::from("## Summary History\n\n");

    for summary in history {
        section.push_str(&format!("### Overall score: {}\n\n", format_score(summary.score)));
        section.push_str(&format!("{}\n\n", summary.text));
        section.push_str(&format!("*Updated: {}*\n\n", format_timestamp(summary.created_at)));
    }

    section
}

fn generate_aspect_summaries_section(summaries: &[AspectSummary]) -> String {
    let mut section = String::from("## Analysis by Aspect\n\n");

    for summary in summaries {
        section.push_str(&format!(
            "### {} ({})\n\n",
            summary.aspect_name,
            format_score(summary.score)
        ));
        section.push_str(&format!("{}\n\n", summary.text));
        section.push_str(&format!("*Updated: {}*\n\n", format_timestamp(summary.created_at)));
    }

    section
}

fn generate_trend_section(points: &[ChartPoint]) -> String {
    let mut section = String::from("## Score Trend\n\n");

    section.push_str("| # | Score | |\n");
    section.push_str("|:---:|:---:|:---|\n");
    for point in points {
        section.push_str(&format!(
            "| {} | {:.1} | {} |\n",
            point.index,
            point.score,
            score_bar(point.score)
        ));
    }
    section.push('\n');

    section
}

/// Generate the employee roster as Markdown.
pub fn generate_markdown_roster(employees: &[EmployeeOverview]) -> String {
    let mut output = String::from("# Employees\n\n");

    if employees.is_empty() {
        output.push_str("No employees registered.\n");
        return output;
    }

    output.push_str("| ID | Reviews | Psychotype |\n");
    output.push_str("|:---:|:---:|:---|\n");
    for employee in employees {
        output.push_str(&format!(
            "| {} | {} | {} |\n",
            employee.employee_id,
            employee.feedback_count,
            employee.psychotype.as_deref().unwrap_or("-")
        ));
    }

    output
}

/// Generate a psychotype profile as Markdown.
pub fn generate_markdown_psychotype(employee_id: EmployeeId, profile: &Psychotype) -> String {
    let mut output = format!("# Psychotype of employee {}\n\n", employee_id);

    if profile.is_empty() {
        output.push_str("No psychotype yet. Run an analysis first.\n");
        return output;
    }

    if let Some(kind) = &profile.psychotype {
        output.push_str(&format!("**{}**\n\n", kind));
    }
    if let Some(description) = &profile.psychotype_description {
        output.push_str(&format!("{}\n", description));
    }

    output
}

/// Serialize any directory or catalog value as pretty JSON.
pub fn generate_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

fn format_score(score: f64) -> String {
    format!("{:.1} / {}", score, MAX_SCORE)
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    match timestamp {
        Some(ts) => ts.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "unknown".to_string(),
    }
}

fn score_bar(score: f64) -> String {
    let cells = (score.clamp(0.0, MAX_SCORE) * 4.0).round() as usize;
    "█".repeat(cells)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AspectId, ReviewerId};
    use chrono::TimeZone;

    fn view_of<'a>(snapshot: &'a EmployeeSnapshot, aspects: &'a [Aspect]) -> DashboardView<'a> {
        DashboardView::new(snapshot, TabGate::evaluate(snapshot), aspects)
    }

    fn loaded_snapshot() -> EmployeeSnapshot {
        let mut snapshot = EmployeeSnapshot {
            employee_id: Some(EmployeeId(1)),
            ..EmployeeSnapshot::default()
        };
        snapshot.reviews.replace(
            EmployeeId(1),
            vec![Review {
                reviewer_id: ReviewerId(11),
                employee_id: Some(EmployeeId(1)),
                text: "Explains decisions clearly".to_string(),
                is_self_review: false,
                weight: None,
            }],
        );
        snapshot.aspect_summaries.replace(
            EmployeeId(1),
            vec![AspectSummary {
                aspect_name: "Communication".to_string(),
                score: 4.4,
                text: "Clear and timely".to_string(),
                created_at: None,
            }],
        );
        let received = vec![
            GeneralSummary {
                score: 4.2,
                text: "Latest".to_string(),
                created_at: Some(Utc.with_ymd_and_hms(2024, 10, 12, 9, 30, 0).unwrap()),
            },
            GeneralSummary {
                score: 3.9,
                text: "Previous".to_string(),
                created_at: None,
            },
        ];
        snapshot.chart = chart::build(&received);
        snapshot
            .general_summaries
            .replace(EmployeeId(1), received.into_iter().rev().collect());
        snapshot
    }

    #[test]
    fn test_generate_markdown_dashboard() {
        let snapshot = loaded_snapshot();
        let aspects = vec![Aspect {
            id: AspectId(1),
            text: "Communication".to_string(),
        }];
        let markdown = generate_markdown_dashboard(&view_of(&snapshot, &aspects));

        assert!(markdown.contains("# Employee Feedback Dashboard"));
        assert!(markdown.contains("## Reviews"));
        assert!(markdown.contains("Peer review"));
        assert!(markdown.contains("4.2 / 5"));
        assert!(markdown.contains("2024-10-12 09:30 UTC"));
        assert!(markdown.contains("## Score Trend"));
        assert!(!markdown.contains("🔒"));
    }

    #[test]
    fn test_disabled_tabs_not_rendered() {
        let snapshot = EmployeeSnapshot::default();
        let markdown = generate_markdown_dashboard(&view_of(&snapshot, &[]));

        assert!(markdown.contains("The catalog is empty."));
        assert!(markdown.contains("🔒 Reviews"));
        assert!(!markdown.contains("## Reviews"));
        assert!(!markdown.contains("## Summary History"));
    }

    #[test]
    fn test_single_point_hides_trend() {
        let mut snapshot = loaded_snapshot();
        snapshot.chart.truncate(1);
        let view = view_of(&snapshot, &[]);

        assert!(!view.chartable);
        assert!(!generate_markdown_dashboard(&view).contains("## Score Trend"));
    }

    #[test]
    fn test_stale_slots_flagged() {
        let mut snapshot = loaded_snapshot();
        snapshot.employee_id = Some(EmployeeId(2));

        let markdown = generate_markdown_dashboard(&view_of(&snapshot, &[]));
        assert!(markdown.contains("showing previously loaded reviews (employee 1)"));
    }

    #[test]
    fn test_generate_json_dashboard() {
        let snapshot = loaded_snapshot();
        let json = generate_json_dashboard(&view_of(&snapshot, &[])).unwrap();

        assert!(json.contains("\"tabs\""));
        assert!(json.contains("\"chart\""));
        assert!(json.contains("\"ID_reviewer\""));
    }

    #[test]
    fn test_psychotype_rendering() {
        let empty = generate_markdown_psychotype(EmployeeId(3), &Psychotype::default());
        assert!(empty.contains("No psychotype yet"));

        let profile = Psychotype {
            psychotype: Some("ENFJ".to_string()),
            psychotype_description: Some("Warm and organised".to_string()),
        };
        let markdown = generate_markdown_psychotype(EmployeeId(3), &profile);
        assert!(markdown.contains("**ENFJ**"));
    }

    #[test]
    fn test_score_bar() {
        assert_eq!(score_bar(5.0).chars().count(), 20);
        assert_eq!(score_bar(0.0), "");
    }
}
