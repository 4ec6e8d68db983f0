//! Plain-text rendering of controller state. Colors are applied by the caller.

use salesdash_application::SubmitOutcome;
use salesdash_core::conversation::APOLOGY_MESSAGE;
use salesdash_core::health::{ComponentStatus, HealthSnapshot, OverallStatus};
use salesdash_core::sales::{DealStats, DealTally, SalesRep};

/// One-line indicator, e.g. `● online (checked 14:03:22)`.
pub fn status_line(snapshot: &HealthSnapshot) -> String {
    let mut line = format!("● {}", snapshot.overall_status.label());
    if let Some(checked_at) = snapshot.checked_at {
        line.push_str(&format!(
            " (checked {})",
            checked_at.with_timezone(&chrono::Local).format("%H:%M:%S")
        ));
    }
    line
}

pub fn component_marker(status: ComponentStatus) -> &'static str {
    match status {
        ComponentStatus::Up => "✓",
        ComponentStatus::Degraded => "!",
        ComponentStatus::Down => "✗",
        ComponentStatus::Disabled => "-",
        ComponentStatus::Unknown => "?",
    }
}

/// Body of the details popover. `expanded` adds per-component metrics.
pub fn health_details(snapshot: &HealthSnapshot, expanded: bool) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(error) = &snapshot.raw_error {
        lines.push(format!("error: {}", error));
    }

    for component in &snapshot.components {
        lines.push(format!(
            "{} {} ({:?})",
            component_marker(component.status),
            component.name,
            component.status
        ));
        if expanded {
            for (key, value) in &component.detail {
                lines.push(format!("    {}: {}", key, value));
            }
        }
    }

    if !snapshot.metrics.is_empty() {
        lines.push(
            snapshot
                .metrics
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join("  "),
        );
    }
    lines
}

/// Whole-dollar amount with thousands separators, e.g. `$1,234,567`.
pub fn currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{}${}", sign, grouped)
}

fn tally(label: &str, tally: &DealTally) -> String {
    format!("{:<12}{:>5}  {:>14}", label, tally.count, currency(tally.value))
}

pub fn stats_lines(stats: &DealStats) -> Vec<String> {
    vec![
        tally("Total", &stats.total),
        tally("Won", &stats.won),
        tally("Lost", &stats.lost),
        tally("In progress", &stats.running),
    ]
}

pub fn rep_lines(rep: &SalesRep) -> Vec<String> {
    let pipeline: f64 = rep.deals.iter().map(|deal| deal.value).sum();
    let mut lines = vec![format!(
        "{} ({}, {}) {} deals, {}",
        rep.name,
        rep.role,
        rep.region,
        rep.deals.len(),
        currency(pipeline)
    )];
    for deal in &rep.deals {
        lines.push(format!(
            "    {} {} [{}]",
            deal.client,
            currency(deal.value),
            deal.status
        ));
    }
    lines
}

/// What the REPL prints once a question settles.
pub fn outcome_lines(outcome: &SubmitOutcome) -> Vec<String> {
    match outcome {
        SubmitOutcome::Answered(text) => text.lines().map(str::to_string).collect(),
        SubmitOutcome::Failed => vec![APOLOGY_MESSAGE.to_string()],
        SubmitOutcome::Rejected(reason) => vec![format!("Not sent: {:?}", reason)],
        SubmitOutcome::Discarded => Vec::new(),
    }
}

/// Whether the indicator should draw attention.
pub fn is_alarming(status: OverallStatus) -> bool {
    matches!(status, OverallStatus::Degraded | OverallStatus::Offline)
}
