use crate::model::{
    CalendarOutput, CommitOutcome, ContributionDay, DateInterval, DayPlan, RunOutput, RunSummary,
    SCHEMA_VERSION,
};
use crate::run::Reporter;
use anyhow::Result;
use chrono::{Datelike, NaiveDate, Utc};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;

/// Prints a line per day and per commit while a batch run progresses.
///
/// On a terminal the lines go through a progress bar sized to the planned
/// commit count; otherwise they are plain stdout lines.
pub struct ConsoleReporter {
    pb: ProgressBar,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        let pb = if Term::stdout().is_term() {
            ProgressBar::with_draw_target(Some(0), ProgressDrawTarget::stdout())
        } else {
            ProgressBar::hidden()
        };
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{bar:30.green/white} {pos}/{len} commits")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { pb }
    }

    fn line(&self, msg: String) {
        if self.pb.is_hidden() {
            println!("{msg}");
        } else {
            self.pb.println(msg);
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn plan_ready(&mut self, plans: &[DayPlan]) {
        let total: u64 = plans.iter().map(|p| u64::from(p.commits_to_add)).sum();
        self.pb.set_length(total);
        self.line(format!("{}", style("Creating retroactive commits").bold()));
    }

    fn day_skipped(&mut self, plan: &DayPlan) {
        self.line(format!(
            "  {} {} existing contribution(s), nothing added",
            style(plan.date).dim(),
            plan.existing_count
        ));
    }

    fn day_started(&mut self, plan: &DayPlan) {
        self.line(format!(
            "  {} no contributions, adding {} commit(s)",
            style(plan.date).cyan(),
            plan.commits_to_add
        ));
    }

    fn commit_finished(&mut self, date: NaiveDate, index: u32, total: u32, outcome: &CommitOutcome) {
        match outcome {
            CommitOutcome::Created { timestamp } => self.line(format!(
                "    {} commit {index}/{total} at {}",
                style("✓").green(),
                timestamp.to_rfc3339()
            )),
            CommitOutcome::Failed { reason } => self.line(format!(
                "    {} commit {index}/{total} for {date} failed: {reason}",
                style("✗").red()
            )),
        }
        self.pb.inc(1);
    }

    fn finished(&mut self, _summary: &RunSummary) {
        self.pb.finish_and_clear();
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("\n{}", style("Summary").bold());
    println!("{}", "─".repeat(50));
    println!("  commits created: {}", style(summary.commits_created).green());
    if summary.commits_failed > 0 {
        println!("  commits failed:  {}", style(summary.commits_failed).red());
    }
    println!("  days filled:     {}", summary.days_planned);
    println!("  days skipped:    {}", summary.days_skipped);
    println!("  days failed:     {}", summary.days_failed);

    if summary.commits_created > 0 {
        println!(
            "\n{} run `git push` to publish the new commits",
            style("Note").yellow().bold()
        );
    } else {
        println!("\nNo retroactive commits were created.");
    }
}

pub fn print_plan(plans: &[DayPlan]) {
    println!("{}", style("Planned commits (dry run)").bold());
    println!("{}", "─".repeat(50));
    for plan in plans {
        if plan.commits_to_add == 0 {
            println!(
                "  {} existing: {:>3}  {}",
                plan.date,
                plan.existing_count,
                style("skip").dim()
            );
        } else {
            println!(
                "  {} existing: {:>3}  {}",
                plan.date,
                plan.existing_count,
                style(format!("+{}", plan.commits_to_add)).green()
            );
        }
    }
    let total: u32 = plans.iter().map(|p| p.commits_to_add).sum();
    let days = plans.iter().filter(|p| p.commits_to_add > 0).count();
    println!("\n{total} commit(s) across {days} day(s)");
}

pub fn output_run_json(
    repository_path: &str,
    interval: &DateInterval,
    dry_run: bool,
    plans: &[DayPlan],
    summary: RunSummary,
) -> Result<()> {
    let output = RunOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repository_path.to_string(),
        start: interval.start(),
        end: interval.end(),
        dry_run,
        plan: plans.to_vec(),
        summary,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// One `ContributionDay` per day of `interval`, zero where the calendar is silent.
pub fn calendar_days(counts: &HashMap<NaiveDate, u32>, interval: &DateInterval) -> Vec<ContributionDay> {
    interval
        .days()
        .map(|date| ContributionDay {
            date,
            contribution_count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

pub fn output_calendar_json(days: &[ContributionDay], interval: &DateInterval) -> Result<()> {
    let output = CalendarOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        start: interval.start(),
        end: interval.end(),
        empty_days: days.iter().filter(|d| d.contribution_count == 0).count(),
        days: days.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn intensity_char(count: u32, max: u32) -> &'static str {
    if count == 0 {
        return "·";
    }
    let ratio = count as f64 / max.max(1) as f64;
    match (ratio * 4.0).ceil() as u32 {
        0 | 1 => "░",
        2 => "▒",
        3 => "▓",
        _ => "█",
    }
}

/// Render days as a seven-row grid (Sunday first), one column per week.
pub fn render_calendar_grid(days: &[ContributionDay]) -> Vec<String> {
    const LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

    let Some(first) = days.first() else {
        return Vec::new();
    };
    let max = days.iter().map(|d| d.contribution_count).max().unwrap_or(0);
    let lead = first.date.weekday().num_days_from_sunday() as usize;
    let weeks = (lead + days.len()).div_ceil(7);

    let mut grid = vec![vec![" "; weeks]; 7];
    for (i, day) in days.iter().enumerate() {
        let slot = lead + i;
        grid[slot % 7][slot / 7] = intensity_char(day.contribution_count, max);
    }

    grid.into_iter()
        .zip(LABELS)
        .map(|(row, label)| format!("{label} {}", row.concat()))
        .collect()
}

pub fn output_calendar(days: &[ContributionDay], interval: &DateInterval) {
    if days.is_empty() {
        println!("No data to display");
        return;
    }

    println!(
        "{} {} to {}",
        style("Contribution calendar").bold(),
        interval.start(),
        interval.end()
    );
    println!("{}", "─".repeat(50));
    for row in render_calendar_grid(days) {
        println!("{}", style(row).green());
    }

    let empty = days.iter().filter(|d| d.contribution_count == 0).count();
    let total: u32 = days.iter().map(|d| d.contribution_count).sum();
    println!("\n{}", style("Legend").bold());
    println!("  · no contributions   ░▒▓█ contribution intensity");
    println!("\n{total} contribution(s), {empty} of {} day(s) empty", days.len());
}
