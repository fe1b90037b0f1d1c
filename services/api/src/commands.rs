use crate::infra::{open_tracker, parse_date};
use chrono::{Local, NaiveDate};
use clap::Args;
use job_tracker::config::AppConfig;
use job_tracker::dashboard::DashboardSummary;
use job_tracker::error::AppError;
use job_tracker::keywords::{compare_keywords, KeywordComparison};
use job_tracker::tracker::{ImportOutcome, EXPORT_FILE_NAME};
use std::fs;
use std::path::PathBuf;

#[derive(Args, Debug, Default)]
pub(crate) struct DashboardArgs {
    /// Reference date for "this week" (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Print the summary as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct KeywordsArgs {
    /// File containing the job description
    #[arg(long)]
    pub(crate) job: PathBuf,
    /// File containing the resume text
    #[arg(long)]
    pub(crate) resume: PathBuf,
    /// Print the comparison as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Destination file (defaults to ./jobs.json)
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// Snapshot file previously produced by `export`
    pub(crate) file: PathBuf,
    /// Confirm the overwrite; without this flag the import is only previewed
    #[arg(long)]
    pub(crate) yes: bool,
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let tracker = open_tracker(&config.storage)?;
    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let summary = tracker.dashboard(today);

    if args.json {
        let rendered = serde_json::to_string_pretty(&summary).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_dashboard(&summary);
    }
    Ok(())
}

fn render_dashboard(summary: &DashboardSummary<'_>) {
    println!("Total applications: {}", summary.total);

    println!("Jobs per status:");
    for entry in summary.status_breakdown() {
        println!("  - {}: {}", entry.status, entry.count);
    }

    match summary.last_applied {
        Some(application) => println!(
            "Last applied: {} @ {} on {}",
            application.position,
            application.company,
            application.date_applied.format("%B %-d, %Y")
        ),
        None => println!("Last applied: no jobs found"),
    }

    println!(
        "Tasks due this week ({} to {}):",
        summary.week.start, summary.week.end
    );
    if summary.tasks_due_this_week.is_empty() {
        println!("  none");
    }
    for entry in &summary.tasks_due_this_week {
        let due = entry
            .task
            .due_date
            .map(|date| date.to_string())
            .unwrap_or_default();
        let marker = if entry.task.completed { "x" } else { " " };
        println!(
            "  [{marker}] {} ({} @ {}, due {due})",
            entry.task.text, entry.application.position, entry.application.company
        );
    }
}

pub(crate) fn run_keywords(args: KeywordsArgs) -> Result<(), AppError> {
    let job_description = fs::read_to_string(&args.job)?;
    let resume = fs::read_to_string(&args.resume)?;
    let comparison = compare_keywords(&job_description, &resume);

    if args.json {
        let rendered = serde_json::to_string_pretty(&comparison).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        render_comparison(&comparison);
    }
    Ok(())
}

fn render_comparison(comparison: &KeywordComparison) {
    println!(
        "Match: {}% ({} of {} job keywords)",
        comparison.match_percent,
        comparison.matched.len(),
        comparison.job_keywords
    );
    println!("Missing keywords: {}", join_or_none(&comparison.missing));
    println!("Unique resume keywords: {}", join_or_none(&comparison.unique));
}

fn join_or_none(tokens: &[String]) -> String {
    if tokens.is_empty() {
        "None".to_string()
    } else {
        tokens.join(", ")
    }
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let tracker = open_tracker(&config.storage)?;
    let export = tracker.export_file()?;
    let destination = args
        .out
        .unwrap_or_else(|| PathBuf::from(export.file_name));

    fs::write(&destination, export.contents)?;
    println!(
        "Exported {} applications to {}",
        tracker.store().len(),
        destination.display()
    );
    Ok(())
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let mut tracker = open_tracker(&config.storage)?;
    let raw = fs::read_to_string(&args.file)?;

    let staged = tracker.stage_import_json(&raw)?;
    println!("{}", staged.prompt);

    let outcome = if args.yes {
        tracker.confirm_import()?
    } else {
        tracker.cancel_import()?
    };

    match outcome {
        ImportOutcome::Committed {
            installed,
            replaced,
        } => println!("Imported {installed} applications (replaced {replaced})."),
        ImportOutcome::Cancelled { .. } => println!(
            "Nothing changed. Re-run with --yes to replace the tracked applications (tip: `export` to {EXPORT_FILE_NAME} first)."
        ),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_or_none_handles_empty_lists() {
        assert_eq!(join_or_none(&[]), "None");
        assert_eq!(
            join_or_none(&["go".to_string(), "rust".to_string()]),
            "go, rust"
        );
    }
}
