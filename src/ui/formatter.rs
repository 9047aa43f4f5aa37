//! Pure formatting functions for UI output.
//!
//! Everything here prints and returns; nothing reads input.

use std::path::Path;

use console::style;

use crate::advisory::Advisory;
use crate::cli::orchestration::{display_path, BumpOutcome, ReleaseReport, StageStatus};
use crate::consistency::Report;
use crate::domain::Stage;
use crate::error::ReleaseError;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Print an advisory on stderr. Advisories never change the exit status.
pub fn display_advisory(advisory: &Advisory) {
    eprintln!(
        "{} {}",
        style(format!("⚠ {}:", advisory.kind())).yellow(),
        advisory
    );
}

/// Print a release error, with its stage when it has one
pub fn display_release_error(error: &ReleaseError) {
    match error {
        ReleaseError::Stage { stage, source } => {
            display_error(&format!("[{}] {} ({})", stage, source, source.kind()))
        }
        other => display_error(&format!("{} ({})", other, other.kind())),
    }
}

/// Print every comparison of a consistency check
pub fn display_check_report(report: &Report) {
    println!("\n{}", style("Version consistency:").bold());
    for comparison in &report.comparisons {
        let mark = if comparison.passed {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "  {} {:<28} {} / {}",
            mark, comparison.pair, comparison.left, comparison.right
        );
    }
    for advisory in &report.advisories {
        display_advisory(advisory);
    }
}

/// Print the result of `bump`
pub fn display_bump(root: &Path, outcome: &BumpOutcome) {
    let verb = if outcome.dry_run { "Would bump" } else { "Bumped" };
    println!(
        "\n{} {} -> {}",
        style(verb).bold(),
        style(&outcome.bump.from).red(),
        style(&outcome.bump.to).green()
    );
    for path in &outcome.files {
        println!("  - {}", display_path(root, path));
    }
    for advisory in &outcome.advisories {
        display_advisory(advisory);
    }
}

/// Print a release report, complete or partial.
///
/// Shows the version change, every stage that ran and the advisories.
pub fn display_release_report(root: &Path, report: &ReleaseReport) {
    let title = if report.dry_run {
        "Release plan (dry run, nothing changed):"
    } else {
        "Release:"
    };
    println!("\n{}", style(title).bold());

    if let Some(bump) = &report.bump {
        println!(
            "  Version: {} -> {}",
            style(&bump.from).red(),
            style(&bump.to).green()
        );
    }
    if let Some(tag) = &report.tag {
        println!("  Tag:     {}", style(tag).cyan());
    }
    if let Some(message) = &report.commit_message {
        println!("  Commit:  {}", message);
    }
    if !report.files.is_empty() {
        let files: Vec<_> = report.files.iter().map(|p| display_path(root, p)).collect();
        println!("  Files:   {}", files.join(", "));
    }

    println!();
    for record in &report.stages {
        let mark = match record.status {
            StageStatus::Done => style("✓").green(),
            StageStatus::Planned => style("○").cyan(),
            StageStatus::Skipped => style("-").dim(),
            StageStatus::Warned => style("⚠").yellow(),
        };
        println!("  {} {:<24} {}", mark, record.stage.name(), record.summary);
    }

    for advisory in &report.advisories {
        display_advisory(advisory);
    }
}

/// Display manual push instruction for a tag.
///
/// # Arguments
/// * `tag` - The tag that was created locally
/// * `remote` - The remote name (e.g., "origin")
pub fn display_manual_push_instruction(tag: &str, remote: &str) {
    println!(
        "\n{} To publish this release later, run:\n  {}",
        style("→").yellow(),
        style(format!("git push {0} HEAD && git push {0} {1}", remote, tag)).cyan()
    );
}

/// Explain what a failed release left behind so it can be finished by hand
pub fn display_resume_hint(report: &ReleaseReport, failed: Option<Stage>, remote: &str) {
    let done = report.completed_mutations();
    if done.is_empty() {
        println!("\nNothing was changed.");
        return;
    }

    let names: Vec<_> = done.iter().map(Stage::name).collect();
    println!(
        "\n{} Completed before the failure (not rolled back): {}",
        style("→").yellow(),
        names.join(", ")
    );

    match (failed, &report.tag) {
        (Some(Stage::PushRemote), Some(tag)) => display_manual_push_instruction(tag, remote),
        (Some(Stage::CreateTag), Some(tag)) => {
            if let Some(message) = &report.commit_message {
                println!(
                    "  Create the tag by hand: {}",
                    style(format!("git tag -a {} -m \"Release {}\"", tag, tag)).cyan()
                );
                println!("  The release commit is '{}'.", message);
            }
        }
        _ => {}
    }
}
