//! CLI output formatting

use crate::{
    core::{RunStatus, SkipReason, StepDecision, StepStatus},
    execution::{MatrixReport, RunEvent, RunReport},
};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SKIP: Emoji<'_, '_> = Emoji("⏭️  ", "- ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a step status for display
pub fn format_step_status(status: &StepStatus) -> String {
    match status {
        StepStatus::Pending => style("PENDING").dim().to_string(),
        StepStatus::Running { .. } => style("RUNNING").yellow().to_string(),
        StepStatus::Succeeded { .. } => style("SUCCEEDED").green().to_string(),
        StepStatus::Failed { .. } => style("FAILED").red().to_string(),
        StepStatus::Skipped { .. } => style("SKIPPED").dim().to_string(),
    }
}

/// Format a run status for display
pub fn format_run_status(status: RunStatus) -> String {
    match status {
        RunStatus::Pending => style("PENDING").dim().to_string(),
        RunStatus::InProgress => style("IN PROGRESS").yellow().to_string(),
        RunStatus::Completed => style("COMPLETED").green().to_string(),
        RunStatus::Halted => style("HALTED").red().to_string(),
    }
}

/// Format a run event for display
pub fn format_run_event(event: &RunEvent) -> String {
    match event {
        RunEvent::RunStarted {
            run_id,
            pipeline,
            platform,
            trigger,
        } => format!(
            "{} Starting {} [{} / {}] ({})",
            ROCKET,
            style(pipeline).bold(),
            style(platform).cyan(),
            style(trigger).cyan(),
            style(&run_id.to_string()[..8]).dim()
        ),
        RunEvent::StepStarted { step } => format!("{} {}", SPINNER, style(step).cyan()),
        RunEvent::StepSkipped { step, reason } => format!(
            "{} {} ({})",
            SKIP,
            style(step).dim(),
            style(reason).dim()
        ),
        RunEvent::StepSucceeded { step } => format!("{} {}", CHECK, style(step).green()),
        RunEvent::StepFailed {
            step,
            exit_code,
            error,
        } => {
            let code = exit_code
                .map(|c| format!("exit {}", c))
                .unwrap_or_else(|| "not dispatched".to_string());
            format!(
                "{} {} ({}): {}",
                CROSS,
                style(step).red(),
                style(code).dim(),
                style(error).dim()
            )
        }
        RunEvent::RunFinished {
            run_id,
            status,
            exit_code,
        } => format!(
            "{} Run ({}) {} (exit {})",
            INFO,
            style(&run_id.to_string()[..8]).dim(),
            format_run_status(*status),
            exit_code
        ),
    }
}

/// Format one gate decision for display
pub fn format_decision(decision: &StepDecision) -> String {
    match &decision.skip {
        None => format!("{} {}", CHECK, style(&decision.step).bold()),
        Some(SkipReason::GuardFalse) => format!(
            "{} {} ({})",
            SKIP,
            style(&decision.step).dim(),
            style("guard false").dim()
        ),
        Some(SkipReason::MissingSecret(name)) => format!(
            "{} {} ({})",
            SKIP,
            style(&decision.step).dim(),
            style(format!("secret {} unavailable", name)).dim()
        ),
    }
}

/// Format the summary line of a run report
pub fn format_run_summary(report: &RunReport) -> String {
    let icon = match report.status {
        RunStatus::Completed => CHECK,
        RunStatus::Halted => CROSS,
        _ => INFO,
    };

    format!(
        "{} {} [{}] - {} ({} executed, {} skipped, exit {})",
        icon,
        style(&report.pipeline).bold(),
        style(&report.platform).cyan(),
        format_run_status(report.status),
        report.executed().len(),
        report.skipped().len(),
        report.exit_code
    )
}

/// Format the per-platform summary of a matrix report
pub fn format_matrix_summary(report: &MatrixReport) -> String {
    report
        .runs
        .iter()
        .map(|run| format!("  {}", format_run_summary(run)))
        .collect::<Vec<_>>()
        .join("\n")
}
