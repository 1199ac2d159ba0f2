mod cli;
mod core;
mod execution;
mod runner;
mod secrets;

use anyhow::{Context, Result};
use cli::commands::{MatrixCommand, PlanCommand, RunCommand, ValidateCommand};
use cli::output::*;
use cli::{Cli, Command};
use crate::core::workflow;
use crate::core::{PipelineConfig, PipelineRun, Platform, TriggerKind};
use execution::{run_matrix, ExecutionEngine};
use runner::ShellRunner;
use secrets::{EnvSecretStore, SecretStore};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_cell(cmd).await?,
        Command::Matrix(cmd) => run_full_matrix(cmd).await?,
        Command::Plan(cmd) => plan_cell(cmd)?,
        Command::Validate(cmd) => validate_pipeline(cmd)?,
    }

    Ok(())
}

/// Load a pipeline config from a file, or fall back to the built-in
/// verification workflow
fn load_config(file: &Option<String>) -> Result<PipelineConfig> {
    match file {
        Some(path) => {
            PipelineConfig::from_file(path).context("Failed to load pipeline config")
        }
        None => Ok(workflow::verification_config()),
    }
}

async fn run_cell(cmd: &RunCommand) -> Result<()> {
    let config = load_config(&cmd.file)?;
    let platform: Platform = cmd.platform.into();
    let trigger: TriggerKind = cmd.trigger.into();

    let mut run = PipelineRun::from_config(&config, platform, trigger);

    let mut engine = ExecutionEngine::new(ShellRunner::new());
    engine.add_event_handler(|event| {
        println!("{}", format_run_event(&event));
    });

    let secrets = EnvSecretStore::new();
    println!();
    let report = engine.execute(&mut run, &secrets).await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{}", format_run_summary(&report));
    }

    if report.exit_code != 0 {
        std::process::exit(report.exit_code);
    }

    Ok(())
}

async fn run_full_matrix(cmd: &MatrixCommand) -> Result<()> {
    let config = load_config(&cmd.file)?;
    let trigger: TriggerKind = cmd.trigger.into();

    let platforms: Vec<Platform> = if cmd.platform.is_empty() {
        Platform::ALL.to_vec()
    } else {
        cmd.platform.iter().map(|&p| p.into()).collect()
    };

    let runner = Arc::new(ShellRunner::new());
    let secrets: Arc<dyn SecretStore> = Arc::new(EnvSecretStore::new());

    let handler: execution::EventHandler = Arc::new(|event| {
        println!("{}", format_run_event(&event));
    });

    println!(
        "{} Fanning out {} across {} platform(s)\n",
        INFO,
        style(&config.name).bold(),
        style(platforms.len()).cyan()
    );

    let report = run_matrix(&config, &platforms, trigger, runner, secrets, Some(handler)).await;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("\n{} Matrix summary:", INFO);
        println!("{}", format_matrix_summary(&report));
    }

    let exit_code = report.exit_code();
    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

fn plan_cell(cmd: &PlanCommand) -> Result<()> {
    let config = load_config(&cmd.file)?;
    let platform: Platform = cmd.platform.into();
    let trigger: TriggerKind = cmd.trigger.into();

    let run = PipelineRun::from_config(&config, platform, trigger);
    let secrets = EnvSecretStore::new();
    let plan = run.plan(&secrets);

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!(
        "{} Plan for {} [{} / {}]:",
        INFO,
        style(&config.name).bold(),
        style(platform).cyan(),
        style(trigger).cyan()
    );
    for decision in &plan {
        println!("  {}", format_decision(decision));
    }

    let executing = plan.iter().filter(|d| d.executes()).count();
    println!(
        "\n{} {} of {} step(s) would execute",
        INFO,
        style(executing).green(),
        plan.len()
    );

    Ok(())
}

fn validate_pipeline(cmd: &ValidateCommand) -> Result<()> {
    println!("{} Validating pipeline...", INFO);

    let result = PipelineConfig::from_file(&cmd.file);

    match result {
        Ok(config) => {
            println!("{} Pipeline configuration is valid!", CHECK);
            println!("  Name: {}", style(&config.name).bold());
            println!("  Steps: {}", style(config.steps.len()).cyan());

            if cmd.json {
                let json = serde_json::to_string_pretty(&config)?;
                println!("\n{}", json);
            }
            Ok(())
        }
        Err(e) => {
            println!("{} Validation failed:", CROSS);
            println!("  {}", style(e).red());
            std::process::exit(1);
        }
    }
}
