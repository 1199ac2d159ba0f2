//! CLI command definitions

use crate::core::{Platform, TriggerKind};
use clap::Args;

/// Execute one matrix cell
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to a pipeline YAML file (omit for the built-in workflow)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Platform of the run
    #[arg(short, long, value_enum)]
    pub platform: PlatformArg,

    /// Trigger kind of the run
    #[arg(short, long, value_enum, default_value_t = TriggerArg::Push)]
    pub trigger: TriggerArg,

    /// Print the final report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Fan out across platforms
#[derive(Debug, Args, Clone)]
pub struct MatrixCommand {
    /// Path to a pipeline YAML file (omit for the built-in workflow)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Platforms to fan out over (defaults to all three)
    #[arg(short, long, value_enum)]
    pub platform: Vec<PlatformArg>,

    /// Trigger kind shared by every cell
    #[arg(short, long, value_enum, default_value_t = TriggerArg::Push)]
    pub trigger: TriggerArg,

    /// Print the matrix report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Show the gate decisions for one matrix cell without executing
#[derive(Debug, Args, Clone)]
pub struct PlanCommand {
    /// Path to a pipeline YAML file (omit for the built-in workflow)
    #[arg(short, long)]
    pub file: Option<String>,

    /// Platform to evaluate for
    #[arg(short, long, value_enum)]
    pub platform: PlatformArg,

    /// Trigger kind to evaluate for
    #[arg(short, long, value_enum, default_value_t = TriggerArg::Push)]
    pub trigger: TriggerArg,

    /// Print the decisions as JSON
    #[arg(long)]
    pub json: bool,
}

/// Validate a pipeline configuration
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    /// Path to a pipeline YAML file
    #[arg(short, long)]
    pub file: String,

    /// Print the parsed configuration as JSON
    #[arg(long)]
    pub json: bool,
}

/// Platform argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum PlatformArg {
    Linux,
    Macos,
    Windows,
}

/// Trigger-kind argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TriggerArg {
    Push,
    #[clap(name = "pull-request")]
    PullRequest,
    #[clap(name = "workflow-call")]
    WorkflowCall,
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Linux => Platform::Linux,
            PlatformArg::Macos => Platform::Macos,
            PlatformArg::Windows => Platform::Windows,
        }
    }
}

impl From<TriggerArg> for TriggerKind {
    fn from(arg: TriggerArg) -> Self {
        match arg {
            TriggerArg::Push => TriggerKind::Push,
            TriggerArg::PullRequest => TriggerKind::PullRequest,
            TriggerArg::WorkflowCall => TriggerKind::WorkflowCall,
        }
    }
}
