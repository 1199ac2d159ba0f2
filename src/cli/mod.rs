//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{MatrixCommand, PlanCommand, RunCommand, ValidateCommand};

/// Matrix CI gate evaluator and step runner
#[derive(Debug, Parser, Clone)]
#[command(name = "gantry")]
#[command(author = "Gantry Contributors")]
#[command(version = "0.1.0")]
#[command(about = "A matrix CI gate evaluator and step runner", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Execute one matrix cell
    Run(RunCommand),

    /// Fan out across platforms
    Matrix(MatrixCommand),

    /// Show gate decisions without executing
    Plan(PlanCommand),

    /// Validate a pipeline configuration
    Validate(ValidateCommand),
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
