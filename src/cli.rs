//! CLI interface for pr-quality-check.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod matches;
pub mod plan;
pub mod rules;

/// pr-quality-check: glob-driven quality rule selection for code review.
#[derive(Parser)]
#[command(name = "pr-quality-check")]
#[command(about = "Selects the quality rules that apply to each changed file", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Tests whether a path matches a glob pattern (exit status 1 if not).
    Matches(matches::MatchesCommand),
    /// Shows the rules applying to one changed file.
    Rules(rules::RulesCommand),
    /// Builds the review plan for a list of changed files.
    Plan(plan::PlanCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Matches(matches_cmd) => matches_cmd.execute(),
            Commands::Rules(rules_cmd) => rules_cmd.execute(),
            Commands::Plan(plan_cmd) => plan_cmd.execute(),
        }
    }
}
