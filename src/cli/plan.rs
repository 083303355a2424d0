//! Plan command: runs rule selection over a whole change set.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{load_changes, resolve_config_path, QualityConfig};
use crate::data::{render, OutputFormat, ReviewPlan};

/// Plan command options.
#[derive(Parser)]
pub struct PlanCommand {
    /// YAML or JSON list of changed files (`path`/`filename` and `status`).
    #[arg(long, value_name = "FILE")]
    pub changes: PathBuf,

    /// Path to the configuration file (defaults to $PR_QUALITY_CHECK_CONFIG,
    /// then .github/pr-quality-check.yml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl PlanCommand {
    /// Executes the plan command.
    pub fn execute(self) -> Result<()> {
        let format: OutputFormat = self.format.parse()?;
        let config_path = resolve_config_path(self.config.as_deref(), &std::env::current_dir()?);
        let config = QualityConfig::load(&config_path)?;
        let changes = load_changes(&self.changes).context("Failed to load change list")?;

        let plan = ReviewPlan::build(&config, &changes);
        println!("{}", render(&plan, format, ReviewPlan::to_text)?);
        Ok(())
    }
}
