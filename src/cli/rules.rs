//! Rules command: shows which rules apply to one file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{resolve_config_path, QualityConfig};
use crate::data::{render, OutputFormat};
use crate::rules::{filter_rules_for_file, FileStatus, MatchResult};

/// Rules command options.
#[derive(Parser)]
pub struct RulesCommand {
    /// Path of the changed file.
    #[arg(long, value_name = "PATH")]
    pub file: String,

    /// Change status of the file (added, modified, removed, renamed, ...).
    #[arg(long, default_value = "modified")]
    pub status: String,

    /// Path to the configuration file (defaults to $PR_QUALITY_CHECK_CONFIG,
    /// then .github/pr-quality-check.yml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format: text (default), json, yaml.
    #[arg(long, default_value = "text")]
    pub format: String,
}

impl RulesCommand {
    /// Executes the rules command.
    pub fn execute(self) -> Result<()> {
        let format: OutputFormat = self.format.parse()?;
        let config_path = resolve_config_path(self.config.as_deref(), &std::env::current_dir()?);
        let config = QualityConfig::load(&config_path)
            .with_context(|| format!("Failed to load rules for {}", self.file))?;

        let status = FileStatus::from(self.status.as_str());
        let result = filter_rules_for_file(&config.rules, &self.file, &status);

        println!("{}", render(&result, format, format_result)?);
        Ok(())
    }
}

fn format_result(result: &MatchResult) -> String {
    if result.matched_patterns.is_empty() {
        return "No matching patterns".to_string();
    }

    let mut out = format!("Matched patterns: {}\n", result.matched_patterns.join(", "));
    if result.is_empty() {
        out.push_str("No enforceable rules");
    } else {
        out.push('\n');
        out.push_str(&result.rendered_block);
    }
    out
}
