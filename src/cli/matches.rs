//! Matches command: tests one path against one glob pattern.

use anyhow::Result;
use clap::Parser;

use crate::glob::{expand_braces, matches};

/// Matches command options.
#[derive(Parser)]
pub struct MatchesCommand {
    /// File path to test (backslash separators are accepted).
    #[arg(value_name = "PATH")]
    pub path: String,

    /// Glob pattern to test against.
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Prints the verdict and the brace expansions tried.
    #[arg(long, short)]
    pub verbose: bool,
}

impl MatchesCommand {
    /// Executes the matches command.
    ///
    /// Exits with status 1 when the path does not match.
    pub fn execute(self) -> Result<()> {
        let matched = matches(&self.path, &self.pattern);

        if self.verbose {
            for expanded in expand_braces(&self.pattern) {
                println!("  {expanded}");
            }
            let verdict = if matched { "matches" } else { "does not match" };
            println!("{} {verdict} {}", self.path, self.pattern);
        }

        if !matched {
            std::process::exit(1);
        }
        Ok(())
    }
}
