//! # pr-quality-check
//!
//! Decides which configured quality rules apply to each file of a change
//! under review.
//!
//! ## Features
//!
//! - Extended glob matching with `**`, `*`, `?` and `{a,b}` alternation
//! - Per-file rule selection with new-files-only rules
//! - Context candidate narrowing for rules that need other files
//!
//! ## Quick Start
//!
//! ```rust
//! use pr_quality_check::rules::{filter_rules_for_file, FileStatus, Rule, RuleSet};
//!
//! let mut rules = RuleSet::new();
//! rules.insert("**/*.sql", vec![Rule::new("sql-style", "Lowercase keywords")]);
//!
//! let result = filter_rules_for_file(&rules, "models/orders.sql", &FileStatus::Added);
//! assert_eq!(result.matched_patterns, vec!["**/*.sql"]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod glob;
pub mod rules;

pub use crate::cli::Cli;
pub use crate::error::ConfigError;

/// The current version of pr-quality-check.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
