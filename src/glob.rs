//! Extended glob matching for repository-relative file paths.
//!
//! The dialect understood here:
//!
//! - `*` matches a run of characters within one path segment
//! - `?` matches exactly one character other than `/`
//! - `**/` matches zero or more whole directories
//! - `/**` matches `/` followed by zero or more segments
//! - a bare `**` matches anything, separators included
//! - `{a,b}` tries the whole pattern once per option
//!
//! Every other character is literal, including `[` and `]`. Dotfiles get no
//! special treatment. Input paths have `\` rewritten to `/` before matching,
//! patterns are taken as written.

pub mod braces;
pub mod compile;
pub mod matcher;
pub mod normalize;

pub use braces::expand_braces;
pub use compile::{compile_pattern, pattern_to_regex};
pub use matcher::{matches, Glob, GlobCache};
pub use normalize::normalize_path;
