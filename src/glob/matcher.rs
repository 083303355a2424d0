//! Whole-path glob matching.

use std::collections::{HashMap, HashSet};

use regex::Regex;
use tracing::warn;

use super::{compile_pattern, expand_braces, normalize_path};

/// A glob pattern compiled into one matcher per brace expansion.
#[derive(Debug, Clone)]
pub struct Glob {
    pattern: String,
    matchers: Vec<Regex>,
}

impl Glob {
    /// Expands and compiles `pattern`.
    ///
    /// Duplicate expansions compile once. An expansion that fails to compile
    /// is logged and dropped, so it can never produce a match.
    pub fn new(pattern: &str) -> Self {
        let mut expansions = expand_braces(pattern);
        let mut seen = HashSet::new();
        expansions.retain(|expanded| seen.insert(expanded.clone()));

        let matchers = expansions
            .iter()
            .filter_map(|expanded| match compile_pattern(expanded) {
                Ok(re) => Some(re),
                Err(e) => {
                    warn!("Ignoring glob expansion {expanded:?} of {pattern:?}: {e}");
                    None
                }
            })
            .collect();

        Self {
            pattern: pattern.to_string(),
            matchers,
        }
    }

    /// Returns the pattern this glob was built from.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns true if any expansion matches the whole normalized `path`.
    pub fn is_match(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.matchers.iter().any(|re| re.is_match(&path))
    }
}

/// Compiled globs keyed by pattern text, kept for the length of one run.
#[derive(Debug, Default)]
pub struct GlobCache {
    compiled: HashMap<String, Glob>,
}

impl GlobCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled glob for `pattern`, compiling it on first use.
    pub fn get(&mut self, pattern: &str) -> &Glob {
        self.compiled
            .entry(pattern.to_string())
            .or_insert_with(|| Glob::new(pattern))
    }

    /// Matches `path` against `pattern` through the cache.
    pub fn matches(&mut self, path: &str, pattern: &str) -> bool {
        self.get(pattern).is_match(path)
    }

    /// Number of distinct patterns compiled so far.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Returns true if nothing has been compiled yet.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

/// Returns true if `path` matches the glob `pattern`.
///
/// ```
/// use pr_quality_check::glob::matches;
///
/// assert!(matches("tests/dbt/models/aaa.sql", "**/*.sql"));
/// assert!(!matches("dir/file.txt", "dir*.txt"));
/// ```
pub fn matches(path: &str, pattern: &str) -> bool {
    Glob::new(pattern).is_match(path)
}
