//! Include/exclude selection of changed files.

use serde::{Deserialize, Serialize};

use super::model::PatternList;
use crate::glob::GlobCache;

fn default_include() -> PatternList {
    PatternList::from("**")
}

/// Which changed files are reviewed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSelector {
    /// Files must match one of these. Defaults to `**`.
    #[serde(default = "default_include")]
    pub include: PatternList,
    /// Files matching any of these are skipped, whatever `include` says.
    #[serde(default)]
    pub exclude: PatternList,
}

impl Default for FileSelector {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: PatternList::default(),
        }
    }
}

impl FileSelector {
    /// Returns true if `path` passes the selector.
    ///
    /// Empty pattern strings are ignored on both sides, and an empty
    /// include list selects nothing.
    pub fn is_selected(&self, cache: &mut GlobCache, path: &str) -> bool {
        let excluded = self
            .exclude
            .patterns()
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| cache.matches(path, p));
        if excluded {
            return false;
        }

        self.include
            .patterns()
            .iter()
            .filter(|p| !p.is_empty())
            .any(|p| cache.matches(path, p))
    }

    /// Returns the selected paths, in input order.
    pub fn select<'a, I>(&self, paths: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut cache = GlobCache::new();
        paths
            .into_iter()
            .filter(|path| self.is_selected(&mut cache, path))
            .collect()
    }
}
