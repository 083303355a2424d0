//! Context candidate narrowing.
//!
//! A rule that needs context may only draw on changed files matching its
//! `context_filter`. Whatever a discovery step proposes is checked against
//! that same candidate list before it is used.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use super::model::{PatternList, Rule};
use crate::glob::GlobCache;

/// Reason recorded when a rule's filter leaves nothing to choose from.
pub const NO_CANDIDATES_REASON: &str = "no changed files match context_filter";

/// Reason recorded when an unfiltered rule meets an empty change set.
pub const NO_CHANGED_FILES_REASON: &str = "no changed files to draw context from";

/// Changed files a rule may use as context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextCandidates {
    /// The rule these candidates belong to.
    pub rule_id: String,
    /// Candidate paths, in change-set order.
    pub files: Vec<String>,
    /// Whether a `context_filter` narrowed the change set.
    pub filtered: bool,
}

impl ContextCandidates {
    /// Narrows `all_changed` by the rule's context filter.
    pub fn for_rule(rule: &Rule, all_changed: &[String]) -> Self {
        Self::for_rule_with_cache(&mut GlobCache::new(), rule, all_changed)
    }

    /// Like [`ContextCandidates::for_rule`], reusing compiled patterns.
    pub fn for_rule_with_cache(cache: &mut GlobCache, rule: &Rule, all_changed: &[String]) -> Self {
        let filter = rule.context_filter.as_ref().filter(|f| !f.is_empty());
        let files = narrow_with_cache(cache, filter, all_changed);
        debug!(
            "Rule {}: {} of {} changed files are context candidates",
            rule.id,
            files.len(),
            all_changed.len()
        );
        Self {
            rule_id: rule.id.clone(),
            files,
            filtered: filter.is_some(),
        }
    }

    /// Returns true if there is nothing to draw context from.
    ///
    /// Discovery must not be attempted for such a rule.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Explains why there is nothing to draw context from.
    pub fn empty_reason(&self) -> &'static str {
        if self.filtered {
            NO_CANDIDATES_REASON
        } else {
            NO_CHANGED_FILES_REASON
        }
    }

    /// Returns true if `path` is one of the candidates.
    pub fn contains(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
    }

    /// Keeps only the proposed paths that are candidates.
    ///
    /// Proposal order is kept and repeats are dropped. Anything outside the
    /// candidate list is discarded.
    pub fn accept(&self, proposed: &[String]) -> Vec<String> {
        let allowed: HashSet<&str> = self.files.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();
        let accepted: Vec<String> = proposed
            .iter()
            .filter(|path| allowed.contains(path.as_str()) && seen.insert(path.as_str()))
            .cloned()
            .collect();
        if accepted.len() < proposed.len() {
            debug!(
                "Rule {}: dropped {} proposed context files outside candidates",
                self.rule_id,
                proposed.len() - accepted.len()
            );
        }
        accepted
    }
}

/// Returns the changed files matching any pattern in `filter`.
///
/// No filter means every changed file is a candidate.
pub fn narrow_candidates(filter: Option<&PatternList>, all_changed: &[String]) -> Vec<String> {
    narrow_with_cache(&mut GlobCache::new(), filter, all_changed)
}

fn narrow_with_cache(
    cache: &mut GlobCache,
    filter: Option<&PatternList>,
    all_changed: &[String],
) -> Vec<String> {
    let Some(filter) = filter else {
        return all_changed.to_vec();
    };

    all_changed
        .iter()
        .filter(|path| {
            filter
                .patterns()
                .iter()
                .any(|pattern| cache.matches(path, pattern))
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn changed(paths: &[&str]) -> Vec<String> {
        paths.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_filter_is_identity() {
        let all = changed(&["a.py", "b.sql"]);
        assert_eq!(narrow_candidates(None, &all), all);
    }

    #[test]
    fn single_pattern_filter() {
        let all = changed(&["a.py", "b.sql"]);
        let filter = PatternList::from("*.py");
        assert_eq!(narrow_candidates(Some(&filter), &all), vec!["a.py"]);
    }

    #[test]
    fn pattern_list_is_union() {
        let all = changed(&["a.py", "b.sql", "c.md", "docs/d.md"]);
        let filter = PatternList::from(vec!["*.py".to_string(), "**/*.md".to_string()]);
        assert_eq!(
            narrow_candidates(Some(&filter), &all),
            vec!["a.py", "c.md", "docs/d.md"]
        );
    }

    #[test]
    fn empty_filter_list_treated_as_absent() {
        let rule = Rule::new("r", "").with_context(Some(PatternList::Many(Vec::new())));
        let candidates = ContextCandidates::for_rule(&rule, &changed(&["a.py"]));
        assert!(!candidates.filtered);
        assert_eq!(candidates.files, vec!["a.py"]);
    }

    #[test]
    fn filter_matching_nothing_is_empty() {
        let rule = Rule::new("r", "").with_context(Some(PatternList::from("**/*.go")));
        let candidates = ContextCandidates::for_rule(&rule, &changed(&["a.py", "b.sql"]));
        assert!(candidates.filtered);
        assert!(candidates.is_empty());
    }

    #[test]
    fn empty_reason_names_the_cause() {
        let filtered = Rule::new("r", "").with_context(Some(PatternList::from("**/*.go")));
        let candidates = ContextCandidates::for_rule(&filtered, &changed(&["a.py"]));
        assert_eq!(candidates.empty_reason(), NO_CANDIDATES_REASON);

        let unfiltered = Rule::new("r", "").with_context(None);
        let candidates = ContextCandidates::for_rule(&unfiltered, &[]);
        assert!(candidates.is_empty());
        assert_eq!(candidates.empty_reason(), NO_CHANGED_FILES_REASON);
    }

    #[test]
    fn accept_drops_paths_outside_candidates() {
        let rule = Rule::new("r", "").with_context(Some(PatternList::from("*.py")));
        let candidates = ContextCandidates::for_rule(&rule, &changed(&["a.py", "b.sql"]));
        assert_eq!(candidates.files, vec!["a.py"]);
        assert_eq!(
            candidates.accept(&changed(&["a.py", "b.sql"])),
            vec!["a.py"]
        );
    }

    #[test]
    fn accept_keeps_order_and_drops_repeats() {
        let candidates = ContextCandidates::for_rule(
            &Rule::new("r", "").with_context(None),
            &changed(&["a", "b", "c"]),
        );
        assert_eq!(
            candidates.accept(&changed(&["c", "ghost", "a", "c"])),
            vec!["c", "a"]
        );
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn candidates_subset_of_changed(
                all in proptest::collection::vec("[a-c]{1,2}(/[a-c]{1,2})?\\.(py|sql)", 0..8),
                pattern in proptest::sample::select(vec!["*.py", "**/*.sql", "a/**", "**"]),
            ) {
                let filter = PatternList::from(pattern);
                for path in narrow_candidates(Some(&filter), &all) {
                    prop_assert!(all.contains(&path));
                }
            }

            #[test]
            fn accepted_subset_of_candidates(
                all in proptest::collection::vec("[a-c]{1,2}\\.(py|sql)", 0..8),
                proposed in proptest::collection::vec("[a-d]{1,2}\\.(py|sql|md)", 0..8),
            ) {
                let rule = Rule::new("r", "").with_context(Some(PatternList::from("*.py")));
                let candidates = ContextCandidates::for_rule(&rule, &all);
                for path in candidates.accept(&proposed) {
                    prop_assert!(candidates.contains(&path));
                }
            }
        }
    }
}
