//! Per-file rule selection.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use super::model::{FileStatus, Rule, RuleSet};
use crate::data::yaml::to_yaml_block;
use crate::glob::GlobCache;

/// Rules selected for one changed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchResult {
    /// Applicable rules grouped by the pattern that declared them.
    ///
    /// Each block reads `Rules from pattern: <pattern>` followed by the
    /// rules as YAML; blocks are separated by a blank line. A rule declared
    /// under two matched patterns shows up in both blocks.
    pub rendered_block: String,
    /// Patterns matching the file, in configuration order.
    pub matched_patterns: Vec<String>,
    /// Applicable rules, unique by id, in first-matched order.
    pub applicable_rules: Vec<Rule>,
}

impl MatchResult {
    /// Returns true if no rule applies to the file.
    pub fn is_empty(&self) -> bool {
        self.applicable_rules.is_empty()
    }

    /// Iterates over the applicable rule ids.
    pub fn rule_ids(&self) -> impl Iterator<Item = &str> {
        self.applicable_rules.iter().map(|r| r.id.as_str())
    }
}

/// Selects the rules from `rule_set` that apply to `file_path`.
pub fn filter_rules_for_file(
    rule_set: &RuleSet,
    file_path: &str,
    file_status: &FileStatus,
) -> MatchResult {
    filter_rules_with_cache(&mut GlobCache::new(), rule_set, file_path, file_status)
}

/// Like [`filter_rules_for_file`], reusing compiled patterns from `cache`.
pub fn filter_rules_with_cache(
    cache: &mut GlobCache,
    rule_set: &RuleSet,
    file_path: &str,
    file_status: &FileStatus,
) -> MatchResult {
    if rule_set.is_empty() {
        return MatchResult::default();
    }

    let matched: Vec<_> = rule_set
        .iter()
        .filter(|entry| cache.matches(file_path, &entry.pattern))
        .collect();
    debug!(
        "{file_path}: {} of {} patterns matched",
        matched.len(),
        rule_set.len()
    );

    let mut seen = HashSet::new();
    let mut applicable_rules = Vec::new();
    for entry in &matched {
        for rule in &entry.rules {
            if !rule.applies_to(file_status) {
                debug!(
                    "{file_path}: skipping {} (new files only, status {file_status})",
                    rule.id
                );
                continue;
            }
            if seen.insert(rule.id.as_str()) {
                applicable_rules.push(rule.clone());
            }
        }
    }

    let matched_patterns = matched.iter().map(|e| e.pattern.clone()).collect();
    if applicable_rules.is_empty() {
        return MatchResult {
            rendered_block: String::new(),
            matched_patterns,
            applicable_rules,
        };
    }

    let mut blocks = Vec::new();
    for entry in &matched {
        let block_rules: Vec<&Rule> = entry
            .rules
            .iter()
            .filter(|rule| seen.contains(rule.id.as_str()))
            .collect();
        if block_rules.is_empty() {
            continue;
        }
        let rendered = block_rules
            .iter()
            .map(|rule| rule.to_value())
            .collect::<Result<Vec<_>, _>>()
            .map_err(anyhow::Error::from)
            .and_then(|values| to_yaml_block(&values));
        match rendered {
            Ok(yaml) => blocks.push(format!("Rules from pattern: {}\n{yaml}", entry.pattern)),
            Err(e) => warn!("Cannot render rules for pattern {:?}: {e:#}", entry.pattern),
        }
    }

    MatchResult {
        rendered_block: blocks.join("\n\n"),
        matched_patterns,
        applicable_rules,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::PatternList;

    fn sample_rules() -> RuleSet {
        let mut rules = RuleSet::new();
        rules.insert(
            "**/*.sql",
            vec![
                Rule::new("sql-style", "Use lowercase keywords"),
                Rule::new("sql-header", "New models need a header").new_files_only(),
            ],
        );
        rules.insert(
            "**/models/**/*.sql",
            vec![
                Rule::new("model-tests", "Models need tests")
                    .with_context(Some(PatternList::from("**/*.yml"))),
                Rule::new("sql-style", "Use lowercase keywords"),
            ],
        );
        rules.insert("**/*.py", vec![Rule::new("py-types", "Annotate")]);
        rules
    }

    fn ids(result: &MatchResult) -> Vec<&str> {
        result.rule_ids().collect()
    }

    #[test]
    fn empty_rule_set() {
        let result = filter_rules_for_file(&RuleSet::new(), "a.sql", &FileStatus::Added);
        assert_eq!(result, MatchResult::default());
    }

    #[test]
    fn no_pattern_matches() {
        let result = filter_rules_for_file(&sample_rules(), "README.md", &FileStatus::Added);
        assert!(result.matched_patterns.is_empty());
        assert!(result.is_empty());
        assert!(result.rendered_block.is_empty());
    }

    #[test]
    fn matched_patterns_in_declaration_order() {
        let result = filter_rules_for_file(
            &sample_rules(),
            "dbt/models/core/orders.sql",
            &FileStatus::Modified,
        );
        assert_eq!(
            result.matched_patterns,
            vec!["**/*.sql", "**/models/**/*.sql"]
        );
    }

    #[test]
    fn new_only_rule_excluded_for_modified() {
        let result = filter_rules_for_file(&sample_rules(), "a/b.sql", &FileStatus::Modified);
        assert_eq!(ids(&result), vec!["sql-style"]);
    }

    #[test]
    fn new_only_rule_included_for_added() {
        let result = filter_rules_for_file(&sample_rules(), "a/b.sql", &FileStatus::Added);
        assert_eq!(ids(&result), vec!["sql-style", "sql-header"]);
    }

    #[test]
    fn duplicate_ids_deduplicated_first_seen_order() {
        let result = filter_rules_for_file(
            &sample_rules(),
            "dbt/models/core/orders.sql",
            &FileStatus::Added,
        );
        assert_eq!(ids(&result), vec!["sql-style", "sql-header", "model-tests"]);
    }

    #[test]
    fn shared_rule_rendered_under_each_pattern() {
        let result = filter_rules_for_file(
            &sample_rules(),
            "dbt/models/core/orders.sql",
            &FileStatus::Modified,
        );
        let blocks: Vec<&str> = result.rendered_block.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with("Rules from pattern: **/*.sql\n"));
        assert!(blocks[1].starts_with("Rules from pattern: **/models/**/*.sql\n"));
        assert!(blocks[0].contains("sql-style"));
        assert!(!blocks[0].contains("sql-header"));
        assert!(blocks[1].contains("sql-style"));
        assert!(blocks[1].contains("model-tests"));
        assert_eq!(result.rendered_block.matches("id: sql-style").count(), 2);
    }

    #[test]
    fn matched_but_nothing_enforceable() {
        let mut rules = RuleSet::new();
        rules.insert("*.sql", vec![Rule::new("only-new", "").new_files_only()]);
        let result = filter_rules_for_file(&rules, "a.sql", &FileStatus::Modified);
        assert_eq!(result.matched_patterns, vec!["*.sql"]);
        assert!(result.is_empty());
        assert_eq!(result.rendered_block, "");
    }

    #[test]
    fn pattern_with_no_rules_still_reported() {
        let mut rules = RuleSet::new();
        rules.insert("*.sql", Vec::new());
        rules.insert("**", vec![Rule::new("all", "everything")]);
        let result = filter_rules_for_file(&rules, "a.sql", &FileStatus::Added);
        assert_eq!(result.matched_patterns, vec!["*.sql", "**"]);
        assert!(result.rendered_block.starts_with("Rules from pattern: **\n"));
    }

    #[test]
    fn configured_rules_render_as_authored() {
        let rules: RuleSet = serde_yaml::from_str(
            r#"
"*.sql":
  - severity: high
    id: 42
    enforce_on_new_only: false
    description: numeric id
"#,
        )
        .unwrap();
        let result = filter_rules_for_file(&rules, "a.sql", &FileStatus::Modified);
        assert_eq!(ids(&result), vec!["42"]);

        let block = result
            .rendered_block
            .strip_prefix("Rules from pattern: *.sql\n")
            .unwrap();
        let severity = block.find("severity: high").unwrap();
        let id = block.find("id: 42").unwrap();
        let new_only = block.find("enforce_on_new_only: false").unwrap();
        let description = block.find("description: numeric id").unwrap();
        assert!(severity < id && id < new_only && new_only < description);
    }

    #[test]
    fn cache_shared_across_files() {
        let rules = sample_rules();
        let mut cache = GlobCache::new();
        filter_rules_with_cache(&mut cache, &rules, "a.sql", &FileStatus::Added);
        filter_rules_with_cache(&mut cache, &rules, "b.py", &FileStatus::Added);
        assert_eq!(cache.len(), 3);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn applicable_ids_unique(
                decls in proptest::collection::vec(
                    (proptest::sample::select(vec!["**", "*.sql", "**/*.sql", "a/**"]),
                     proptest::collection::vec(("[a-d]", any::<bool>()), 0..4)),
                    0..5,
                ),
                path in proptest::sample::select(vec!["a.sql", "a/b.sql", "x/y/z.py"]),
                added in any::<bool>(),
            ) {
                let mut rules = RuleSet::new();
                for (pattern, list) in decls {
                    let list = list
                        .into_iter()
                        .map(|(id, new_only)| {
                            let rule = Rule::new(id, "");
                            if new_only { rule.new_files_only() } else { rule }
                        })
                        .collect();
                    rules.insert(pattern, list);
                }
                let status = if added { FileStatus::Added } else { FileStatus::Modified };
                let result = filter_rules_for_file(&rules, path, &status);
                let mut seen = HashSet::new();
                for id in result.rule_ids() {
                    prop_assert!(seen.insert(id.to_string()));
                }
            }
        }
    }
}
