//! Review plan: the rule engine run over a whole change set.

use serde::Serialize;
use tracing::debug;

use crate::config::QualityConfig;
use crate::glob::GlobCache;
use crate::rules::{
    filter_rules_with_cache, ContextCandidates, FileChange, FileStatus, MatchResult,
};

/// Rules and context candidates for every reviewed file of a change.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewPlan {
    /// Reviewed files, in change-set order.
    pub files: Vec<FilePlan>,
    /// Changed files left out by the include/exclude selector.
    pub skipped_files: Vec<String>,
    /// Summary statistics.
    pub summary: PlanSummary,
}

/// Review plan for one changed file.
#[derive(Debug, Clone, Serialize)]
pub struct FilePlan {
    /// File path.
    pub path: String,
    /// Change status.
    pub status: FileStatus,
    /// Patterns matching the file.
    pub matched_patterns: Vec<String>,
    /// Ids of the applicable rules.
    pub rules: Vec<String>,
    /// Applicable rules grouped by pattern, as embedded in review prompts.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub rendered_rules: String,
    /// Context candidates per context-requiring rule.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub context: Vec<ContextPlan>,
}

/// Context candidates for one rule on one file.
#[derive(Debug, Clone, Serialize)]
pub struct ContextPlan {
    /// Rule id.
    pub rule_id: String,
    /// Changed files the rule may draw context from.
    pub candidates: Vec<String>,
    /// Set when discovery would be skipped for this rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped_reason: Option<String>,
}

/// Summary statistics for a review plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    /// Number of changed files.
    pub total_files: usize,
    /// Number of files passing the selector.
    pub reviewed_files: usize,
    /// Number of reviewed files with at least one applicable rule.
    pub files_with_rules: usize,
    /// Applicable rules summed over files.
    pub applicable_rules: usize,
    /// Context-requiring rules whose discovery would be skipped.
    pub skipped_context_rules: usize,
}

impl FilePlan {
    fn new(
        cache: &mut GlobCache,
        change: &FileChange,
        result: MatchResult,
        all_changed: &[String],
    ) -> Self {
        let context = result
            .applicable_rules
            .iter()
            .filter(|rule| rule.requires_context)
            .map(|rule| {
                let candidates = ContextCandidates::for_rule_with_cache(cache, rule, all_changed);
                ContextPlan {
                    skipped_reason: candidates
                        .is_empty()
                        .then(|| candidates.empty_reason().to_string()),
                    rule_id: candidates.rule_id,
                    candidates: candidates.files,
                }
            })
            .collect();

        Self {
            path: change.path.clone(),
            status: change.status.clone(),
            rules: result.rule_ids().map(ToString::to_string).collect(),
            matched_patterns: result.matched_patterns,
            rendered_rules: result.rendered_block,
            context,
        }
    }
}

impl ReviewPlan {
    /// Runs selection, rule filtering and context narrowing over `changes`.
    pub fn build(config: &QualityConfig, changes: &[FileChange]) -> Self {
        let mut cache = GlobCache::new();
        let all_changed: Vec<String> = changes.iter().map(|c| c.path.clone()).collect();

        let mut files = Vec::new();
        let mut skipped_files = Vec::new();
        for change in changes {
            if !config.files.is_selected(&mut cache, &change.path) {
                debug!("{}: not selected for review", change.path);
                skipped_files.push(change.path.clone());
                continue;
            }
            let result =
                filter_rules_with_cache(&mut cache, &config.rules, &change.path, &change.status);
            files.push(FilePlan::new(&mut cache, change, result, &all_changed));
        }

        let summary = PlanSummary {
            total_files: changes.len(),
            reviewed_files: files.len(),
            files_with_rules: files.iter().filter(|f| !f.rules.is_empty()).count(),
            applicable_rules: files.iter().map(|f| f.rules.len()).sum(),
            skipped_context_rules: files
                .iter()
                .flat_map(|f| &f.context)
                .filter(|c| c.skipped_reason.is_some())
                .count(),
        };
        debug!("Compiled {} distinct patterns for the plan", cache.len());

        Self {
            files,
            skipped_files,
            summary,
        }
    }

    /// Renders the plan for terminal output.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for file in &self.files {
            out.push_str(&format!("📄 {} ({})\n", file.path, file.status));
            if file.matched_patterns.is_empty() {
                out.push_str("   No matching patterns\n");
                continue;
            }
            out.push_str(&format!(
                "   Matched patterns: {}\n",
                file.matched_patterns.join(", ")
            ));
            if file.rules.is_empty() {
                out.push_str("   No enforceable rules\n");
            } else {
                out.push_str(&format!("   Rules: {}\n", file.rules.join(", ")));
            }
            for context in &file.context {
                match &context.skipped_reason {
                    Some(reason) => out.push_str(&format!(
                        "   Context for {}: skipped ({reason})\n",
                        context.rule_id
                    )),
                    None => out.push_str(&format!(
                        "   Context for {}: {}\n",
                        context.rule_id,
                        context.candidates.join(", ")
                    )),
                }
            }
        }
        if !self.skipped_files.is_empty() {
            out.push_str(&format!(
                "⏭️  Not reviewed: {}\n",
                self.skipped_files.join(", ")
            ));
        }
        out.push_str(&format!(
            "📊 {} of {} files reviewed, {} with rules, {} rules applicable",
            self.summary.reviewed_files,
            self.summary.total_files,
            self.summary.files_with_rules,
            self.summary.applicable_rules
        ));
        out
    }
}
