//! Context discovery for rules that need more than the file under review.

use std::collections::BTreeSet;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::model::Rule;
use super::narrow::ContextCandidates;
use crate::glob::GlobCache;

/// What a discovery backend is asked about one rule.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest<'a> {
    /// The rule needing context.
    pub rule: &'a Rule,
    /// The file under review.
    pub file_path: &'a str,
    /// The only files the backend may choose from.
    pub candidates: &'a [String],
}

/// A backend's proposal of context files for one rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryResponse {
    /// Proposed context paths.
    #[serde(default)]
    pub context_files: Vec<String>,
    /// Why these files were proposed.
    #[serde(default)]
    pub reason: String,
}

/// Picks context files for a rule from its candidates.
///
/// Typically backed by a language model. Its answers are untrusted: every
/// proposed path is checked against the candidates it was given.
pub trait ContextDiscovery {
    /// Proposes context files for `request.rule`.
    fn discover(&self, request: &DiscoveryRequest<'_>) -> Result<DiscoveryResponse>;
}

/// How context resolution ended for one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContextOutcome {
    /// Discovery ran and its answer was validated.
    Resolved,
    /// The context filter left no candidates; discovery was not called.
    NoCandidates,
    /// Discovery returned an error.
    DiscoveryFailed,
}

/// Context resolution record for one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleContext {
    /// The rule id.
    pub rule_id: String,
    /// How resolution ended.
    pub outcome: ContextOutcome,
    /// Files the rule was allowed to draw from.
    pub candidates: Vec<String>,
    /// Accepted context files.
    pub context_files: Vec<String>,
    /// Backend reason, or why discovery was skipped or failed.
    pub reason: String,
}

/// Context resolution for every context-requiring rule of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContextReport {
    /// Union of accepted files across rules, sorted and unique.
    pub context_files: Vec<String>,
    /// One record per rule with `requires_context`, in rule order.
    pub per_rule: Vec<RuleContext>,
}

/// Resolves context for one rule.
pub fn resolve_rule_context<D: ContextDiscovery + ?Sized>(
    discovery: &D,
    cache: &mut GlobCache,
    rule: &Rule,
    file_path: &str,
    all_changed: &[String],
) -> RuleContext {
    let candidates = ContextCandidates::for_rule_with_cache(cache, rule, all_changed);

    if candidates.is_empty() {
        debug!("Rule {}: no context candidates, skipping discovery", rule.id);
        return RuleContext {
            rule_id: rule.id.clone(),
            outcome: ContextOutcome::NoCandidates,
            candidates: Vec::new(),
            context_files: Vec::new(),
            reason: candidates.empty_reason().to_string(),
        };
    }

    let request = DiscoveryRequest {
        rule,
        file_path,
        candidates: &candidates.files,
    };
    match discovery.discover(&request) {
        Ok(response) => RuleContext {
            rule_id: rule.id.clone(),
            outcome: ContextOutcome::Resolved,
            context_files: candidates.accept(&response.context_files),
            candidates: candidates.files,
            reason: response.reason,
        },
        Err(e) => {
            warn!("Context discovery failed for rule {} on {file_path}: {e:#}", rule.id);
            RuleContext {
                rule_id: rule.id.clone(),
                outcome: ContextOutcome::DiscoveryFailed,
                candidates: candidates.files,
                context_files: Vec::new(),
                reason: format!("discovery failed: {e:#}"),
            }
        }
    }
}

/// Resolves context for every rule in `rules` that requires it.
pub fn resolve_context<D: ContextDiscovery + ?Sized>(
    discovery: &D,
    file_path: &str,
    all_changed: &[String],
    rules: &[Rule],
) -> ContextReport {
    let mut cache = GlobCache::new();
    let per_rule: Vec<RuleContext> = rules
        .iter()
        .filter(|rule| rule.requires_context)
        .map(|rule| resolve_rule_context(discovery, &mut cache, rule, file_path, all_changed))
        .collect();

    let context_files = per_rule
        .iter()
        .flat_map(|r| r.context_files.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    ContextReport {
        context_files,
        per_rule,
    }
}
