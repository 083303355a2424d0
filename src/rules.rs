//! Quality rule selection for changed files.
//!
//! Given a [`RuleSet`] mapping glob patterns to rules, [`filter_rules_for_file`]
//! picks the rules applying to one changed file, and [`ContextCandidates`]
//! bounds which other changed files a context-requiring rule may look at.

pub mod discovery;
pub mod filter;
pub mod model;
pub mod narrow;
pub mod select;

pub use discovery::{
    resolve_context, resolve_rule_context, ContextDiscovery, ContextOutcome, ContextReport,
    DiscoveryRequest, DiscoveryResponse, RuleContext,
};
pub use filter::{filter_rules_for_file, filter_rules_with_cache, MatchResult};
pub use model::{FileChange, FileStatus, PatternList, PatternRules, Rule, RuleSet};
pub use narrow::{
    narrow_candidates, ContextCandidates, NO_CANDIDATES_REASON, NO_CHANGED_FILES_REASON,
};
pub use select::FileSelector;
