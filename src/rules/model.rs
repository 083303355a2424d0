//! Rule configuration and change-set data types.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::{Mapping, Value};
use tracing::warn;

/// One pattern or a list of them, as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternList {
    /// A single pattern string.
    One(String),
    /// A list of pattern strings.
    Many(Vec<String>),
}

impl PatternList {
    /// Returns the patterns as a slice, whichever form was written.
    pub fn patterns(&self) -> &[String] {
        match self {
            Self::One(pattern) => std::slice::from_ref(pattern),
            Self::Many(patterns) => patterns,
        }
    }

    /// Returns true if no pattern was given.
    pub fn is_empty(&self) -> bool {
        self.patterns().is_empty()
    }
}

impl Default for PatternList {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

impl From<&str> for PatternList {
    fn from(pattern: &str) -> Self {
        Self::One(pattern.to_string())
    }
}

impl From<Vec<String>> for PatternList {
    fn from(patterns: Vec<String>) -> Self {
        Self::Many(patterns)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// A quality rule as declared under a glob pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Identifier, unique within one configuration.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    /// What the rule asks reviewers to check.
    #[serde(default)]
    pub description: String,
    /// Only applies to files the change adds.
    #[serde(default, skip_serializing_if = "is_false")]
    pub enforce_on_new_only: bool,
    /// Judging the rule needs other changed files as context.
    #[serde(default, skip_serializing_if = "is_false")]
    pub requires_context: bool,
    /// Restricts which changed files may serve as context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_filter: Option<PatternList>,
    /// Any further keys, kept in declaration order for rendering.
    #[serde(flatten)]
    pub extra: Mapping,
    /// The mapping exactly as written in configuration.
    #[serde(skip)]
    authored: Option<Mapping>,
}

/// Accepts any scalar id; `id: 42` names the rule `"42"`.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        Value::Bool(id) => Ok(id.to_string()),
        other => Err(D::Error::custom(format!(
            "rule id must be a scalar, got {}",
            kind(&other)
        ))),
    }
}

impl Rule {
    /// Creates a rule with the given id and description and no flags set.
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            enforce_on_new_only: false,
            requires_context: false,
            context_filter: None,
            extra: Mapping::new(),
            authored: None,
        }
    }

    /// Marks the rule as applying to added files only.
    #[must_use]
    pub fn new_files_only(mut self) -> Self {
        self.enforce_on_new_only = true;
        self.authored = None;
        self
    }

    /// Marks the rule as needing context, optionally narrowed by `filter`.
    #[must_use]
    pub fn with_context(mut self, filter: Option<PatternList>) -> Self {
        self.requires_context = true;
        self.context_filter = filter;
        self.authored = None;
        self
    }

    /// Returns the rule as YAML for display.
    ///
    /// A rule read from configuration keeps its authored keys, values and
    /// key order; a rule built in code serializes its fields.
    pub fn to_value(&self) -> Result<Value, serde_yaml::Error> {
        match &self.authored {
            Some(mapping) => Ok(Value::Mapping(mapping.clone())),
            None => serde_yaml::to_value(self),
        }
    }

    /// Returns true if the rule applies to a file with the given status.
    pub fn applies_to(&self, status: &FileStatus) -> bool {
        !self.enforce_on_new_only || *status == FileStatus::Added
    }
}

/// The rules declared under one glob pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRules {
    /// The glob pattern.
    pub pattern: String,
    /// Rules in declaration order.
    pub rules: Vec<Rule>,
}

/// Mapping from glob pattern to rules, in declaration order.
///
/// Decoding is tolerant: configuration is hand-written, so shape problems
/// drop the offending entry with a warning rather than failing the run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    entries: Vec<PatternRules>,
}

impl RuleSet {
    /// Creates an empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the rules for `pattern`.
    ///
    /// A pattern already present keeps its position and has its rules replaced.
    pub fn insert(&mut self, pattern: impl Into<String>, rules: Vec<Rule>) {
        let pattern = pattern.into();
        match self.entries.iter_mut().find(|e| e.pattern == pattern) {
            Some(entry) => entry.rules = rules,
            None => self.entries.push(PatternRules { pattern, rules }),
        }
    }

    /// Iterates over patterns and their rules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &PatternRules> {
        self.entries.iter()
    }

    /// Returns the rules declared under `pattern`, or an empty slice.
    pub fn rules_for(&self, pattern: &str) -> &[Rule] {
        self.entries
            .iter()
            .find(|e| e.pattern == pattern)
            .map_or(&[], |e| e.rules.as_slice())
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no pattern is declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a rule set from an already-parsed YAML value.
    pub fn from_value(value: &Value) -> Self {
        let mut rule_set = Self::new();

        let mapping = match value {
            Value::Mapping(mapping) => mapping,
            Value::Null => return rule_set,
            other => {
                warn!("Ignoring rules section: expected a mapping, got {}", kind(other));
                return rule_set;
            }
        };

        for (key, rules) in mapping {
            let Some(pattern) = key.as_str() else {
                warn!("Ignoring rules entry with non-string pattern {key:?}");
                continue;
            };
            rule_set.insert(pattern, decode_rules(pattern, rules));
        }

        rule_set
    }
}

impl FromIterator<(String, Vec<Rule>)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, Vec<Rule>)>>(iter: I) -> Self {
        let mut rule_set = Self::new();
        for (pattern, rules) in iter {
            rule_set.insert(pattern, rules);
        }
        rule_set
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

/// Decodes the value under one pattern; anything but a list means no rules.
fn decode_rules(pattern: &str, value: &Value) -> Vec<Rule> {
    let items = match value {
        Value::Sequence(items) => items,
        Value::Null => return Vec::new(),
        other => {
            warn!(
                "Pattern {pattern:?}: expected a list of rules, got {}; treating as no rules",
                kind(other)
            );
            return Vec::new();
        }
    };

    items
        .iter()
        .filter_map(|item| match serde_yaml::from_value::<Rule>(item.clone()) {
            Ok(mut rule) => {
                rule.authored = item.as_mapping().cloned();
                Some(rule)
            }
            Err(e) => {
                warn!("Pattern {pattern:?}: skipping malformed rule: {e}");
                None
            }
        })
        .collect()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Change status of a file, as reported by the code host.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FileStatus {
    /// Newly created.
    Added,
    /// Content changed.
    #[default]
    Modified,
    /// Deleted.
    Removed,
    /// Moved, possibly with edits.
    Renamed,
    /// Copied from another path.
    Copied,
    /// Mode or metadata change.
    Changed,
    /// Listed without changes.
    Unchanged,
    /// Any status string not listed above, kept verbatim.
    Other(String),
}

impl FileStatus {
    /// Returns the status string as the code host spells it.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Other(status) => status,
        }
    }
}

impl From<&str> for FileStatus {
    fn from(status: &str) -> Self {
        match status {
            "added" => Self::Added,
            "modified" => Self::Modified,
            "removed" => Self::Removed,
            "renamed" => Self::Renamed,
            "copied" => Self::Copied,
            "changed" => Self::Changed,
            "unchanged" => Self::Unchanged,
            other => {
                tracing::debug!("Unknown file status {other:?}, keeping verbatim");
                Self::Other(other.to_string())
            }
        }
    }
}

impl From<String> for FileStatus {
    fn from(status: String) -> Self {
        Self::from(status.as_str())
    }
}

impl From<FileStatus> for String {
    fn from(status: FileStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::str::FromStr for FileStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A file touched by the change under review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    /// Repository-relative path.
    #[serde(alias = "filename")]
    pub path: String,
    /// Change status; missing means `modified`.
    #[serde(default)]
    pub status: FileStatus,
}

impl FileChange {
    /// Creates a change record.
    pub fn new(path: impl Into<String>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            status,
        }
    }
}
