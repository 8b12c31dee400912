use crate::domain::version::VersionBump;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Release category of a merged branch, decided by its name prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Breaking,
    Feature,
    Fix,
    Invalid,
}

impl Category {
    /// The bump this category applies, or `None` when no release is produced
    pub fn bump(&self) -> Option<VersionBump> {
        match self {
            Category::Breaking => Some(VersionBump::Major),
            Category::Feature => Some(VersionBump::Minor),
            Category::Fix => Some(VersionBump::Patch),
            Category::Invalid => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Category::Breaking => "breaking",
            Category::Feature => "feature",
            Category::Fix => "fix",
            Category::Invalid => "invalid",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One branch-name prefix and the category it selects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixRule {
    pub prefix: String,
    pub category: Category,
}

impl PrefixRule {
    pub fn new(prefix: impl Into<String>, category: Category) -> Self {
        PrefixRule {
            prefix: prefix.into(),
            category,
        }
    }
}

/// Returns the built-in classification rules, in match order.
pub fn default_rules() -> Vec<PrefixRule> {
    vec![
        PrefixRule::new("major/", Category::Breaking),
        PrefixRule::new("breaking/", Category::Breaking),
        PrefixRule::new("feature/", Category::Feature),
        PrefixRule::new("feat/", Category::Feature),
        PrefixRule::new("minor/", Category::Feature),
        PrefixRule::new("fix/", Category::Fix),
        PrefixRule::new("bugfix/", Category::Fix),
        PrefixRule::new("hotfix/", Category::Fix),
        PrefixRule::new("patch/", Category::Fix),
    ]
}

/// Classifies branch names with an ordered list of prefix rules.
///
/// The first rule whose prefix the branch starts with wins; a branch no rule
/// matches is [`Category::Invalid`].
#[derive(Debug, Clone)]
pub struct BranchClassifier {
    rules: Vec<PrefixRule>,
}

impl BranchClassifier {
    pub fn new(rules: Vec<PrefixRule>) -> Self {
        BranchClassifier { rules }
    }

    pub fn rules(&self) -> &[PrefixRule] {
        &self.rules
    }

    /// Classify a branch name (a leading `refs/heads/` is ignored)
    pub fn classify(&self, branch: &str) -> Category {
        let name = branch_short_name(branch);

        self.rules
            .iter()
            .find(|rule| name.starts_with(rule.prefix.as_str()))
            .map(|rule| rule.category)
            .unwrap_or(Category::Invalid)
    }
}

impl Default for BranchClassifier {
    fn default() -> Self {
        BranchClassifier::new(default_rules())
    }
}

/// Strips a `refs/heads/` qualifier and surrounding whitespace from a branch name
pub fn branch_short_name(branch: &str) -> &str {
    let trimmed = branch.trim();
    trimmed.strip_prefix("refs/heads/").unwrap_or(trimmed)
}
