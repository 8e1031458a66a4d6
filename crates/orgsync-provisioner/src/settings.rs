use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Repositories that are never deleted automatically, even when they are
/// missing from the manifest.
pub const PROTECTED_REPOSITORIES: &[&str] = &[".github", "documentation"];

/// The protected-name set handed to the plan generator.
pub fn protected_names() -> BTreeSet<String> {
    PROTECTED_REPOSITORIES.iter().map(|s| s.to_string()).collect()
}

/// Baseline configuration re-applied to every managed repository on every
/// run. None of this is expressible in the manifest, so it is enforced by
/// the `ensure-settings` sweep rather than diffed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineSettings {
    pub has_issues: bool,
    pub has_projects: bool,
    pub has_wiki: bool,
    pub allow_merge_commit: bool,
    pub allow_squash_merge: bool,
    pub allow_rebase_merge: bool,
    pub delete_branch_on_merge: bool,
    pub ruleset: RulesetSettings,
}

impl Default for BaselineSettings {
    fn default() -> Self {
        Self {
            has_issues: true,
            has_projects: true,
            has_wiki: true,
            allow_merge_commit: false,
            allow_squash_merge: true,
            allow_rebase_merge: true,
            delete_branch_on_merge: true,
            ruleset: RulesetSettings::default(),
        }
    }
}

/// Branch protection ruleset for the default branch, identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesetSettings {
    pub name: String,
    pub required_approving_review_count: u32,
    pub dismiss_stale_reviews_on_push: bool,
    pub block_force_pushes: bool,
    pub block_deletion: bool,
}

impl Default for RulesetSettings {
    fn default() -> Self {
        Self {
            name: "default-branch-protection".into(),
            required_approving_review_count: 0,
            dismiss_stale_reviews_on_push: true,
            block_force_pushes: true,
            block_deletion: true,
        }
    }
}
