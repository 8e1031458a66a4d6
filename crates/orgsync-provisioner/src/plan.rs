use std::collections::{BTreeSet, HashSet};
use std::fmt;

use orgsync_core::ResourceRecord;
use serde::{Deserialize, Serialize};

use crate::drift::DriftReport;

/// One remediation step. Each variant carries only what it needs to be
/// executed or explained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Action {
    Create {
        record: ResourceRecord,
    },
    UpdateDescription {
        name: String,
        from: String,
        to: String,
    },
    UpdateTopics {
        name: String,
        from: Vec<String>,
        to: Vec<String>,
    },
    EnsureSettings {
        name: String,
    },
    Initialize {
        name: String,
        description: String,
    },
    Delete {
        name: String,
    },
    /// Best-effort: the permission check passed, but the move can still fail.
    Transfer {
        record: ResourceRecord,
        origin: String,
    },
    Skip {
        name: String,
        reason: SkipReason,
    },
}

impl Action {
    /// The repository this action targets.
    pub fn name(&self) -> &str {
        match self {
            Action::Create { record } | Action::Transfer { record, .. } => &record.name,
            Action::UpdateDescription { name, .. }
            | Action::UpdateTopics { name, .. }
            | Action::EnsureSettings { name }
            | Action::Initialize { name, .. }
            | Action::Delete { name }
            | Action::Skip { name, .. } => name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Action::Create { .. } => "create",
            Action::UpdateDescription { .. } => "update-description",
            Action::UpdateTopics { .. } => "update-topics",
            Action::EnsureSettings { .. } => "ensure-settings",
            Action::Initialize { .. } => "initialize",
            Action::Delete { .. } => "delete",
            Action::Transfer { .. } => "transfer",
            Action::Skip { .. } => "skip",
        }
    }
}

/// The policy that turned an action into a skip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "kebab-case")]
pub enum SkipReason {
    Protected,
    PermissionDenied { origin: String, details: String },
    PermissionNotChecked { origin: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SkipReason::Protected => write!(
                f,
                "protected: not in the manifest, but exempt from automatic deletion"
            ),
            SkipReason::PermissionDenied { origin, details } => {
                write!(f, "transfer permission denied for {origin}: {details}")
            }
            SkipReason::PermissionNotChecked { origin } => write!(
                f,
                "transfer permission for {origin} was not checked; migration not attempted"
            ),
        }
    }
}

/// Running tally per action type, for reporting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub create: usize,
    pub update_description: usize,
    pub update_topics: usize,
    pub ensure_settings: usize,
    pub initialize: usize,
    pub delete: usize,
    pub transfer: usize,
    pub skip: usize,
}

impl PlanSummary {
    fn record(&mut self, action: &Action) {
        let slot = match action {
            Action::Create { .. } => &mut self.create,
            Action::UpdateDescription { .. } => &mut self.update_description,
            Action::UpdateTopics { .. } => &mut self.update_topics,
            Action::EnsureSettings { .. } => &mut self.ensure_settings,
            Action::Initialize { .. } => &mut self.initialize,
            Action::Delete { .. } => &mut self.delete,
            Action::Transfer { .. } => &mut self.transfer,
            Action::Skip { .. } => &mut self.skip,
        };
        *slot += 1;
    }
}

/// Ordered remediation plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub actions: Vec<Action>,
    pub summary: PlanSummary,
}

impl SyncPlan {
    pub fn push(&mut self, action: Action) {
        self.summary.record(&action);
        self.actions.push(action);
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Whether anything other than skips would touch the remote.
    pub fn has_changes(&self) -> bool {
        self.actions
            .iter()
            .any(|a| !matches!(a, Action::Skip { .. }))
    }

    pub fn creates(&self, name: &str) -> bool {
        self.actions
            .iter()
            .any(|a| matches!(a, Action::Create { record } if record.name == name))
    }
}

/// Turn a drift report into an ordered plan.
///
/// Order is fixed: transfers, creates, description updates, topic updates,
/// the settings sweep, then extras. Within each group the input order is
/// kept.
pub fn generate(
    drift: &DriftReport,
    desired: &[ResourceRecord],
    protected_names: &BTreeSet<String>,
) -> SyncPlan {
    let mut plan = SyncPlan::default();
    // Created repositories get their settings at creation time.
    let mut created: HashSet<&str> = HashSet::new();

    // 1. Pending transfers
    for record in &drift.pending_transfer {
        let Some(origin) = record.origin.as_deref() else {
            continue;
        };
        match drift.transfer_permissions.get(origin) {
            Some(permission) if permission.has_permission => plan.push(Action::Transfer {
                record: record.clone(),
                origin: origin.to_string(),
            }),
            Some(permission) => plan.push(Action::Skip {
                name: record.name.clone(),
                reason: SkipReason::PermissionDenied {
                    origin: origin.to_string(),
                    details: permission.details.clone(),
                },
            }),
            None => plan.push(Action::Skip {
                name: record.name.clone(),
                reason: SkipReason::PermissionNotChecked {
                    origin: origin.to_string(),
                },
            }),
        }
    }

    // 2. Missing
    for record in &drift.missing {
        created.insert(&record.name);
        plan.push(Action::Create {
            record: record.clone(),
        });
    }

    // 3. Description mismatches
    for diff in &drift.description_diff {
        plan.push(Action::UpdateDescription {
            name: diff.name.clone(),
            from: diff.actual.clone(),
            to: diff.desired.clone(),
        });
    }

    // 4. Topic mismatches
    for diff in &drift.topics_diff {
        plan.push(Action::UpdateTopics {
            name: diff.name.clone(),
            from: diff.actual.clone(),
            to: diff.desired.clone(),
        });
    }

    // 5. Settings sweep, regardless of drift
    for record in desired {
        if !created.contains(record.name.as_str()) {
            plan.push(Action::EnsureSettings {
                name: record.name.clone(),
            });
        }
    }

    // 6. Extras
    for record in &drift.extra {
        if protected_names.contains(&record.name) {
            plan.push(Action::Skip {
                name: record.name.clone(),
                reason: SkipReason::Protected,
            });
        } else {
            plan.push(Action::Delete {
                name: record.name.clone(),
            });
        }
    }

    plan
}
