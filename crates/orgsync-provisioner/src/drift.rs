use std::collections::{BTreeMap, HashMap};

use orgsync_core::{PermissionResult, ResourceRecord};
use serde::{Deserialize, Serialize};

/// Description mismatch between manifest and remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionDiff {
    pub name: String,
    pub desired: String,
    pub actual: String,
}

/// Topic-set mismatch between manifest and remote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicsDiff {
    pub name: String,
    pub desired: Vec<String>,
    pub actual: Vec<String>,
}

/// Categorized difference between desired and actual state.
///
/// Recomputed from scratch on every run; never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftReport {
    /// In the manifest, not in the organization.
    pub missing: Vec<ResourceRecord>,
    /// In the organization, not in the manifest.
    pub extra: Vec<ResourceRecord>,
    pub description_diff: Vec<DescriptionDiff>,
    pub topics_diff: Vec<TopicsDiff>,
    /// Desired records carrying an `origin`; excluded from every other category.
    pub pending_transfer: Vec<ResourceRecord>,
    /// Origin reference -> permission oracle answer, as supplied by the caller.
    pub transfer_permissions: BTreeMap<String, PermissionResult>,
}

impl DriftReport {
    /// Drift that should fail a CI check. Pending transfers do not count.
    pub fn has_drift(&self) -> bool {
        !self.missing.is_empty()
            || !self.extra.is_empty()
            || !self.description_diff.is_empty()
            || !self.topics_diff.is_empty()
    }

    pub fn has_pending_transfers(&self) -> bool {
        !self.pending_transfer.is_empty()
    }
}

/// Compare desired records against actual records.
///
/// Names must be unique within each collection; duplicates are a caller
/// bug and the last one wins in the lookup.
pub fn detect(
    desired: &[ResourceRecord],
    actual: &[ResourceRecord],
    transfer_permissions: BTreeMap<String, PermissionResult>,
) -> DriftReport {
    let actual_by_name: HashMap<&str, &ResourceRecord> =
        actual.iter().map(|r| (r.name.as_str(), r)).collect();
    let desired_by_name: HashMap<&str, &ResourceRecord> =
        desired.iter().map(|r| (r.name.as_str(), r)).collect();

    let mut drift = DriftReport {
        transfer_permissions,
        ..Default::default()
    };

    for want in desired {
        if want.origin.is_some() {
            drift.pending_transfer.push(want.clone());
            continue;
        }

        let Some(have) = actual_by_name.get(want.name.as_str()) else {
            drift.missing.push(want.clone());
            continue;
        };

        if want.description != have.description {
            drift.description_diff.push(DescriptionDiff {
                name: want.name.clone(),
                desired: want.description.clone(),
                actual: have.description.clone(),
            });
        }

        if !want.topics_match(have) {
            drift.topics_diff.push(TopicsDiff {
                name: want.name.clone(),
                desired: want.topics.clone(),
                actual: have.topics.clone(),
            });
        }
    }

    for have in actual {
        if !desired_by_name.contains_key(have.name.as_str()) {
            drift.extra.push(have.clone());
        }
    }

    drift
}
