use std::collections::HashMap;

use orgsync_core::ResourceRecord;

use crate::plan::{Action, SyncPlan};
use crate::remote::{Emptiness, RemoteOrg};

/// Append `initialize` actions for managed repositories with no commits.
///
/// Only repositories that exist remotely, appear in the manifest and are
/// not created by this plan are probed. An ambiguous probe leaves the
/// repository alone; the next run probes it again.
pub async fn augment(
    plan: &mut SyncPlan,
    actual: &[ResourceRecord],
    desired: &[ResourceRecord],
    remote: &dyn RemoteOrg,
) {
    let desired_by_name: HashMap<&str, &ResourceRecord> =
        desired.iter().map(|r| (r.name.as_str(), r)).collect();

    for have in actual {
        let Some(want) = desired_by_name.get(have.name.as_str()) else {
            continue;
        };
        if plan.creates(&have.name) {
            continue;
        }

        match remote.probe_emptiness(&have.name).await {
            Emptiness::Empty => {
                tracing::info!(name = %have.name, "repository has no commits, scheduling initialization");
                plan.push(Action::Initialize {
                    name: have.name.clone(),
                    description: want.description.clone(),
                });
            }
            Emptiness::HasCommits => {}
            Emptiness::Unknown(reason) => {
                tracing::warn!(
                    name = %have.name,
                    reason = %reason,
                    "emptiness probe inconclusive, assuming repository is initialized"
                );
            }
        }
    }
}
