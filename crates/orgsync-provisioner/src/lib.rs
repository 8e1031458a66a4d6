//! orgsync-provisioner
//!
//! Reconciliation engine that converges a GitHub organization on the
//! repository manifest.
//!
//! Public API:
//! - `drift::detect()`: compare desired records against the remote listing
//! - `plan::generate()`: turn drift into an ordered plan with policy applied
//! - `probe::augment()`: add `initialize` actions for empty repositories
//! - `sync::Executor`: apply a plan (or simulate it) with per-action isolation
//! - `reconcile()`: fetch, detect, plan, augment, execute

pub mod drift;
pub mod error;
pub mod plan;
pub mod probe;
pub mod remote;
pub mod settings;
pub mod sync;

use orgsync_core::{OriginRef, ResourceRecord};
use serde::{Deserialize, Serialize};

pub use crate::drift::{detect, DriftReport};
pub use crate::error::ProvisionerError;
pub use crate::plan::{generate, Action, SkipReason, SyncPlan};
pub use crate::remote::{PermissionOracle, RemoteOrg};
pub use crate::settings::{protected_names, BaselineSettings};
pub use crate::sync::{ExecutionResult, Executor};

/// Everything one reconciliation run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reconciliation {
    pub dry_run: bool,
    pub actual: Vec<ResourceRecord>,
    pub drift: DriftReport,
    pub plan: SyncPlan,
    pub result: ExecutionResult,
}

impl Reconciliation {
    /// Whether the caller should report a non-zero status.
    ///
    /// Any execution failure counts. Drift only counts in a dry run, since an
    /// applied run has just remediated it. Pending transfers never count.
    pub fn signals_failure(&self) -> bool {
        self.result.has_failures() || (self.dry_run && self.drift.has_drift())
    }
}

/// Fetch remote state and transfer permissions, then compute drift.
///
/// Origin references are validated before any remote call is made.
pub async fn assess(
    remote: &dyn RemoteOrg,
    oracle: &dyn PermissionOracle,
    desired: &[ResourceRecord],
) -> Result<(Vec<ResourceRecord>, DriftReport), ProvisionerError> {
    let origins = desired
        .iter()
        .filter_map(|r| r.origin.as_deref())
        .map(str::parse::<OriginRef>)
        .collect::<Result<Vec<_>, _>>()?;

    let actual = remote.list_repositories().await?;
    tracing::info!(
        desired = desired.len(),
        actual = actual.len(),
        "fetched organization state"
    );

    let permissions = remote::check_permissions(oracle, &origins).await?;
    let drift = drift::detect(desired, &actual, permissions);

    Ok((actual, drift))
}

/// Full reconciliation run, from listing to execution.
///
/// Only read failures abort the run. Write failures land in
/// `result.failures`.
pub async fn reconcile(
    remote: &dyn RemoteOrg,
    oracle: &dyn PermissionOracle,
    desired: &[ResourceRecord],
    baseline: &BaselineSettings,
    dry_run: bool,
) -> Result<Reconciliation, ProvisionerError> {
    let (actual, drift) = assess(remote, oracle, desired).await?;

    let mut plan = plan::generate(&drift, desired, &settings::protected_names());
    probe::augment(&mut plan, &actual, desired, remote).await;

    if plan.has_changes() {
        tracing::info!(
            actions = plan.len(),
            creates = plan.summary.create,
            deletes = plan.summary.delete,
            transfers = plan.summary.transfer,
            dry_run,
            "executing sync plan"
        );
    } else {
        tracing::info!("organization in sync, nothing to apply");
    }

    let result = Executor::new(remote, baseline).execute(&plan, dry_run).await;

    Ok(Reconciliation {
        dry_run,
        actual,
        drift,
        plan,
        result,
    })
}
