use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use orgsync_core::{OriginRef, PermissionResult, ResourceRecord};

use crate::error::ProvisionerError;
use crate::settings::{BaselineSettings, RulesetSettings};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Outcome of probing a repository for committed history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emptiness {
    Empty,
    HasCommits,
    /// The probe answered with neither signal. Carries the raw explanation.
    Unknown(String),
}

/// The managed organization as seen by the engine.
///
/// One impl per hosting backend. Every method is a single request/response
/// call with no retry. Methods return boxed futures for dyn compatibility.
pub trait RemoteOrg: Send + Sync {
    /// Current state of every repository in the organization, sorted by name.
    fn list_repositories(&self) -> BoxFuture<'_, Result<Vec<ResourceRecord>, ProvisionerError>>;

    /// Create the repository with its description and the baseline merge settings.
    fn create_repository<'a>(
        &'a self,
        record: &'a ResourceRecord,
        settings: &'a BaselineSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>>;

    fn set_description<'a>(
        &'a self,
        name: &'a str,
        description: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>>;

    /// Replace the full topic list.
    fn set_topics<'a>(
        &'a self,
        name: &'a str,
        topics: &'a [String],
    ) -> BoxFuture<'a, Result<(), ProvisionerError>>;

    fn apply_baseline_settings<'a>(
        &'a self,
        name: &'a str,
        settings: &'a BaselineSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>>;

    /// Create the named ruleset, or update it in place if it already exists.
    fn ensure_protection_ruleset<'a>(
        &'a self,
        name: &'a str,
        ruleset: &'a RulesetSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>>;

    /// Make the first commit in an empty repository.
    fn seed_initial_commit<'a>(
        &'a self,
        name: &'a str,
        description: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>>;

    fn delete_repository<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), ProvisionerError>>;

    /// Move `origin` into the organization under `new_name`.
    fn transfer_repository<'a>(
        &'a self,
        origin: &'a OriginRef,
        new_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>>;

    /// Never fails: transport errors come back as `Emptiness::Unknown`.
    fn probe_emptiness<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Emptiness>;
}

/// Answers whether the automation principal may migrate a repository.
///
/// How the credential is shaped is the implementor's business.
pub trait PermissionOracle: Send + Sync {
    fn check_permission<'a>(
        &'a self,
        origin: &'a OriginRef,
    ) -> BoxFuture<'a, Result<PermissionResult, ProvisionerError>>;
}

/// Check every origin in turn. Keys are the origin strings as written.
pub async fn check_permissions(
    oracle: &dyn PermissionOracle,
    origins: &[OriginRef],
) -> Result<BTreeMap<String, PermissionResult>, ProvisionerError> {
    let mut results = BTreeMap::new();
    for origin in origins {
        let key = origin.to_string();
        if results.contains_key(&key) {
            continue;
        }
        let result = oracle.check_permission(origin).await?;
        tracing::debug!(
            origin = %key,
            level = %result.permission_level,
            granted = result.has_permission,
            "transfer permission checked"
        );
        results.insert(key, result);
    }
    Ok(results)
}
