#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use orgsync_core::{OriginRef, PermissionResult, ResourceRecord};
use orgsync_provisioner::remote::{BoxFuture, Emptiness, PermissionOracle, RemoteOrg};
use orgsync_provisioner::settings::{BaselineSettings, RulesetSettings};
use orgsync_provisioner::ProvisionerError;

/// In-memory organization that records every call it receives.
///
/// Calls are recorded as `"<op>:<name>"`. A call fails when its name is in
/// `failing_names` or the full call string is in `failing_calls`.
#[derive(Default)]
pub struct RecordingRemote {
    pub repos: Vec<ResourceRecord>,
    pub empty: HashSet<String>,
    pub ambiguous: HashSet<String>,
    pub failing_names: HashSet<String>,
    pub failing_calls: HashSet<String>,
    pub fail_listing: bool,
    pub calls: Mutex<Vec<String>>,
}

impl RecordingRemote {
    pub fn with_repos(repos: Vec<ResourceRecord>) -> Self {
        Self {
            repos,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls that would have changed the organization.
    pub fn writes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c != "list" && !c.starts_with("probe:"))
            .collect()
    }

    fn record(&self, op: &str, name: &str) -> Result<(), ProvisionerError> {
        let call = format!("{op}:{name}");
        self.calls.lock().unwrap().push(call.clone());
        if self.failing_names.contains(name) || self.failing_calls.contains(&call) {
            return Err(ProvisionerError::UpdateFailed(format!("simulated failure for {call}")));
        }
        Ok(())
    }
}

impl RemoteOrg for RecordingRemote {
    fn list_repositories(&self) -> BoxFuture<'_, Result<Vec<ResourceRecord>, ProvisionerError>> {
        Box::pin(async move {
            self.calls.lock().unwrap().push("list".into());
            if self.fail_listing {
                return Err(ProvisionerError::RemoteRead("listing unavailable".into()));
            }
            Ok(self.repos.clone())
        })
    }

    fn create_repository<'a>(
        &'a self,
        record: &'a ResourceRecord,
        _settings: &'a BaselineSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move { self.record("create", &record.name) })
    }

    fn set_description<'a>(
        &'a self,
        name: &'a str,
        _description: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move { self.record("description", name) })
    }

    fn set_topics<'a>(
        &'a self,
        name: &'a str,
        _topics: &'a [String],
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move { self.record("topics", name) })
    }

    fn apply_baseline_settings<'a>(
        &'a self,
        name: &'a str,
        _settings: &'a BaselineSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move { self.record("settings", name) })
    }

    fn ensure_protection_ruleset<'a>(
        &'a self,
        name: &'a str,
        _ruleset: &'a RulesetSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move { self.record("ruleset", name) })
    }

    fn seed_initial_commit<'a>(
        &'a self,
        name: &'a str,
        _description: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move { self.record("seed", name) })
    }

    fn delete_repository<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move { self.record("delete", name) })
    }

    fn transfer_repository<'a>(
        &'a self,
        _origin: &'a OriginRef,
        new_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move { self.record("transfer", new_name) })
    }

    fn probe_emptiness<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Emptiness> {
        Box::pin(async move {
            self.calls.lock().unwrap().push(format!("probe:{name}"));
            if self.empty.contains(name) {
                Emptiness::Empty
            } else if self.ambiguous.contains(name) {
                Emptiness::Unknown("unexpected status 502".into())
            } else {
                Emptiness::HasCommits
            }
        })
    }
}

/// Oracle backed by a fixed table. Unknown origins come back as "none".
#[derive(Default)]
pub struct StaticOracle {
    pub results: HashMap<String, PermissionResult>,
    pub calls: Mutex<Vec<String>>,
}

impl StaticOracle {
    pub fn with(origin: &str, result: PermissionResult) -> Self {
        let mut oracle = Self::default();
        oracle.results.insert(origin.to_string(), result);
        oracle
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl PermissionOracle for StaticOracle {
    fn check_permission<'a>(
        &'a self,
        origin: &'a OriginRef,
    ) -> BoxFuture<'a, Result<PermissionResult, ProvisionerError>> {
        Box::pin(async move {
            let key = origin.to_string();
            self.calls.lock().unwrap().push(key.clone());
            Ok(self
                .results
                .get(&key)
                .cloned()
                .unwrap_or_else(|| PermissionResult::denied("none", format!("{key} not found"))))
        })
    }
}

pub fn repo(name: &str, description: &str) -> ResourceRecord {
    ResourceRecord::new(name, description)
}
