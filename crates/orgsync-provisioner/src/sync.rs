use orgsync_core::{OriginRef, ResourceRecord};
use serde::{Deserialize, Serialize};

use crate::error::ProvisionerError;
use crate::plan::{Action, SkipReason, SyncPlan};
use crate::remote::RemoteOrg;
use crate::settings::BaselineSettings;

pub const DRY_RUN_RESULT: &str = "DRY-RUN: would be applied";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub action: Action,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFailure {
    pub action: Action,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedAction {
    pub action: Action,
    pub reason: String,
}

/// Per-action outcome of running a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: Vec<ActionOutcome>,
    pub failures: Vec<ActionFailure>,
    pub skipped: Vec<SkippedAction>,
}

impl ExecutionResult {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn skip(&mut self, action: &Action, reason: &SkipReason) {
        self.skipped.push(SkippedAction {
            action: action.clone(),
            reason: reason.to_string(),
        });
    }
}

/// Classify a plan without touching the remote.
///
/// Takes no remote handle, so a dry run cannot mutate anything.
pub fn simulate(plan: &SyncPlan) -> ExecutionResult {
    let mut results = ExecutionResult::default();
    for action in &plan.actions {
        if let Action::Skip { reason, .. } = action {
            results.skip(action, reason);
            continue;
        }
        results.success.push(ActionOutcome {
            action: action.clone(),
            result: DRY_RUN_RESULT.to_string(),
        });
    }
    results
}

/// Applies plans against a remote organization with a fixed baseline.
pub struct Executor<'a> {
    remote: &'a dyn RemoteOrg,
    settings: &'a BaselineSettings,
}

impl<'a> Executor<'a> {
    pub fn new(remote: &'a dyn RemoteOrg, settings: &'a BaselineSettings) -> Self {
        Self { remote, settings }
    }

    /// Run every action in order. A failing action is recorded and the run
    /// moves on to the next one.
    pub async fn execute(&self, plan: &SyncPlan, dry_run: bool) -> ExecutionResult {
        if dry_run {
            return simulate(plan);
        }

        let mut results = ExecutionResult::default();
        for action in &plan.actions {
            let remote = self.remote;
            let outcome = match action {
                Action::Skip { reason, .. } => {
                    results.skip(action, reason);
                    continue;
                }
                Action::Create { record } => self.create(record).await,
                Action::UpdateDescription { name, to, .. } => remote
                    .set_description(name, to)
                    .await
                    .map(|()| String::from("description updated")),
                Action::UpdateTopics { name, to, .. } => remote
                    .set_topics(name, to)
                    .await
                    .map(|()| String::from("topics updated")),
                Action::EnsureSettings { name } => self.enforce_settings(name).await,
                Action::Initialize { name, description } => remote
                    .seed_initial_commit(name, description)
                    .await
                    .map(|()| String::from("initial commit created")),
                Action::Delete { name } => remote
                    .delete_repository(name)
                    .await
                    .map(|()| String::from("deleted")),
                Action::Transfer { record, origin } => self.transfer(record, origin).await,
            };

            match outcome {
                Ok(result) => {
                    tracing::info!(action = action.label(), name = %action.name(), "applied");
                    results.success.push(ActionOutcome {
                        action: action.clone(),
                        result,
                    });
                }
                Err(e) => {
                    tracing::error!(
                        action = action.label(),
                        name = %action.name(),
                        error = %e,
                        "action failed"
                    );
                    results.failures.push(ActionFailure {
                        action: action.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }
        results
    }

    async fn create(&self, record: &ResourceRecord) -> Result<String, ProvisionerError> {
        let remote = self.remote;
        remote.create_repository(record, self.settings).await?;
        if !record.topics.is_empty() {
            remote.set_topics(&record.name, &record.topics).await?;
        }
        remote
            .ensure_protection_ruleset(&record.name, &self.settings.ruleset)
            .await?;
        Ok("created".into())
    }

    async fn enforce_settings(&self, name: &str) -> Result<String, ProvisionerError> {
        self.remote
            .apply_baseline_settings(name, self.settings)
            .await?;
        self.remote
            .ensure_protection_ruleset(name, &self.settings.ruleset)
            .await?;
        Ok("settings enforced".into())
    }

    async fn transfer(
        &self,
        record: &ResourceRecord,
        origin: &str,
    ) -> Result<String, ProvisionerError> {
        let origin: OriginRef = origin.parse()?;
        self.remote
            .transfer_repository(&origin, &record.name)
            .await?;

        let problems = self.reconfigure(record).await;
        if problems.is_empty() {
            Ok(format!("transferred from {origin}"))
        } else {
            Ok(format!(
                "transferred from {origin}; reconfiguration incomplete: {}",
                problems.join("; ")
            ))
        }
    }

    /// Bring a freshly transferred repository in line with the manifest.
    ///
    /// The ownership move has already happened and cannot be undone, so
    /// failures here are collected and logged instead of returned.
    async fn reconfigure(&self, record: &ResourceRecord) -> Vec<String> {
        let remote = self.remote;
        let name = record.name.as_str();
        let mut problems = Vec::new();

        let steps = [
            (
                "description",
                remote.set_description(name, &record.description).await,
            ),
            ("topics", remote.set_topics(name, &record.topics).await),
            (
                "settings",
                remote.apply_baseline_settings(name, self.settings).await,
            ),
            (
                "ruleset",
                remote
                    .ensure_protection_ruleset(name, &self.settings.ruleset)
                    .await,
            ),
        ];

        for (step, outcome) in steps {
            if let Err(e) = outcome {
                tracing::warn!(
                    name = %name,
                    step,
                    error = %e,
                    "post-transfer reconfiguration failed"
                );
                problems.push(format!("{step}: {e}"));
            }
        }
        problems
    }
}
