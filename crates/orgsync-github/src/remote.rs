use orgsync_core::{OriginRef, PermissionResult, ResourceRecord};
use orgsync_provisioner::error::format_err_chain;
use orgsync_provisioner::remote::{BoxFuture, Emptiness, PermissionOracle, RemoteOrg};
use orgsync_provisioner::settings::{BaselineSettings, RulesetSettings};
use orgsync_provisioner::ProvisionerError;

use crate::client::GitHubClient;
use crate::error::GitHubError;

fn read_failed(e: GitHubError) -> ProvisionerError {
    ProvisionerError::RemoteRead(format_err_chain(&e))
}

fn create_failed(name: &str) -> impl FnOnce(GitHubError) -> ProvisionerError + '_ {
    move |e| ProvisionerError::CreateFailed(format_err_chain(&e)).with_resource("repository", name)
}

fn update_failed<'a>(what: &'a str, name: &'a str) -> impl FnOnce(GitHubError) -> ProvisionerError + 'a {
    move |e| ProvisionerError::UpdateFailed(format_err_chain(&e)).with_resource(what, name)
}

impl RemoteOrg for GitHubClient {
    fn list_repositories(&self) -> BoxFuture<'_, Result<Vec<ResourceRecord>, ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::list_repositories(self)
                .await
                .map_err(read_failed)
        })
    }

    fn create_repository<'a>(
        &'a self,
        record: &'a ResourceRecord,
        settings: &'a BaselineSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::create_repository(self, record, settings)
                .await
                .map_err(create_failed(&record.name))
        })
    }

    fn set_description<'a>(
        &'a self,
        name: &'a str,
        description: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::set_description(self, name, description)
                .await
                .map_err(update_failed("description", name))
        })
    }

    fn set_topics<'a>(
        &'a self,
        name: &'a str,
        topics: &'a [String],
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::set_topics(self, name, topics)
                .await
                .map_err(update_failed("topics", name))
        })
    }

    fn apply_baseline_settings<'a>(
        &'a self,
        name: &'a str,
        settings: &'a BaselineSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::apply_baseline_settings(self, name, settings)
                .await
                .map_err(update_failed("settings", name))
        })
    }

    fn ensure_protection_ruleset<'a>(
        &'a self,
        name: &'a str,
        ruleset: &'a RulesetSettings,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::ensure_protection_ruleset(self, name, ruleset)
                .await
                .map_err(update_failed("ruleset", name))
        })
    }

    fn seed_initial_commit<'a>(
        &'a self,
        name: &'a str,
        description: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::seed_initial_commit(self, name, description)
                .await
                .map_err(update_failed("initial commit", name))
        })
    }

    fn delete_repository<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::delete_repository(self, name)
                .await
                .map_err(|e| {
                    ProvisionerError::DeleteFailed(format_err_chain(&e))
                        .with_resource("repository", name)
                })
        })
    }

    fn transfer_repository<'a>(
        &'a self,
        origin: &'a OriginRef,
        new_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::transfer_repository(self, origin, new_name)
                .await
                .map_err(|e| {
                    ProvisionerError::TransferFailed(format_err_chain(&e))
                        .with_resource(&origin.to_string(), new_name)
                })
        })
    }

    fn probe_emptiness<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Emptiness> {
        Box::pin(GitHubClient::probe_emptiness(self, name))
    }
}

impl PermissionOracle for GitHubClient {
    fn check_permission<'a>(
        &'a self,
        origin: &'a OriginRef,
    ) -> BoxFuture<'a, Result<PermissionResult, ProvisionerError>> {
        Box::pin(async move {
            GitHubClient::check_permission(self, origin)
                .await
                .map_err(|e| ProvisionerError::PermissionCheck {
                    origin: origin.to_string(),
                    reason: format_err_chain(&e),
                })
        })
    }
}
