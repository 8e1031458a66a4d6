use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use orgsync_core::{OriginRef, ResourceRecord};
use orgsync_provisioner::remote::Emptiness;
use orgsync_provisioner::settings::{BaselineSettings, RulesetSettings};
use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::{GitHubClient, NO_BODY};
use crate::error::GitHubError;

const PAGE_SIZE: usize = 100;

#[derive(Debug, Deserialize)]
struct RepoListing {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    topics: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RulesetListing {
    id: u64,
    name: String,
}

#[derive(Debug, Serialize)]
struct MergeSettings {
    has_issues: bool,
    has_projects: bool,
    has_wiki: bool,
    allow_merge_commit: bool,
    allow_squash_merge: bool,
    allow_rebase_merge: bool,
    delete_branch_on_merge: bool,
}

impl From<&BaselineSettings> for MergeSettings {
    fn from(s: &BaselineSettings) -> Self {
        Self {
            has_issues: s.has_issues,
            has_projects: s.has_projects,
            has_wiki: s.has_wiki,
            allow_merge_commit: s.allow_merge_commit,
            allow_squash_merge: s.allow_squash_merge,
            allow_rebase_merge: s.allow_rebase_merge,
            delete_branch_on_merge: s.delete_branch_on_merge,
        }
    }
}

#[derive(Debug, Serialize)]
struct CreateRepo<'a> {
    name: &'a str,
    description: &'a str,
    private: bool,
    #[serde(flatten)]
    settings: MergeSettings,
}

/// Request body for a default-branch ruleset.
fn ruleset_body(ruleset: &RulesetSettings) -> serde_json::Value {
    let mut rules = vec![json!({
        "type": "pull_request",
        "parameters": {
            "required_approving_review_count": ruleset.required_approving_review_count,
            "dismiss_stale_reviews_on_push": ruleset.dismiss_stale_reviews_on_push,
            "require_code_owner_review": false,
            "require_last_push_approval": false,
            "required_review_thread_resolution": false,
        }
    })];
    if ruleset.block_force_pushes {
        rules.push(json!({ "type": "non_fast_forward" }));
    }
    if ruleset.block_deletion {
        rules.push(json!({ "type": "deletion" }));
    }

    json!({
        "name": ruleset.name,
        "target": "branch",
        "enforcement": "active",
        "conditions": {
            "ref_name": { "include": ["~DEFAULT_BRANCH"], "exclude": [] }
        },
        "rules": rules,
    })
}

/// README contents for a freshly seeded repository.
pub fn readme_contents(name: &str, description: &str) -> String {
    if description.is_empty() {
        format!("# {name}\n")
    } else {
        format!("# {name}\n\n{description}\n")
    }
}

impl GitHubClient {
    fn repo_path(&self, name: &str) -> String {
        format!("/repos/{}/{}", self.org(), name)
    }

    /// Every repository in the organization, sorted by name.
    ///
    /// Pages through the listing until a short page comes back. A null
    /// description is read as empty.
    pub async fn list_repositories(&self) -> Result<Vec<ResourceRecord>, GitHubError> {
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let path = format!(
                "/orgs/{}/repos?per_page={PAGE_SIZE}&page={page}&type=all",
                self.org()
            );
            let batch: Vec<RepoListing> = self
                .call(Method::GET, &path, NO_BODY)
                .await?
                .json()
                .await?;
            let fetched = batch.len();

            repos.extend(batch.into_iter().map(|r| {
                ResourceRecord::new(r.name, r.description.unwrap_or_default())
                    .with_topics(r.topics)
            }));

            if fetched < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        repos.sort_by(|a, b| a.name.cmp(&b.name));
        tracing::debug!(org = %self.org(), count = repos.len(), "listed repositories");
        Ok(repos)
    }

    pub async fn create_repository(
        &self,
        record: &ResourceRecord,
        settings: &BaselineSettings,
    ) -> Result<(), GitHubError> {
        let body = CreateRepo {
            name: &record.name,
            description: &record.description,
            private: false,
            settings: settings.into(),
        };
        let path = format!("/orgs/{}/repos", self.org());
        self.call(Method::POST, &path, Some(&body)).await?;
        tracing::info!(name = %record.name, "repository created");
        Ok(())
    }

    pub async fn set_description(&self, name: &str, description: &str) -> Result<(), GitHubError> {
        let body = json!({ "description": description });
        self.call(Method::PATCH, &self.repo_path(name), Some(&body))
            .await?;
        Ok(())
    }

    pub async fn set_topics(&self, name: &str, topics: &[String]) -> Result<(), GitHubError> {
        let body = json!({ "names": topics });
        let path = format!("{}/topics", self.repo_path(name));
        self.call(Method::PUT, &path, Some(&body)).await?;
        Ok(())
    }

    pub async fn apply_baseline_settings(
        &self,
        name: &str,
        settings: &BaselineSettings,
    ) -> Result<(), GitHubError> {
        let body = MergeSettings::from(settings);
        self.call(Method::PATCH, &self.repo_path(name), Some(&body))
            .await?;
        Ok(())
    }

    /// Create the ruleset, or overwrite the existing one with the same name.
    pub async fn ensure_protection_ruleset(
        &self,
        name: &str,
        ruleset: &RulesetSettings,
    ) -> Result<(), GitHubError> {
        let base = format!("{}/rulesets", self.repo_path(name));
        let existing: Vec<RulesetListing> = self
            .call(Method::GET, &base, NO_BODY)
            .await?
            .json()
            .await?;

        let body = ruleset_body(ruleset);
        match existing.iter().find(|r| r.name == ruleset.name) {
            Some(found) => {
                let path = format!("{base}/{}", found.id);
                self.call(Method::PUT, &path, Some(&body)).await?;
                tracing::debug!(name, ruleset = %ruleset.name, id = found.id, "ruleset updated");
            }
            None => {
                self.call(Method::POST, &base, Some(&body)).await?;
                tracing::debug!(name, ruleset = %ruleset.name, "ruleset created");
            }
        }
        Ok(())
    }

    /// Commit a README so the repository gets a default branch.
    pub async fn seed_initial_commit(
        &self,
        name: &str,
        description: &str,
    ) -> Result<(), GitHubError> {
        let content = STANDARD.encode(readme_contents(name, description));
        let body = json!({
            "message": "Initial commit",
            "content": content,
        });
        let path = format!("{}/contents/README.md", self.repo_path(name));
        self.call(Method::PUT, &path, Some(&body)).await?;
        tracing::info!(name, "initial commit created");
        Ok(())
    }

    pub async fn delete_repository(&self, name: &str) -> Result<(), GitHubError> {
        self.call(Method::DELETE, &self.repo_path(name), NO_BODY)
            .await?;
        tracing::info!(name, "repository deleted");
        Ok(())
    }

    /// Ask GitHub to move `origin` into this organization as `new_name`.
    ///
    /// GitHub accepts the request before the move completes, so a success
    /// here means the transfer was started.
    pub async fn transfer_repository(
        &self,
        origin: &OriginRef,
        new_name: &str,
    ) -> Result<(), GitHubError> {
        let body = json!({
            "new_owner": self.org(),
            "new_name": new_name,
        });
        let path = format!("/repos/{}/{}/transfer", origin.owner, origin.repo);
        self.call(Method::POST, &path, Some(&body)).await?;
        tracing::info!(origin = %origin, new_name, "transfer requested");
        Ok(())
    }

    /// 409 means the repository is empty. Any other unexpected answer is
    /// reported as `Unknown`.
    pub async fn probe_emptiness(&self, name: &str) -> Emptiness {
        let path = format!("{}/commits?per_page=1", self.repo_path(name));
        let resp = match self.send(Method::GET, &path, NO_BODY).await {
            Ok(resp) => resp,
            Err(e) => return Emptiness::Unknown(e.to_string()),
        };

        match resp.status() {
            StatusCode::CONFLICT => Emptiness::Empty,
            StatusCode::OK => match resp.json::<Vec<serde_json::Value>>().await {
                Ok(commits) if !commits.is_empty() => Emptiness::HasCommits,
                Ok(_) => Emptiness::Unknown("commit listing was empty".into()),
                Err(e) => Emptiness::Unknown(format!("unreadable commit listing: {e}")),
            },
            other => Emptiness::Unknown(format!("unexpected status {}", other.as_u16())),
        }
    }
}
