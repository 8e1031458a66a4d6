use orgsync_core::{OriginRef, PermissionResult};
use reqwest::{Method, StatusCode};
use serde::Deserialize;

use crate::client::{status_error, GitHubClient, NO_BODY};
use crate::error::GitHubError;

/// Only this level allows a repository to be transferred.
pub const REQUIRED_LEVEL: &str = "admin";

#[derive(Debug, Deserialize)]
struct CollaboratorPermission {
    permission: String,
}

impl GitHubClient {
    /// Ask GitHub which access level the organization holds on `origin`.
    ///
    /// A 404 is an answer, not an error: the repository is missing or
    /// invisible to us, which reads as level `none`.
    pub async fn check_permission(
        &self,
        origin: &OriginRef,
    ) -> Result<PermissionResult, GitHubError> {
        let path = format!(
            "/repos/{}/{}/collaborators/{}/permission",
            origin.owner,
            origin.repo,
            self.org()
        );
        let resp = self.send(Method::GET, &path, NO_BODY).await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(PermissionResult::denied(
                "none",
                format!(
                    "Repository {origin} not found or {} has no access",
                    self.org()
                ),
            ));
        }
        if !resp.status().is_success() {
            return Err(status_error(&Method::GET, &path, resp).await);
        }

        let level = resp.json::<CollaboratorPermission>().await?.permission;
        Ok(classify(self.org(), origin, level))
    }
}

fn classify(org: &str, origin: &OriginRef, level: String) -> PermissionResult {
    if level == REQUIRED_LEVEL {
        let details = format!("✅ {org} has admin access to {origin}");
        PermissionResult::granted(level, details)
    } else {
        let details = format!("❌ {org} has \"{level}\" access to {origin} ({REQUIRED_LEVEL} required)");
        PermissionResult::denied(level, details)
    }
}

