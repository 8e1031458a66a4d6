use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Method, Response};
use serde::Serialize;

use crate::error::GitHubError;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("orgsync/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Body argument for requests that carry none.
pub(crate) const NO_BODY: Option<&()> = None;

/// Authenticated GitHub REST client scoped to one organization.
///
/// Every call is a single request with no retry.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    api_base: String,
    org: String,
}

impl GitHubClient {
    pub fn new(org: impl Into<String>, token: &str) -> Result<Self, GitHubError> {
        Self::with_api_base(DEFAULT_API_BASE, org, token)
    }

    /// Build a client against a non-default API root (GitHub Enterprise, or
    /// a local mock server in tests).
    pub fn with_api_base(
        api_base: &str,
        org: impl Into<String>,
        token: &str,
    ) -> Result<Self, GitHubError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(GitHubError::MissingToken);
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| GitHubError::InvalidToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            org: org.into(),
        })
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Send a request and hand back the response whatever its status.
    pub(crate) async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, GitHubError> {
        let url = format!("{}{}", self.api_base, path);
        let mut req = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        tracing::debug!(%method, path, status = resp.status().as_u16(), "github call");
        Ok(resp)
    }

    /// Send a request and turn any non-2xx status into `GitHubError::Status`.
    pub(crate) async fn call<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, GitHubError> {
        let resp = self.send(method.clone(), path, body).await?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        Err(status_error(&method, path, resp).await)
    }
}

/// Build a status error, preferring the `message` field GitHub puts in
/// error bodies over the raw text.
pub(crate) async fn status_error(method: &Method, path: &str, resp: Response) -> GitHubError {
    let status = resp.status().as_u16();
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(text);

    GitHubError::Status {
        method: method.to_string(),
        path: path.to_string(),
        status,
        message,
    }
}
