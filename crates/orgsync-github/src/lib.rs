//! orgsync-github
//!
//! GitHub REST backend for the reconciliation engine. `GitHubClient`
//! implements both `RemoteOrg` and `PermissionOracle`.

pub mod client;
pub mod error;
pub mod permissions;
pub mod remote;
pub mod repos;

pub use crate::client::{GitHubClient, DEFAULT_API_BASE};
pub use crate::error::GitHubError;
