//! orgsync-core
//!
//! Pure domain types, origin references, and the manifest reader.
//! Shared vocabulary of the orgsync system. No HTTP dependency.

pub mod error;
pub mod manifest;
pub mod models;
pub mod origin;

pub use crate::error::CoreError;
pub use crate::models::permission::PermissionResult;
pub use crate::models::record::ResourceRecord;
pub use crate::origin::OriginRef;
