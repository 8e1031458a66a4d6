use serde::{Deserialize, Serialize};

/// Answer from the permission oracle for one origin reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionResult {
    pub has_permission: bool,
    /// Coarse level as reported by the remote: "admin", "write", "read", "none".
    pub permission_level: String,
    /// Human-readable explanation, surfaced verbatim in skip reasons.
    pub details: String,
}

impl PermissionResult {
    pub fn granted(level: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            has_permission: true,
            permission_level: level.into(),
            details: details.into(),
        }
    }

    pub fn denied(level: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            has_permission: false,
            permission_level: level.into(),
            details: details.into(),
        }
    }
}
