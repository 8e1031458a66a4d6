use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionerError {
    #[error("repository creation failed: {0}")]
    CreateFailed(String),

    #[error("repository update failed: {0}")]
    UpdateFailed(String),

    #[error("repository deletion failed: {0}")]
    DeleteFailed(String),

    #[error("repository transfer failed: {0}")]
    TransferFailed(String),

    #[error("failed to read remote state: {0}")]
    RemoteRead(String),

    #[error("permission check failed for {origin}: {reason}")]
    PermissionCheck { origin: String, reason: String },

    #[error("invalid input: {0}")]
    Core(#[from] orgsync_core::CoreError),
}

impl ProvisionerError {
    /// Prepend resource identity to the error message.
    pub fn with_resource(self, label: &str, name: &str) -> Self {
        match self {
            Self::CreateFailed(msg) => Self::CreateFailed(format!("{label} ({name}): {msg}")),
            Self::UpdateFailed(msg) => Self::UpdateFailed(format!("{label} ({name}): {msg}")),
            Self::DeleteFailed(msg) => Self::DeleteFailed(format!("{label} ({name}): {msg}")),
            Self::TransferFailed(msg) => {
                Self::TransferFailed(format!("{label} ({name}): {msg}"))
            }
            other => other,
        }
    }
}

/// Walk the full error chain and join all causes into one string.
///
/// HTTP client errors often have terse `Display` impls (e.g. "error sending
/// request") but useful detail in the source chain.
pub fn format_err_chain(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        msg.push_str(": ");
        msg.push_str(&cause.to_string());
        source = cause.source();
    }
    msg
}
