use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("origin repository must be in format \"owner/repo-name\": {0:?}")]
    OriginFormat(String),

    #[error("invalid origin repository format: {0:?}")]
    InvalidOrigin(String),

    #[error("failed to read manifest at {path}: {source}")]
    ManifestRead {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
