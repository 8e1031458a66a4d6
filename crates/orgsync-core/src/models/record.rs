use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Desired or actual state of one managed repository.
///
/// `name` is the identity key within a collection. Desired-state records
/// may carry an `origin` when the repository still has to be migrated in
/// from another namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    pub name: String,
    /// Absent and empty both compare as the empty string.
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl ResourceRecord {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            topics: Vec::new(),
            origin: None,
        }
    }

    pub fn with_topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.topics = topics.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Topics as a set, the way the remote stores them.
    pub fn topic_set(&self) -> BTreeSet<&str> {
        self.topics.iter().map(String::as_str).collect()
    }

    /// Order-insensitive topic comparison.
    pub fn topics_match(&self, other: &ResourceRecord) -> bool {
        self.topic_set() == other.topic_set()
    }
}
