//! Manifest reader.
//!
//! The manifest is a Markdown document. Each repository is a `## name`
//! heading followed by `- Key: Value` property lines:
//!
//! ```markdown
//! ## repository-name
//! - Description: Brief description of the repository
//! - Topics: topic1, topic2, topic3
//! - Origin: someone/old-repository
//! ```
//!
//! Anything inside a fenced code block is documentation and never parsed.

use std::collections::HashSet;
use std::path::Path;

use crate::error::CoreError;
use crate::models::record::ResourceRecord;

/// Headings containing any of these (case-insensitive) are document
/// structure, not repositories.
const RESERVED_HEADINGS: &[&str] = &["example", "current repositories", "format"];

const FENCE: &str = "```";

#[derive(Default)]
struct PendingRecord {
    name: String,
    description: Option<String>,
    topics: Option<Vec<String>>,
    origin: Option<String>,
}

impl PendingRecord {
    fn finish(self) -> Option<ResourceRecord> {
        let Some(description) = self.description else {
            tracing::warn!(name = %self.name, "repository is missing required description, skipping");
            return None;
        };
        Some(ResourceRecord {
            name: self.name,
            description,
            topics: self.topics.unwrap_or_default(),
            origin: self.origin,
        })
    }
}

/// Parse manifest text into desired-state records, in document order.
///
/// Incomplete entries are dropped with a warning. When a name appears more
/// than once, the first definition wins.
pub fn parse_manifest(content: &str) -> Vec<ResourceRecord> {
    let mut pending: Vec<PendingRecord> = Vec::new();
    let mut current: Option<PendingRecord> = None;
    let mut in_fence = false;

    for raw in content.lines() {
        let line = raw.trim();

        if line.starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }

        if let Some(heading) = line.strip_prefix("## ") {
            if let Some(done) = current.take() {
                pending.push(done);
            }
            let name = heading.trim();
            if !name.is_empty() && !is_reserved_heading(name) {
                current = Some(PendingRecord {
                    name: name.to_string(),
                    ..Default::default()
                });
            }
            continue;
        }

        let Some(record) = current.as_mut() else {
            continue;
        };
        if let Some((key, value)) = parse_property(line) {
            match key.to_lowercase().as_str() {
                "description" => record.description = Some(value.to_string()),
                "topics" => {
                    record.topics = Some(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|t| !t.is_empty())
                            .map(String::from)
                            .collect(),
                    )
                }
                "origin" => record.origin = Some(value.to_string()),
                other => {
                    tracing::debug!(name = %record.name, key = %other, "ignoring unknown property");
                }
            }
        }
    }

    if let Some(done) = current.take() {
        pending.push(done);
    }

    let mut seen = HashSet::new();
    pending
        .into_iter()
        .filter_map(PendingRecord::finish)
        .filter(|record| {
            let first = seen.insert(record.name.clone());
            if !first {
                tracing::warn!(name = %record.name, "duplicate repository definition, keeping the first");
            }
            first
        })
        .collect()
}

/// Read and parse a manifest file.
pub fn read_manifest(path: &Path) -> Result<Vec<ResourceRecord>, CoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| CoreError::ManifestRead {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_manifest(&content))
}

fn is_reserved_heading(name: &str) -> bool {
    let lower = name.to_lowercase();
    RESERVED_HEADINGS.iter().any(|r| lower.contains(r))
}

/// `- Key: Value` with a non-empty key and value.
fn parse_property(line: &str) -> Option<(&str, &str)> {
    let body = line.strip_prefix("- ")?;
    let (key, value) = body.split_once(':')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}
