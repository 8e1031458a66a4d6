use std::path::{Path, PathBuf};

use orgsync_provisioner::settings::BaselineSettings;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_CONFIG_FILE: &str = "orgsync.json";
pub const DEFAULT_MANIFEST: &str = "REPOSITORIES.md";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    #[serde(default)]
    pub organization: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_manifest_path")]
    pub manifest_path: PathBuf,
    /// Baseline enforced on every managed repository. Added in v1.
    #[serde(default)]
    pub settings: BaselineSettings,
}

fn default_api_base() -> String {
    orgsync_github::DEFAULT_API_BASE.to_string()
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from(DEFAULT_MANIFEST)
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            organization: String::new(),
            api_base: default_api_base(),
            manifest_path: default_manifest_path(),
            settings: BaselineSettings::default(),
        }
    }
}

/// Command-line and environment values that win over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub organization: Option<String>,
    pub api_base: Option<String>,
    pub manifest_path: Option<PathBuf>,
}

impl SyncConfig {
    pub fn apply(mut self, overrides: Overrides) -> Self {
        if let Some(org) = overrides.organization {
            self.organization = org;
        }
        if let Some(base) = overrides.api_base {
            self.api_base = base;
        }
        if let Some(path) = overrides.manifest_path {
            self.manifest_path = path;
        }
        self
    }

    /// Reject configs that cannot drive a run.
    pub fn validate(&self) -> eyre::Result<()> {
        if self.organization.trim().is_empty() {
            return Err(eyre::eyre!(
                "no organization configured; set `organization` in the config, \
                 pass --org, or export ORGSYNC_ORG"
            ));
        }
        Ok(())
    }
}

/// Load the config at `path`, or the defaults when `path` is absent and
/// `required` is false.
pub fn load_or_default(path: &Path, required: bool) -> eyre::Result<SyncConfig> {
    if !required && !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SyncConfig::default());
    }
    load_config(path)
}

pub fn load_config(path: &Path) -> eyre::Result<SyncConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> eyre::Result<SyncConfig> {
    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: SyncConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update orgsync."
        ));
    }

    // v0 to v1: `org` became `organization`; `settings` became an object.
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        if let Some(org) = obj.remove("org") {
            obj.entry("organization").or_insert(org);
        }
        obj.entry("settings")
            .or_insert_with(|| serde_json::Value::Object(Default::default()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 to v1 (renamed org to organization)");
    }

    Ok(json)
}

/// Write a config, refusing to clobber an existing file.
pub fn save_new_config(path: &Path, config: &SyncConfig) -> eyre::Result<()> {
    if path.exists() {
        return Err(eyre::eyre!("{} already exists", path.display()));
    }

    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    // Write to a temp file then rename for atomicity
    let file_name = path
        .file_name()
        .ok_or_else(|| eyre::eyre!("{} is not a file path", path.display()))?;
    let tmp_path = dir.join(format!("{}.tmp", file_name.to_string_lossy()));
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config written");
    Ok(())
}

/// Safe-to-log form of a token: first and last four characters.
pub fn redact_token(token: &str) -> String {
    if token.len() <= 8 || !token.is_ascii() {
        return "****".to_string();
    }
    let prefix = &token[..4];
    let suffix = &token[token.len() - 4..];
    format!("{prefix}...{suffix}")
}
