use std::path::PathBuf;

use orgsync_cli::config::{
    load_config, load_or_default, parse_config, redact_token, save_new_config, Overrides,
    SyncConfig, DEFAULT_MANIFEST,
};
use orgsync_github::DEFAULT_API_BASE;

#[test]
fn unversioned_config_is_migrated() {
    let config = parse_config(r#"{ "org": "acme" }"#).unwrap();

    assert_eq!(config.config_version, 1);
    assert_eq!(config.organization, "acme");
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert_eq!(config.manifest_path, PathBuf::from(DEFAULT_MANIFEST));
    assert_eq!(config.settings, Default::default());
}

#[test]
fn explicit_organization_wins_over_legacy_key() {
    let config = parse_config(r#"{ "org": "old", "organization": "new" }"#).unwrap();
    assert_eq!(config.organization, "new");
}

#[test]
fn current_config_keeps_its_settings() {
    let config = parse_config(
        r#"{
            "config_version": 1,
            "organization": "acme",
            "manifest_path": "docs/REPOS.md",
            "settings": { "allow_merge_commit": true, "ruleset": { "name": "main-guard" } }
        }"#,
    )
    .unwrap();

    assert_eq!(config.manifest_path, PathBuf::from("docs/REPOS.md"));
    assert!(config.settings.allow_merge_commit);
    // Unset fields keep their defaults.
    assert!(config.settings.delete_branch_on_merge);
    assert_eq!(config.settings.ruleset.name, "main-guard");
    assert!(config.settings.ruleset.block_force_pushes);
}

#[test]
fn newer_config_is_rejected() {
    let err = parse_config(r#"{ "config_version": 99, "organization": "acme" }"#).unwrap_err();
    assert!(err.to_string().contains("newer than this build supports"));
}

#[test]
fn non_object_config_is_rejected() {
    assert!(parse_config("[1, 2]").is_err());
}

#[test]
fn overrides_replace_file_values() {
    let config = SyncConfig {
        organization: "from-file".into(),
        ..SyncConfig::default()
    }
    .apply(Overrides {
        organization: Some("from-flag".into()),
        api_base: None,
        manifest_path: Some("other.md".into()),
    });

    assert_eq!(config.organization, "from-flag");
    assert_eq!(config.api_base, DEFAULT_API_BASE);
    assert_eq!(config.manifest_path, PathBuf::from("other.md"));
}

#[test]
fn missing_organization_fails_validation() {
    assert!(SyncConfig::default().validate().is_err());
    let config = SyncConfig {
        organization: "acme".into(),
        ..SyncConfig::default()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn optional_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    assert_eq!(load_or_default(&path, false).unwrap(), SyncConfig::default());
    assert!(load_or_default(&path, true).is_err());
}

#[test]
fn saved_config_round_trips_and_is_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("orgsync.json");
    let config = SyncConfig {
        config_version: 0,
        organization: "acme".into(),
        ..SyncConfig::default()
    };

    save_new_config(&path, &config).unwrap();
    let loaded = load_config(&path).unwrap();

    assert_eq!(loaded.config_version, 1);
    assert_eq!(loaded.organization, "acme");
    assert!(!dir.path().join("nested").join("orgsync.json.tmp").exists());
    assert!(save_new_config(&path, &config).is_err());
}

#[test]
fn tokens_are_redacted() {
    assert_eq!(redact_token("ghp_abcdefghijklmnop"), "ghp_...mnop");
    assert_eq!(redact_token("short"), "****");
}
