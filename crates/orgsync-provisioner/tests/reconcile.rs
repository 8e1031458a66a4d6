mod common;

use common::{repo, RecordingRemote, StaticOracle};
use orgsync_core::{CoreError, PermissionResult};
use orgsync_provisioner::plan::Action;
use orgsync_provisioner::settings::BaselineSettings;
use orgsync_provisioner::sync::DRY_RUN_RESULT;
use orgsync_provisioner::{assess, reconcile, ProvisionerError};

#[tokio::test]
async fn malformed_origin_fails_before_any_remote_call() {
    let remote = RecordingRemote::default();
    let oracle = StaticOracle::default();
    let desired = vec![repo("a", "x").with_origin("no-slash")];

    let err = reconcile(&remote, &oracle, &desired, &BaselineSettings::default(), true)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ProvisionerError::Core(CoreError::OriginFormat(_))
    ));
    assert!(remote.calls().is_empty());
    assert!(oracle.calls().is_empty());
}

#[tokio::test]
async fn listing_failure_aborts_the_run() {
    let remote = RecordingRemote {
        fail_listing: true,
        ..Default::default()
    };
    let oracle = StaticOracle::default();

    let err = reconcile(
        &remote,
        &oracle,
        &[repo("a", "x")],
        &BaselineSettings::default(),
        false,
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ProvisionerError::RemoteRead(_)));
    assert_eq!(remote.calls(), vec!["list"]);
}

#[tokio::test]
async fn each_origin_is_checked_once() {
    let remote = RecordingRemote::default();
    let oracle = StaticOracle::with("old/a", PermissionResult::granted("admin", "ok"));
    let desired = vec![
        repo("a", "x").with_origin("old/a"),
        repo("a-copy", "y").with_origin("old/a"),
    ];

    let (_, drift) = assess(&remote, &oracle, &desired).await.unwrap();

    assert_eq!(oracle.calls(), vec!["old/a"]);
    assert!(drift.transfer_permissions["old/a"].has_permission);
}

#[tokio::test]
async fn dry_run_plans_everything_and_writes_nothing() {
    let mut remote = RecordingRemote::with_repos(vec![
        repo("keep", "stale"),
        repo("bare", "b"),
        repo("stray", ""),
        repo(".github", ""),
    ]);
    remote.empty.insert("bare".into());
    let oracle = StaticOracle::with("elsewhere/moved", PermissionResult::granted("admin", "ok"));
    let desired = vec![
        repo("keep", "fresh"),
        repo("bare", "b"),
        repo("new", "n"),
        repo("moved", "m").with_origin("elsewhere/moved"),
    ];

    let run = reconcile(&remote, &oracle, &desired, &BaselineSettings::default(), true)
        .await
        .unwrap();

    assert!(remote.writes().is_empty());
    assert_eq!(run.actual.len(), 4);
    assert!(run.drift.has_drift());
    assert_eq!(run.plan.summary.transfer, 1);
    assert_eq!(run.plan.summary.create, 1);
    assert_eq!(run.plan.summary.update_description, 1);
    assert_eq!(run.plan.summary.delete, 1);
    assert_eq!(run.plan.summary.skip, 1);
    assert_eq!(run.plan.summary.initialize, 1);
    assert!(matches!(
        run.plan.actions.last(),
        Some(Action::Initialize { name, .. }) if name == "bare"
    ));
    assert!(run.result.success.iter().all(|s| s.result == DRY_RUN_RESULT));
    assert_eq!(run.result.skipped.len(), 1);
    assert!(run.signals_failure());
}

#[tokio::test]
async fn apply_converges_and_isolates_failures() {
    let mut remote = RecordingRemote::with_repos(vec![repo("keep", "stale"), repo("stray", "")]);
    remote.failing_calls.insert("delete:stray".into());
    let oracle = StaticOracle::default();
    let desired = vec![repo("keep", "fresh"), repo("new", "n")];

    let run = reconcile(&remote, &oracle, &desired, &BaselineSettings::default(), false)
        .await
        .unwrap();

    assert_eq!(
        remote.calls(),
        vec![
            "list",
            "probe:keep",
            "create:new",
            "ruleset:new",
            "description:keep",
            "settings:keep",
            "ruleset:keep",
            "delete:stray",
        ]
    );
    assert_eq!(run.result.success.len(), 3);
    assert_eq!(run.result.failures.len(), 1);
    assert_eq!(run.result.failures[0].action.name(), "stray");
    assert!(run.signals_failure());
}

#[tokio::test]
async fn pending_transfer_alone_does_not_signal_failure() {
    let remote = RecordingRemote::with_repos(vec![repo("kept", "k")]);
    let oracle = StaticOracle::default();
    let desired = vec![repo("kept", "k"), repo("moved", "m").with_origin("a/moved")];

    let run = reconcile(&remote, &oracle, &desired, &BaselineSettings::default(), true)
        .await
        .unwrap();

    assert!(!run.drift.has_drift());
    assert!(run.drift.has_pending_transfers());
    assert_eq!(run.plan.summary.skip, 1);
    assert!(!run.signals_failure());
}

#[tokio::test]
async fn clean_apply_does_not_signal_failure() {
    let remote = RecordingRemote::with_repos(vec![repo("a", "old")]);
    let oracle = StaticOracle::default();

    let run = reconcile(
        &remote,
        &oracle,
        &[repo("a", "new")],
        &BaselineSettings::default(),
        false,
    )
    .await
    .unwrap();

    assert!(run.drift.has_drift());
    assert!(!run.result.has_failures());
    assert!(!run.signals_failure());
}

#[tokio::test]
async fn probes_skip_created_and_unmanaged_repositories() {
    let mut remote = RecordingRemote::with_repos(vec![repo("managed", "m"), repo("stray", "")]);
    remote.ambiguous.insert("managed".into());
    let oracle = StaticOracle::default();
    let desired = vec![repo("managed", "m"), repo("new", "n")];

    let run = reconcile(&remote, &oracle, &desired, &BaselineSettings::default(), true)
        .await
        .unwrap();

    let probes: Vec<_> = remote
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("probe:"))
        .collect();
    assert_eq!(probes, vec!["probe:managed"]);
    // Inconclusive probe means no initialize.
    assert_eq!(run.plan.summary.initialize, 0);
}
