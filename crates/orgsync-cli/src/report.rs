//! Markdown rendering for drift, sync and permission results.
//!
//! Reports go to stdout so CI jobs can post them verbatim.

use std::collections::BTreeMap;

use orgsync_core::PermissionResult;
use orgsync_provisioner::drift::DriftReport;
use orgsync_provisioner::plan::{Action, SyncPlan};
use orgsync_provisioner::sync::ExecutionResult;

const MANIFEST: &str = "REPOSITORIES.md";

fn or_empty(s: &str) -> &str {
    if s.is_empty() { "(empty)" } else { s }
}

fn joined(topics: &[String]) -> String {
    if topics.is_empty() {
        "(none)".to_string()
    } else {
        topics.join(", ")
    }
}

pub fn drift_report(drift: &DriftReport, desired_count: usize, actual_count: usize) -> String {
    let mut lines = vec![
        "# 🔍 Repository Drift Report".to_string(),
        String::new(),
        format!(
            "**Summary**: {desired_count} repositories in {MANIFEST}, \
             {actual_count} repositories in GitHub organization"
        ),
        String::new(),
    ];

    if drift.has_drift() {
        lines.push(format!(
            "⚠️ **Drift detected** - Differences found between {MANIFEST} and GitHub"
        ));
        lines.push(String::new());
    } else {
        lines.push(format!(
            "✅ **No drift detected** - {MANIFEST} matches GitHub organization state"
        ));
        lines.push(String::new());
    }

    if !drift.missing.is_empty() {
        lines.push(format!("## 📝 Missing in GitHub ({})", drift.missing.len()));
        lines.push(String::new());
        lines.push(format!(
            "These repositories are defined in {MANIFEST} but do not exist in GitHub:"
        ));
        lines.push(String::new());
        for repo in &drift.missing {
            lines.push(format!("- **{}**: {}", repo.name, repo.description));
        }
        lines.push(String::new());
    }

    if !drift.extra.is_empty() {
        lines.push(format!("## ➕ Not in {MANIFEST} ({})", drift.extra.len()));
        lines.push(String::new());
        lines.push(format!(
            "These repositories exist in GitHub but are not documented in {MANIFEST}:"
        ));
        lines.push(String::new());
        for repo in &drift.extra {
            let description = if repo.description.is_empty() {
                "(no description)"
            } else {
                &repo.description
            };
            lines.push(format!("- **{}**: {description}", repo.name));
        }
        lines.push(String::new());
    }

    if !drift.description_diff.is_empty() {
        lines.push(format!(
            "## 📄 Description Mismatches ({})",
            drift.description_diff.len()
        ));
        lines.push(String::new());
        for diff in &drift.description_diff {
            lines.push(format!("### {}", diff.name));
            lines.push(format!("- **In {MANIFEST}**: {}", or_empty(&diff.desired)));
            lines.push(format!("- **In GitHub**: {}", or_empty(&diff.actual)));
            lines.push(String::new());
        }
    }

    if !drift.topics_diff.is_empty() {
        lines.push(format!("## 🏷️ Topics Mismatches ({})", drift.topics_diff.len()));
        lines.push(String::new());
        for diff in &drift.topics_diff {
            lines.push(format!("### {}", diff.name));
            lines.push(format!("- **In {MANIFEST}**: {}", joined(&diff.desired)));
            lines.push(format!("- **In GitHub**: {}", joined(&diff.actual)));
            lines.push(String::new());
        }
    }

    if !drift.pending_transfer.is_empty() {
        lines.push(format!(
            "## 🚚 Pending Transfers ({})",
            drift.pending_transfer.len()
        ));
        lines.push(String::new());
        for repo in &drift.pending_transfer {
            let origin = repo.origin.as_deref().unwrap_or_default();
            let status = match drift.transfer_permissions.get(origin) {
                Some(p) if p.has_permission => "ready".to_string(),
                Some(p) => format!("blocked: {}", p.details),
                None => "permission not checked".to_string(),
            };
            lines.push(format!("- **{}** from `{origin}`: {status}", repo.name));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

fn describe(action: &Action) -> Vec<String> {
    match action {
        Action::Create { record } => {
            let mut out = vec![
                format!("- **Create** `{}`", record.name),
                format!("  - Description: {}", record.description),
            ];
            if !record.topics.is_empty() {
                out.push(format!("  - Topics: {}", record.topics.join(", ")));
            }
            out
        }
        Action::UpdateDescription { name, from, to } => vec![
            format!("- **Update description** for `{name}`"),
            format!("  - From: {}", or_empty(from)),
            format!("  - To: {}", or_empty(to)),
        ],
        Action::UpdateTopics { name, from, to } => vec![
            format!("- **Update topics** for `{name}`"),
            format!("  - From: {}", joined(from)),
            format!("  - To: {}", joined(to)),
        ],
        Action::EnsureSettings { name } => vec![format!("- **Enforce settings** on `{name}`")],
        Action::Initialize { name, .. } => {
            vec![format!("- **Initialize** `{name}` with a README commit")]
        }
        Action::Delete { name } => vec![format!("- **Delete** `{name}`")],
        Action::Transfer { record, origin } => vec![format!(
            "- **Transfer** `{origin}` into the organization as `{}`",
            record.name
        )],
        Action::Skip { name, reason } => vec![format!("- `{name}`: {reason}")],
    }
}

pub fn sync_report(plan: &SyncPlan, results: &ExecutionResult, dry_run: bool) -> String {
    let mode = if dry_run { "🔍 DRY-RUN" } else { "✅ APPLY" };
    let mut lines = vec![format!("# {mode} Repository Sync Report"), String::new()];

    if plan.is_empty() {
        lines.push(format!(
            "✅ **No changes needed** - GitHub organization matches {MANIFEST}"
        ));
        return lines.join("\n");
    }

    let s = &plan.summary;
    lines.push(format!("**Summary**: {} total actions", plan.len()));
    lines.push(format!("- Create: {}", s.create));
    lines.push(format!("- Update descriptions: {}", s.update_description));
    lines.push(format!("- Update topics: {}", s.update_topics));
    lines.push(format!("- Enforce settings: {}", s.ensure_settings));
    lines.push(format!("- Initialize: {}", s.initialize));
    lines.push(format!("- Delete: {}", s.delete));
    lines.push(format!("- Transfer: {}", s.transfer));
    lines.push(format!("- Skip (manual action needed): {}", s.skip));
    lines.push(String::new());

    if !results.success.is_empty() {
        let header = if dry_run {
            "📋 Actions to Apply"
        } else {
            "✅ Successfully Applied"
        };
        lines.push(format!("## {header} ({})", results.success.len()));
        lines.push(String::new());
        for item in &results.success {
            lines.extend(describe(&item.action));
            if !dry_run {
                lines.push(format!("  - Result: {}", item.result));
            }
            lines.push(String::new());
        }
    }

    if !results.failures.is_empty() {
        lines.push(format!("## ❌ Failed ({})", results.failures.len()));
        lines.push(String::new());
        for item in &results.failures {
            lines.push(format!(
                "- **{}** for `{}`",
                item.action.label(),
                item.action.name()
            ));
            lines.push(format!("  - Error: {}", item.error));
            lines.push(String::new());
        }
    }

    if !results.skipped.is_empty() {
        lines.push(format!(
            "## ⚠️ Skipped - Manual Action Required ({})",
            results.skipped.len()
        ));
        lines.push(String::new());
        for item in &results.skipped {
            lines.push(format!("- `{}`: {}", item.action.name(), item.reason));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

pub fn permission_report(results: &BTreeMap<String, PermissionResult>) -> String {
    let mut lines = vec!["# 🔐 Transfer Permission Check".to_string(), String::new()];
    for (origin, result) in results {
        let verdict = if result.has_permission { "✅ Yes" } else { "❌ No" };
        lines.push(format!("## {origin}"));
        lines.push(format!("- Permission level: {}", result.permission_level));
        lines.push(format!("- Can transfer: {verdict}"));
        lines.push(format!("- Details: {}", result.details));
        lines.push(String::new());
    }
    lines.join("\n")
}
