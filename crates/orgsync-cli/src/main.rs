use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use eyre::{Result, WrapErr};
use orgsync_cli::config::{self, redact_token, Overrides, SyncConfig};
use orgsync_cli::report;
use orgsync_core::{manifest, OriginRef, ResourceRecord};
use orgsync_github::GitHubClient;
use orgsync_provisioner::remote::check_permissions;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "orgsync",
    version,
    about = "Reconcile a GitHub organization against REPOSITORIES.md"
)]
struct Cli {
    /// Config file (JSON). Optional unless given explicitly.
    #[arg(long, global = true, env = "ORGSYNC_CONFIG")]
    config: Option<PathBuf>,

    /// Organization to manage
    #[arg(long, global = true, env = "ORGSYNC_ORG")]
    org: Option<String>,

    /// GitHub API root
    #[arg(long, global = true, env = "ORGSYNC_API_BASE")]
    api_base: Option<String>,

    /// Path to the repository manifest
    #[arg(long, global = true, env = "ORGSYNC_MANIFEST")]
    manifest: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed manifest as JSON
    Parse,
    /// Report differences between the manifest and the organization
    Drift {
        #[command(flatten)]
        auth: Auth,
    },
    /// Plan and (with --apply) execute the changes that converge the organization
    Sync {
        #[command(flatten)]
        auth: Auth,
        /// Make changes instead of only reporting them
        #[arg(long)]
        apply: bool,
    },
    /// Check whether the organization may transfer the given repositories
    CheckPermissions {
        #[command(flatten)]
        auth: Auth,
        /// Origins as owner/repo
        #[arg(required = true)]
        origins: Vec<String>,
    },
    /// Write a starter config file
    InitConfig {
        #[arg(default_value = config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
struct Auth {
    /// GitHub token with org admin scope
    #[arg(long, env = "ORGSYNC_GITHUB_TOKEN", hide_env_values = true)]
    token: String,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn resolve_config(cli: &Cli) -> Result<SyncConfig> {
    let (path, required) = match &cli.config {
        Some(p) => (p.clone(), true),
        None => (PathBuf::from(config::DEFAULT_CONFIG_FILE), false),
    };
    let config = config::load_or_default(&path, required)?.apply(Overrides {
        organization: cli.org.clone(),
        api_base: cli.api_base.clone(),
        manifest_path: cli.manifest.clone(),
    });
    Ok(config)
}

fn load_manifest(config: &SyncConfig) -> Result<Vec<ResourceRecord>> {
    let desired = manifest::read_manifest(&config.manifest_path)?;
    tracing::info!(
        path = %config.manifest_path.display(),
        repositories = desired.len(),
        "manifest loaded"
    );
    Ok(desired)
}

fn github(config: &SyncConfig, auth: &Auth) -> Result<GitHubClient> {
    config.validate()?;
    tracing::info!(
        org = %config.organization,
        api_base = %config.api_base,
        token = %redact_token(&auth.token),
        "connecting to GitHub"
    );
    GitHubClient::with_api_base(&config.api_base, config.organization.clone(), &auth.token)
        .wrap_err("failed to build GitHub client")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match &cli.command {
        Command::InitConfig { path } => {
            let starter = SyncConfig {
                organization: cli.org.clone().unwrap_or_default(),
                ..SyncConfig::default()
            };
            config::save_new_config(path, &starter)?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Parse => {
            let config = resolve_config(&cli)?;
            let desired = load_manifest(&config)?;
            println!("{}", serde_json::to_string_pretty(&desired)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Drift { auth } => {
            let config = resolve_config(&cli)?;
            let desired = load_manifest(&config)?;
            let client = github(&config, auth)?;
            let (actual, drift) = orgsync_provisioner::assess(&client, &client, &desired).await?;
            println!("{}", report::drift_report(&drift, desired.len(), actual.len()));
            Ok(exit_code(drift.has_drift()))
        }
        Command::Sync { auth, apply } => {
            let config = resolve_config(&cli)?;
            let desired = load_manifest(&config)?;
            let client = github(&config, auth)?;
            let run = orgsync_provisioner::reconcile(
                &client,
                &client,
                &desired,
                &config.settings,
                !apply,
            )
            .await?;
            println!("{}", report::sync_report(&run.plan, &run.result, run.dry_run));
            if run.result.has_failures() {
                tracing::error!(failures = run.result.failures.len(), "sync finished with failures");
            }
            Ok(exit_code(run.signals_failure()))
        }
        Command::CheckPermissions { auth, origins } => {
            let origins = origins
                .iter()
                .map(|o| o.parse::<OriginRef>())
                .collect::<Result<Vec<_>, _>>()?;
            let config = resolve_config(&cli)?;
            let client = github(&config, auth)?;
            let results = check_permissions(&client, &origins).await?;
            println!("{}", report::permission_report(&results));
            Ok(exit_code(results.values().any(|r| !r.has_permission)))
        }
    }
}

fn exit_code(failed: bool) -> ExitCode {
    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
