use clap::Parser;
use tracing::info;

use cleanup_core::config::{Config, DEFAULT_MAX_AGE_HOURS};
use cleanup_core::delete::RduRemover;
use cleanup_core::github::GitHubClient;
use cleanup_core::helm::HelmCli;
use cleanup_core::kube::KubectlExemptions;
use cleanup_core::run::run_cleanup;

#[derive(Parser)]
#[command(
    name = "ci-cleanup",
    about = "Delete stale CI-triggered deployments — reconciles age, PR state, and exemption into one pass",
    version
)]
struct Cli {
    /// Whitespace-separated namespace regexes; only matching namespaces are considered
    #[arg(long, env = "NAMESPACE_PATTERNS", default_value = "")]
    namespace_patterns: String,

    /// Maximum deployment age in hours before it becomes a deletion candidate
    #[arg(long, env = "MAX_AGE_HOURS", default_value_t = DEFAULT_MAX_AGE_HOURS)]
    max_age_hours: i64,

    /// Log would-be deletions without touching the cluster
    #[arg(long, env = "DRY_RUN")]
    dry_run: bool,

    /// Exemption annotation as `key=value`; only the key is used
    #[arg(long, env = "EXEMPTION_LABEL")]
    exemption_label: Option<String>,

    /// Whitespace-separated `regex:repository` namespace-to-repo mappings
    #[arg(long, env = "PR_REPOSITORIES", default_value = "")]
    pr_repositories: String,

    /// GitHub access token for pull-request state lookups
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: String,

    /// Release name to exclude from consideration (repeatable)
    #[arg(long = "exclude", value_name = "NAME")]
    exclude: Vec<String>,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_parts(
        &cli.namespace_patterns,
        cli.max_age_hours,
        cli.dry_run,
        cli.exemption_label.as_deref(),
        &cli.pr_repositories,
        cli.github_token,
    )?;

    info!(
        max_age_hours = config.max_age_hours,
        dry_run = config.dry_run,
        "starting cleanup"
    );

    let github = GitHubClient::new(config.github_token.clone());
    let exemptions = KubectlExemptions::new(config.exemption_annotation.clone());

    let summary = run_cleanup(
        &config,
        &HelmCli,
        &github,
        &exemptions,
        &RduRemover,
        &cli.exclude,
    )?;

    // Individual deletion failures are reported, not fatal to the run.
    println!("{}", summary.render());
    Ok(())
}
