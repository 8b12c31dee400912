use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use release_tagger::cli::{run_release_workflow, ReleaseWorkflowArgs};
use release_tagger::config;
use release_tagger::git::Git2Repository;
use release_tagger::{output, ui};

#[derive(clap::Parser)]
#[command(
    name = "release-tagger",
    version,
    about = "Derive the next semantic version from a merged branch name and publish it as a git tag"
)]
struct Args {
    #[arg(
        short,
        long,
        env = "RELEASE_BRANCH",
        help = "Merged branch name (falls back to GITHUB_HEAD_REF)"
    )]
    branch: Option<String>,

    #[arg(long, env = "RELEASE_PULL_REQUEST", help = "Pull request number to record")]
    pr: Option<u64>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, help = "Remote to fetch from and push to")]
    remote: Option<String>,

    #[arg(long, default_value = "HEAD", help = "Revision to tag")]
    target: String,

    #[arg(long, help = "Preview the release without creating or pushing a tag")]
    dry_run: bool,

    #[arg(long, help = "Create the tag locally without pushing it")]
    no_push: bool,

    #[arg(long, help = "Do not fetch tags before deriving the version")]
    offline: bool,

    #[arg(
        short,
        long,
        env = "GITHUB_OUTPUT",
        help = "Append key=value release outputs to this file"
    )]
    output: Option<PathBuf>,

    #[arg(long, help = "Show the branch classification rules and exit")]
    list_rules: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    if args.list_rules {
        ui::display_rules(&config.rules);
        return Ok(());
    }

    let branch = args
        .branch
        .or_else(|| {
            std::env::var("GITHUB_HEAD_REF")
                .ok()
                .filter(|b| !b.is_empty())
        })
        .context("No branch given: pass --branch or set RELEASE_BRANCH")?;

    let repo = Git2Repository::open(".").context("Git repository error")?;

    let workflow_args = ReleaseWorkflowArgs {
        branch,
        pull_request: args.pr,
        remote: args.remote.clone(),
        target: args.target,
        dry_run: args.dry_run,
        fetch: !args.offline,
        push: !args.no_push,
    };

    let report = run_release_workflow(&repo, &workflow_args, &config)?;

    let remote = args.remote.as_deref().unwrap_or(config.remote.as_str());
    ui::display_report(&report, remote);

    if let Some(path) = &args.output {
        output::append_outputs(path, &report)
            .with_context(|| format!("Failed to write outputs to {}", path.display()))?;
    }

    Ok(())
}
