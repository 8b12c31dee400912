//! Release workflow orchestration
//!
//! Turns one merged branch into at most one published tag. Publication is a
//! compare-and-swap on the remote's tag namespace: a tag is only created
//! under a name the remote does not have, pushes never force, and a run that
//! loses a race re-reads the tags and derives again.

use tracing::{debug, info};

use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::{
    branch_short_name, derive_next_version, Category, ReleaseRecord, TagScan, Version,
};
use crate::error::{ReleaseError, Result};
use crate::git::{PushOutcome, Repository};
use crate::hooks::{HookContext, HookExecutor, HookType};

/// Arguments for the release workflow
///
/// Mirrors the CLI arguments without depending on clap, so the workflow can
/// be driven programmatically.
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Name of the merged branch
    pub branch: String,

    /// Pull request that was merged, recorded on the release
    pub pull_request: Option<u64>,

    /// Overrides the configured remote
    pub remote: Option<String>,

    /// Revision to tag
    pub target: String,

    /// Derive and report only
    pub dry_run: bool,

    /// Fetch tags before deriving
    pub fetch: bool,

    /// Push the created tag
    pub push: bool,
}

impl ReleaseWorkflowArgs {
    /// Arguments for a normal release of `branch` at HEAD
    pub fn new(branch: impl Into<String>) -> Self {
        ReleaseWorkflowArgs {
            branch: branch.into(),
            pull_request: None,
            remote: None,
            target: "HEAD".to_string(),
            dry_run: false,
            fetch: true,
            push: true,
        }
    }
}

/// What a workflow run did
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowOutcome {
    /// The branch matched no rule; nothing was derived
    Skipped { branch: String },
    /// The release that would be made
    DryRun { record: ReleaseRecord },
    /// A tag was created, and pushed unless pushing was disabled
    Released { record: ReleaseRecord, pushed: bool },
}

impl WorkflowOutcome {
    pub fn record(&self) -> Option<&ReleaseRecord> {
        match self {
            WorkflowOutcome::Skipped { .. } => None,
            WorkflowOutcome::DryRun { record } | WorkflowOutcome::Released { record, .. } => {
                Some(record)
            }
        }
    }
}

/// Result of a workflow run
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowReport {
    pub outcome: WorkflowOutcome,
    /// Non-fatal conditions met along the way, in order
    pub warnings: Vec<BoundaryWarning>,
    /// Derivation rounds used (0 when skipped)
    pub attempts: u32,
}

/// Log a boundary condition and keep it for the report; the UI prints the report
fn note(warnings: &mut Vec<BoundaryWarning>, warning: BoundaryWarning) {
    info!(warning = %warning, "boundary condition");
    warnings.push(warning);
}

/// Main release workflow
///
/// 1. Classify the branch; an unmatched branch ends the run as skipped
/// 2. Fetch tags and find the latest release version
/// 3. Derive the next version and its tag
/// 4. Create the tag and push it without force
/// 5. On a lost race, drop the local tag and go back to 2
///
/// # Returns
///
/// The report of what happened, or [ReleaseError::Conflict] when every
/// attempt lost to a concurrent release.
pub fn run_release_workflow<R: Repository>(
    repo: &R,
    args: &ReleaseWorkflowArgs,
    config: &Config,
) -> Result<WorkflowReport> {
    let branch = branch_short_name(&args.branch).to_string();
    let category = config.classifier().classify(&branch);
    let mut warnings = Vec::new();

    if category == Category::Invalid {
        note(
            &mut warnings,
            BoundaryWarning::InvalidBranch {
                branch: branch.clone(),
            },
        );
        return Ok(WorkflowReport {
            outcome: WorkflowOutcome::Skipped { branch },
            warnings,
            attempts: 0,
        });
    }

    let pattern = config.tag_pattern()?;
    let remote = args.remote.as_deref().unwrap_or(config.remote.as_str());
    let commit = repo.resolve_commit(&args.target)?;
    info!(branch = %branch, category = %category, commit = %commit, "deriving release");

    let mut last_tag = String::new();

    for attempt in 1..=config.max_attempts {
        if args.fetch {
            if let Err(e) = repo.fetch_tags(remote) {
                note(
                    &mut warnings,
                    BoundaryWarning::FetchFailed {
                        remote: remote.to_string(),
                        reason: e.to_string(),
                    },
                );
            }
        }

        let tags = repo.list_tags()?;
        let scan = TagScan::scan(&pattern, &tags);
        debug!(
            attempt,
            tags = tags.len(),
            latest = ?scan.latest_tag(),
            "scanned tags"
        );

        if attempt == 1 {
            for (tag, reason) in &scan.unparsable {
                note(
                    &mut warnings,
                    BoundaryWarning::UnparsableTag {
                        tag: tag.clone(),
                        reason: reason.clone(),
                    },
                );
            }
            if scan.latest.is_none() {
                note(
                    &mut warnings,
                    BoundaryWarning::NoPriorTag {
                        fallback: pattern.format(&Version::INITIAL),
                    },
                );
            }
        }

        let version = derive_next_version(scan.base_version(), category)?.ok_or_else(|| {
            ReleaseError::version(format!("Branch '{}' does not produce a release", branch))
        })?;
        let tag = pattern.format(&version);
        last_tag = tag.clone();

        let record = ReleaseRecord {
            tag: tag.clone(),
            version,
            previous_tag: scan.latest_tag().map(str::to_string),
            branch: branch.clone(),
            category,
            pull_request: args.pull_request,
            commit: commit.to_string(),
        };

        if args.dry_run {
            info!(tag = %tag, "dry run, not creating tag");
            return Ok(WorkflowReport {
                outcome: WorkflowOutcome::DryRun { record },
                warnings,
                attempts: attempt,
            });
        }

        // Local tags may be stale if the fetch failed; ask the remote itself
        if args.push && repo.remote_tag(remote, &tag)?.is_some() {
            note(&mut warnings, BoundaryWarning::TagConflict { tag, attempt });
            continue;
        }

        if let Some(script) = &config.hooks.pre_tag {
            HookExecutor::execute(script, &HookContext::new(HookType::PreTag, &record, remote))?;
        }

        let message = config.tag.annotated.then(|| record.message());
        repo.create_tag(&tag, commit, message.as_deref())?;
        info!(tag = %tag, "created tag");

        if !args.push {
            return Ok(WorkflowReport {
                outcome: WorkflowOutcome::Released {
                    record,
                    pushed: false,
                },
                warnings,
                attempts: attempt,
            });
        }

        match repo.push_tag(remote, &tag)? {
            PushOutcome::Pushed => {
                info!(tag = %tag, remote, "pushed tag");

                if let Some(script) = &config.hooks.post_push {
                    let context = HookContext::new(HookType::PostPush, &record, remote);
                    if let Some(reason) = HookExecutor::execute_permissive(script, &context) {
                        note(
                            &mut warnings,
                            BoundaryWarning::HookFailed {
                                hook: HookType::PostPush.name().to_string(),
                                reason,
                            },
                        );
                    }
                }

                return Ok(WorkflowReport {
                    outcome: WorkflowOutcome::Released {
                        record,
                        pushed: true,
                    },
                    warnings,
                    attempts: attempt,
                });
            }
            PushOutcome::Rejected { reason } => {
                debug!(tag = %tag, reason = %reason, "push rejected");
                repo.delete_tag(&tag)?;
                note(&mut warnings, BoundaryWarning::TagConflict { tag, attempt });
            }
        }
    }

    Err(ReleaseError::Conflict {
        tag: last_tag,
        attempts: config.max_attempts,
    })
}
