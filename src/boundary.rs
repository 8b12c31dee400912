use std::fmt;

/// Non-fatal conditions met while deriving or publishing a release.
/// These are reported to the user but never abort the run on their own.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// Branch name matched no classification rule, so no release is made
    InvalidBranch { branch: String },
    /// Tag looks like a release tag but cannot be parsed as a version
    UnparsableTag { tag: String, reason: String },
    /// No release tag found; derivation starts from the fallback version
    NoPriorTag { fallback: String },
    /// Fetching tags failed; local tags may be stale
    FetchFailed { remote: String, reason: String },
    /// Another release published the tag first
    TagConflict { tag: String, attempt: u32 },
    /// A post-push hook failed after the tag was already published
    HookFailed { hook: String, reason: String },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::InvalidBranch { branch } => {
                write!(
                    f,
                    "Branch '{}' matches no release rule; skipping release",
                    branch
                )
            }
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::NoPriorTag { fallback } => {
                write!(f, "No release tag found; starting from {}", fallback)
            }
            BoundaryWarning::FetchFailed { remote, reason } => {
                write!(
                    f,
                    "Could not fetch tags from remote '{}': {}. Using local tags",
                    remote, reason
                )
            }
            BoundaryWarning::TagConflict { tag, attempt } => {
                write!(
                    f,
                    "Tag '{}' was published by a concurrent release (attempt {}); re-deriving",
                    tag, attempt
                )
            }
            BoundaryWarning::HookFailed { hook, reason } => {
                write!(f, "Hook '{}' failed after publishing: {}", hook, reason)
            }
        }
    }
}
