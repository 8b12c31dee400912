//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the git operations a
//! release needs, with a real implementation and an in-memory one for tests.
//!
//! - [repository::Git2Repository]: libgit2 through the `git2` crate
//! - [mock::MockRepository]: local and remote tag namespaces in memory
//!
//! The release workflow depends on the [Repository] trait only.
//!
//! ```rust
//! # use release_tagger::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> release_tagger::Result<()> {
//! repo.fetch_tags("origin")?;
//! let tags = repo.list_tags()?;
//! println!("{} tags, HEAD at {}", tags.len(), repo.resolve_commit("HEAD")?);
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use git2::Oid;

/// How a remote answered a tag push
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    /// The remote created the tag
    Pushed,
    /// The remote refused the update, normally because the tag already exists
    Rejected { reason: String },
}

/// Git operations used to derive and publish a release tag
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. Implementations map
/// underlying errors (like `git2::Error`) to the matching
/// [crate::error::ReleaseError] variants. A push the remote refuses is not an
/// error: it is reported as [PushOutcome::Rejected] so the caller can retry.
pub trait Repository {
    /// Resolve a revision (e.g. "HEAD", a branch or a commit id) to a commit id
    fn resolve_commit(&self, rev: &str) -> Result<Oid>;

    /// All tag names known locally, sorted alphabetically
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Fetch every tag from a remote, updating local tags to the remote's view
    fn fetch_tags(&self, remote: &str) -> Result<()>;

    /// Look up a tag on the remote itself, bypassing local state
    ///
    /// # Returns
    /// * `Ok(Some(Oid))` - The object the remote's tag ref points to
    /// * `Ok(None)` - The remote has no such tag
    fn remote_tag(&self, remote: &str, tag_name: &str) -> Result<Option<Oid>>;

    /// Create a tag on a commit; never overwrites an existing tag
    ///
    /// With a message the tag is annotated, otherwise it is lightweight.
    fn create_tag(&self, name: &str, oid: Oid, message: Option<&str>) -> Result<()>;

    /// Delete a local tag
    fn delete_tag(&self, name: &str) -> Result<()>;

    /// Push one tag to a remote without forcing
    fn push_tag(&self, remote: &str, tag_name: &str) -> Result<PushOutcome>;
}
