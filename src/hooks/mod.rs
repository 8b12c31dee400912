//! Hook scripts run around tag publication
//!
//! - pre-tag: before the tag is created; failure aborts the release
//! - post-push: after the tag reached the remote; this is where the release
//!   record is published (e.g. `gh release create "$RELEASE_TAG"`)

pub mod executor;
pub mod lifecycle;

pub use executor::HookExecutor;
pub use lifecycle::{HookContext, HookType};
