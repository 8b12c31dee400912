//! Domain logic - pure release rules independent of git operations

pub mod branch;
pub mod release;
pub mod tag;
pub mod version;

pub use branch::{branch_short_name, default_rules, BranchClassifier, Category, PrefixRule};
pub use release::ReleaseRecord;
pub use tag::{TagPattern, TagScan, DEFAULT_TAG_PATTERN};
pub use version::{derive_next_version, Version, VersionBump};
