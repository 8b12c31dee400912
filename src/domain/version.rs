use crate::domain::branch::Category;
use crate::error::{ReleaseError, Result};
use std::fmt;

/// Semantic version representation
///
/// Field order matters: the derived `Ord` compares major, then minor, then
/// patch, which is semantic-version precedence for release versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// The base version used when no prior release tag exists
    pub const INITIAL: Version = Version {
        major: 0,
        minor: 0,
        patch: 0,
    };

    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a release version, with or without a 'v'/'V' prefix (e.g., "v1.2.3").
    ///
    /// Pre-release and build metadata are rejected: `1.2.3-rc.1` is not a
    /// release and must never be picked as the base for the next one.
    pub fn parse(text: &str) -> Result<Self> {
        let clean = text
            .strip_prefix('v')
            .or_else(|| text.strip_prefix('V'))
            .unwrap_or(text);

        let parsed = semver::Version::parse(clean).map_err(|e| {
            ReleaseError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z ({})",
                text, e
            ))
        })?;

        if !parsed.pre.is_empty() || !parsed.build.is_empty() {
            return Err(ReleaseError::version(format!(
                "'{}' is not a release version",
                text
            )));
        }

        Ok(Version::from(parsed))
    }

    /// Bump version according to bump type
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow = || {
            ReleaseError::version(format!("Cannot apply {:?} bump to {}", bump_type, self))
        };

        let next = match bump_type {
            VersionBump::Major => Version {
                major: self.major.checked_add(1).ok_or_else(overflow)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: self.minor.checked_add(1).ok_or_else(overflow)?,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: self.patch.checked_add(1).ok_or_else(overflow)?,
            },
        };

        Ok(next)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<semver::Version> for Version {
    fn from(v: semver::Version) -> Self {
        Version::new(v.major, v.minor, v.patch)
    }
}

impl From<Version> for semver::Version {
    fn from(v: Version) -> Self {
        semver::Version::new(v.major, v.minor, v.patch)
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

/// Computes the version that follows `latest` for a branch of the given category.
///
/// Returns `Ok(None)` for [`Category::Invalid`]: no release is produced and
/// that is not an error. Any returned version is strictly greater than
/// `latest`.
///
/// # Example
/// ```
/// use release_tagger::domain::{derive_next_version, Category, Version};
///
/// let next = derive_next_version(Version::new(2, 3, 4), Category::Feature).unwrap();
/// assert_eq!(next, Some(Version::new(2, 4, 0)));
///
/// let skipped = derive_next_version(Version::new(2, 3, 4), Category::Invalid).unwrap();
/// assert_eq!(skipped, None);
/// ```
pub fn derive_next_version(latest: Version, category: Category) -> Result<Option<Version>> {
    match category.bump() {
        Some(bump) => latest.bump(bump).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parse() {
        let v = Version::parse("v1.2.3").unwrap();
        assert_eq!(v.major, 1);
        assert_eq!(v.minor, 2);
        assert_eq!(v.patch, 3);
    }

    #[test]
    fn test_version_parse_without_v() {
        let v = Version::parse("1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_uppercase_v() {
        let v = Version::parse("V1.2.3").unwrap();
        assert_eq!(v, Version::new(1, 2, 3));
    }

    #[test]
    fn test_version_parse_invalid() {
        assert!(Version::parse("1.2").is_err());
        assert!(Version::parse("v1.2.3.4").is_err());
        assert!(Version::parse("vv1.2.3").is_err());
        assert!(Version::parse("latest").is_err());
        assert!(Version::parse("").is_err());
    }

    #[test]
    fn test_version_parse_rejects_prerelease_and_build() {
        assert!(Version::parse("v1.2.3-rc.1").is_err());
        assert!(Version::parse("1.2.3+build.7").is_err());
    }

    #[test]
    fn test_version_bump_major() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Major).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_version_bump_minor() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Minor).unwrap(), Version::new(1, 3, 0));
    }

    #[test]
    fn test_version_bump_patch() {
        let v = Version::new(1, 2, 3);
        assert_eq!(v.bump(VersionBump::Patch).unwrap(), Version::new(1, 2, 4));
    }

    #[test]
    fn test_version_bump_overflow_is_error() {
        let v = Version::new(u64::MAX, 0, 0);
        assert!(v.bump(VersionBump::Major).is_err());
        // Lower components reset, so a maxed-out patch is harmless for a minor bump
        let v = Version::new(0, 0, u64::MAX);
        assert_eq!(v.bump(VersionBump::Minor).unwrap(), Version::new(0, 1, 0));
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(1, 2, 3).to_string(), "1.2.3");
        assert_eq!(Version::INITIAL.to_string(), "0.0.0");
    }

    #[test]
    fn test_ordering_matches_semver_precedence() {
        let pairs = [
            (Version::new(1, 9, 9), Version::new(2, 0, 0)),
            (Version::new(1, 2, 10), Version::new(1, 3, 0)),
            (Version::new(0, 0, 9), Version::new(0, 0, 10)),
        ];
        for (lower, higher) in pairs {
            assert!(lower < higher);
            assert!(semver::Version::from(lower) < semver::Version::from(higher));
        }
    }

    #[test]
    fn test_derive_breaking_resets_minor_and_patch() {
        let next = derive_next_version(Version::new(2, 3, 4), Category::Breaking).unwrap();
        assert_eq!(next, Some(Version::new(3, 0, 0)));
    }

    #[test]
    fn test_derive_feature_resets_patch() {
        let next = derive_next_version(Version::new(2, 3, 4), Category::Feature).unwrap();
        assert_eq!(next, Some(Version::new(2, 4, 0)));
    }

    #[test]
    fn test_derive_fix_from_initial() {
        let next = derive_next_version(Version::INITIAL, Category::Fix).unwrap();
        assert_eq!(next, Some(Version::new(0, 0, 1)));
    }

    #[test]
    fn test_derive_invalid_is_noop() {
        let next = derive_next_version(Version::new(2, 3, 4), Category::Invalid).unwrap();
        assert_eq!(next, None);
    }

    #[test]
    fn test_derived_version_is_strictly_greater() {
        let bases = [
            Version::INITIAL,
            Version::new(0, 0, 7),
            Version::new(0, 5, 0),
            Version::new(3, 0, 0),
            Version::new(12, 40, 113),
        ];
        let categories = [Category::Breaking, Category::Feature, Category::Fix];

        for base in bases {
            for category in categories {
                let next = derive_next_version(base, category).unwrap().unwrap();
                assert!(
                    semver::Version::from(next) > semver::Version::from(base),
                    "{:?} on {} gave {}",
                    category,
                    base,
                    next
                );
            }
        }
    }
}
