use crate::domain::version::Version;
use crate::error::{ReleaseError, Result};
use regex::Regex;

const PLACEHOLDER: &str = "{version}";

/// Tag template used when none is configured
pub const DEFAULT_TAG_PATTERN: &str = "v{version}";

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
    matcher: Regex,
}

impl TagPattern {
    /// Create a tag pattern; the template must hold exactly one `{version}`
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();

        if pattern.matches(PLACEHOLDER).count() != 1 {
            return Err(ReleaseError::tag(format!(
                "Invalid pattern '{}': should have exactly one {{version}} placeholder",
                pattern
            )));
        }

        // Escape everything, then open up the placeholder as a capture group
        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(\d+\.\d+\.\d+)");
        let matcher = Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| ReleaseError::tag(format!("Invalid pattern '{}': {}", pattern, e)))?;

        Ok(TagPattern { pattern, matcher })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Literal text before the placeholder
    pub fn prefix(&self) -> &str {
        self.pattern.split(PLACEHOLDER).next().unwrap_or("")
    }

    /// Literal text after the placeholder
    pub fn suffix(&self) -> &str {
        self.pattern.split(PLACEHOLDER).nth(1).unwrap_or("")
    }

    /// Whether the tag carries the pattern's fixed text and so is meant as a
    /// release tag, parsable or not.
    ///
    /// A bare `{version}` pattern has no fixed text; there the tag must start
    /// with a digit.
    pub fn is_candidate(&self, tag: &str) -> bool {
        let (prefix, suffix) = (self.prefix(), self.suffix());

        if tag.len() < prefix.len() + suffix.len()
            || !tag.starts_with(prefix)
            || !tag.ends_with(suffix)
        {
            return false;
        }

        if prefix.is_empty() && suffix.is_empty() {
            return tag.starts_with(|c: char| c.is_ascii_digit());
        }

        true
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace(PLACEHOLDER, &version.to_string())
    }

    /// Whether the tag has this pattern's shape
    pub fn matches(&self, tag: &str) -> bool {
        self.matcher.is_match(tag)
    }

    /// Extract the release version from a tag of this pattern
    pub fn parse(&self, tag: &str) -> Result<Version> {
        let captures = self.matcher.captures(tag).ok_or_else(|| {
            ReleaseError::tag(format!(
                "Tag '{}' does not match pattern '{}'",
                tag, self.pattern
            ))
        })?;

        let version = captures.get(1).map(|m| m.as_str()).unwrap_or_default();
        Version::parse(version)
    }
}

/// Result of scanning a repository's tags for the latest release
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagScan {
    /// Highest release version found, with the tag that carries it
    pub latest: Option<(String, Version)>,
    /// Tags that look like release tags but don't parse as one
    pub unparsable: Vec<(String, String)>,
}

impl TagScan {
    /// Scan tag names for the highest version matching `pattern`.
    ///
    /// Tags that are not [TagPattern::is_candidate] are unrelated and skipped
    /// silently. Candidates that fail to parse are collected in `unparsable`.
    pub fn scan<I, S>(pattern: &TagPattern, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut scan = TagScan::default();

        for tag in tags {
            let tag = tag.as_ref();
            if !pattern.is_candidate(tag) {
                continue;
            }

            match pattern.parse(tag) {
                Ok(version) => {
                    let is_newer = scan
                        .latest
                        .as_ref()
                        .map_or(true, |(_, current)| version > *current);
                    if is_newer {
                        scan.latest = Some((tag.to_string(), version));
                    }
                }
                Err(e) => scan.unparsable.push((tag.to_string(), e.to_string())),
            }
        }

        scan
    }

    /// The version the next release builds on (0.0.0 when nothing parsed)
    pub fn base_version(&self) -> Version {
        self.latest
            .as_ref()
            .map(|(_, version)| *version)
            .unwrap_or(Version::INITIAL)
    }

    pub fn latest_tag(&self) -> Option<&str> {
        self.latest.as_ref().map(|(tag, _)| tag.as_str())
    }
}
