use crate::domain::{default_rules, BranchClassifier, PrefixRule, TagPattern, DEFAULT_TAG_PATTERN};
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "release-tagger.toml";

/// Represents the complete configuration for release-tagger.
///
/// Contains the remote to publish to, the tag naming pattern, the ordered
/// branch classification rules and optional hook scripts.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default)]
    pub tag: TagConfig,

    /// Classification rules, matched in file order
    #[serde(default = "default_rules")]
    pub rules: Vec<PrefixRule>,

    #[serde(default)]
    pub hooks: HooksConfig,
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_tag_pattern() -> String {
    DEFAULT_TAG_PATTERN.to_string()
}

fn default_annotated() -> bool {
    true
}

/// Configuration for tag naming and creation.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagConfig {
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,

    /// Create annotated tags carrying the release record; lightweight otherwise
    #[serde(default = "default_annotated")]
    pub annotated: bool,
}

impl Default for TagConfig {
    fn default() -> Self {
        TagConfig {
            pattern: default_tag_pattern(),
            annotated: default_annotated(),
        }
    }
}

/// Hook scripts run around tag publication.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct HooksConfig {
    /// Runs before the tag is created; failure aborts the release
    #[serde(default)]
    pub pre_tag: Option<String>,

    /// Runs after the tag is pushed; failure is only reported
    #[serde(default)]
    pub post_push: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            remote: default_remote(),
            max_attempts: default_max_attempts(),
            tag: TagConfig::default(),
            rules: default_rules(),
            hooks: HooksConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)
            .map_err(|e| ReleaseError::config(format!("Invalid TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.remote.trim().is_empty() {
            return Err(ReleaseError::config("remote must not be empty"));
        }

        if self.max_attempts == 0 {
            return Err(ReleaseError::config("max_attempts must be at least 1"));
        }

        if let Some(rule) = self.rules.iter().find(|r| r.prefix.is_empty()) {
            return Err(ReleaseError::config(format!(
                "Rule for category '{}' has an empty prefix and would match every branch",
                rule.category
            )));
        }

        TagPattern::new(self.tag.pattern.as_str())
            .map_err(|e| ReleaseError::config(e.to_string()))?;

        Ok(())
    }

    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.tag.pattern.as_str())
    }

    pub fn classifier(&self) -> BranchClassifier {
        BranchClassifier::new(self.rules.clone())
    }
}

/// Finds the configuration file to use, if any.
///
/// Looks in the following order:
/// 1. Custom path provided as parameter (must exist)
/// 2. `release-tagger.toml` in current directory
/// 3. `release-tagger.toml` in the user config directory
pub fn locate_config(config_path: Option<&str>) -> Result<Option<PathBuf>> {
    if let Some(path) = config_path {
        let path = PathBuf::from(path);
        if !path.is_file() {
            return Err(ReleaseError::config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        return Ok(Some(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.is_file() {
        return Ok(Some(local));
    }

    Ok(dirs::config_dir()
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file()))
}

/// Loads configuration from file or returns defaults.
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    match locate_config(config_path)? {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading configuration");
            let text = fs::read_to_string(&path)?;
            Config::from_toml(&text)
        }
        None => {
            tracing::debug!("no configuration file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Category;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.remote, "origin");
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.tag.pattern, "v{version}");
        assert!(config.tag.annotated);
    }

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_rules_keep_file_order() {
        let config = Config::from_toml(
            r#"
[[rules]]
prefix = "release/major-"
category = "breaking"

[[rules]]
prefix = "release/"
category = "fix"
"#,
        )
        .unwrap();

        assert_eq!(config.rules.len(), 2);
        assert_eq!(config.rules[0].category, Category::Breaking);
        let classifier = config.classifier();
        assert_eq!(classifier.classify("release/major-x"), Category::Breaking);
        assert_eq!(classifier.classify("feature/x"), Category::Invalid);
    }

    #[test]
    fn test_unknown_category_is_rejected() {
        let result = Config::from_toml(
            r#"
[[rules]]
prefix = "docs/"
category = "cosmetic"
"#,
        );
        assert!(matches!(result, Err(ReleaseError::Config(_))));
    }

    #[test]
    fn test_empty_prefix_is_rejected() {
        let result = Config::from_toml(
            r#"
[[rules]]
prefix = ""
category = "fix"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_attempts_is_rejected() {
        assert!(Config::from_toml("max_attempts = 0").is_err());
    }

    #[test]
    fn test_bad_tag_pattern_is_rejected() {
        let result = Config::from_toml(
            r#"
[tag]
pattern = "release"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_explicit_config_file_is_error() {
        let result = load_config(Some("/nonexistent/release-tagger.toml"));
        assert!(matches!(result, Err(ReleaseError::Config(_))));
    }
}
