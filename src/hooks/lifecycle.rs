use crate::domain::ReleaseRecord;
use std::collections::HashMap;

/// Points in the release where a user script can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookType {
    PreTag,
    PostPush,
}

impl HookType {
    /// Get the hook name as a string
    pub fn name(&self) -> &'static str {
        match self {
            HookType::PreTag => "pre-tag",
            HookType::PostPush => "post-push",
        }
    }
}

/// Context information passed to a hook
#[derive(Debug, Clone)]
pub struct HookContext<'a> {
    pub hook_type: HookType,
    pub record: &'a ReleaseRecord,
    pub remote: &'a str,
}

impl<'a> HookContext<'a> {
    pub fn new(hook_type: HookType, record: &'a ReleaseRecord, remote: &'a str) -> Self {
        HookContext {
            hook_type,
            record,
            remote,
        }
    }

    /// Convert context to environment variables for the hook script
    ///
    /// Maps the release record to RELEASE_* environment variables
    pub fn to_env_vars(&self) -> HashMap<String, String> {
        let record = self.record;
        let mut env = HashMap::new();

        env.insert("RELEASE_HOOK".to_string(), self.hook_type.name().to_string());
        env.insert("RELEASE_TAG".to_string(), record.tag.clone());
        env.insert("RELEASE_VERSION".to_string(), record.version.to_string());
        env.insert("RELEASE_BRANCH".to_string(), record.branch.clone());
        env.insert("RELEASE_CATEGORY".to_string(), record.category.to_string());
        env.insert("RELEASE_REMOTE".to_string(), self.remote.to_string());
        env.insert("RELEASE_COMMIT".to_string(), record.commit.clone());

        if let Some(previous) = &record.previous_tag {
            env.insert("RELEASE_PREVIOUS_TAG".to_string(), previous.clone());
        }

        if let Some(pr) = record.pull_request {
            env.insert("RELEASE_PULL_REQUEST".to_string(), pr.to_string());
        }

        env
    }
}
