use crate::domain::branch::Category;
use crate::domain::version::Version;

/// Everything known about one release: what gets tagged, and why
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRecord {
    pub tag: String,
    pub version: Version,
    pub previous_tag: Option<String>,
    pub branch: String,
    pub category: Category,
    pub pull_request: Option<u64>,
    /// Full id of the commit the tag points to
    pub commit: String,
}

impl ReleaseRecord {
    /// One-line release title, e.g. "v1.4.0 (feature/search, #42)"
    pub fn title(&self) -> String {
        match self.pull_request {
            Some(pr) => format!("{} ({}, #{})", self.tag, self.branch, pr),
            None => format!("{} ({})", self.tag, self.branch),
        }
    }

    /// Message stored on annotated tags
    pub fn message(&self) -> String {
        let mut message = format!("Release {}\n\n", self.tag);
        message.push_str(&format!("Branch: {}\n", self.branch));
        message.push_str(&format!("Category: {}\n", self.category));
        if let Some(pr) = self.pull_request {
            message.push_str(&format!("Pull request: #{}\n", pr));
        }
        match &self.previous_tag {
            Some(previous) => message.push_str(&format!("Previous: {}\n", previous)),
            None => message.push_str("Previous: none (first release)\n"),
        }
        message
    }

    pub fn short_commit(&self) -> &str {
        if self.commit.len() > 7 {
            &self.commit[..7]
        } else {
            &self.commit
        }
    }
}
