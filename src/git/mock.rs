use crate::error::{ReleaseError, Result};
use crate::git::{PushOutcome, Repository};
use git2::Oid;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};

/// In-memory repository with a local and a remote tag namespace.
///
/// Can simulate a concurrent release: tags queued with
/// [MockRepository::publish_concurrently] land on the remote right before the
/// next push, the way a second pipeline would win the race.
pub struct MockRepository {
    head: Oid,
    local_tags: RefCell<BTreeMap<String, Oid>>,
    remote_tags: RefCell<BTreeMap<String, Oid>>,
    messages: RefCell<BTreeMap<String, String>>,
    concurrent: RefCell<VecDeque<(String, Oid)>>,
    fetch_error: Option<String>,
    fetch_count: Cell<u32>,
    push_attempts: RefCell<Vec<String>>,
}

impl MockRepository {
    /// Create an empty repository whose HEAD is `head`
    pub fn new(head: Oid) -> Self {
        MockRepository {
            head,
            local_tags: RefCell::new(BTreeMap::new()),
            remote_tags: RefCell::new(BTreeMap::new()),
            messages: RefCell::new(BTreeMap::new()),
            concurrent: RefCell::new(VecDeque::new()),
            fetch_error: None,
            fetch_count: Cell::new(0),
            push_attempts: RefCell::new(Vec::new()),
        }
    }

    /// Add a tag that exists both locally and on the remote
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        let name = name.into();
        self.local_tags.get_mut().insert(name.clone(), oid);
        self.remote_tags.get_mut().insert(name, oid);
    }

    /// Add a tag only the remote knows about
    pub fn add_remote_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.remote_tags.get_mut().insert(name.into(), oid);
    }

    /// Make every fetch fail with the given reason
    pub fn fail_fetch(&mut self, reason: impl Into<String>) {
        self.fetch_error = Some(reason.into());
    }

    /// Have another release publish `name` on the remote just before our next push
    pub fn publish_concurrently(&mut self, name: impl Into<String>, oid: Oid) {
        self.concurrent.get_mut().push_back((name.into(), oid));
    }

    pub fn local_tag_names(&self) -> Vec<String> {
        self.local_tags.borrow().keys().cloned().collect()
    }

    pub fn remote_tag_oid(&self, name: &str) -> Option<Oid> {
        self.remote_tags.borrow().get(name).copied()
    }

    /// Annotation stored with a tag, if it was created annotated
    pub fn tag_message(&self, name: &str) -> Option<String> {
        self.messages.borrow().get(name).cloned()
    }

    pub fn fetch_count(&self) -> u32 {
        self.fetch_count.get()
    }

    /// Tag names in the order pushes were attempted, rejected ones included
    pub fn push_attempts(&self) -> Vec<String> {
        self.push_attempts.borrow().clone()
    }
}

impl Repository for MockRepository {
    fn resolve_commit(&self, rev: &str) -> Result<Oid> {
        if rev == "HEAD" {
            return Ok(self.head);
        }

        if let Some(oid) = self.local_tags.borrow().get(rev) {
            return Ok(*oid);
        }

        Oid::from_str(rev)
            .map_err(|_| ReleaseError::tag(format!("Cannot resolve '{}' to a commit", rev)))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.local_tag_names())
    }

    fn fetch_tags(&self, _remote: &str) -> Result<()> {
        if let Some(reason) = &self.fetch_error {
            return Err(ReleaseError::remote(reason.clone()));
        }

        self.fetch_count.set(self.fetch_count.get() + 1);
        let remote = self.remote_tags.borrow();
        let mut local = self.local_tags.borrow_mut();
        for (name, oid) in remote.iter() {
            local.insert(name.clone(), *oid);
        }
        Ok(())
    }

    fn remote_tag(&self, _remote: &str, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.remote_tag_oid(tag_name))
    }

    fn create_tag(&self, name: &str, oid: Oid, message: Option<&str>) -> Result<()> {
        let mut local = self.local_tags.borrow_mut();
        if local.contains_key(name) {
            return Err(ReleaseError::tag(format!("Tag '{}' already exists", name)));
        }

        local.insert(name.to_string(), oid);
        if let Some(message) = message {
            self.messages
                .borrow_mut()
                .insert(name.to_string(), message.to_string());
        }
        Ok(())
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.messages.borrow_mut().remove(name);
        self.local_tags
            .borrow_mut()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ReleaseError::tag(format!("Tag '{}' not found", name)))
    }

    fn push_tag(&self, _remote: &str, tag_name: &str) -> Result<PushOutcome> {
        self.push_attempts.borrow_mut().push(tag_name.to_string());

        let oid = self
            .local_tags
            .borrow()
            .get(tag_name)
            .copied()
            .ok_or_else(|| ReleaseError::remote(format!("No local tag '{}' to push", tag_name)))?;

        let mut remote = self.remote_tags.borrow_mut();
        for (name, concurrent_oid) in self.concurrent.borrow_mut().drain(..) {
            remote.entry(name).or_insert(concurrent_oid);
        }

        if remote.contains_key(tag_name) {
            return Ok(PushOutcome::Rejected {
                reason: format!("refs/tags/{}: already exists", tag_name),
            });
        }

        remote.insert(tag_name.to_string(), oid);
        Ok(PushOutcome::Pushed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> Oid {
        Oid::from_bytes(&[byte; 20]).unwrap()
    }

    #[test]
    fn test_mock_repository_tags() {
        let mut repo = MockRepository::new(oid(9));
        repo.add_tag("v1.0.0", oid(2));

        assert_eq!(repo.list_tags().unwrap(), vec!["v1.0.0".to_string()]);
        assert_eq!(repo.remote_tag("origin", "v1.0.0").unwrap(), Some(oid(2)));
        assert_eq!(repo.remote_tag("origin", "v2.0.0").unwrap(), None);
    }

    #[test]
    fn test_fetch_brings_remote_tags() {
        let mut repo = MockRepository::new(oid(9));
        repo.add_remote_tag("v0.3.0", oid(3));

        assert!(repo.list_tags().unwrap().is_empty());
        repo.fetch_tags("origin").unwrap();
        assert_eq!(repo.list_tags().unwrap(), vec!["v0.3.0".to_string()]);
        assert_eq!(repo.fetch_count(), 1);
    }

    #[test]
    fn test_failing_fetch() {
        let mut repo = MockRepository::new(oid(9));
        repo.fail_fetch("network unreachable");
        assert!(repo.fetch_tags("origin").is_err());
    }

    #[test]
    fn test_create_tag_never_overwrites() {
        let repo = MockRepository::new(oid(9));
        repo.create_tag("v1.0.0", oid(9), Some("Release v1.0.0")).unwrap();
        assert!(repo.create_tag("v1.0.0", oid(1), None).is_err());
        assert_eq!(repo.tag_message("v1.0.0").as_deref(), Some("Release v1.0.0"));
    }

    #[test]
    fn test_push_then_conflict() {
        let mut repo = MockRepository::new(oid(9));
        repo.publish_concurrently("v0.0.2", oid(7));

        repo.create_tag("v0.0.1", oid(9), None).unwrap();
        assert_eq!(repo.push_tag("origin", "v0.0.1").unwrap(), PushOutcome::Pushed);

        repo.create_tag("v0.0.2", oid(9), None).unwrap();
        assert!(matches!(
            repo.push_tag("origin", "v0.0.2").unwrap(),
            PushOutcome::Rejected { .. }
        ));
        // The concurrent release keeps its tag
        assert_eq!(repo.remote_tag_oid("v0.0.2"), Some(oid(7)));
    }

    #[test]
    fn test_resolve_head() {
        let repo = MockRepository::new(oid(9));
        assert_eq!(repo.resolve_commit("HEAD").unwrap(), oid(9));
        assert!(repo.resolve_commit("no-such-rev").is_err());
    }
}
