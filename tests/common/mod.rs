#![allow(dead_code)]

use git2::{Oid, Repository, Signature};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A working repository with an "origin" remote that is a bare repository
/// on the local filesystem.
pub struct TestRepos {
    pub dir: TempDir,
    pub work_path: PathBuf,
    pub remote_path: PathBuf,
}

impl TestRepos {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let work_path = dir.path().join("work");
        let remote_path = dir.path().join("origin.git");

        Repository::init_bare(&remote_path).expect("Could not init bare remote");
        let work = Repository::init(&work_path).expect("Could not init git repo");

        {
            let mut config = work.config().expect("Could not get config");
            config
                .set_str("user.name", "Test User")
                .expect("Could not set user.name");
            config
                .set_str("user.email", "test@example.com")
                .expect("Could not set user.email");
        }

        work.remote("origin", remote_path.to_str().unwrap())
            .expect("Could not add remote");

        let repos = TestRepos {
            dir,
            work_path,
            remote_path,
        };
        repos.commit("Initial commit");
        repos
    }

    pub fn work(&self) -> Repository {
        Repository::open(&self.work_path).expect("Could not open work repo")
    }

    pub fn remote(&self) -> Repository {
        Repository::open_bare(&self.remote_path).expect("Could not open bare remote")
    }

    /// Commit a change to README.md on HEAD
    pub fn commit(&self, message: &str) -> Oid {
        let repo = self.work();
        let content_path = self.work_path.join("README.md");
        let previous = fs::read_to_string(&content_path).unwrap_or_default();
        fs::write(&content_path, format!("{}{}\n", previous, message))
            .expect("Could not write file");

        let mut index = repo.index().expect("Could not get index");
        index
            .add_path(Path::new("README.md"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");
        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");

        let signature = Signature::now("Test User", "test@example.com").unwrap();
        let parent = repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )
        .expect("Could not create commit")
    }

    pub fn head(&self) -> Oid {
        self.work()
            .head()
            .unwrap()
            .peel_to_commit()
            .unwrap()
            .id()
    }

    /// Commit a tag points to on the remote, if it exists there
    pub fn remote_tag_commit(&self, tag: &str) -> Option<Oid> {
        let remote = self.remote();
        let reference = remote.find_reference(&format!("refs/tags/{}", tag)).ok()?;
        let commit = reference.peel_to_commit().ok()?;
        Some(commit.id())
    }

    pub fn local_tags(&self) -> Vec<String> {
        let repo = self.work();
        let names = repo.tag_names(None).unwrap();
        let mut tags: Vec<String> = names.iter().flatten().map(str::to_string).collect();
        tags.sort();
        tags
    }

    pub fn lightweight_tag(&self, name: &str, oid: Oid) {
        let repo = self.work();
        let object = repo.find_object(oid, None).unwrap();
        repo.tag_lightweight(name, &object, false).unwrap();
    }

    pub fn annotated_tag(&self, name: &str, oid: Oid, message: &str) {
        let repo = self.work();
        let object = repo.find_object(oid, None).unwrap();
        let tagger = Signature::now("Test User", "test@example.com").unwrap();
        repo.tag(name, &object, &tagger, message, false).unwrap();
    }

    /// Object the remote's tag ref points to (the tag object for annotated tags)
    pub fn remote_tag_target(&self, tag: &str) -> Option<Oid> {
        let remote = self.remote();
        let reference = remote.find_reference(&format!("refs/tags/{}", tag)).ok()?;
        reference.target()
    }
}
