use crate::error::{ReleaseError, Result};
use crate::git::PushOutcome;
use git2::{
    Cred, CredentialType, Direction, ErrorClass, ErrorCode, FetchOptions, Oid, PushOptions,
    RemoteCallbacks, Repository as Git2Repo, Signature,
};
use std::cell::RefCell;
use std::path::Path;
use tracing::debug;

/// libgit2 keeps asking for credentials while authentication fails
const MAX_CREDENTIAL_ATTEMPTS: u32 = 5;

/// Identity used for annotated tags when the repository has no user configured
const FALLBACK_TAGGER: (&str, &str) = ("release-tagger", "release-tagger@localhost");

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;

        Ok(Git2Repository { repo })
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn find_remote(&self, name: &str) -> Result<git2::Remote<'_>> {
        self.repo
            .find_remote(name)
            .map_err(|e| ReleaseError::remote(format!("Cannot find remote '{}': {}", name, e)))
    }

    fn callbacks<'a>(&self) -> RemoteCallbacks<'a> {
        remote_callbacks(self.repo.config().ok())
    }

    fn tagger(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(signature) => Ok(signature),
            Err(_) => Ok(Signature::now(FALLBACK_TAGGER.0, FALLBACK_TAGGER.1)?),
        }
    }
}

/// Builds remote callbacks that authenticate the way plain git would.
///
/// Tries SSH keys from `~/.ssh/` in order of preference, then the SSH agent,
/// then the configured credential helper for HTTPS remotes.
fn remote_callbacks<'a>(git_config: Option<git2::Config>) -> RemoteCallbacks<'a> {
    let mut callbacks = RemoteCallbacks::new();
    let mut attempts = 0;

    callbacks.credentials(move |url, username_from_url, allowed_types| {
        attempts += 1;
        if attempts > MAX_CREDENTIAL_ATTEMPTS {
            return Err(git2::Error::from_str("authentication failed"));
        }

        let username = username_from_url.unwrap_or("git");

        if allowed_types.contains(CredentialType::SSH_KEY) {
            if let Some(home) = dirs::home_dir() {
                for key in ["id_ed25519", "id_rsa", "id_ecdsa"] {
                    let path = home.join(".ssh").join(key);
                    if path.exists() {
                        if let Ok(cred) = Cred::ssh_key(username, None, &path, None) {
                            return Ok(cred);
                        }
                    }
                }
            }

            if let Ok(cred) = Cred::ssh_key_from_agent(username) {
                return Ok(cred);
            }
        }

        if allowed_types.contains(CredentialType::USER_PASS_PLAINTEXT) {
            if let Some(config) = git_config.as_ref() {
                if let Ok(cred) = Cred::credential_helper(config, url, username_from_url) {
                    return Ok(cred);
                }
            }
        }

        Cred::default()
    });

    callbacks
}

impl super::Repository for Git2Repository {
    fn resolve_commit(&self, rev: &str) -> Result<Oid> {
        let commit = self
            .repo
            .revparse_single(rev)
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| ReleaseError::tag(format!("Cannot resolve '{}' to a commit: {}", rev, e)))?;

        Ok(commit.id())
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;

        let mut names: Vec<String> = tags.iter().flatten().map(|s| s.to_string()).collect();
        names.sort();
        Ok(names)
    }

    fn fetch_tags(&self, remote_name: &str) -> Result<()> {
        let mut remote = self.find_remote(remote_name)?;

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(self.callbacks());

        debug!(remote = remote_name, "fetching tags");
        remote
            .fetch(&["+refs/tags/*:refs/tags/*"], Some(&mut fetch_options), None)
            .map_err(|e| {
                ReleaseError::remote(format!(
                    "Failed to fetch tags from remote '{}': {}",
                    remote_name, e
                ))
            })?;

        Ok(())
    }

    fn remote_tag(&self, remote_name: &str, tag_name: &str) -> Result<Option<Oid>> {
        let mut remote = self.find_remote(remote_name)?;
        let reference_name = format!("refs/tags/{}", tag_name);

        let connection = remote
            .connect_auth(Direction::Fetch, Some(self.callbacks()), None)
            .map_err(|e| {
                ReleaseError::remote(format!(
                    "Cannot connect to remote '{}': {}",
                    remote_name, e
                ))
            })?;

        let oid = connection
            .list()?
            .iter()
            .find(|head| head.name() == reference_name)
            .map(|head| head.oid());

        Ok(oid)
    }

    fn create_tag(&self, name: &str, oid: Oid, message: Option<&str>) -> Result<()> {
        let object = self
            .repo
            .find_object(oid, None)
            .map_err(|e| ReleaseError::tag(format!("Cannot find object: {}", e)))?;

        let created = match message {
            Some(message) => {
                let tagger = self.tagger()?;
                self.repo
                    .tag(name, &object, &tagger, message, false)
                    .map(|_| ())
            }
            None => self.repo.tag_lightweight(name, &object, false).map(|_| ()),
        };

        created.map_err(|e| {
            if e.code() == ErrorCode::Exists {
                ReleaseError::tag(format!("Tag '{}' already exists", name))
            } else {
                ReleaseError::tag(format!("Cannot create tag '{}': {}", name, e))
            }
        })
    }

    fn delete_tag(&self, name: &str) -> Result<()> {
        self.repo
            .tag_delete(name)
            .map_err(|e| ReleaseError::tag(format!("Cannot delete tag '{}': {}", name, e)))
    }

    fn push_tag(&self, remote_name: &str, tag_name: &str) -> Result<PushOutcome> {
        let mut remote = self.find_remote(remote_name)?;
        let reference_name = format!("refs/tags/{}", tag_name);

        // Tags are create-only: an update whose remote side exists is refused
        let taken: RefCell<Option<String>> = RefCell::new(None);
        // The remote reports per-ref refusals here rather than as an error
        let rejection: RefCell<Option<String>> = RefCell::new(None);

        let mut callbacks = self.callbacks();
        callbacks.push_negotiation(|updates| {
            if let Some(update) = updates.iter().find(|u| !u.src().is_zero()) {
                let refname = update.dst_refname().unwrap_or("tag").to_string();
                *taken.borrow_mut() = Some(format!(
                    "{} already exists on the remote at {}",
                    refname,
                    update.src()
                ));
                return Err(git2::Error::from_str("remote tag already exists"));
            }
            Ok(())
        });
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                *rejection.borrow_mut() = Some(format!("{}: {}", refname, status));
            }
            Ok(())
        });

        let mut push_options = PushOptions::new();
        push_options.remote_callbacks(callbacks);

        // No leading '+': the remote must not already have this tag
        let refspec = format!("{0}:{0}", reference_name);
        debug!(remote = remote_name, refspec = %refspec, "pushing tag");

        let pushed = remote.push(&[refspec.as_str()], Some(&mut push_options));
        drop(push_options);

        if let Err(e) = pushed {
            if let Some(reason) = taken.take() {
                return Ok(PushOutcome::Rejected { reason });
            }

            if e.code() == ErrorCode::NotFastForward {
                return Ok(PushOutcome::Rejected {
                    reason: e.message().to_string(),
                });
            }

            // The fast-forward check fails on annotated tags the remote already has
            if matches!(
                e.class(),
                ErrorClass::Invalid | ErrorClass::Reference | ErrorClass::Object
            ) {
                let existing = super::Repository::remote_tag(self, remote_name, tag_name)?;
                if let Some(existing) = existing {
                    return Ok(PushOutcome::Rejected {
                        reason: format!(
                            "{} already exists on the remote at {} ({})",
                            reference_name,
                            existing,
                            e.message()
                        ),
                    });
                }
            }

            return Err(ReleaseError::remote(format!(
                "Failed to push tag '{}' to '{}': {}",
                tag_name, remote_name, e
            )));
        }

        match rejection.take() {
            Some(reason) => Ok(PushOutcome::Rejected { reason }),
            None => Ok(PushOutcome::Pushed),
        }
    }
}
