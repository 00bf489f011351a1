use anyhow::{Context, Result};
use git2::{Repository, Signature, Time};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Git versioning of the hangar data file
///
/// Every operation is a no-op when the file does not live inside a git
/// repository.
pub struct GitOps {
    repo: Option<Arc<Mutex<Repository>>>,
}

impl GitOps {
    /// Detect the repository containing `file_path`, if any
    pub fn new(file_path: &Path) -> Self {
        // The data file may not exist yet
        let file_dir = match file_path.parent() {
            _ if file_path.is_dir() => file_path.to_path_buf(),
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => Path::new(".").to_path_buf(),
        };

        let repo = Repository::discover(&file_dir)
            .ok()
            .map(|r| Arc::new(Mutex::new(r)));
        if repo.is_none() {
            tracing::debug!(path = %file_dir.display(), "data file is not in a git repository");
        }
        Self { repo }
    }

    pub fn is_git_managed(&self) -> bool {
        self.repo.is_some()
    }

    /// Fast-forward the current branch from `origin`
    ///
    /// Diverged histories are reported as an error and left for the user to merge.
    pub fn pull(&self) -> Result<()> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };
        let repo = repo.lock().unwrap();

        let branch = current_branch(&repo)?;
        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        remote
            .fetch(&[branch.as_str()], None, None)
            .context("Failed to fetch from origin")?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

        if analysis.is_up_to_date() {
            return Ok(());
        }
        if analysis.is_fast_forward() {
            let refname = format!("refs/heads/{}", branch);
            let mut reference = repo.find_reference(&refname)?;
            reference.set_target(fetch_commit.id(), "Fast-forward")?;
            repo.set_head(&refname)?;
            repo.checkout_head(Some(git2::build::CheckoutBuilder::default().force()))?;
            tracing::info!(branch = %branch, "fast-forwarded data repository");
            return Ok(());
        }

        Err(anyhow::anyhow!(
            "Remote history has diverged from the local data file. Please merge manually."
        ))
    }

    /// Stage `file_path` and commit it on HEAD
    pub fn commit(&self, file_path: &Path, message: &str) -> Result<()> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };
        let repo = repo.lock().unwrap();

        let workdir = repo
            .workdir()
            .context("Repository has no working directory")?;
        let relative_path = file_path
            .strip_prefix(workdir)
            .context("Data file is not inside the repository")?;

        let mut index = repo.index()?;
        index.add_path(relative_path)?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;

        let parent = match repo.head() {
            Ok(head) => {
                let oid = head.target().context("HEAD has no target")?;
                Some(repo.find_commit(oid)?)
            }
            Err(_) => None,
        };
        let parents: Vec<_> = parent.iter().collect();

        let signature = signature(&repo)?;
        repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;
        tracing::debug!(commit_message = message, "committed data file");
        Ok(())
    }

    /// Push the current branch to `origin`
    pub fn push(&self) -> Result<()> {
        let Some(repo) = &self.repo else {
            return Ok(());
        };
        let repo = repo.lock().unwrap();

        let branch = current_branch(&repo)?;
        let mut remote = repo
            .find_remote("origin")
            .context("Failed to find remote 'origin'")?;
        let refspec = format!("refs/heads/{}", branch);
        remote.push(&[refspec.as_str()], None)?;
        Ok(())
    }
}

fn current_branch(repo: &Repository) -> Result<String> {
    let head = repo.head().context("Failed to get HEAD")?;
    Ok(head
        .shorthand()
        .context("Failed to get branch name")?
        .to_string())
}

fn signature(repo: &Repository) -> Result<Signature<'static>> {
    let config = repo.config()?;
    let name = config
        .get_string("user.name")
        .unwrap_or_else(|_| "Hangar MCP Server".to_string());
    let email = config
        .get_string("user.email")
        .unwrap_or_else(|_| "hangar-mcp@localhost".to_string());

    match Signature::now(&name, &email) {
        Ok(sig) => Ok(sig),
        // Some CI sandboxes can't read the clock through libgit2
        Err(_) => Signature::new(&name, &email, &Time::new(1_700_000_000, 0))
            .context("Failed to create commit signature"),
    }
}
