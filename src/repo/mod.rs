use crate::error::GitHttpError;
use std::path::{Path, PathBuf};

/// Resolves repository names to filesystem locations under the configured
/// project root. Pure path computation; the only filesystem touch is the
/// existence check in [`RepoStore::open`].
#[derive(Clone, Debug)]
pub struct RepoStore {
    root: PathBuf,
}

/// A validated repository location: the metadata directory git itself
/// operates on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GitDir(PathBuf);

impl GitDir {
    pub fn path(&self) -> &Path {
        &self.0
    }

    /// A file inside the git dir, each extra segment validated against
    /// traversal before joining.
    pub fn file(&self, segments: &[&str]) -> Result<PathBuf, GitHttpError> {
        let mut path = self.0.clone();
        for segment in segments {
            validate_segment(segment)?;
            path.push(segment);
        }
        Ok(path)
    }
}

impl RepoStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Compute the git dir for a repository name without touching the
    /// filesystem. Bare names (word character followed by a literal
    /// `.git`) are their own git dir; anything else gets the conventional
    /// `.git` subdirectory appended.
    pub fn git_dir(&self, name: &str) -> Result<GitDir, GitHttpError> {
        validate_segment(name)?;
        let dir = if is_bare(name) {
            self.root.join(name)
        } else {
            self.root.join(name).join(".git")
        };
        Ok(GitDir(dir))
    }

    /// Resolve a repository and require its git dir to exist on disk.
    /// Callers go through this before spawning any subprocess so that a
    /// missing repository surfaces as 404 rather than a git failure.
    pub fn open(&self, name: &str) -> Result<GitDir, GitHttpError> {
        let dir = self.git_dir(name)?;
        if !dir.path().is_dir() {
            return Err(GitHttpError::NotFound);
        }
        Ok(dir)
    }
}

fn is_bare(name: &str) -> bool {
    name.strip_suffix(".git")
        .and_then(|stem| stem.chars().last())
        .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

/// Reject anything that could escape the project root once joined:
/// traversal tokens, separators, NUL, absolute prefixes, empty or
/// dot-prefixed segments.
fn validate_segment(segment: &str) -> Result<(), GitHttpError> {
    let bad = segment.is_empty()
        || segment.starts_with('.')
        || segment.contains("..")
        || segment.contains('/')
        || segment.contains('\\')
        || segment.contains('\0')
        || Path::new(segment).is_absolute();
    if bad {
        return Err(GitHttpError::InvalidPath(segment.to_string()));
    }
    Ok(())
}
