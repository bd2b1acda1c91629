use crate::config::GitConfig;
use crate::error::GitHttpError;
use crate::repo::GitDir;
use crate::service::GitService;
use bytes::Bytes;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::warn;

/// Invokes the git executable in stateless-RPC mode. The target git dir is
/// always passed as an explicit argv element, never via the process-wide
/// working directory, and the argv is a discrete vector, never a shell
/// string.
#[derive(Clone, Debug)]
pub struct GitCli {
    git_path: PathBuf,
    timeout: Duration,
}

impl GitCli {
    pub fn new(git_path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            git_path: git_path.into(),
            timeout,
        }
    }

    pub fn from_config(config: &GitConfig) -> Self {
        Self::new(config.git_path.clone(), config.timeout())
    }

    fn command(&self, service: GitService, git_dir: &GitDir, advertise: bool) -> Command {
        let mut cmd = Command::new(&self.git_path);
        cmd.arg(service.name()).arg("--stateless-rpc");
        if advertise {
            cmd.arg("--advertise-refs");
        }
        cmd.arg(git_dir.path());
        cmd
    }

    /// Run `git <service> --stateless-rpc --advertise-refs <dir>` to
    /// completion and return its stdout. The caller has already verified
    /// the repository exists, so any failure here is a server fault.
    pub async fn advertise_refs(
        &self,
        service: GitService,
        git_dir: &GitDir,
    ) -> Result<Bytes, GitHttpError> {
        let mut cmd = self.command(service, git_dir, true);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                GitHttpError::Subprocess(format!("git {} timed out", service.name()))
            })?
            .map_err(|e| {
                GitHttpError::Subprocess(format!("failed to spawn {:?}: {}", self.git_path, e))
            })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(service = service.name(), %stderr, "advertise-refs failed");
            return Err(GitHttpError::Subprocess(format!(
                "git {} exited with {}",
                service.name(),
                output.status
            )));
        }
        Ok(Bytes::from(output.stdout))
    }

    /// Spawn `git <service> --stateless-rpc <dir>` with piped stdin and
    /// stdout for a full RPC exchange. `kill_on_drop` guarantees a client
    /// disconnect (the response stream, which owns the child, is dropped)
    /// does not leave an orphaned git behind.
    pub fn stateless_rpc(
        &self,
        service: GitService,
        git_dir: &GitDir,
    ) -> Result<Child, GitHttpError> {
        self.command(service, git_dir, false)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                GitHttpError::Subprocess(format!("failed to spawn {:?}: {}", self.git_path, e))
            })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::RepoStore;

    #[tokio::test]
    async fn test_missing_executable_is_subprocess_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("demo/.git")).unwrap();
        let store = RepoStore::new(tmp.path());
        let dir = store.open("demo").unwrap();
        let cli = GitCli::new("/nonexistent/git", Duration::from_secs(5));
        let err = cli
            .advertise_refs(GitService::UploadPack, &dir)
            .await
            .unwrap_err();
        assert!(matches!(err, GitHttpError::Subprocess(_)));
    }

    #[tokio::test]
    async fn test_spawn_failure_is_subprocess_error() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("demo/.git")).unwrap();
        let store = RepoStore::new(tmp.path());
        let dir = store.open("demo").unwrap();
        let cli = GitCli::new("/nonexistent/git", Duration::from_secs(5));
        assert!(matches!(
            cli.stateless_rpc(GitService::ReceivePack, &dir),
            Err(GitHttpError::Subprocess(_))
        ));
    }
}
