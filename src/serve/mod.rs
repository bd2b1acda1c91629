use crate::config::GitConfig;
use crate::process::GitCli;
use crate::repo::RepoStore;

/// Per-request shared state handed to every handler through
/// `web::Data<AppCore>`. Built once from an immutable config at startup.
#[derive(Clone)]
pub struct AppCore {
    pub config: GitConfig,
    pub repos: RepoStore,
    pub git: GitCli,
}

impl AppCore {
    pub fn new(config: GitConfig) -> Self {
        let repos = RepoStore::new(config.project_root.clone());
        let git = GitCli::from_config(&config);
        Self { config, repos, git }
    }
}
