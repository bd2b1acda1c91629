use crate::service::GitService;
use serde::{Deserialize, Serialize};
use std::env::var;
use std::path::PathBuf;
use std::time::Duration;

/// Process-wide configuration, read once at startup and passed by value
/// into the components that need it. Deliberately not a global: tests run
/// isolated instances with distinct roots.
#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct GitConfig {
    /// Base directory containing every served repository.
    pub project_root: PathBuf,
    /// Absolute path of the git executable.
    pub git_path: PathBuf,
    /// Permit fetch/clone (`git-upload-pack`).
    pub upload_pack: bool,
    /// Permit push (`git-receive-pack`).
    pub receive_pack: bool,
    /// Upper bound on a single git invocation, seconds.
    pub timeout_secs: u64,
    pub http: HttpConfig,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
#[serde(default)]
pub struct HttpConfig {
    pub addr: String,
    pub port: u16,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            git_path: PathBuf::from("/usr/bin/git"),
            upload_pack: true,
            receive_pack: true,
            timeout_secs: 300,
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            addr: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl GitConfig {
    /// Loads configuration from the file named by `CONFIG_FILE` (default
    /// `config.toml`). A missing file yields the defaults; a present but
    /// unparseable file is a startup failure.
    pub fn load() -> Result<Self, toml::de::Error> {
        let config_file_path = var("CONFIG_FILE").unwrap_or("config.toml".to_string());
        match std::fs::read_to_string(&config_file_path) {
            Ok(content) => toml::from_str(&content),
            Err(_) => Ok(GitConfig::default()),
        }
    }

    pub fn save(&self) -> std::io::Result<()> {
        let config_file_path = var("CONFIG_FILE").unwrap_or("config.toml".to_string());
        let toml_str = toml::to_string_pretty(self).expect("Could not serialize config");
        std::fs::write(config_file_path, toml_str)
    }

    pub fn enabled(&self, service: GitService) -> bool {
        match service {
            GitService::UploadPack => self.upload_pack,
            GitService::ReceivePack => self.receive_pack,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = GitConfig::default();
        assert_eq!(cfg.project_root, PathBuf::from("."));
        assert_eq!(cfg.git_path, PathBuf::from("/usr/bin/git"));
        assert!(cfg.upload_pack);
        assert!(cfg.receive_pack);
        assert_eq!(cfg.http.port, 3000);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let cfg: GitConfig = toml::from_str(
            r#"
            project_root = "/srv/repos"
            receive_pack = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.project_root, PathBuf::from("/srv/repos"));
        assert!(!cfg.receive_pack);
        assert!(cfg.upload_pack);
        assert_eq!(cfg.git_path, PathBuf::from("/usr/bin/git"));
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let cfg: GitConfig = toml::from_str(
            r#"
            git_path = "/usr/local/bin/git"
            show_loose_refs = true
            "#,
        )
        .unwrap();
        assert_eq!(cfg.git_path, PathBuf::from("/usr/local/bin/git"));
    }

    #[test]
    fn test_enabled_follows_toggles() {
        let cfg = GitConfig {
            receive_pack: false,
            ..GitConfig::default()
        };
        assert!(cfg.enabled(GitService::UploadPack));
        assert!(!cfg.enabled(GitService::ReceivePack));
    }
}
