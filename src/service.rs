use crate::error::GitHttpError;
use serde::{Deserialize, Serialize};

/// The two git sub-services exposed over smart HTTP.
///
/// Configuration toggles use the underscore form (`upload_pack`,
/// `receive_pack`); on the wire and on the command line git wants dashes.
/// [`GitService::name`] is the dashed form handed to the subprocess.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GitService {
    #[serde(rename = "git-upload-pack")]
    UploadPack,
    #[serde(rename = "git-receive-pack")]
    ReceivePack,
}

impl GitService {
    pub fn from_name(s: &str) -> Option<GitService> {
        match s {
            "upload-pack" => Some(GitService::UploadPack),
            "receive-pack" => Some(GitService::ReceivePack),
            _ => None,
        }
    }

    /// Dashed service name, as it appears in the git argv and in
    /// content types.
    pub fn name(&self) -> &'static str {
        match self {
            GitService::UploadPack => "upload-pack",
            GitService::ReceivePack => "receive-pack",
        }
    }

    /// Wire name with the `git-` prefix, e.g. `git-upload-pack`.
    pub fn wire_name(&self) -> String {
        format!("git-{}", self.name())
    }
}

/// Parse the `?service=` query parameter from an `info/refs` request.
///
/// Absent parameter means the client speaks the dumb protocol and is not
/// an error. A present parameter must carry the `git-` prefix and name a
/// service this server knows.
pub fn parse_service_param(param: Option<&str>) -> Result<Option<GitService>, GitHttpError> {
    let raw = match param {
        Some(raw) => raw,
        None => return Ok(None),
    };
    let name = raw
        .strip_prefix("git-")
        .ok_or_else(|| GitHttpError::UnsupportedService(raw.to_string()))?;
    match GitService::from_name(name) {
        Some(service) => Ok(Some(service)),
        None => Err(GitHttpError::UnsupportedService(raw.to_string())),
    }
}
