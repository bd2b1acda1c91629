use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

#[derive(Debug)]
pub enum GitHttpError {
    /// Repository name or path segment with traversal tokens, separators
    /// or an absolute prefix. Rejected before any filesystem access.
    InvalidPath(String),
    /// `service` query parameter without the `git-` prefix, or naming a
    /// service this server does not know.
    UnsupportedService(String),
    /// Known service switched off by configuration.
    ServiceDisabled(&'static str),
    /// Repository, object or file does not exist under the project root.
    NotFound,
    /// The git executable could not be spawned, timed out, or exited
    /// non-zero while producing an advertisement.
    Subprocess(String),
    /// Client went away or a body stream broke mid-transfer.
    Stream(String),
    Io(std::io::Error),
}

impl std::fmt::Display for GitHttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitHttpError::InvalidPath(seg) => write!(f, "invalid path segment: {:?}", seg),
            GitHttpError::UnsupportedService(name) => {
                write!(f, "unsupported service: {:?}", name)
            }
            GitHttpError::ServiceDisabled(name) => write!(f, "service disabled: {}", name),
            GitHttpError::NotFound => write!(f, "not found"),
            GitHttpError::Subprocess(msg) => write!(f, "git subprocess error: {}", msg),
            GitHttpError::Stream(msg) => write!(f, "stream error: {}", msg),
            GitHttpError::Io(e) => write!(f, "io error: {}", e),
        }
    }
}

impl std::error::Error for GitHttpError {}

impl From<std::io::Error> for GitHttpError {
    fn from(e: std::io::Error) -> Self {
        // A vanished file is a client-visible 404, not a server fault.
        if e.kind() == std::io::ErrorKind::NotFound {
            GitHttpError::NotFound
        } else {
            GitHttpError::Io(e)
        }
    }
}

impl ResponseError for GitHttpError {
    fn status_code(&self) -> StatusCode {
        match self {
            GitHttpError::InvalidPath(_) | GitHttpError::UnsupportedService(_) => {
                StatusCode::BAD_REQUEST
            }
            GitHttpError::ServiceDisabled(_) => StatusCode::FORBIDDEN,
            GitHttpError::NotFound => StatusCode::NOT_FOUND,
            GitHttpError::Subprocess(_) | GitHttpError::Stream(_) | GitHttpError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Git clients react to status codes, not body text.
        HttpResponse::build(self.status_code()).body(self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            GitHttpError::InvalidPath("..".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GitHttpError::ServiceDisabled("receive-pack").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(GitHttpError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            GitHttpError::Subprocess("exit 128".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_file_becomes_not_found() {
        let e = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(GitHttpError::from(e), GitHttpError::NotFound));
        let e = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(GitHttpError::from(e), GitHttpError::Io(_)));
    }
}
