use crate::error::GitHttpError;
use crate::mime;
use crate::pkt_line;
use crate::serve::AppCore;
use crate::service::parse_service_param;
use actix_web::web::{Data, Path, Query};
use actix_web::HttpResponse;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct RefsQuery {
    service: Option<String>,
}

/// `GET /{repo}/info/refs`
///
/// With a recognized `?service=`, produce the smart advertisement: the
/// pkt-line service header and flush, then the raw stdout of
/// `git <service> --stateless-rpc --advertise-refs`. Without one, fall
/// back to serving the dumb-protocol `info/refs` file verbatim.
pub async fn info_refs(
    path: Path<String>,
    app: Data<AppCore>,
    query: Query<RefsQuery>,
) -> Result<HttpResponse, GitHttpError> {
    let repo = path.into_inner();
    match parse_service_param(query.service.as_deref())? {
        Some(service) => {
            if !app.config.enabled(service) {
                return Err(GitHttpError::ServiceDisabled(service.name()));
            }
            let git_dir = app.repos.open(&repo)?;
            let advert = app.git.advertise_refs(service, &git_dir).await?;
            let mut body = pkt_line::service_header(service);
            body.extend_from_slice(&advert);
            Ok(HttpResponse::Ok()
                .content_type(mime::content_type_for(service.name(), &[Some("advertisement")]))
                .body(body.freeze()))
        }
        None => {
            let git_dir = app.repos.open(&repo)?;
            let refs_file = git_dir.file(&["info", "refs"])?;
            let text = tokio::fs::read_to_string(refs_file).await?;
            Ok(HttpResponse::Ok().content_type("text/plain").body(text))
        }
    }
}
