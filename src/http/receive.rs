use crate::error::GitHttpError;
use crate::http::run_rpc;
use crate::serve::AppCore;
use crate::service::GitService;
use actix_web::web::{Data, Path, Payload};
use actix_web::{HttpRequest, HttpResponse};

/// `POST /{repo}/git-receive-pack` — push RPC. Concurrent pushes against
/// one repository are serialized by git's own lock files, not here.
pub async fn receive_pack(
    req: HttpRequest,
    payload: Payload,
    path: Path<String>,
    app: Data<AppCore>,
) -> Result<HttpResponse, GitHttpError> {
    run_rpc(&req, payload, &path.into_inner(), GitService::ReceivePack, &app).await
}
