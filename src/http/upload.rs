use crate::error::GitHttpError;
use crate::http::run_rpc;
use crate::serve::AppCore;
use crate::service::GitService;
use actix_web::web::{Data, Path, Payload};
use actix_web::{HttpRequest, HttpResponse};

/// `POST /{repo}/git-upload-pack` — fetch/clone RPC.
pub async fn upload_pack(
    req: HttpRequest,
    payload: Payload,
    path: Path<String>,
    app: Data<AppCore>,
) -> Result<HttpResponse, GitHttpError> {
    run_rpc(&req, payload, &path.into_inner(), GitService::UploadPack, &app).await
}
