use crate::error::GitHttpError;
use crate::mime;
use crate::serve::AppCore;
use crate::service::GitService;
use actix_web::http::header;
use actix_web::middleware::DefaultHeaders;
use actix_web::web::{get, post, scope, Data, Payload};
use actix_web::{App, HttpRequest, HttpResponse, Scope};
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio_stream::StreamExt;
use tracing::warn;

pub mod files;
pub mod receive;
pub mod refs;
pub mod upload;

#[derive(Clone)]
pub struct HttpServer {
    pub addr: String,
    pub port: u16,
    pub core: AppCore,
}

impl HttpServer {
    pub fn new(addr: String, port: u16, core: AppCore) -> Self {
        Self { addr, port, core }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }

    pub async fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        let core = self.core.clone();
        actix_web::HttpServer::new(move || {
            App::new()
                .app_data(Data::new(core.clone()))
                .wrap(actix_web::middleware::Logger::default())
                .wrap(cache_headers())
                .service(routes())
        })
        .bind(self.bind_addr())?
        .run()
        .await?;
        Ok(())
    }
}

/// Git clients must never see cached responses. Applied to every route
/// before any handler logic.
pub fn cache_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add((header::CACHE_CONTROL, "no-cache, max-age=0, must-revalidate"))
        .add((header::PRAGMA, "no-cache"))
}

/// The smart HTTP route table for a single repository. The pack route is
/// registered ahead of the loose-object route so `objects/pack/...` never
/// lands in the `{prefix}/{object}` pattern.
pub fn routes() -> Scope {
    scope("/{repo}")
        .route("/HEAD", get().to(files::head))
        .route("/info/refs", get().to(refs::info_refs))
        .route("/objects/pack/{pack}", get().to(files::pack_file))
        .route("/objects/{prefix}/{object}", get().to(files::loose_object))
        .route("/git-upload-pack", post().to(upload::upload_pack))
        .route("/git-receive-pack", post().to(receive::receive_pack))
}

/// Bridge one stateless RPC exchange: request body to git's stdin,
/// stdout streamed straight back as the response body.
///
/// Validation runs strictly before the spawn: service toggle, then
/// repository existence. The request body is forwarded on a local task
/// (it may still be arriving while git starts responding); dropping the
/// stdin handle half-closes the pipe so git sees EOF. The response stream
/// owns the child, so a client disconnect drops and kills it.
pub(crate) async fn run_rpc(
    req: &HttpRequest,
    mut payload: Payload,
    repo: &str,
    service: GitService,
    app: &AppCore,
) -> Result<HttpResponse, GitHttpError> {
    if !app.config.enabled(service) {
        return Err(GitHttpError::ServiceDisabled(service.name()));
    }
    let git_dir = app.repos.open(repo)?;

    let mut child = app.git.stateless_rpc(service, &git_dir)?;
    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| GitHttpError::Subprocess("stdin not captured".to_string()))?;
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| GitHttpError::Subprocess("stdout not captured".to_string()))?;

    let gzipped = req
        .headers()
        .get(header::CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("gzip"));

    tokio::task::spawn_local(async move {
        let forward = async {
            if gzipped {
                // Git gzips only the small negotiation bodies, so
                // buffering before inflating is fine here.
                let mut raw = BytesMut::new();
                while let Some(chunk) = payload.next().await {
                    let chunk = chunk.map_err(|e| GitHttpError::Stream(e.to_string()))?;
                    raw.extend_from_slice(&chunk);
                }
                stdin.write_all(&decode_gzip(&raw)?).await?;
            } else {
                while let Some(chunk) = payload.next().await {
                    let chunk = chunk.map_err(|e| GitHttpError::Stream(e.to_string()))?;
                    stdin.write_all(&chunk).await?;
                }
            }
            stdin.shutdown().await?;
            Ok::<_, GitHttpError>(())
        };
        if let Err(e) = forward.await {
            warn!(error = %e, "request body forwarding aborted");
        }
    });

    let idle_timeout = app.git.timeout();
    let service_name = service.name();
    let body = async_stream::stream! {
        let mut child = child;
        loop {
            let mut chunk = BytesMut::with_capacity(64 * 1024);
            match tokio::time::timeout(idle_timeout, stdout.read_buf(&mut chunk)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(_)) => yield Ok::<_, std::io::Error>(chunk.freeze()),
                Ok(Err(e)) => {
                    yield Err(e);
                    break;
                }
                Err(_) => {
                    warn!(service = service_name, "git produced no output within timeout, killing");
                    let _ = child.kill().await;
                    break;
                }
            }
        }
        // Bytes already went out, so a failure here can only be logged.
        match child.wait().await {
            Ok(status) if !status.success() => {
                warn!(service = service_name, %status, "git exited non-zero");
            }
            Err(e) => warn!(service = service_name, error = %e, "failed to reap git"),
            _ => {}
        }
    };

    Ok(HttpResponse::Ok()
        .content_type(mime::content_type_for(service.name(), &[Some("result")]))
        .streaming(body))
}

fn decode_gzip(raw: &[u8]) -> Result<Vec<u8>, GitHttpError> {
    use flate2::read::GzDecoder;
    use std::io::Read;
    let mut out = Vec::new();
    GzDecoder::new(raw)
        .read_to_end(&mut out)
        .map_err(|e| GitHttpError::Stream(format!("bad gzip body: {}", e)))?;
    Ok(out)
}
