//! Dumb-protocol passthrough: HEAD, loose objects and pack files served
//! straight off disk with the content types git clients expect.

use crate::error::GitHttpError;
use crate::mime;
use crate::serve::AppCore;
use actix_web::web::{Data, Path};
use actix_web::HttpResponse;
use bytes::BytesMut;
use tokio::io::AsyncReadExt;

/// `GET /{repo}/HEAD`
pub async fn head(path: Path<String>, app: Data<AppCore>) -> Result<HttpResponse, GitHttpError> {
    let git_dir = app.repos.open(&path.into_inner())?;
    let text = tokio::fs::read_to_string(git_dir.file(&["HEAD"])?).await?;
    Ok(HttpResponse::Ok().content_type("text/plain").body(text))
}

/// `GET /{repo}/objects/{2hex}/{38hex}`
///
/// The 2/38 hex split is part of the route contract; anything else is a
/// 404, same as a route that never matched.
pub async fn loose_object(
    path: Path<(String, String, String)>,
    app: Data<AppCore>,
) -> Result<HttpResponse, GitHttpError> {
    let (repo, prefix, object) = path.into_inner();
    if !lower_hex(&prefix, 2) || !lower_hex(&object, 38) {
        return Err(GitHttpError::NotFound);
    }
    let git_dir = app.repos.open(&repo)?;
    let bytes = tokio::fs::read(git_dir.file(&["objects", &prefix, &object])?).await?;
    Ok(HttpResponse::Ok()
        .content_type(mime::content_type_for("loose", &[Some("object")]))
        .body(bytes))
}

fn lower_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// `GET /{repo}/objects/pack/pack-{40hex}.(pack|idx)`
pub async fn pack_file(
    path: Path<(String, String)>,
    app: Data<AppCore>,
) -> Result<HttpResponse, GitHttpError> {
    let (repo, pack) = path.into_inner();
    let toc = parse_pack_name(&pack).ok_or(GitHttpError::NotFound)?;
    let git_dir = app.repos.open(&repo)?;
    let file_path = git_dir.file(&["objects", "pack", &pack])?;
    let file = tokio::fs::File::open(&file_path).await.map_err(GitHttpError::from)?;
    Ok(HttpResponse::Ok()
        .content_type(mime::content_type_for("packed", &[Some("objects"), toc]))
        .streaming(stream_file(file)))
}

/// Pack and index files can be large; hand them out in chunks instead of
/// buffering whole files per request.
fn stream_file(
    mut file: tokio::fs::File,
) -> impl futures_util::Stream<Item = Result<bytes::Bytes, std::io::Error>> {
    async_stream::stream! {
        loop {
            let mut chunk = BytesMut::with_capacity(64 * 1024);
            match file.read_buf(&mut chunk).await {
                Ok(0) => break,
                Ok(_) => yield Ok(chunk.freeze()),
                Err(e) => {
                    yield Err(e);
                    break;
                }
            }
        }
    }
}

/// Validate `pack-<40 lower hex>.(pack|idx)` and pick the content-type
/// suffix: `None` for pack data, `toc` for the index.
fn parse_pack_name(name: &str) -> Option<Option<&'static str>> {
    let rest = name.strip_prefix("pack-")?;
    let (hash, ext) = rest.split_once('.')?;
    if !lower_hex(hash, 40) {
        return None;
    }
    match ext {
        "pack" => Some(None),
        "idx" => Some(Some("toc")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_hex() {
        assert!(lower_hex("ab", 2));
        assert!(lower_hex("0123456789abcdef0123456789abcdef01234567", 40));
        assert!(!lower_hex("AB", 2));
        assert!(!lower_hex("ab", 3));
        assert!(!lower_hex("zz", 2));
    }

    #[test]
    fn test_parse_pack_name() {
        let hash = "0123456789abcdef0123456789abcdef01234567";
        assert_eq!(parse_pack_name(&format!("pack-{hash}.pack")), Some(None));
        assert_eq!(
            parse_pack_name(&format!("pack-{hash}.idx")),
            Some(Some("toc"))
        );
        assert_eq!(parse_pack_name(&format!("pack-{hash}.bitmap")), None);
        assert_eq!(parse_pack_name("pack-short.pack"), None);
        assert_eq!(parse_pack_name(&format!("{hash}.pack")), None);
    }
}
