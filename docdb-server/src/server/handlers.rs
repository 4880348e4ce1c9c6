//! HTTP request handlers.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, error, info, warn};

use crate::errors::StorageError;
use crate::server::pages::{self, Flash};
use crate::server::state::AppState;

/// Multipart field holding the uploaded file.
const FILE_FIELD: &str = "file";

/// Where a missing upload field is sent back to.
const MISSING_FILE_REDIRECT: &str = "/?error=Missing%20file";

/// Optional notice passed to the landing page.
#[derive(Debug, Default, Deserialize)]
pub struct FlashParams {
    pub error: Option<String>,
    pub message: Option<String>,
}

impl FlashParams {
    fn flash(self) -> Option<Flash> {
        match (self.error, self.message) {
            (Some(error), _) => Some(Flash::Error(error)),
            (None, Some(message)) => Some(Flash::Message(message)),
            (None, None) => None,
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "DocDB server is running")
}

/// Landing page
pub async fn index(Query(params): Query<FlashParams>) -> Html<String> {
    Html(pages::landing_page(params.flash().as_ref(), ""))
}

/// Landing page with the search box restored from `/Search/<pattern>`.
pub async fn search_page(Path(pattern): Path<String>) -> Html<String> {
    Html(pages::landing_page(None, &pattern))
}

/// The browser search script, pointed at this server's socket endpoint.
pub async fn search_script(headers: HeaderMap) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        pages::search_script(&socket_url(&headers)),
    )
}

/// Socket URL derived from the request's `Host` header.
pub fn socket_url(headers: &HeaderMap) -> String {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let secure = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));

    format!("{}://{}/ws", if secure { "wss" } else { "ws" }, host)
}

/// Upload endpoint - stores the multipart `file` field under its original name
pub async fn upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return multipart_failure(e),
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        // Browsers send an unnamed empty part when no file was chosen.
        let file_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => break,
        };

        let mut pending = match state.store.begin_upload(&file_name).await {
            Ok(pending) => pending,
            Err(e) => return storage_failure(&file_name, e),
        };

        loop {
            let chunk = match field.chunk().await {
                Ok(Some(chunk)) => chunk,
                Ok(None) => break,
                Err(e) => {
                    pending.abort().await;
                    return multipart_failure(e);
                }
            };
            if let Err(e) = pending.write(&chunk).await {
                pending.abort().await;
                return storage_failure(&file_name, e);
            }
        }

        return match pending.commit().await {
            Ok(path) => {
                info!(file_name = %file_name, path = %path.display(), "Upload stored");
                let stored_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(file_name);
                Html(pages::uploaded_page(&stored_name)).into_response()
            }
            Err(e) => storage_failure(&file_name, e),
        };
    }

    debug!("Upload without a file field");
    Redirect::to(MISSING_FILE_REDIRECT).into_response()
}

/// Download endpoint - streams a stored file as an attachment
pub async fn download(State(state): State<AppState>, Path(path): Path<String>) -> Response {
    let stored = match state.store.open(&path).await {
        Ok(stored) => stored,
        Err(StorageError::InvalidName(_)) | Err(StorageError::NotFound(_)) => {
            debug!(path = %path, "Download of unknown path, redirecting");
            return Redirect::to("/").into_response();
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open stored file");
            return storage_failure(&path, e);
        }
    };

    let mut response = Body::from_stream(ReaderStream::new(stored.file)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/x-download"),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(stored.len));
    headers.insert(
        header::CONTENT_DISPOSITION,
        content_disposition(&stored.file_name),
    );
    response
}

/// `attachment; filename="<name>"` for printable ASCII names.
///
/// Other names get an ASCII fallback with `_` in place of each unsupported
/// character, plus the exact name as an RFC 5987 `filename*` parameter.
fn content_disposition(file_name: &str) -> HeaderValue {
    let fallback: String = file_name
        .chars()
        .map(|c| if c == ' ' || c.is_ascii_graphic() { c } else { '_' })
        .collect();
    let quoted = fallback.replace('\\', "\\\\").replace('"', "\\\"");

    let value = if fallback == file_name {
        format!("attachment; filename=\"{}\"", quoted)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            quoted,
            pages::percent_encode(file_name)
        )
    };
    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

fn multipart_failure(e: MultipartError) -> Response {
    warn!(error = %e, "Failed to read upload body");
    (e.status(), Html(pages::error_page(&e.body_text()))).into_response()
}

fn storage_failure(file_name: &str, e: StorageError) -> Response {
    let status = e.status_code();
    if status.is_server_error() {
        error!(file_name = %file_name, error = %e, "Failed to store upload");
    } else {
        warn!(file_name = %file_name, error = %e, "Rejected upload");
    }
    (status, Html(pages::error_page(&e.to_string()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_url_from_host() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("docs.example.com:9000"));
        assert_eq!(socket_url(&headers), "ws://docs.example.com:9000/ws");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(socket_url(&headers), "wss://docs.example.com:9000/ws");
    }

    #[test]
    fn test_socket_url_without_host() {
        assert_eq!(socket_url(&HeaderMap::new()), "ws://localhost/ws");
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("a.txt"),
            HeaderValue::from_static("attachment; filename=\"a.txt\"")
        );
        assert_eq!(
            content_disposition("say \"hi\".txt"),
            HeaderValue::from_static("attachment; filename=\"say \\\"hi\\\".txt\"")
        );
        assert_eq!(
            content_disposition("line\nbreak"),
            HeaderValue::from_static(
                "attachment; filename=\"line_break\"; filename*=UTF-8''line%0Abreak"
            )
        );
    }

    #[test]
    fn test_content_disposition_non_ascii_name() {
        assert_eq!(
            content_disposition("Łódź plan.pdf"),
            HeaderValue::from_static(
                "attachment; filename=\"__d_ plan.pdf\"; filename*=UTF-8''%C5%81%C3%B3d%C5%BA%20plan.pdf"
            )
        );
    }

    #[test]
    fn test_flash_prefers_error() {
        let params = FlashParams {
            error: Some("Missing file".to_string()),
            message: Some("ignored".to_string()),
        };
        assert_eq!(params.flash(), Some(Flash::Error("Missing file".to_string())));
        assert_eq!(FlashParams::default().flash(), None);
    }
}
