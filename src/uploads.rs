//! Upload gate for the create-recipe route.
//!
//! Multipart bodies are buffered up front so the image part can be checked
//! and written to disk before the handler runs; the handler then re-reads
//! the same body for the text fields. Non-multipart requests pass through
//! untouched.

use std::path::{Path, PathBuf};

use axum::body::{to_bytes, Body, Bytes};
use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

use crate::error::ApiError;
use crate::AppState;

pub const ALLOWED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

/// Headroom on top of the image cap for the text fields sharing the
/// multipart body.
const FORM_FIELD_ALLOWANCE: u64 = 64 * 1024;

/// Temp file written by the gate, picked up by the create handler through
/// request extensions.
#[derive(Debug, Clone)]
pub struct StagedUpload {
    pub path: PathBuf,
}

pub async fn stage_image(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false);
    if !is_multipart {
        return Ok(next.run(request).await);
    }

    let cap = state.config.max_upload_bytes() + FORM_FIELD_ALLOWANCE;
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, cap as usize)
        .await
        .map_err(|_| file_too_large(state.config.max_upload_mb))?;

    let staged = extract_image(&state, &parts, &bytes).await?;

    // Replay the buffered body so the handler can read the form fields
    let mut request = Request::from_parts(parts, Body::from(bytes));
    if let Some(upload) = staged {
        request.extensions_mut().insert(upload);
    }
    Ok(next.run(request).await)
}

/// Walks the multipart body looking for an `image` part. A body without one
/// (or one that doesn't parse at all) is not an error here; the handler does
/// its own field validation.
async fn extract_image(
    state: &AppState,
    parts: &Parts,
    bytes: &Bytes,
) -> Result<Option<StagedUpload>, ApiError> {
    let request = Request::from_parts(parts.clone(), Body::from(bytes.clone()));
    let mut multipart = match Multipart::from_request(request, &()).await {
        Ok(multipart) => multipart,
        Err(_) => return Ok(None),
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) | Err(_) => return Ok(None),
        };
        if field.name() != Some("image") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !ALLOWED_IMAGE_TYPES.contains(&content_type.as_str()) {
            return Err(ApiError::Validation(format!(
                "Invalid file type: {content_type}. Only JPEG and PNG are allowed"
            )));
        }

        let ext = field.file_name().map(file_extension).unwrap_or_default();

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(_) => return Ok(None),
        };
        if data.len() as u64 > state.config.max_upload_bytes() {
            return Err(file_too_large(state.config.max_upload_mb));
        }

        tokio::fs::create_dir_all(&state.config.upload_dir)
            .await
            .map_err(ApiError::UploadDir)?;

        let filename = format!("raw_{}{ext}", &Uuid::new_v4().to_string()[..8]);
        let path = state.config.upload_dir.join(filename);
        tokio::fs::write(&path, &data)
            .await
            .map_err(ApiError::UploadWrite)?;

        return Ok(Some(StagedUpload { path }));
    }
}

/// Lowercased extension of the client filename, dot included. Empty when the
/// name has none.
fn file_extension(name: &str) -> String {
    Path::new(name)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

fn file_too_large(max_mb: u64) -> ApiError {
    ApiError::Validation(format!("File too large. Maximum size is {max_mb}MB"))
}
