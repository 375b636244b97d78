use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Response},
};
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::models::GatewayError;
use crate::pages;
use crate::storage::sanitize_filename;
use crate::AppState;

/// Render the HTML page listing every stored file
///
/// GET /download
pub async fn list_files(State(state): State<AppState>) -> Result<Html<String>, GatewayError> {
    let names = state.store.list().await?;
    let page = pages::render_file_list(&state.templates, &names)?;

    debug!(count = names.len(), "Rendered file list");
    Ok(Html(page))
}

/// Stream a stored file back as an attachment
///
/// GET /download/:filename
pub async fn download_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, GatewayError> {
    // Unsafe names are indistinguishable from missing ones to the client
    let hide_invalid = |err: GatewayError| match err {
        GatewayError::InvalidFilename(_) | GatewayError::EmptyFilename => {
            GatewayError::NotFound(filename.clone())
        }
        other => other,
    };

    let name = sanitize_filename(&filename).map_err(hide_invalid)?;
    let (file, size) = state.store.open_file(&name).await.map_err(hide_invalid)?;

    let mime = mime_guess::from_path(name.as_str()).first_or_octet_stream();

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(mime.essence_str())
            .map_err(|e| GatewayError::Internal(format!("Invalid content type: {}", e)))?,
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&attachment_disposition(name.as_str()))
            .map_err(|e| GatewayError::Internal(format!("Invalid content disposition: {}", e)))?,
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(size));

    info!(filename = %name, bytes = size, content_type = %mime, "Serving download");

    let body = Body::from_stream(ReaderStream::new(file));
    Ok((StatusCode::OK, headers, body).into_response())
}

/// `Content-Disposition` value forcing a "Save As" download.
///
/// `filename` carries an ASCII fallback, `filename*` the exact UTF-8 name.
fn attachment_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c == ' ' || c.is_ascii_graphic() => c,
            _ => '_',
        })
        .collect();

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(name)
    )
}
