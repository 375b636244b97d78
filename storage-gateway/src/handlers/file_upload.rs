use axum::extract::{multipart::MultipartRejection, Multipart, State};
use tracing::{debug, info};

use crate::models::{GatewayError, FILE_FIELD, UPLOAD_SUCCESS_MESSAGE};
use crate::storage::sanitize_filename;
use crate::AppState;

/// Handle a multipart upload of one or more files under the `file` field.
///
/// POST /upload
///
/// Every part is staged before anything is committed, so a request rejected
/// part-way through leaves the store as it was.
pub async fn upload_files(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<&'static str, GatewayError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!(%rejection, "Upload is not a multipart request");
        GatewayError::MissingFilePart
    })?;

    let mut batch = state.store.begin_upload();
    let mut saw_file_field = false;

    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            debug!(field = ?field.name(), "Skipping unrelated form field");
            continue;
        }
        saw_file_field = true;

        // A `file` value without a filename attribute is a plain form value
        let Some(raw_name) = field.file_name().map(str::to_owned) else {
            debug!("Skipping file field without a filename");
            continue;
        };

        if raw_name.is_empty() {
            return Err(GatewayError::EmptyFilename);
        }

        let name = sanitize_filename(&raw_name)?;
        let staged = batch.stage(name).await?;
        while let Some(chunk) = field.chunk().await? {
            staged.write_chunk(&chunk).await?;
        }

        debug!(
            filename = %staged.name(),
            original = %raw_name,
            bytes = staged.size(),
            "File part received"
        );
    }

    if !saw_file_field {
        return Err(GatewayError::MissingFilePart);
    }
    if batch.is_empty() {
        return Err(GatewayError::EmptyFileList);
    }

    let stored = batch.commit().await?;
    let total_bytes: u64 = stored.iter().map(|file| file.size).sum();
    for file in &stored {
        info!(filename = %file.name, bytes = file.size, "File stored");
    }
    info!(count = stored.len(), bytes = total_bytes, "Upload completed");

    Ok(UPLOAD_SUCCESS_MESSAGE)
}
