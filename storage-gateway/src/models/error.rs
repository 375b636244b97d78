use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

/// Errors surfaced by the gateway's upload, list and download operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("No file part")]
    MissingFilePart,

    #[error("No selected files")]
    EmptyFileList,

    #[error("No selected file")]
    EmptyFilename,

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),

    #[error("Upload exceeds the configured size limit")]
    PayloadTooLarge,

    #[error("Template error: {0}")]
    Template(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::MissingFilePart => "MISSING_FILE_PART",
            GatewayError::EmptyFileList => "EMPTY_FILE_LIST",
            GatewayError::EmptyFilename => "EMPTY_FILENAME",
            GatewayError::InvalidFilename(_) => "INVALID_FILENAME",
            GatewayError::NotFound(_) => "NOT_FOUND",
            GatewayError::Multipart(_) => "MALFORMED_MULTIPART",
            GatewayError::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            GatewayError::Template(_) => "TEMPLATE_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
            GatewayError::Io(_) => "IO_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingFilePart
            | GatewayError::EmptyFileList
            | GatewayError::EmptyFilename
            | GatewayError::InvalidFilename(_)
            | GatewayError::Multipart(_) => StatusCode::BAD_REQUEST,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            GatewayError::Template(_) | GatewayError::Internal(_) | GatewayError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client. Server-side failures stay generic so that
    /// filesystem paths never leak into responses.
    fn public_message(&self) -> String {
        match self {
            GatewayError::NotFound(_) => "File not found".to_string(),
            GatewayError::Template(_) | GatewayError::Internal(_) | GatewayError::Io(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(code = self.error_code(), error = %self, "Request failed");
        } else {
            warn!(code = self.error_code(), error = %self, "Request rejected");
        }

        (status, self.public_message()).into_response()
    }
}

impl From<MultipartError> for GatewayError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            GatewayError::PayloadTooLarge
        } else {
            GatewayError::Multipart(err.body_text())
        }
    }
}

impl From<handlebars::RenderError> for GatewayError {
    fn from(err: handlebars::RenderError) -> Self {
        GatewayError::Template(err.to_string())
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_client_errors_map_to_4xx() {
        assert_eq!(GatewayError::MissingFilePart.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(GatewayError::EmptyFileList.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(GatewayError::EmptyFilename.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            GatewayError::InvalidFilename("../x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GatewayError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_error_code_generation() {
        let error = GatewayError::InvalidFilename("../../etc/passwd".to_string());
        assert_eq!(error.error_code(), "INVALID_FILENAME");
    }

    #[test]
    fn test_io_errors_do_not_leak_details() {
        let error = GatewayError::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "/var/secret/uploads: permission denied",
        ));
        assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.public_message(), "Internal server error");
    }
}
