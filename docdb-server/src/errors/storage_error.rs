//! Errors raised by the upload store.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors from saving or opening stored files.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested name or path cannot address a file inside the store.
    #[error("Invalid file name: {0}")]
    InvalidName(String),

    /// No file exists at the requested path.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Writing or reading the disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    /// Create an invalid name error.
    pub fn invalid_name(name: impl Into<String>) -> Self {
        Self::InvalidName(name.into())
    }

    /// Create a not found error.
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound(path.into())
    }

    /// HTTP status reported to the uploader.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidName(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            StorageError::invalid_name("..").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StorageError::not_found("a.txt").status_code(),
            StatusCode::NOT_FOUND
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(
            StorageError::from(io).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
