// Client Error Types
use reqwest::StatusCode;
use thiserror::Error;

/// Everything that can go wrong between the console and the rental backend
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    // 401
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    // 403
    #[error("forbidden: {0}")]
    Forbidden(String),

    // 404
    #[error("not found: {0}")]
    NotFound(String),

    // 409
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("credential storage error: {0}")]
    Storage(String),

    #[error("page size {0} is not one of 10, 25, 50, 100")]
    InvalidPageSize(usize),

    #[error("page {requested} is out of range (total pages: {total})")]
    PageOutOfRange { requested: usize, total: usize },

    #[error("not signed in")]
    NotAuthenticated,

    #[error("{0}")]
    Validation(String),
}

impl ClientError {
    /// Map a non-success HTTP status to the matching variant
    pub fn from_status(status: StatusCode, body: String) -> Self {
        match status.as_u16() {
            401 => ClientError::Unauthorized(body),
            403 => ClientError::Forbidden(body),
            404 => ClientError::NotFound(body),
            409 => ClientError::Conflict(body),
            code => ClientError::Status { status: code, body },
        }
    }

    /// HTTP status code behind this error, if it came from a response
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized(_) => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Conflict(_) => Some(409),
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable error code for JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Network(_) => "NETWORK_ERROR",
            ClientError::Unauthorized(_) => "UNAUTHORIZED",
            ClientError::Forbidden(_) => "FORBIDDEN",
            ClientError::NotFound(_) => "NOT_FOUND",
            ClientError::Conflict(_) => "CONFLICT",
            ClientError::Status { .. } => "HTTP_ERROR",
            ClientError::Decode(_) => "DECODE_ERROR",
            ClientError::Storage(_) => "STORAGE_ERROR",
            ClientError::InvalidPageSize(_) => "INVALID_PAGE_SIZE",
            ClientError::PageOutOfRange { .. } => "PAGE_OUT_OF_RANGE",
            ClientError::NotAuthenticated => "NOT_AUTHENTICATED",
            ClientError::Validation(_) => "VALIDATION_ERROR",
        }
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Conflict(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            ClientError::from_status(status, err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Storage(err.to_string())
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::Validation(format!("invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_recognizes_conflict() {
        let err = ClientError::from_status(StatusCode::CONFLICT, "rented".into());
        assert!(err.is_conflict());
        assert_eq!(err.status_code(), Some(409));
        assert_eq!(err.error_code(), "CONFLICT");
    }

    #[test]
    fn unknown_status_keeps_code() {
        let err = ClientError::from_status(StatusCode::IM_A_TEAPOT, String::new());
        assert_eq!(err.status_code(), Some(418));
        assert_eq!(err.error_code(), "HTTP_ERROR");
    }
}
