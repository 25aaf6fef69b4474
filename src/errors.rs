use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Data integrity violation: {0}")]
    DataIntegrityViolation(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::InvalidParameter(_) => "INVALID_PARAMETER",
            AppError::DataIntegrityViolation(_) => "DATA_INTEGRITY_VIOLATION",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::StorageError(_) => "STORAGE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Process exit code used by the binary when an error ends the program.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::InternalError(_) => 1,
            AppError::InvalidParameter(_) => 2,
            AppError::NotFound(_) => 3,
            AppError::DataIntegrityViolation(_) => 4,
            AppError::InvalidState(_) => 5,
            AppError::StorageError(_) => 6,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        ErrorResponse {
            error: err.to_string(),
            code: err.error_code(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::StorageError(err.to_string())
    }
}
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            AppError::StorageError(err.to_string())
        } else if err.is_data() || err.is_syntax() || err.is_eof() {
            AppError::DataIntegrityViolation(format!("malformed JSON: {}", err))
        } else {
            AppError::InternalError(format!("JSON error: {}", err))
        }
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::DataIntegrityViolation(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound("x".into()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::InvalidParameter("x".into()).error_code(),
            "INVALID_PARAMETER"
        );
        assert_eq!(
            AppError::DataIntegrityViolation("x".into()).error_code(),
            "DATA_INTEGRITY_VIOLATION"
        );
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let errors = [
            AppError::NotFound(String::new()),
            AppError::InvalidParameter(String::new()),
            AppError::DataIntegrityViolation(String::new()),
            AppError::InvalidState(String::new()),
            AppError::StorageError(String::new()),
            AppError::InternalError(String::new()),
        ];
        let mut codes: Vec<u8> = errors.iter().map(AppError::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::NotFound("certification 'pd1'".into());
        assert_eq!(err.to_string(), "Not found: certification 'pd1'");
    }

    #[test]
    fn test_malformed_json_maps_to_integrity_violation() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{ nope")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), "DATA_INTEGRITY_VIOLATION");
    }

    #[test]
    fn test_error_response_carries_code() {
        let err = AppError::InvalidState("summary".into());
        let response = ErrorResponse::from(&err);
        assert_eq!(response.code, "INVALID_STATE");
        assert_eq!(response.error, "Invalid state: summary");
    }
}
