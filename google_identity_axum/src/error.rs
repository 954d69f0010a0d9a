use http::StatusCode;

use google_identity::CoordinationError;

/// Helper trait for converting errors to a standard response error format
pub(super) trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Implementation for CoordinationError to map variants to appropriate status codes
impl<T> IntoResponseError<T> for Result<T, CoordinationError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                CoordinationError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
                CoordinationError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
                CoordinationError::Conflict(_) => StatusCode::CONFLICT,
                CoordinationError::Validation(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}
