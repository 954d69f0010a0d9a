//! Error types for the reconciliation layer

use thiserror::Error;

use crate::userdb::UserError;

/// Errors that can occur while reconciling external identity with local users
#[derive(Error, Debug)]
pub enum CoordinationError {
    /// Missing, malformed or unverifiable credentials
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Resource not found with context
    #[error("Resource not found: {resource_type} {resource_id}")]
    ResourceNotFound {
        resource_type: String,
        resource_id: String,
    },

    /// Conflict error
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Malformed input payload
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Error from the user database operations
    #[error("User error: {0}")]
    UserError(UserError),
}

impl CoordinationError {
    /// Log the error and return self
    ///
    /// Allows method chaining and explicit logging at the point the error
    /// is constructed.
    pub fn log(self) -> Self {
        tracing::error!("{}", self);
        self
    }
}

// Custom From implementation that automatically logs errors.
// A store-level uniqueness rejection is a domain conflict, not an I/O fault.
impl From<UserError> for CoordinationError {
    fn from(err: UserError) -> Self {
        let error = match err {
            UserError::UniqueViolation(msg) => Self::Conflict(msg),
            err => Self::UserError(err),
        };
        tracing::error!("{}", error);
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_sync_and_send() {
        fn assert_sync_send<T: Sync + Send>() {}
        assert_sync_send::<CoordinationError>();
    }

    #[test]
    fn test_error_display() {
        let err = CoordinationError::Unauthenticated("token expired".to_string());
        assert_eq!(err.to_string(), "Unauthenticated: token expired");

        let err = CoordinationError::ResourceNotFound {
            resource_type: "User".to_string(),
            resource_id: "123".to_string(),
        };
        assert_eq!(err.to_string(), "Resource not found: User 123");

        let err = CoordinationError::Conflict("Username already taken".to_string());
        assert_eq!(err.to_string(), "Conflict: Username already taken");

        let err = CoordinationError::Validation("bad payload".to_string());
        assert_eq!(err.to_string(), "Invalid input: bad payload");

        let err = CoordinationError::Database("db error".to_string());
        assert_eq!(err.to_string(), "Database error: db error");
    }

    #[test]
    fn test_from_user_error() {
        let user_err = UserError::Storage("user db error".to_string());
        let err: CoordinationError = user_err.into();

        if let CoordinationError::UserError(UserError::Storage(msg)) = err {
            assert_eq!(msg, "user db error");
        } else {
            panic!("Wrong error type");
        }
    }

    #[test]
    fn test_from_unique_violation_is_conflict() {
        let user_err = UserError::UniqueViolation("users.username".to_string());
        let err: CoordinationError = user_err.into();

        assert!(matches!(err, CoordinationError::Conflict(_)));
    }

    #[test]
    fn test_error_log_returns_self() {
        let err = CoordinationError::Conflict("test error".to_string());
        let logged_err = err.log();

        if let CoordinationError::Conflict(msg) = logged_err {
            assert_eq!(msg, "test error");
        } else {
            panic!("Wrong error type after logging");
        }
    }
}
