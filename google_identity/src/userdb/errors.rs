use thiserror::Error;

#[derive(Clone, Error, Debug)]
pub enum UserError {
    #[error("User not found")]
    NotFound,

    #[error("Duplicate value for a unique column: {0}")]
    UniqueViolation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_environment;
    use crate::userdb::{UserSearchField, UserStore};
    use serial_test::serial;

    /// Test error propagation through the ? operator
    #[test]
    fn test_error_propagation() {
        fn validate_username(username: &str) -> Result<(), UserError> {
            if username.is_empty() {
                return Err(UserError::InvalidData(
                    "Username cannot be empty".to_string(),
                ));
            }
            Ok(())
        }

        fn process_username(username: &str) -> Result<String, UserError> {
            validate_username(username)?;
            Ok(format!("Processed {username}"))
        }

        assert!(process_username("alice").is_ok());
        assert!(matches!(
            process_username(""),
            Err(UserError::InvalidData(_))
        ));
    }

    /// A missing user is a successful None from the store; NotFound is the
    /// caller's decision when existence is required
    #[tokio::test]
    #[serial]
    async fn test_not_found_error_in_context() {
        init_test_environment().await;

        let result =
            UserStore::get_user_by(UserSearchField::Id("nonexistent_user_id".to_string())).await;

        assert!(result.is_ok());
        assert!(
            result
                .expect("Getting non-existent user should succeed")
                .is_none()
        );

        async fn get_existing_user(id: &str) -> Result<crate::userdb::User, UserError> {
            match UserStore::get_user_by(UserSearchField::Id(id.to_string())).await? {
                Some(user) => Ok(user),
                None => Err(UserError::NotFound),
            }
        }

        let result = get_existing_user("nonexistent_user_id").await;
        assert!(matches!(result, Err(UserError::NotFound)));
    }
}
