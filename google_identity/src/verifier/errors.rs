use thiserror::Error;

#[derive(Error, Debug)]
pub enum TokenVerificationError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JWT error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidTokenFormat,

    #[error("No matching key found in JWKS")]
    NoMatchingKey,

    #[error("Missing key component: {0}")]
    MissingKeyComponent(String),

    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("JWKS fetch error: {0}")]
    JwksFetch(String),

    #[error("Missing configuration: {0}")]
    MissingConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TokenVerificationError::InvalidTokenFormat;
        assert_eq!(err.to_string(), "Invalid token format");

        let err = TokenVerificationError::NoMatchingKey;
        assert_eq!(err.to_string(), "No matching key found in JWKS");

        let err = TokenVerificationError::MissingKeyComponent("kid".to_string());
        assert_eq!(err.to_string(), "Missing key component: kid");

        let err = TokenVerificationError::UnsupportedAlgorithm("HS256".to_string());
        assert_eq!(err.to_string(), "Unsupported algorithm: HS256");

        let err = TokenVerificationError::MissingConfig("GOOGLE_PROJECT_ID".to_string());
        assert_eq!(err.to_string(), "Missing configuration: GOOGLE_PROJECT_ID");
    }

    #[test]
    fn test_from_jwt_error() {
        let jwt_error = jsonwebtoken::decode_header("not-a-jwt").unwrap_err();

        let err = TokenVerificationError::from(jwt_error);

        assert!(matches!(err, TokenVerificationError::JwtError(_)));
    }
}
