use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use super::errors::TokenVerificationError;
use super::types::IdClaims;

/// Contract for the external token-verification collaborator
///
/// Implementations verify signature, issuer, audience and validity window;
/// a failure of any check must yield an error rather than partial claims.
#[async_trait]
pub trait IdTokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<IdClaims, TokenVerificationError>;
}

#[derive(Debug, Deserialize, Clone)]
struct Jwks {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize, Clone)]
struct Jwk {
    #[allow(unused)]
    kty: String,
    kid: String,
    alg: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Clone)]
struct JwksCache {
    jwks: Jwks,
    expires_at: DateTime<Utc>,
}

const JWKS_CACHE_TTL_SECS: i64 = 600;

const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken%40system.gserviceaccount.com";

/// Verifier for Google-issued (Firebase-style) RS256 ID tokens
///
/// Constructed once at startup and passed around as a handle; holds the HTTP
/// client and a TTL-bounded copy of the provider's JWKS.
pub struct GoogleTokenVerifier {
    client: reqwest::Client,
    jwks_url: String,
    issuer: String,
    audience: String,
    jwks_cache: RwLock<Option<JwksCache>>,
}

impl GoogleTokenVerifier {
    pub fn new(project_id: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            jwks_url: DEFAULT_JWKS_URL.to_string(),
            issuer: format!("https://securetoken.google.com/{project_id}"),
            audience: project_id.to_string(),
            jwks_cache: RwLock::new(None),
        }
    }

    /// Build a verifier from `GOOGLE_PROJECT_ID`, honoring an optional
    /// `GOOGLE_JWKS_URL` override
    pub fn from_env() -> Result<Self, TokenVerificationError> {
        let project_id = std::env::var("GOOGLE_PROJECT_ID")
            .map_err(|_| TokenVerificationError::MissingConfig("GOOGLE_PROJECT_ID".to_string()))?;

        let mut verifier = Self::new(&project_id);
        if let Ok(url) = std::env::var("GOOGLE_JWKS_URL") {
            verifier.jwks_url = url;
        }
        Ok(verifier)
    }

    async fn fetch_jwks(&self) -> Result<Jwks, TokenVerificationError> {
        if let Some(cache) = self.jwks_cache.read().await.as_ref() {
            if cache.expires_at > Utc::now() {
                tracing::debug!("Returning valid cached JWKs");
                return Ok(cache.jwks.clone());
            }
        }

        let jwks: Jwks = self
            .client
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        tracing::debug!("JWKs fetched from {}", self.jwks_url);

        *self.jwks_cache.write().await = Some(JwksCache {
            jwks: jwks.clone(),
            expires_at: Utc::now() + Duration::seconds(JWKS_CACHE_TTL_SECS),
        });

        Ok(jwks)
    }
}

#[async_trait]
impl IdTokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<IdClaims, TokenVerificationError> {
        let header = jsonwebtoken::decode_header(token)?;

        // Google signs ID tokens with RS256 only
        if header.alg != Algorithm::RS256 {
            return Err(TokenVerificationError::UnsupportedAlgorithm(format!(
                "{:?}",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or(TokenVerificationError::MissingKeyComponent(
                "kid".to_string(),
            ))?;

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks
            .keys
            .iter()
            .find(|key| key.kid == kid)
            .ok_or(TokenVerificationError::NoMatchingKey)?;

        if let Some(alg) = &jwk.alg {
            if alg != "RS256" {
                return Err(TokenVerificationError::UnsupportedAlgorithm(alg.clone()));
            }
        }

        let n = jwk
            .n
            .as_ref()
            .ok_or(TokenVerificationError::MissingKeyComponent("n".to_string()))?;
        let e = jwk
            .e
            .as_ref()
            .ok_or(TokenVerificationError::MissingKeyComponent("e".to_string()))?;
        let decoding_key = DecodingKey::from_rsa_components(n, e)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        let data = jsonwebtoken::decode::<IdClaims>(token, &decoding_key, &validation)?;

        tracing::debug!("Verified id_token for subject {}", data.claims.sub);

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_derives_issuer_and_audience() {
        let verifier = GoogleTokenVerifier::new("my-project");

        assert_eq!(verifier.issuer, "https://securetoken.google.com/my-project");
        assert_eq!(verifier.audience, "my-project");
        assert_eq!(verifier.jwks_url, DEFAULT_JWKS_URL);
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_token() {
        let verifier = GoogleTokenVerifier::new("my-project");

        let result = verifier.verify("not-a-jwt").await;

        assert!(matches!(result, Err(TokenVerificationError::JwtError(_))));
    }

    /// A structurally valid token signed with a non-RS256 algorithm is
    /// rejected before any network access
    #[tokio::test]
    async fn test_verify_rejects_wrong_algorithm() {
        use jsonwebtoken::{EncodingKey, Header, encode};
        use serde::Serialize;

        #[derive(Serialize)]
        struct Claims {
            sub: String,
            exp: i64,
        }

        let token = encode(
            &Header::new(Algorithm::HS256),
            &Claims {
                sub: "subject".to_string(),
                exp: i64::MAX,
            },
            &EncodingKey::from_secret(b"secret"),
        )
        .expect("encoding a test token should succeed");

        let verifier = GoogleTokenVerifier::new("my-project");
        let result = verifier.verify(&token).await;

        assert!(matches!(
            result,
            Err(TokenVerificationError::UnsupportedAlgorithm(_))
        ));
    }
}
