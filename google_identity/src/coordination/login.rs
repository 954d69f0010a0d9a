use crate::userdb::{User, UserError, UserSearchField, UserStore};
use crate::verifier::{IdClaims, IdTokenVerifier};

use super::errors::CoordinationError;

/// Prefix for usernames derived from claims that carry no email
const USERNAME_FALLBACK_PREFIX: &str = "user_";

/// Length of the subject-id slice used in fallback usernames
const SUBJECT_SLICE_LEN: usize = 8;

/// Upper bound on the suffix search; exhausting it surfaces a conflict
const MAX_USERNAME_ATTEMPTS: usize = 100;

/// Extract and verify the token carried by an `Authorization` header,
/// returning the decoded claims
pub async fn verify_bearer(
    verifier: &dyn IdTokenVerifier,
    authorization: Option<&str>,
) -> Result<IdClaims, CoordinationError> {
    let token = bearer_token(authorization)?;

    verifier.verify(token).await.map_err(|e| {
        CoordinationError::Unauthenticated(format!("Token verification failed: {e}")).log()
    })
}

/// Guard for protected operations: verified claims must map to an existing
/// local user
///
/// Registration is a separate prior step; this never auto-creates a record.
pub async fn authenticate_request(
    verifier: &dyn IdTokenVerifier,
    authorization: Option<&str>,
) -> Result<User, CoordinationError> {
    let claims = verify_bearer(verifier, authorization).await?;

    UserStore::get_user_by(UserSearchField::SubjectId(claims.sub.clone()))
        .await?
        .ok_or_else(|| {
            CoordinationError::ResourceNotFound {
                resource_type: "User".to_string(),
                resource_id: claims.sub.clone(),
            }
            .log()
        })
}

/// Verify a raw ID token and map it to a local user, provisioning one on
/// first sight of the subject
pub async fn federated_login(
    verifier: &dyn IdTokenVerifier,
    id_token: &str,
) -> Result<(User, bool), CoordinationError> {
    let claims = verifier.verify(id_token).await.map_err(|e| {
        CoordinationError::Unauthenticated(format!("Token verification failed: {e}")).log()
    })?;

    resolve_or_create(&claims).await
}

/// Map verified claims to exactly one local user
///
/// Returns the existing user for a known subject, or creates one with a
/// collision-free username derived from the claims. The boolean reports
/// whether a record was created by this call.
pub async fn resolve_or_create(claims: &IdClaims) -> Result<(User, bool), CoordinationError> {
    if let Some(user) =
        UserStore::get_user_by(UserSearchField::SubjectId(claims.sub.clone())).await?
    {
        return Ok((user, false));
    }

    let base = base_username(claims);

    // Two rounds: a lost race on username or email gets one re-derivation
    // before the conflict surfaces. A lost race on the subject itself
    // resolves by re-reading the winner's row.
    for _ in 0..2 {
        let username = next_free_username(&base).await?;

        let mut user = User::new(Some(claims.sub.clone()), username, claims.email.clone());
        user.display_name = claims.name.clone();
        user.photo_url = claims.picture.clone();

        match UserStore::insert_user(user).await {
            Ok(user) => {
                tracing::debug!("Created user {} for subject {}", user.username, claims.sub);
                return Ok((user, true));
            }
            Err(UserError::UniqueViolation(_)) => {
                if let Some(user) =
                    UserStore::get_user_by(UserSearchField::SubjectId(claims.sub.clone())).await?
                {
                    tracing::debug!("Subject {} was created concurrently", claims.sub);
                    return Ok((user, false));
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(CoordinationError::Conflict(format!(
        "Could not allocate a unique username for subject {}",
        claims.sub
    ))
    .log())
}

/// Candidate username base: the email local-part, or a slice of the subject
/// identifier when the claims carry no email
fn base_username(claims: &IdClaims) -> String {
    match claims.email.as_deref() {
        Some(email) if !email.is_empty() => {
            email.split('@').next().unwrap_or(email).to_string()
        }
        _ => {
            let slice: String = claims.sub.chars().take(SUBJECT_SLICE_LEN).collect();
            format!("{USERNAME_FALLBACK_PREFIX}{slice}")
        }
    }
}

/// Find the first unused username in the deterministic sequence
/// `base`, `base1`, `base2`, ...
async fn next_free_username(base: &str) -> Result<String, CoordinationError> {
    let mut candidate = base.to_string();

    for n in 1..=MAX_USERNAME_ATTEMPTS {
        let taken = UserStore::get_user_by(UserSearchField::Username(candidate.clone()))
            .await?
            .is_some();
        if !taken {
            return Ok(candidate);
        }
        candidate = format!("{base}{n}");
    }

    Err(CoordinationError::Conflict(format!("No free username found for base {base}")).log())
}

/// Extract the token from a `Bearer <token>` authorization header value
fn bearer_token(authorization: Option<&str>) -> Result<&str, CoordinationError> {
    let header = authorization.ok_or_else(|| {
        CoordinationError::Unauthenticated("Authorization header missing".to_string()).log()
    })?;

    let parts: Vec<&str> = header.split_whitespace().collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(token),
        _ => Err(
            CoordinationError::Unauthenticated("Invalid authorization scheme".to_string()).log(),
        ),
    }
}
