use chrono::Utc;
use serde::Deserialize;

use crate::userdb::{User, UserSearchField, UserStore};

use super::errors::CoordinationError;

/// Create a user with an explicitly chosen username
///
/// Used by the signup flow, where the caller picks the handle instead of
/// having one derived from claims. `hashed_password` stays unset: accounts
/// created here authenticate through the identity provider only.
pub async fn register(
    subject_id: &str,
    username: &str,
    email: &str,
    display_name: Option<String>,
) -> Result<User, CoordinationError> {
    if username.trim().is_empty() {
        return Err(CoordinationError::Validation("Username must not be empty".to_string()).log());
    }
    if email.is_empty() || !email.contains('@') {
        return Err(CoordinationError::Validation(format!("Invalid email address: {email}")).log());
    }

    if UserStore::get_user_by(UserSearchField::Username(username.to_string()))
        .await?
        .is_some()
    {
        return Err(CoordinationError::Conflict("Username already taken".to_string()).log());
    }

    let mut user = User::new(
        Some(subject_id.to_string()),
        username.to_string(),
        Some(email.to_string()),
    );
    user.display_name = display_name;

    // The unique indexes close the window between the lookup above and this
    // insert
    let user = UserStore::insert_user(user).await?;

    tracing::debug!("Registered user {} for subject {}", user.username, subject_id);

    Ok(user)
}

/// Partial profile update; absent fields leave existing values untouched
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub profile_region: Option<String>,
    pub preferred_language: Option<String>,
    pub photo_url: Option<String>,
    pub bio: Option<String>,
}

/// Apply the supplied profile fields and persist the record
///
/// An empty string is treated the same as an absent field: no change. A
/// field can therefore not be cleared once set through this operation.
pub async fn update_profile(
    user: User,
    update: ProfileUpdate,
) -> Result<User, CoordinationError> {
    fn apply(current: &mut Option<String>, next: Option<String>) {
        if let Some(value) = next.filter(|v| !v.is_empty()) {
            *current = Some(value);
        }
    }

    let mut user = user;
    apply(&mut user.display_name, update.display_name);
    apply(&mut user.profile_region, update.profile_region);
    apply(&mut user.preferred_language, update.preferred_language);
    apply(&mut user.photo_url, update.photo_url);
    apply(&mut user.bio, update.bio);
    user.updated_at = Utc::now();

    let user = UserStore::update_user(user).await?;

    Ok(user)
}

/// Resolve a username to the account's email address
///
/// Fails with not-found when no user has the username; a user without a
/// stored email yields `None`.
pub async fn lookup_email_by_username(
    username: &str,
) -> Result<Option<String>, CoordinationError> {
    let user = UserStore::get_user_by(UserSearchField::Username(username.to_string()))
        .await?
        .ok_or_else(|| {
            CoordinationError::ResourceNotFound {
                resource_type: "User".to_string(),
                resource_id: username.to_string(),
            }
            .log()
        })?;

    Ok(user.email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::init_test_environment;
    use serial_test::serial;

    fn unique(tag: &str) -> String {
        format!("{}-{}", tag, uuid::Uuid::new_v4())
    }

    /// Registering an already-taken username fails with Conflict, regardless
    /// of the subject behind it
    #[tokio::test]
    #[serial]
    async fn test_register_duplicate_username_conflicts() {
        init_test_environment().await;

        let username = unique("reg");
        let email = format!("{}@example.com", unique("reg"));

        let user = register(&unique("subject"), &username, &email, None)
            .await
            .expect("first registration");
        assert_eq!(user.username, username);
        assert_eq!(user.hashed_password, None);

        let other_email = format!("{}@example.com", unique("reg2"));
        let result = register(&unique("subject"), &username, &other_email, None).await;

        assert!(matches!(result, Err(CoordinationError::Conflict(_))));
    }

    #[tokio::test]
    #[serial]
    async fn test_register_rejects_malformed_input() {
        init_test_environment().await;

        let result = register(&unique("subject"), "", "a@example.com", None).await;
        assert!(matches!(result, Err(CoordinationError::Validation(_))));

        let result = register(&unique("subject"), &unique("reg"), "not-an-email", None).await;
        assert!(matches!(result, Err(CoordinationError::Validation(_))));
    }

    /// Empty strings skip the field, non-empty strings overwrite it
    #[tokio::test]
    #[serial]
    async fn test_update_profile_skips_empty_fields() {
        init_test_environment().await;

        let mut user = User::new(Some(unique("subject")), unique("prof"), None);
        user.display_name = Some("Original Name".to_string());
        let user = UserStore::insert_user(user).await.expect("seed insert");

        let update = ProfileUpdate {
            display_name: Some(String::new()),
            bio: Some("new bio".to_string()),
            ..ProfileUpdate::default()
        };

        let updated = update_profile(user, update).await.expect("update");

        assert_eq!(updated.display_name.as_deref(), Some("Original Name"));
        assert_eq!(updated.bio.as_deref(), Some("new bio"));

        // And the persisted row agrees
        let reloaded = UserStore::get_user_by(UserSearchField::Id(updated.id.clone()))
            .await
            .expect("lookup")
            .expect("user exists");
        assert_eq!(reloaded.display_name.as_deref(), Some("Original Name"));
        assert_eq!(reloaded.bio.as_deref(), Some("new bio"));
    }

    #[tokio::test]
    #[serial]
    async fn test_update_profile_applies_all_supplied_fields() {
        init_test_environment().await;

        let user = User::new(Some(unique("subject")), unique("prof-all"), None);
        let user = UserStore::insert_user(user).await.expect("seed insert");

        let update = ProfileUpdate {
            display_name: Some("Name".to_string()),
            profile_region: Some("Bavaria".to_string()),
            preferred_language: Some("de".to_string()),
            photo_url: Some("https://example.com/p.png".to_string()),
            bio: Some("bio".to_string()),
        };

        let updated = update_profile(user, update).await.expect("update");

        assert_eq!(updated.display_name.as_deref(), Some("Name"));
        assert_eq!(updated.profile_region.as_deref(), Some("Bavaria"));
        assert_eq!(updated.preferred_language.as_deref(), Some("de"));
        assert_eq!(updated.photo_url.as_deref(), Some("https://example.com/p.png"));
        assert_eq!(updated.bio.as_deref(), Some("bio"));
    }

    #[tokio::test]
    #[serial]
    async fn test_lookup_email_by_username() {
        init_test_environment().await;

        let username = unique("lookup");
        let email = format!("{}@example.com", unique("lookup"));
        register(&unique("subject"), &username, &email, None)
            .await
            .expect("registration");

        let found = lookup_email_by_username(&username).await.expect("lookup");
        assert_eq!(found.as_deref(), Some(email.as_str()));

        let missing = lookup_email_by_username(&unique("nobody")).await;
        assert!(matches!(
            missing,
            Err(CoordinationError::ResourceNotFound { .. })
        ));
    }

    /// A user created without an email resolves to a None email, not an error
    #[tokio::test]
    #[serial]
    async fn test_lookup_email_without_email_is_none() {
        init_test_environment().await;

        let username = unique("no-email");
        UserStore::insert_user(User::new(Some(unique("subject")), username.clone(), None))
            .await
            .expect("seed insert");

        let found = lookup_email_by_username(&username).await.expect("lookup");
        assert_eq!(found, None);
    }
}
