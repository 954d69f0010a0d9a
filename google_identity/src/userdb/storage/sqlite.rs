use sqlx::{Pool, Sqlite};

use crate::userdb::errors::UserError;
use crate::userdb::types::{User, UserSearchField};

use super::DB_TABLE_USERS;
use super::map_db_error;

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    // Create users table; uniqueness of subject_id, username and email is
    // enforced here rather than by application-level checks
    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id TEXT PRIMARY KEY NOT NULL,
            subject_id TEXT UNIQUE,
            username TEXT NOT NULL UNIQUE,
            email TEXT UNIQUE,
            hashed_password TEXT,
            display_name TEXT,
            profile_region TEXT,
            preferred_language TEXT,
            photo_url TEXT,
            bio TEXT,
            created_at TIMESTAMP NOT NULL,
            updated_at TIMESTAMP NOT NULL
        )
        "#,
        table_name
    ))
    .execute(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))?;

    Ok(())
}

pub(super) async fn get_user_by_field_sqlite(
    pool: &Pool<Sqlite>,
    field: &UserSearchField,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();
    let (column, value) = field.as_column_value();

    sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT * FROM {} WHERE {} = ?
        "#,
        table_name, column
    ))
    .bind(value)
    .fetch_optional(pool)
    .await
    .map_err(|e| UserError::Storage(e.to_string()))
}

pub(super) async fn insert_user_sqlite(pool: &Pool<Sqlite>, user: User) -> Result<User, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {} (
            id, subject_id, username, email, hashed_password,
            display_name, profile_region, preferred_language, photo_url, bio,
            created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
        table_name
    ))
    .bind(&user.id)
    .bind(&user.subject_id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.hashed_password)
    .bind(&user.display_name)
    .bind(&user.profile_region)
    .bind(&user.preferred_language)
    .bind(&user.photo_url)
    .bind(&user.bio)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map_err(map_db_error)?;

    Ok(user)
}

pub(super) async fn update_user_sqlite(pool: &Pool<Sqlite>, user: User) -> Result<User, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    // id and created_at never change after insert
    sqlx::query(&format!(
        r#"
        UPDATE {} SET
            subject_id = ?,
            username = ?,
            email = ?,
            hashed_password = ?,
            display_name = ?,
            profile_region = ?,
            preferred_language = ?,
            photo_url = ?,
            bio = ?,
            updated_at = ?
        WHERE id = ?
        "#,
        table_name
    ))
    .bind(&user.subject_id)
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.hashed_password)
    .bind(&user.display_name)
    .bind(&user.profile_region)
    .bind(&user.preferred_language)
    .bind(&user.photo_url)
    .bind(&user.bio)
    .bind(user.updated_at)
    .bind(&user.id)
    .execute(pool)
    .await
    .map_err(map_db_error)?;

    Ok(user)
}
