mod postgres;
mod sqlite;
mod store_type;

use std::{env, sync::LazyLock};

use crate::storage::DB_TABLE_PREFIX;
use crate::userdb::errors::UserError;

// Re-export only the specific items needed for the public API
pub use store_type::UserStore;

/// Users table name
static DB_TABLE_USERS: LazyLock<String> = LazyLock::new(|| {
    env::var("DB_TABLE_USERS").unwrap_or_else(|_| format!("{}{}", *DB_TABLE_PREFIX, "users"))
});

/// Surface backend UNIQUE-constraint rejections as a typed violation
pub(super) fn map_db_error(err: sqlx::Error) -> UserError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            UserError::UniqueViolation(db_err.message().to_string())
        }
        _ => UserError::Storage(err.to_string()),
    }
}
