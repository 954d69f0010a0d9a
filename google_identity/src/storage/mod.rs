mod data_store;
mod errors;
mod schema_validation;

pub async fn init() -> Result<(), errors::StorageError> {
    let _ = *data_store::GENERIC_DATA_STORE;

    Ok(())
}

pub(crate) use data_store::{DB_TABLE_PREFIX, GENERIC_DATA_STORE};

// Re-export schema validation function for internal use
pub(crate) use schema_validation::validate_postgres_table_schema;
