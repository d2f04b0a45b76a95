use crate::database::EarningsStore;
use sqlx::PgPool;

const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Clone)]
pub struct PostgresRepository {
    pub pool: PgPool,
}

impl EarningsStore for PostgresRepository {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

/// True when the error is Postgres rejecting a reference to a missing row.
pub(crate) fn is_foreign_key_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .and_then(|db_error| db_error.code())
        .is_some_and(|code| code == FOREIGN_KEY_VIOLATION)
}
