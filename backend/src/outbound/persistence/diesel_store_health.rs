//! PostgreSQL-backed `StoreHealth` probe.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoreHealth, StoreHealthError};

use super::diesel_helpers::{DieselFailure, classify_diesel_error, map_pool_error_message};
use super::pool::DbPool;

/// Checks out a pooled connection and runs `SELECT 1`.
#[derive(Clone)]
pub struct DieselStoreHealth {
    pool: DbPool,
}

impl DieselStoreHealth {
    /// Create a probe over the given pool.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn failure_message(failure: DieselFailure) -> String {
    match failure {
        DieselFailure::Connection(message) | DieselFailure::Query(message) => message,
        DieselFailure::UniqueViolation { .. } | DieselFailure::ForeignKeyViolation { .. } => {
            "unexpected constraint violation".to_owned()
        }
    }
}

#[async_trait]
impl StoreHealth for DieselStoreHealth {
    async fn ping(&self) -> Result<(), StoreHealthError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|error| StoreHealthError::unreachable(map_pool_error_message(error)))?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|error| {
                StoreHealthError::unreachable(failure_message(classify_diesel_error(error)))
            })?;
        Ok(())
    }
}
