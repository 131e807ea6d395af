//! Employee data service.
//!
//! [`EmployeeService`] is the only way the rest of the crate reads or writes
//! employee records. It validates input against [`crate::schema`], enforces
//! email uniqueness, and runs every mutation in its own transaction:
//!
//! - `employees`: list/search, lookup, create, update, delete
//! - `analytics`: average salary and hire-date utilities

mod analytics;
mod employees;

pub use analytics::SalaryStats;

use sqlx::{Sqlite, Transaction};
use tracing::warn;

use crate::error::{DirectoryError, DirectoryResult};
use crate::store::Store;

/// Validated access to employee records.
///
/// The store handle is injected at construction; cloning shares it.
#[derive(Debug, Clone)]
pub struct EmployeeService {
    store: Store,
}

impl EmployeeService {
    /// Creates a service over `store`.
    pub fn new(store: Store) -> Self {
        Self { store }
    }
}

/// Commits `tx` if `result` is `Ok`, otherwise rolls it back and returns
/// the original error.
async fn finish<T>(
    tx: Transaction<'static, Sqlite>,
    result: DirectoryResult<T>,
) -> DirectoryResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

/// Maps a write failure, reporting unique-constraint violations as
/// `DuplicateEmail`.
fn write_error(err: sqlx::Error, email: &str) -> DirectoryError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => DirectoryError::DuplicateEmail {
            email: email.to_string(),
        },
        _ => DirectoryError::PersistenceFailure(err),
    }
}
