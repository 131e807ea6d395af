//! Derived values over the employee table.

use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::info;

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::Employee;
use crate::schema;
use crate::store::employees;

use super::{EmployeeService, finish};

/// Salary figures over the whole directory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalaryStats {
    /// Mean salary, `0.0` when there are no employees.
    pub average_salary: f64,
    /// Number of employees the mean was taken over.
    pub employee_count: i64,
}

impl EmployeeService {
    /// Mean salary across all employees, or `0.0` when there are none.
    pub async fn average_salary(&self) -> DirectoryResult<f64> {
        Ok(self.salary_stats().await?.average_salary)
    }

    /// Mean salary together with the headcount it covers.
    pub async fn salary_stats(&self) -> DirectoryResult<SalaryStats> {
        let mut conn = self.store.pool().acquire().await?;
        let (total, count) = employees::salary_totals(&mut conn).await?;

        let average_salary = if count == 0 { 0.0 } else { total / count as f64 };
        Ok(SalaryStats {
            average_salary,
            employee_count: count,
        })
    }

    /// Employees hired strictly after midnight at the start of `date`.
    ///
    /// `date` must be `YYYY-MM-DD`; anything else is `InvalidDateFormat`.
    pub async fn hired_after(&self, date: &str) -> DirectoryResult<Vec<Employee>> {
        let cutoff = schema::parse_day_start(date)?;

        let mut conn = self.store.pool().acquire().await?;
        Ok(employees::hired_after(&mut conn, cutoff).await?)
    }

    /// Sets employee `id`'s hire date to midnight at the start of `date`.
    ///
    /// The id is checked before the date, so an unknown id is `NotFound`
    /// even when the date is also malformed.
    pub async fn update_hiring_date(&self, id: i64, date: &str) -> DirectoryResult<Employee> {
        let mut tx = self.store.begin().await?;
        let result = apply_hiring_date(&mut tx, id, date).await;
        let employee = finish(tx, result).await?;

        info!(
            employee_id = id,
            date_hired = %employee.date_hired,
            "Hiring date updated"
        );
        Ok(employee)
    }
}

async fn apply_hiring_date(
    conn: &mut SqliteConnection,
    id: i64,
    date: &str,
) -> DirectoryResult<Employee> {
    let mut employee = employees::find_by_id(conn, id)
        .await?
        .ok_or(DirectoryError::NotFound { id })?;

    employee.date_hired = schema::parse_day_start(date)?;
    employees::update(conn, &employee).await?;

    Ok(employee)
}
