//! Employee CRUD operations.

use chrono::{NaiveDateTime, SubsecRound, Utc};
use sqlx::SqliteConnection;
use tracing::{debug, info};

use crate::error::{DirectoryError, DirectoryResult};
use crate::models::{DeleteConfirmation, Employee, NewEmployee};
use crate::schema::{self, EmployeePayload};
use crate::store::employees;

use super::{EmployeeService, finish, write_error};

/// Current UTC time truncated to whole seconds.
pub(super) fn hire_timestamp() -> NaiveDateTime {
    Utc::now().naive_utc().trunc_subsecs(0)
}

impl EmployeeService {
    /// Returns every employee, or only those whose name, email or position
    /// contains `query` ignoring case.
    ///
    /// A missing or blank query lists everyone. Results are in insertion
    /// order.
    pub async fn list(&self, query: Option<&str>) -> DirectoryResult<Vec<Employee>> {
        let mut conn = self.store.pool().acquire().await?;

        let employees = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(term) => employees::search(&mut conn, term).await?,
            None => employees::list_all(&mut conn).await?,
        };

        debug!(count = employees.len(), query = ?query, "Listed employees");
        Ok(employees)
    }

    /// Looks up an employee. A missing id is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: i64) -> DirectoryResult<Option<Employee>> {
        let mut conn = self.store.pool().acquire().await?;
        Ok(employees::find_by_id(&mut conn, id).await?)
    }

    /// Validates `payload` and stores a new employee hired now.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if any field breaks its schema constraint
    /// - `DuplicateEmail` if the email is already in use
    /// - `PersistenceFailure` if the store fails; nothing is written
    pub async fn create(&self, payload: &EmployeePayload) -> DirectoryResult<Employee> {
        let new_employee = schema::validate_for_create(payload)?;

        let mut tx = self.store.begin().await?;
        let result = insert_unique(&mut tx, &new_employee).await;
        let employee = finish(tx, result).await?;

        info!(employee_id = employee.id, "Employee created");
        Ok(employee)
    }

    /// Runs every check `create` would make on `payload`, without writing.
    ///
    /// Lets callers refuse a request before storing anything tied to it.
    pub async fn check_create(&self, payload: &EmployeePayload) -> DirectoryResult<()> {
        let new_employee = schema::validate_for_create(payload)?;
        let mut conn = self.store.pool().acquire().await?;
        ensure_email_free(&mut conn, &new_employee.email, None).await
    }

    /// Runs every check `update` would make, without writing.
    pub async fn check_update(&self, id: i64, payload: &EmployeePayload) -> DirectoryResult<()> {
        let mut conn = self.store.pool().acquire().await?;
        let employee = employees::find_by_id(&mut conn, id)
            .await?
            .ok_or(DirectoryError::NotFound { id })?;

        let changes = schema::validate_for_update(payload)?;
        match changes.email_change(&employee.email) {
            Some(email) => ensure_email_free(&mut conn, email, Some(id)).await,
            None => Ok(()),
        }
    }

    /// Applies the supplied fields of `payload` to employee `id`.
    ///
    /// Omitted or blank fields keep their current value. A changed email is
    /// checked for shape and for uniqueness against every other employee.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no employee has this id
    /// - `InvalidFormat` if a supplied field breaks its constraint
    /// - `DuplicateEmail` if the new email belongs to someone else
    /// - `PersistenceFailure` if the store fails; the row is left unchanged
    pub async fn update(&self, id: i64, payload: &EmployeePayload) -> DirectoryResult<Employee> {
        let mut tx = self.store.begin().await?;
        let result = apply_update(&mut tx, id, payload).await;
        let employee = finish(tx, result).await?;

        info!(employee_id = employee.id, "Employee updated");
        Ok(employee)
    }

    /// Permanently removes employee `id`.
    pub async fn delete(&self, id: i64) -> DirectoryResult<DeleteConfirmation> {
        let mut tx = self.store.begin().await?;
        let result = apply_delete(&mut tx, id).await;
        let confirmation = finish(tx, result).await?;

        info!(employee_id = id, "Employee deleted");
        Ok(confirmation)
    }
}

async fn ensure_email_free(
    conn: &mut SqliteConnection,
    email: &str,
    exclude_id: Option<i64>,
) -> DirectoryResult<()> {
    if employees::email_taken(conn, email, exclude_id).await? {
        return Err(DirectoryError::DuplicateEmail {
            email: email.to_string(),
        });
    }
    Ok(())
}

async fn insert_unique(
    conn: &mut SqliteConnection,
    new_employee: &NewEmployee,
) -> DirectoryResult<Employee> {
    ensure_email_free(conn, &new_employee.email, None).await?;

    employees::insert(conn, new_employee, hire_timestamp())
        .await
        .map_err(|e| write_error(e, &new_employee.email))
}

async fn apply_update(
    conn: &mut SqliteConnection,
    id: i64,
    payload: &EmployeePayload,
) -> DirectoryResult<Employee> {
    let mut employee = employees::find_by_id(conn, id)
        .await?
        .ok_or(DirectoryError::NotFound { id })?;

    let changes = schema::validate_for_update(payload)?;

    if let Some(email) = changes.email_change(&employee.email) {
        ensure_email_free(conn, email, Some(id)).await?;
    }

    if changes.is_empty() {
        return Ok(employee);
    }

    changes.apply_to(&mut employee);
    employees::update(conn, &employee)
        .await
        .map_err(|e| write_error(e, &employee.email))?;

    Ok(employee)
}

async fn apply_delete(conn: &mut SqliteConnection, id: i64) -> DirectoryResult<DeleteConfirmation> {
    match employees::delete(conn, id).await? {
        0 => Err(DirectoryError::NotFound { id }),
        _ => Ok(DeleteConfirmation::new(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;

    async fn create_test_service() -> EmployeeService {
        EmployeeService::new(Store::in_memory().await.unwrap())
    }

    fn john() -> EmployeePayload {
        EmployeePayload::new(
            "John Doe",
            "john.doe@example.com",
            "Software Engineer",
            "70000.0",
        )
    }

    #[tokio::test]
    async fn test_create_returns_stored_employee() {
        let service = create_test_service().await;

        let employee = service
            .create(&john().with_profile_picture("john.png"))
            .await
            .unwrap();
        assert!(employee.id > 0);
        assert_eq!(employee.name, "John Doe");
        assert_eq!(employee.salary, 70000.0);
        assert_eq!(employee.profile_picture.as_deref(), Some("john.png"));

        let stored = service.get_by_id(employee.id).await.unwrap();
        assert_eq!(stored, Some(employee));
    }

    #[tokio::test]
    async fn test_create_with_invalid_email_persists_nothing() {
        let service = create_test_service().await;

        let mut payload = john();
        payload.email = Some("not-an-email".to_string());

        let result = service.create(&payload).await;
        assert!(matches!(
            result,
            Err(DirectoryError::InvalidFormat { ref field, .. }) if field == "email"
        ));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_padded_email_fails() {
        let service = create_test_service().await;

        let result = service
            .create(&EmployeePayload::new("  John  ", " a@b.com ", "Dev", "1"))
            .await;
        assert!(matches!(
            result,
            Err(DirectoryError::InvalidFormat { ref field, .. }) if field == "email"
        ));
        assert!(service.list(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_non_numeric_salary_fails() {
        let service = create_test_service().await;

        let mut payload = john();
        payload.salary = Some("seventy thousand".to_string());

        let result = service.create(&payload).await;
        assert!(matches!(
            result,
            Err(DirectoryError::InvalidFormat { ref field, .. }) if field == "salary"
        ));
    }

    #[tokio::test]
    async fn test_create_duplicate_email_fails() {
        let service = create_test_service().await;

        service
            .create(&EmployeePayload::new("A", "a@b.com", "X", "1"))
            .await
            .unwrap();
        let result = service
            .create(&EmployeePayload::new("B", "a@b.com", "Y", "2"))
            .await;

        match result {
            Err(DirectoryError::DuplicateEmail { email }) => assert_eq!(email, "a@b.com"),
            other => panic!("Expected DuplicateEmail, got {:?}", other),
        }
        assert_eq!(service.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_query() {
        let service = create_test_service().await;
        service.create(&john()).await.unwrap();
        service
            .create(&EmployeePayload::new("Ann Lee", "ann@corp.com", "Designer", "50000"))
            .await
            .unwrap();

        assert_eq!(service.list(None).await.unwrap().len(), 2);
        assert_eq!(service.list(Some("  ")).await.unwrap().len(), 2);

        let designers = service.list(Some("DESIGN")).await.unwrap();
        assert_eq!(designers.len(), 1);
        assert_eq!(designers[0].name, "Ann Lee");

        let by_email = service.list(Some("example.com")).await.unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].name, "John Doe");

        assert!(service.list(Some("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_missing_is_none() {
        let service = create_test_service().await;
        assert_eq!(service.get_by_id(42).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_name_only_keeps_other_fields() {
        let service = create_test_service().await;
        let original = service
            .create(&john().with_profile_picture("john.jpg"))
            .await
            .unwrap();

        let payload = EmployeePayload {
            name: Some("Johnny Doe".to_string()),
            ..Default::default()
        };
        let updated = service.update(original.id, &payload).await.unwrap();

        assert_eq!(updated.name, "Johnny Doe");
        assert_eq!(updated.email, original.email);
        assert_eq!(updated.position, original.position);
        assert_eq!(updated.salary, original.salary);
        assert_eq!(updated.profile_picture, original.profile_picture);
        assert_eq!(updated.date_hired, original.date_hired);

        let stored = service.get_by_id(original.id).await.unwrap().unwrap();
        assert_eq!(stored, updated);
    }

    #[tokio::test]
    async fn test_update_missing_employee_is_not_found() {
        let service = create_test_service().await;
        let result = service.update(7, &john()).await;
        assert!(matches!(result, Err(DirectoryError::NotFound { id: 7 })));
    }

    #[tokio::test]
    async fn test_update_email_to_other_employees_email_fails() {
        let service = create_test_service().await;
        let first = service.create(&john()).await.unwrap();
        service
            .create(&EmployeePayload::new("Jane Doe", "jane.doe@example.com", "CTO", "1"))
            .await
            .unwrap();

        let payload = EmployeePayload {
            email: Some("jane.doe@example.com".to_string()),
            name: Some("Renamed".to_string()),
            ..Default::default()
        };
        let result = service.update(first.id, &payload).await;
        assert!(matches!(result, Err(DirectoryError::DuplicateEmail { .. })));

        let stored = service.get_by_id(first.id).await.unwrap().unwrap();
        assert_eq!(stored, first);
    }

    #[tokio::test]
    async fn test_update_with_same_email_succeeds() {
        let service = create_test_service().await;
        let employee = service.create(&john()).await.unwrap();

        let payload = EmployeePayload {
            email: Some(employee.email.clone()),
            salary: Some("80000".to_string()),
            ..Default::default()
        };
        let updated = service.update(employee.id, &payload).await.unwrap();
        assert_eq!(updated.salary, 80000.0);
        assert_eq!(updated.email, employee.email);
    }

    #[tokio::test]
    async fn test_update_with_invalid_email_fails() {
        let service = create_test_service().await;
        let employee = service.create(&john()).await.unwrap();

        let payload = EmployeePayload {
            email: Some("broken@".to_string()),
            ..Default::default()
        };
        let result = service.update(employee.id, &payload).await;
        assert!(matches!(result, Err(DirectoryError::InvalidFormat { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_employee() {
        let service = create_test_service().await;
        let employee = service.create(&john()).await.unwrap();

        let confirmation = service.delete(employee.id).await.unwrap();
        assert_eq!(confirmation.id, employee.id);
        assert_eq!(service.get_by_id(employee.id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_employee_is_not_found() {
        let service = create_test_service().await;
        let result = service.delete(99).await;
        assert!(matches!(result, Err(DirectoryError::NotFound { id: 99 })));
    }

    #[tokio::test]
    async fn test_check_create_matches_create_rules() {
        let service = create_test_service().await;
        assert!(service.check_create(&john()).await.is_ok());

        service.create(&john()).await.unwrap();
        let result = service.check_create(&john()).await;
        assert!(matches!(result, Err(DirectoryError::DuplicateEmail { .. })));

        let mut payload = john();
        payload.salary = Some("-5".to_string());
        let result = service.check_create(&payload).await;
        assert!(matches!(result, Err(DirectoryError::InvalidFormat { .. })));

        assert_eq!(service.list(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_check_update_matches_update_rules() {
        let service = create_test_service().await;
        let first = service.create(&john()).await.unwrap();
        service
            .create(&EmployeePayload::new("Jane", "jane@example.com", "CTO", "1"))
            .await
            .unwrap();

        let result = service.check_update(99, &john()).await;
        assert!(matches!(result, Err(DirectoryError::NotFound { id: 99 })));

        let payload = EmployeePayload {
            email: Some("jane@example.com".to_string()),
            ..Default::default()
        };
        let result = service.check_update(first.id, &payload).await;
        assert!(matches!(result, Err(DirectoryError::DuplicateEmail { .. })));

        assert!(service.check_update(first.id, &john()).await.is_ok());
    }

    #[tokio::test]
    async fn test_create_search_update_delete_flow() {
        let service = create_test_service().await;

        let created = service.create(&john()).await.unwrap();

        let listed = service.list(Some("")).await.unwrap();
        assert!(
            listed
                .iter()
                .any(|e| e.id == created.id && e.salary == 70000.0)
        );

        let payload = EmployeePayload {
            email: Some("jane.doe@example.com".to_string()),
            ..Default::default()
        };
        service.update(created.id, &payload).await.unwrap();
        let fetched = service.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "jane.doe@example.com");

        service.delete(created.id).await.unwrap();
        assert_eq!(service.get_by_id(created.id).await.unwrap(), None);
    }
}
