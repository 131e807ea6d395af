//! Employee table operations.
//!
//! Every function takes a `&mut SqliteConnection` so it can run either on a
//! pooled connection or inside a transaction. No validation happens here.

use chrono::NaiveDateTime;
use sqlx::SqliteConnection;

use crate::models::{Employee, NewEmployee};

/// Insert a new employee and return the stored row.
pub async fn insert(
    conn: &mut SqliteConnection,
    employee: &NewEmployee,
    date_hired: NaiveDateTime,
) -> Result<Employee, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        INSERT INTO employees (name, email, position, salary, date_hired, profile_picture)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id, name, email, position, salary, date_hired, profile_picture
        "#,
    )
    .bind(&employee.name)
    .bind(&employee.email)
    .bind(&employee.position)
    .bind(employee.salary)
    .bind(date_hired)
    .bind(&employee.profile_picture)
    .fetch_one(conn)
    .await
}

/// Fetch a single employee by primary key.
pub async fn find_by_id(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, email, position, salary, date_hired, profile_picture
        FROM employees
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await
}

/// Returns true if `email` belongs to an employee other than `exclude_id`.
pub async fn email_taken(
    conn: &mut SqliteConnection,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS (
            SELECT 1 FROM employees
            WHERE email = ? AND (? IS NULL OR id != ?)
        )
        "#,
    )
    .bind(email)
    .bind(exclude_id)
    .bind(exclude_id)
    .fetch_one(conn)
    .await
}

/// Return all employees in insertion order.
pub async fn list_all(conn: &mut SqliteConnection) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, email, position, salary, date_hired, profile_picture
        FROM employees
        ORDER BY id
        "#,
    )
    .fetch_all(conn)
    .await
}

/// Return employees whose name, email or position contains `term`,
/// ignoring ASCII case. `%` and `_` in `term` match literally.
pub async fn search(
    conn: &mut SqliteConnection,
    term: &str,
) -> Result<Vec<Employee>, sqlx::Error> {
    let pattern = format!("%{}%", escape_like(term));

    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, email, position, salary, date_hired, profile_picture
        FROM employees
        WHERE name LIKE ? ESCAPE '\'
           OR email LIKE ? ESCAPE '\'
           OR position LIKE ? ESCAPE '\'
        ORDER BY id
        "#,
    )
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(conn)
    .await
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Overwrite every mutable column of `employee`. Returns rows affected.
pub async fn update(conn: &mut SqliteConnection, employee: &Employee) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE employees
        SET name = ?, email = ?, position = ?, salary = ?, date_hired = ?, profile_picture = ?
        WHERE id = ?
        "#,
    )
    .bind(&employee.name)
    .bind(&employee.email)
    .bind(&employee.position)
    .bind(employee.salary)
    .bind(employee.date_hired)
    .bind(&employee.profile_picture)
    .bind(employee.id)
    .execute(conn)
    .await?;

    Ok(result.rows_affected())
}

/// Permanently delete an employee. Returns rows affected.
pub async fn delete(conn: &mut SqliteConnection, id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(conn)
        .await?;

    Ok(result.rows_affected())
}

/// Sum of all salaries and the number of employees.
pub async fn salary_totals(conn: &mut SqliteConnection) -> Result<(f64, i64), sqlx::Error> {
    sqlx::query_as::<_, (f64, i64)>(
        "SELECT CAST(COALESCE(SUM(salary), 0) AS REAL), COUNT(id) FROM employees",
    )
    .fetch_one(conn)
    .await
}

/// Return employees hired strictly after `instant`, in insertion order.
pub async fn hired_after(
    conn: &mut SqliteConnection,
    instant: NaiveDateTime,
) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, name, email, position, salary, date_hired, profile_picture
        FROM employees
        WHERE date_hired > ?
        ORDER BY id
        "#,
    )
    .bind(instant)
    .fetch_all(conn)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn new_employee(name: &str, email: &str, position: &str, salary: f64) -> NewEmployee {
        NewEmployee {
            name: name.to_string(),
            email: email.to_string(),
            position: position.to_string(),
            salary,
            profile_picture: None,
        }
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }

    #[tokio::test]
    async fn test_insert_and_find_by_id() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        let created = insert(
            &mut conn,
            &new_employee("John Doe", "john@example.com", "Engineer", 70000.0),
            at(2023, 5, 1),
        )
        .await
        .unwrap();
        assert!(created.id > 0);
        assert_eq!(created.date_hired, at(2023, 5, 1));

        let found = find_by_id(&mut conn, created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert_eq!(find_by_id(&mut conn, 999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_unique_email_constraint_is_enforced() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        let employee = new_employee("A", "a@b.com", "X", 1.0);
        insert(&mut conn, &employee, at(2023, 1, 1)).await.unwrap();

        let err = insert(&mut conn, &employee, at(2023, 1, 1))
            .await
            .unwrap_err();
        match err {
            sqlx::Error::Database(db) => assert!(db.is_unique_violation()),
            other => panic!("Expected database error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_email_taken_excludes_self() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        let created = insert(
            &mut conn,
            &new_employee("A", "a@b.com", "X", 1.0),
            at(2023, 1, 1),
        )
        .await
        .unwrap();

        assert!(email_taken(&mut conn, "a@b.com", None).await.unwrap());
        assert!(!email_taken(&mut conn, "a@b.com", Some(created.id)).await.unwrap());
        assert!(!email_taken(&mut conn, "c@d.com", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_search_matches_any_text_column_case_insensitively() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        for (name, email, position) in [
            ("Alice Smith", "alice@corp.com", "Engineer"),
            ("Bob Jones", "bob@corp.com", "Designer"),
            ("Carol 100%", "carol@other.org", "Engineering Manager"),
        ] {
            insert(&mut conn, &new_employee(name, email, position, 1.0), at(2023, 1, 1))
                .await
                .unwrap();
        }

        let names = |employees: Vec<Employee>| -> Vec<String> {
            employees.into_iter().map(|e| e.name).collect()
        };

        assert_eq!(
            names(search(&mut conn, "ENGINEER").await.unwrap()),
            vec!["Alice Smith", "Carol 100%"]
        );
        assert_eq!(names(search(&mut conn, "corp").await.unwrap()), vec!["Alice Smith", "Bob Jones"]);
        assert_eq!(names(search(&mut conn, "jones").await.unwrap()), vec!["Bob Jones"]);
        assert_eq!(names(search(&mut conn, "0%").await.unwrap()), vec!["Carol 100%"]);
        assert!(search(&mut conn, "_").await.unwrap().is_empty());
        assert_eq!(list_all(&mut conn).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_update_and_delete_report_rows_affected() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        let mut employee = insert(
            &mut conn,
            &new_employee("A", "a@b.com", "X", 1.0),
            at(2023, 1, 1),
        )
        .await
        .unwrap();

        employee.position = "Y".to_string();
        assert_eq!(update(&mut conn, &employee).await.unwrap(), 1);
        assert_eq!(
            find_by_id(&mut conn, employee.id).await.unwrap().unwrap().position,
            "Y"
        );

        assert_eq!(delete(&mut conn, employee.id).await.unwrap(), 1);
        assert_eq!(delete(&mut conn, employee.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_salary_totals_and_hired_after() {
        let store = Store::in_memory().await.unwrap();
        let mut conn = store.pool().acquire().await.unwrap();

        assert_eq!(salary_totals(&mut conn).await.unwrap(), (0.0, 0));

        insert(&mut conn, &new_employee("A", "a@b.com", "X", 70000.0), at(2022, 12, 31))
            .await
            .unwrap();
        insert(&mut conn, &new_employee("B", "b@b.com", "X", 80000.0), at(2023, 1, 2))
            .await
            .unwrap();

        assert_eq!(salary_totals(&mut conn).await.unwrap(), (150000.0, 2));

        let hired = hired_after(&mut conn, at(2023, 1, 1)).await.unwrap();
        assert_eq!(hired.len(), 1);
        assert_eq!(hired[0].name, "B");
    }
}
