//! HTTP request handlers for the employee directory.
//!
//! HTML form handlers report outcomes through a [`Notice`] cookie and a
//! redirect to `/`. The `/api` handlers answer in JSON.

use std::any::Any;

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::error::DirectoryResult;
use crate::models::Employee;
use crate::schema::{EmployeePayload, EmployeeRecord};

use super::notice::{Action, Notice};
use super::pages::{self, AddEmployeePage, EditEmployeePage, IndexPage, NotFoundPage, ServerErrorPage};
use super::request::{
    EmployeeForm, EmployeeFormRejection, HireDateRequest, HiredAfterQuery, SearchQuery,
    UploadedPicture,
};
use super::response::{ApiErrorResponse, HiredAfterResponse, SearchResponse};
use super::state::AppState;

/// Header set by the search script on AJAX requests.
const REQUESTED_WITH: &str = "x-requested-with";

/// Creates the router with every page, API endpoint and static mount.
pub fn create_router(state: AppState) -> Router {
    let static_dir = state.config().server.static_dir.clone();
    let upload_dir = state.pictures().directory().to_path_buf();
    let body_limit = state.config().uploads.max_file_size;

    Router::new()
        .route("/", get(index_handler))
        .route("/search", get(search_handler))
        .route("/add", get(add_form_handler).post(add_handler))
        .route("/edit/:id", get(edit_form_handler).post(edit_handler))
        .route("/delete/:id", post(delete_handler))
        .route("/api/stats/average-salary", get(average_salary_handler))
        .route("/api/employees/hired-after", get(hired_after_handler))
        .route("/api/employees/:id/date-hired", put(update_hiring_date_handler))
        .nest_service("/static", ServeDir::new(static_dir))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .fallback(not_found_handler)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Redirects to `/`, leaving `notice` for the next page view.
fn redirect_with(state: &AppState, notice: Notice) -> Response {
    (
        [(header::SET_COOKIE, notice.set_cookie(state.secure_cookies()))],
        Redirect::to("/"),
    )
        .into_response()
}

/// Names the form's picture in its payload, without storing it yet.
///
/// A file with a disallowed name or extension is dropped and the payload
/// goes ahead without a new picture.
fn accept_picture(state: &AppState, form: EmployeeForm) -> (EmployeePayload, Option<UploadedPicture>) {
    let EmployeeForm { mut payload, picture } = form;

    let picture = picture.and_then(|picture| match state.pictures().accept(&picture.filename) {
        Some(stored) => {
            payload.profile_picture = Some(stored);
            Some(picture)
        }
        None => {
            warn!(filename = %picture.filename, "Ignoring upload with disallowed extension");
            None
        }
    });

    (payload, picture)
}

async fn store_picture(state: &AppState, picture: Option<UploadedPicture>) -> DirectoryResult<()> {
    if let Some(picture) = picture {
        state.pictures().save(&picture.filename, &picture.contents).await?;
    }
    Ok(())
}

/// Creates an employee from a form. The picture is only written once the
/// payload has passed every check.
async fn create_employee(state: &AppState, form: EmployeeForm) -> DirectoryResult<Employee> {
    let (payload, picture) = accept_picture(state, form);
    state.service().check_create(&payload).await?;
    store_picture(state, picture).await?;
    state.service().create(&payload).await
}

/// Edits an employee from a form. Nothing is written to the upload
/// directory for an unknown id or a rejected payload.
async fn edit_employee(state: &AppState, id: i64, form: EmployeeForm) -> DirectoryResult<Employee> {
    let (payload, picture) = accept_picture(state, form);
    state.service().check_update(id, &payload).await?;
    store_picture(state, picture).await?;
    state.service().update(id, &payload).await
}

/// Handler for GET /.
///
/// Renders the directory page and consumes any pending notice.
async fn index_handler(headers: HeaderMap) -> Response {
    let notice = Notice::from_headers(&headers);
    let page = pages::render(IndexPage::new(notice.as_ref()));

    match notice {
        Some(_) => ([(header::SET_COOKIE, Notice::clear_cookie())], page).into_response(),
        None => page,
    }
}

/// Handler for GET /search.
///
/// Only answers AJAX requests; anything else is sent back to `/`.
async fn search_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let is_ajax = headers
        .get(REQUESTED_WITH)
        .is_some_and(|value| value == "XMLHttpRequest");
    if !is_ajax {
        return Redirect::to("/").into_response();
    }

    match state.service().list(Some(&query.q)).await {
        Ok(employees) => Json(SearchResponse::new(&employees)).into_response(),
        Err(err) => {
            error!(error = %err, query = %query.q, "Search failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /add.
async fn add_form_handler() -> Response {
    pages::render(AddEmployeePage)
}

/// Handler for POST /add.
async fn add_handler(
    State(state): State<AppState>,
    form: Result<EmployeeForm, EmployeeFormRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing add employee request");

    let form = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Rejected add employee body"
            );
            return redirect_with(&state, Notice::Unexpected(Action::Create));
        }
    };

    let notice = match create_employee(&state, form).await {
        Ok(employee) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = employee.id,
                "Employee added"
            );
            Notice::Created
        }
        Err(err) if err.is_user_error() => {
            warn!(correlation_id = %correlation_id, error = %err, "Add employee rejected");
            Notice::from_error(&err, Action::Create)
        }
        Err(err) => {
            error!(correlation_id = %correlation_id, error = %err, "Add employee failed");
            Notice::Unexpected(Action::Create)
        }
    };

    redirect_with(&state, notice)
}

/// Handler for GET /edit/:id.
async fn edit_form_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.service().get_by_id(id).await {
        Ok(Some(employee)) => pages::render(EditEmployeePage::from(&employee)),
        Ok(None) => redirect_with(&state, Notice::NotFound),
        Err(err) => {
            error!(employee_id = id, error = %err, "Loading employee for edit failed");
            redirect_with(&state, Notice::Unexpected(Action::Update))
        }
    }
}

/// Handler for POST /edit/:id.
///
/// Only the supplied fields change; the current picture is kept unless an
/// accepted file is uploaded.
async fn edit_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    form: Result<EmployeeForm, EmployeeFormRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = id, "Processing edit employee request");

    let form = match form {
        Ok(form) => form,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Rejected edit employee body"
            );
            return redirect_with(&state, Notice::Unexpected(Action::Update));
        }
    };

    let notice = match edit_employee(&state, id, form).await {
        Ok(_) => {
            info!(correlation_id = %correlation_id, employee_id = id, "Employee edited");
            Notice::Updated
        }
        Err(err) if err.is_user_error() => {
            warn!(correlation_id = %correlation_id, error = %err, "Edit employee rejected");
            Notice::from_error(&err, Action::Update)
        }
        Err(err) => {
            error!(correlation_id = %correlation_id, error = %err, "Edit employee failed");
            Notice::Unexpected(Action::Update)
        }
    };

    redirect_with(&state, notice)
}

/// Handler for POST /delete/:id.
async fn delete_handler(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let correlation_id = Uuid::new_v4();

    let notice = match state.service().delete(id).await {
        Ok(confirmation) => {
            info!(correlation_id = %correlation_id, "{}", confirmation.message);
            Notice::Deleted
        }
        Err(err) if err.is_user_error() => {
            warn!(correlation_id = %correlation_id, error = %err, "Delete employee rejected");
            Notice::from_error(&err, Action::Delete)
        }
        Err(err) => {
            error!(correlation_id = %correlation_id, error = %err, "Delete employee failed");
            Notice::Unexpected(Action::Delete)
        }
    };

    redirect_with(&state, notice)
}

/// Handler for GET /api/stats/average-salary.
async fn average_salary_handler(State(state): State<AppState>) -> Response {
    match state.service().salary_stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(err) => {
            error!(error = %err, "Average salary lookup failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for GET /api/employees/hired-after.
async fn hired_after_handler(
    State(state): State<AppState>,
    Query(query): Query<HiredAfterQuery>,
) -> Response {
    match state.service().hired_after(&query.date).await {
        Ok(employees) => Json(HiredAfterResponse {
            date: query.date,
            employees: employees.iter().map(EmployeeRecord::from).collect(),
        })
        .into_response(),
        Err(err) => {
            warn!(date = %query.date, error = %err, "Hired-after lookup failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Handler for PUT /api/employees/:id/date-hired.
async fn update_hiring_date_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<HireDateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = id, "Processing hiring date update");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            warn!(
                correlation_id = %correlation_id,
                error = %rejection.body_text(),
                "Rejected hiring date body"
            );
            return ApiErrorResponse::malformed_json(rejection.body_text()).into_response();
        }
    };

    match state.service().update_hiring_date(id, &request.date).await {
        Ok(employee) => Json(EmployeeRecord::from(employee)).into_response(),
        Err(err) => {
            warn!(correlation_id = %correlation_id, error = %err, "Hiring date update failed");
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Fallback for unknown routes.
async fn not_found_handler() -> Response {
    (StatusCode::NOT_FOUND, pages::render(NotFoundPage)).into_response()
}

/// Turns a panicking handler into the 500 page.
fn handle_panic(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("Request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, pages::render(ServerErrorPage)).into_response()
}
