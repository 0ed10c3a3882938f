//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic. Authenticated endpoints resolve the
//! bearer token to a teacher first; everything below the handler works
//! with that explicit teacher id.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use super::dto::{
    CalendarQuery, DaySheetQuery, ExportQuery, GroupListResponse, HealthResponse, LoginRequest,
    LoginResponse, RecordAttendanceRequest, RecordAttendanceResponse, RegisterResponse,
    StudentListResponse, TeacherDto,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{GroupId, SessionToken, StudentId};
use crate::db::repository::{GroupRepository, StudentRepository, TeacherRepository};
use crate::models::{Group, GroupUpdate, NewGroup, NewStudent, Student, Teacher};
use crate::services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn bearer_token(headers: &HeaderMap) -> Result<SessionToken, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing authorization header".to_string()))?;
    let token = value
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::Unauthorized("expected bearer token".to_string()))?;
    let token = Uuid::parse_str(token.trim())
        .map_err(|_| AppError::Unauthorized("malformed bearer token".to_string()))?;
    Ok(SessionToken::new(token))
}

async fn require_teacher(state: &AppState, headers: &HeaderMap) -> Result<Teacher, AppError> {
    let token = bearer_token(headers)?;
    services::current_teacher(state.repository.as_ref(), token)
        .await
        .map_err(AppError::from)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the storage
/// backend is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Authentication
// =============================================================================

/// POST /v1/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<services::RegisterInput>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let teacher = services::register(state.repository.as_ref(), request).await?;
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            teacher: teacher.into(),
            message: "account created, you can now sign in".to_string(),
        }),
    ))
}

/// POST /v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> HandlerResult<LoginResponse> {
    let session =
        services::login(state.repository.as_ref(), &request.email, &request.password).await?;
    let teacher = services::current_teacher(state.repository.as_ref(), session.token).await?;
    Ok(Json(LoginResponse {
        token: session.token,
        teacher: teacher.into(),
    }))
}

/// POST /v1/auth/logout
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, AppError> {
    let token = bearer_token(&headers)?;
    services::logout(state.repository.as_ref(), token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/me
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> HandlerResult<TeacherDto> {
    let teacher = require_teacher(&state, &headers).await?;
    Ok(Json(teacher.into()))
}

// =============================================================================
// Groups
// =============================================================================

/// GET /v1/groups
pub async fn list_groups(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<GroupListResponse> {
    let teacher = require_teacher(&state, &headers).await?;
    let groups = state.repository.list_groups(teacher.id).await?;
    let total = groups.len();
    Ok(Json(GroupListResponse { groups, total }))
}

/// POST /v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<NewGroup>,
) -> Result<(StatusCode, Json<Group>), AppError> {
    let teacher = require_teacher(&state, &headers).await?;
    if request.name.trim().is_empty() || request.place.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and place are required".to_string(),
        ));
    }

    let group = Group::new(teacher.id, request);
    state.repository.create_group(&group).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// GET /v1/groups/{group_id}
pub async fn get_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
) -> HandlerResult<Group> {
    let teacher = require_teacher(&state, &headers).await?;
    let group = state.repository.get_group(teacher.id, group_id).await?;
    Ok(Json(group))
}

/// PUT /v1/groups/{group_id}
pub async fn update_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
    Json(request): Json<GroupUpdate>,
) -> HandlerResult<Group> {
    let teacher = require_teacher(&state, &headers).await?;
    if request.name.trim().is_empty() || request.place.trim().is_empty() {
        return Err(AppError::BadRequest(
            "name and place are required".to_string(),
        ));
    }

    let group = state
        .repository
        .update_group(teacher.id, group_id, request)
        .await?;
    Ok(Json(group))
}

/// DELETE /v1/groups/{group_id}
pub async fn delete_group(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
) -> Result<StatusCode, AppError> {
    let teacher = require_teacher(&state, &headers).await?;
    state.repository.delete_group(teacher.id, group_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Students
// =============================================================================

/// GET /v1/groups/{group_id}/students
pub async fn list_students(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
) -> HandlerResult<StudentListResponse> {
    let teacher = require_teacher(&state, &headers).await?;
    let students = state.repository.list_students(teacher.id, group_id).await?;
    let total = students.len();
    Ok(Json(StudentListResponse { students, total }))
}

/// POST /v1/groups/{group_id}/students
pub async fn add_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
    Json(request): Json<NewStudent>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let teacher = require_teacher(&state, &headers).await?;
    if request.full_name.trim().is_empty()
        || request.email.trim().is_empty()
        || request.national_id.trim().is_empty()
    {
        return Err(AppError::BadRequest(
            "full name, email and national id are required".to_string(),
        ));
    }

    let student = state
        .repository
        .add_student(teacher.id, group_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// DELETE /v1/groups/{group_id}/students/{student_id}
pub async fn delete_student(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((group_id, student_id)): Path<(GroupId, StudentId)>,
) -> Result<StatusCode, AppError> {
    let teacher = require_teacher(&state, &headers).await?;
    state
        .repository
        .delete_student(teacher.id, group_id, student_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Attendance
// =============================================================================

/// GET /v1/groups/{group_id}/attendance?date=YYYY-MM-DD
///
/// The editable day sheet: the roster merged with any saved entries.
pub async fn get_day_sheet(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
    Query(query): Query<DaySheetQuery>,
) -> HandlerResult<crate::api::DaySheet> {
    let teacher = require_teacher(&state, &headers).await?;
    let sheet =
        services::day_sheet(state.repository.as_ref(), teacher.id, group_id, query.date).await?;
    Ok(Json(sheet))
}

/// PUT /v1/groups/{group_id}/attendance
///
/// Record one day: replaces whatever was saved for the date.
pub async fn record_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
    Json(request): Json<RecordAttendanceRequest>,
) -> HandlerResult<RecordAttendanceResponse> {
    let teacher = require_teacher(&state, &headers).await?;
    let marks = request.marks_by_student();
    let saved = services::record_day(
        state.repository.as_ref(),
        teacher.id,
        group_id,
        request.date,
        &marks,
    )
    .await?;
    Ok(Json(RecordAttendanceResponse {
        saved,
        message: "attendance saved".to_string(),
    }))
}

/// GET /v1/groups/{group_id}/attendance/{date}
///
/// The saved entries of one recorded day.
pub async fn get_day_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((group_id, date)): Path<(GroupId, NaiveDate)>,
) -> HandlerResult<Vec<crate::api::AttendanceDetailRow>> {
    let teacher = require_teacher(&state, &headers).await?;
    let rows =
        services::day_detail(state.repository.as_ref(), teacher.id, group_id, date).await?;
    Ok(Json(rows))
}

/// GET /v1/groups/{group_id}/history
pub async fn get_history(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
) -> HandlerResult<Vec<crate::api::DaySummary>> {
    let teacher = require_teacher(&state, &headers).await?;
    let summaries = services::history(state.repository.as_ref(), teacher.id, group_id).await?;
    Ok(Json(summaries))
}

// =============================================================================
// Calendar & Birthdays
// =============================================================================

/// GET /v1/calendar?year=&month=&group_id=
pub async fn get_calendar(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CalendarQuery>,
) -> HandlerResult<Vec<crate::api::GroupDaySummary>> {
    let teacher = require_teacher(&state, &headers).await?;
    let cells = services::attendance::calendar(
        state.repository.as_ref(),
        teacher.id,
        query.year,
        query.month,
        query.group_id,
    )
    .await?;
    Ok(Json(cells))
}

/// GET /v1/birthdays
pub async fn get_birthdays(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> HandlerResult<crate::api::BirthdayBoard> {
    let teacher = require_teacher(&state, &headers).await?;
    let today = Utc::now().date_naive();
    let board =
        services::upcoming_for_teacher(state.repository.as_ref(), teacher.id, today).await?;
    Ok(Json(board))
}

// =============================================================================
// Export
// =============================================================================

/// GET /v1/groups/{group_id}/export?from=&to=
///
/// The attendance sheet as CSV, with a download filename.
pub async fn export_attendance(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(group_id): Path<GroupId>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let teacher = require_teacher(&state, &headers).await?;
    if query.from > query.to {
        return Err(AppError::BadRequest(
            "'from' must not be after 'to'".to_string(),
        ));
    }

    let (filename, csv) = services::export_group_csv(
        state.repository.as_ref(),
        teacher.id,
        group_id,
        query.from,
        query.to,
    )
    .await?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}
