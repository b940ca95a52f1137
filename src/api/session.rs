use crate::{
    error::{ApiError, db_error},
    model::session::{AttendanceSession, DATE_FORMAT, NewSession, TIME_FORMAT},
};
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSession {
    #[schema(example = "2026-10-19", format = "date")]
    pub session_date: String,
    #[schema(example = "08:25")]
    pub start_time: String,
    #[schema(example = "09:05")]
    pub end_time: String,
    #[serde(default)]
    pub is_active: bool,
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| ApiError::Malformed(format!("Invalid session_date {raw:?}: {e}")))
}

fn parse_time(field: &str, raw: &str) -> Result<NaiveTime, ApiError> {
    NaiveTime::parse_from_str(raw, TIME_FORMAT)
        .map_err(|e| ApiError::Malformed(format!("Invalid {field} {raw:?}: {e}")))
}

impl CreateSession {
    fn parse(&self) -> Result<NewSession, ApiError> {
        Ok(NewSession {
            session_date: parse_date(&self.session_date)?,
            start_time: parse_time("start_time", &self.start_time)?,
            end_time: parse_time("end_time", &self.end_time)?,
            is_active: self.is_active,
        })
    }
}

/// List sessions
#[utoipa::path(
    get,
    path = "/api/sessions",
    responses(
        (status = 200, description = "Sessions, newest date first", body = [AttendanceSession]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn list_sessions(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let sessions = AttendanceSession::list(pool.get_ref())
        .await
        .map_err(db_error("Failed to list sessions"))?;

    Ok(HttpResponse::Ok().json(sessions))
}

/// Create Session
///
/// Dates are `YYYY-MM-DD`, times `HH:MM`. Unparseable values fail with 500.
#[utoipa::path(
    post,
    path = "/api/sessions",
    request_body = CreateSession,
    responses(
        (status = 201, description = "Session created", body = AttendanceSession),
        (status = 500, description = "Malformed date/time or internal error")
    ),
    tag = "Session"
)]
pub async fn create_session(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateSession>,
) -> Result<HttpResponse, ApiError> {
    let new = payload.parse().inspect_err(|e| {
        tracing::error!(error = %e, "Rejected session payload");
    })?;

    let session = AttendanceSession::insert(pool.get_ref(), &new)
        .await
        .map_err(db_error("Failed to create session"))?;

    info!(
        session_id = session.id,
        date = %session.session_date,
        is_active = session.is_active,
        "Session created"
    );

    Ok(HttpResponse::Created().json(session))
}

/// Activate Session
///
/// Deactivates every session, then activates this one.
#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/activate",
    params(
        ("session_id" = i64, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session activated", body = AttendanceSession),
        (status = 404, description = "Session not found", body = Object, example = json!({
            "error": "Session not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn activate_session(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();

    let session = AttendanceSession::activate(pool.get_ref(), session_id)
        .await
        .map_err(db_error("Failed to activate session"))?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    info!(session_id, "Session activated");

    Ok(HttpResponse::Ok().json(session))
}

/// Deactivate Session
#[utoipa::path(
    post,
    path = "/api/sessions/{session_id}/deactivate",
    params(
        ("session_id" = i64, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Session deactivated", body = AttendanceSession),
        (status = 404, description = "Session not found", body = Object, example = json!({
            "error": "Session not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn deactivate_session(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let session_id = path.into_inner();

    let session = AttendanceSession::deactivate(pool.get_ref(), session_id)
        .await
        .map_err(db_error("Failed to deactivate session"))?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    info!(session_id, "Session deactivated");

    Ok(HttpResponse::Ok().json(session))
}

/// Get the active session
#[utoipa::path(
    get,
    path = "/api/sessions/active",
    responses(
        (status = 200, description = "The active session", body = AttendanceSession),
        (status = 404, description = "No session is active", body = Object, example = json!({
            "error": "No active session"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Session"
)]
pub async fn get_active_session(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let session = AttendanceSession::find_active(pool.get_ref())
        .await
        .map_err(db_error("Failed to fetch active session"))?
        .ok_or_else(|| ApiError::not_found("No active session"))?;

    Ok(HttpResponse::Ok().json(session))
}
