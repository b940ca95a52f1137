use crate::{
    error::{ApiError, db_error},
    model::{
        attendance::{AttendanceRecord, NewAttendance},
        session::{AttendanceSession, NewSession},
        student::Student,
    },
};
use actix_web::{HttpRequest, HttpResponse, http::header, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkAttendance {
    /// Full name; an unknown name registers a new student.
    #[schema(example = "Ada Yilmaz")]
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct MarkAttendanceResponse {
    #[schema(example = "Attendance recorded successfully")]
    pub message: String,
    pub attendance: AttendanceRecord,
}

/// Caller address as reported by `X-Forwarded-For`, falling back to the
/// socket peer. The header is taken verbatim.
fn client_ip(req: &HttpRequest) -> String {
    req.headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .map(str::to_owned)
        .or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn user_agent(req: &HttpRequest) -> &str {
    req.headers()
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
}

/// Mark attendance
///
/// Records attendance for the named student in the active session. When no
/// session is active, today's 08:25-09:05 session is created and activated.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = MarkAttendance,
    responses(
        (status = 201, description = "Attendance recorded", body = MarkAttendanceResponse),
        (status = 400, description = "Already recorded for this session, or blank name", body = Object, example = json!({
            "error": "Attendance already recorded for this session"
        })),
        (status = 429, description = "Too many requests from this address"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    req: HttpRequest,
    pool: web::Data<SqlitePool>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let pool = pool.get_ref();

    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    let session = match AttendanceSession::find_active(pool)
        .await
        .map_err(db_error("Failed to fetch active session"))?
    {
        Some(session) => session,
        None => {
            let today = Local::now().date_naive();
            let session = AttendanceSession::insert(pool, &NewSession::default_for(today))
                .await
                .map_err(db_error("Failed to create default session"))?;
            info!(session_id = session.id, date = %today, "No active session, opened default session");
            session
        }
    };

    let student = match Student::find_by_name(pool, &payload.name)
        .await
        .map_err(db_error("Failed to look up student by name"))?
    {
        Some(student) => student,
        None => {
            let student = Student::insert(pool, "", &payload.name, "")
                .await
                .map_err(db_error("Failed to register student"))?;
            info!(student_id = student.id, name = %student.name, "Registered student on first check-in");
            student
        }
    };

    let already = AttendanceRecord::exists(pool, student.id, session.id)
        .await
        .map_err(db_error("Failed to check existing attendance"))?;

    if already {
        warn!(student_id = student.id, session_id = session.id, "Duplicate attendance rejected");
        return Err(ApiError::bad_request(
            "Attendance already recorded for this session",
        ));
    }

    let ip_address = client_ip(&req);
    let attendance_id = AttendanceRecord::insert(
        pool,
        &NewAttendance {
            student_id: student.id,
            session_id: session.id,
            ip_address: &ip_address,
            user_agent: user_agent(&req),
        },
    )
    .await
    .map_err(db_error("Failed to record attendance"))?;

    let attendance = AttendanceRecord::find(pool, attendance_id)
        .await
        .map_err(db_error("Failed to reload attendance"))?
        .ok_or(ApiError::Internal)?;

    info!(
        attendance_id,
        student_id = student.id,
        session_id = session.id,
        ip = %ip_address,
        "Attendance recorded"
    );

    Ok(HttpResponse::Created().json(MarkAttendanceResponse {
        message: "Attendance recorded successfully".to_string(),
        attendance,
    }))
}

/// Attendance for a session
#[utoipa::path(
    get,
    path = "/api/attendance/session/{session_id}",
    params(
        ("session_id" = i64, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Attendance records of the session", body = [AttendanceRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn session_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let records = AttendanceRecord::for_session(pool.get_ref(), path.into_inner())
        .await
        .map_err(db_error("Failed to fetch session attendance"))?;

    Ok(HttpResponse::Ok().json(records))
}

/// Attendance for a student
#[utoipa::path(
    get,
    path = "/api/attendance/student/{student_id}",
    params(
        ("student_id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Attendance records of the student", body = [AttendanceRecord]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn student_attendance(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let records = AttendanceRecord::for_student(pool.get_ref(), path.into_inner())
        .await
        .map_err(db_error("Failed to fetch student attendance"))?;

    Ok(HttpResponse::Ok().json(records))
}
