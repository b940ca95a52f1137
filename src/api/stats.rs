use crate::{
    error::{ApiError, db_error},
    model::{attendance::AttendanceRecord, session::AttendanceSession, student::Student},
};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct SessionStats {
    pub session: AttendanceSession,
    #[schema(example = 24)]
    pub total_students: i64,
    #[schema(example = 18)]
    pub present_students: i64,
    /// Percentage of all registered students present in this session.
    #[schema(example = 75.0)]
    pub attendance_rate: f64,
}

#[derive(Serialize, ToSchema)]
pub struct OverallStats {
    #[schema(example = 24)]
    pub total_students: i64,
    #[schema(example = 2)]
    pub total_sessions: i64,
    #[schema(example = 40)]
    pub total_attendances: i64,
    /// `attendances / (students * sessions) * 100`.
    #[schema(example = 83.33)]
    pub average_attendance_rate: f64,
}

/// `part / whole * 100`, or 0 when `whole` is 0.
fn percentage(part: i64, whole: i64) -> f64 {
    if whole > 0 {
        part as f64 / whole as f64 * 100.0
    } else {
        0.0
    }
}

/// Session statistics
#[utoipa::path(
    get,
    path = "/api/stats/session/{session_id}",
    params(
        ("session_id" = i64, Path, description = "Session ID")
    ),
    responses(
        (status = 200, description = "Presence for the session", body = SessionStats),
        (status = 404, description = "Session not found", body = Object, example = json!({
            "error": "Session not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Stats"
)]
pub async fn session_stats(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let pool = pool.get_ref();
    let session_id = path.into_inner();

    let session = AttendanceSession::find(pool, session_id)
        .await
        .map_err(db_error("Failed to fetch session"))?
        .ok_or_else(|| ApiError::not_found("Session not found"))?;

    let total_students = Student::count(pool)
        .await
        .map_err(db_error("Failed to count students"))?;
    let present_students = AttendanceRecord::count_for_session(pool, session_id)
        .await
        .map_err(db_error("Failed to count session attendance"))?;

    Ok(HttpResponse::Ok().json(SessionStats {
        session,
        total_students,
        present_students,
        attendance_rate: percentage(present_students, total_students),
    }))
}

/// Overall statistics
#[utoipa::path(
    get,
    path = "/api/stats/overall",
    responses(
        (status = 200, description = "Totals across all sessions", body = OverallStats),
        (status = 500, description = "Internal server error")
    ),
    tag = "Stats"
)]
pub async fn overall_stats(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let pool = pool.get_ref();

    let total_students = Student::count(pool)
        .await
        .map_err(db_error("Failed to count students"))?;
    let total_sessions = AttendanceSession::count(pool)
        .await
        .map_err(db_error("Failed to count sessions"))?;
    let total_attendances = AttendanceRecord::count(pool)
        .await
        .map_err(db_error("Failed to count attendance"))?;

    Ok(HttpResponse::Ok().json(OverallStats {
        total_students,
        total_sessions,
        total_attendances,
        average_attendance_rate: percentage(total_attendances, total_students * total_sessions),
    }))
}

#[cfg(test)]
mod tests {
    use super::percentage;

    #[test]
    fn zero_denominator_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(5, 0), 0.0);
    }

    #[test]
    fn computes_percent() {
        assert_eq!(percentage(3, 4), 75.0);
        assert_eq!(percentage(4, 4), 100.0);
    }
}
