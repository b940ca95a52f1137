use crate::{
    error::{ApiError, db_error},
    model::{attendance::AttendanceRecord, session::AttendanceSession},
};
use actix_web::{HttpResponse, web};
use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

const ADMIN_USERNAME: &str = "admin";
const ADMIN_PASSWORD: &str = "admin123";
/// Handed out on every successful login. Never expires and is not checked
/// by any route.
pub const ADMIN_TOKEN: &str = "admin_token";

#[derive(Deserialize, ToSchema)]
pub struct AdminLogin {
    #[schema(example = "admin")]
    pub username: Option<String>,
    #[schema(example = "admin123")]
    pub password: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AdminLoginResponse {
    #[schema(example = "Login successful")]
    pub message: String,
    #[schema(example = "admin_token")]
    pub token: String,
}

fn credentials_match(username: Option<&str>, password: Option<&str>) -> bool {
    username == Some(ADMIN_USERNAME) && password == Some(ADMIN_PASSWORD)
}

/// Admin login
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLogin,
    responses(
        (status = 200, description = "Credentials accepted", body = AdminLoginResponse),
        (status = 401, description = "Wrong username or password", body = Object, example = json!({
            "error": "Invalid username or password"
        })),
        (status = 429, description = "Too many login attempts from this address")
    ),
    tag = "Admin"
)]
#[instrument(
    name = "admin_login",
    skip(payload),
    fields(username = payload.username.as_deref().unwrap_or(""))
)]
pub async fn admin_login(payload: web::Json<AdminLogin>) -> Result<HttpResponse, ApiError> {
    if !credentials_match(payload.username.as_deref(), payload.password.as_deref()) {
        warn!("Invalid credentials");
        return Err(ApiError::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    info!("Login successful");

    Ok(HttpResponse::Ok().json(AdminLoginResponse {
        message: "Login successful".to_string(),
        token: ADMIN_TOKEN.to_string(),
    }))
}

/// Today's attendance list
#[utoipa::path(
    get,
    path = "/api/admin/daily-list",
    responses(
        (status = 200, description = "Today's session and its attendance", body = Object, example = json!({
            "session": {
                "id": 3,
                "session_date": "2026-10-19",
                "start_time": "08:25",
                "end_time": "09:05",
                "is_active": true,
                "created_at": "2026-10-19T05:25:00"
            },
            "attendances": [],
            "total_count": 0
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Admin"
)]
pub async fn daily_list(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let pool = pool.get_ref();
    let today = Local::now().date_naive();

    let Some(session) = AttendanceSession::find_by_date(pool, today)
        .await
        .map_err(db_error("Failed to fetch today's session"))?
    else {
        return Ok(HttpResponse::Ok().json(json!({
            "message": "No session found for today",
            "attendances": []
        })));
    };

    let attendances = AttendanceRecord::for_session(pool, session.id)
        .await
        .map_err(db_error("Failed to fetch today's attendance"))?;

    Ok(HttpResponse::Ok().json(json!({
        "total_count": attendances.len(),
        "session": session,
        "attendances": attendances,
    })))
}
