use crate::{
    error::{ApiError, db_error},
    model::student::Student,
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStudent {
    #[schema(example = "Ada Yilmaz")]
    pub name: String,
    #[schema(example = "2024-017")]
    pub student_number: Option<String>,
    #[schema(example = "ada@school.example", format = "email")]
    pub email: Option<String>,
}

/// List students
#[utoipa::path(
    get,
    path = "/api/students",
    responses(
        (status = 200, description = "All registered students", body = [Student]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn list_students(pool: web::Data<SqlitePool>) -> Result<HttpResponse, ApiError> {
    let students = Student::list(pool.get_ref())
        .await
        .map_err(db_error("Failed to list students"))?;

    Ok(HttpResponse::Ok().json(students))
}

/// Create Student
#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudent,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Blank name, or a student with this name already exists", body = Object, example = json!({
            "error": "A student with this name is already registered"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn create_student(
    pool: web::Data<SqlitePool>,
    payload: web::Json<CreateStudent>,
) -> Result<HttpResponse, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::bad_request("Name is required"));
    }

    let existing = Student::find_by_name(pool.get_ref(), &payload.name)
        .await
        .map_err(db_error("Failed to look up student by name"))?;

    if existing.is_some() {
        return Err(ApiError::bad_request(
            "A student with this name is already registered",
        ));
    }

    let student = Student::insert(
        pool.get_ref(),
        payload.student_number.as_deref().unwrap_or(""),
        &payload.name,
        payload.email.as_deref().unwrap_or(""),
    )
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return ApiError::bad_request("Student number or email already registered");
            }
        }
        tracing::error!(error = %e, "Failed to create student");
        ApiError::Internal
    })?;

    info!(student_id = student.id, name = %student.name, "Student created");

    Ok(HttpResponse::Created().json(student))
}

/// Get Student by ID
#[utoipa::path(
    get,
    path = "/api/students/{student_id}",
    params(
        ("student_id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student found", body = Student),
        (status = 404, description = "Student not found", body = Object, example = json!({
            "error": "Student not found"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Student"
)]
pub async fn get_student(
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let student_id = path.into_inner();

    let student = Student::find(pool.get_ref(), student_id)
        .await
        .map_err(db_error("Failed to fetch student"))?
        .ok_or_else(|| ApiError::not_found("Student not found"))?;

    Ok(HttpResponse::Ok().json(student))
}
