use chrono::{NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "student_number": "2024-017",
        "name": "Ada Yilmaz",
        "email": "ada@school.example",
        "created_at": "2026-10-19T08:26:11.204512"
    })
)]
pub struct Student {
    #[schema(example = 1)]
    pub id: i64,

    /// Empty when the student was created implicitly by marking attendance.
    #[schema(example = "2024-017")]
    pub student_number: String,

    #[schema(example = "Ada Yilmaz")]
    pub name: String,

    #[schema(example = "ada@school.example")]
    pub email: String,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

const COLUMNS: &str = "id, student_number, name, email, created_at";

impl Student {
    pub async fn list(pool: &SqlitePool) -> Result<Vec<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM student ORDER BY id"))
            .fetch_all(pool)
            .await
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM student WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Exact, case-sensitive match on the full name.
    pub async fn find_by_name(pool: &SqlitePool, name: &str) -> Result<Option<Student>, sqlx::Error> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {COLUMNS} FROM student WHERE name = ? ORDER BY id LIMIT 1"
        ))
        .bind(name)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert(
        pool: &SqlitePool,
        student_number: &str,
        name: &str,
        email: &str,
    ) -> Result<Student, sqlx::Error> {
        sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO student (student_number, name, email, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(student_number)
        .bind(name)
        .bind(email)
        .bind(Utc::now().naive_utc())
        .fetch_one(pool)
        .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM student")
            .fetch_one(pool)
            .await
    }
}
