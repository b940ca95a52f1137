use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

use super::{session::AttendanceSession, student::Student};

/// An attendance row joined with the student and session it links.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: i64,
    pub student_id: i64,
    pub session_id: i64,
    #[schema(example = "203.0.113.7")]
    pub ip_address: String,
    pub user_agent: Option<String>,
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: NaiveDateTime,
    pub student: Student,
    pub session: AttendanceSession,
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: i64,
    student_id: i64,
    session_id: i64,
    ip_address: String,
    user_agent: Option<String>,
    timestamp: NaiveDateTime,

    student_number: String,
    student_name: String,
    student_email: String,
    student_created_at: NaiveDateTime,

    session_date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
    is_active: bool,
    session_created_at: NaiveDateTime,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            session_id: row.session_id,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            timestamp: row.timestamp,
            student: Student {
                id: row.student_id,
                student_number: row.student_number,
                name: row.student_name,
                email: row.student_email,
                created_at: row.student_created_at,
            },
            session: AttendanceSession {
                id: row.session_id,
                session_date: row.session_date,
                start_time: row.start_time,
                end_time: row.end_time,
                is_active: row.is_active,
                created_at: row.session_created_at,
            },
        }
    }
}

const SELECT_JOINED: &str = r#"
    SELECT
        a.id, a.student_id, a.session_id, a.ip_address, a.user_agent, a.timestamp,
        st.student_number, st.name AS student_name, st.email AS student_email,
        st.created_at AS student_created_at,
        se.session_date, se.start_time, se.end_time, se.is_active,
        se.created_at AS session_created_at
    FROM attendance a
    JOIN student st ON st.id = a.student_id
    JOIN attendance_session se ON se.id = a.session_id
"#;

/// Fields captured when a student checks in.
#[derive(Debug, Clone)]
pub struct NewAttendance<'a> {
    pub student_id: i64,
    pub session_id: i64,
    pub ip_address: &'a str,
    pub user_agent: &'a str,
}

async fn fetch_where(
    pool: &SqlitePool,
    filter: &str,
    id: i64,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let sql = format!("{SELECT_JOINED} WHERE {filter} = ? ORDER BY a.id");
    let rows = sqlx::query_as::<_, AttendanceRow>(&sql)
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(AttendanceRecord::from).collect())
}

impl AttendanceRecord {
    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<AttendanceRecord>, sqlx::Error> {
        Ok(fetch_where(pool, "a.id", id).await?.into_iter().next())
    }

    pub async fn for_session(
        pool: &SqlitePool,
        session_id: i64,
    ) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        fetch_where(pool, "a.session_id", session_id).await
    }

    pub async fn for_student(
        pool: &SqlitePool,
        student_id: i64,
    ) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
        fetch_where(pool, "a.student_id", student_id).await
    }

    pub async fn exists(
        pool: &SqlitePool,
        student_id: i64,
        session_id: i64,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM attendance WHERE student_id = ? AND session_id = ? LIMIT 1)",
        )
        .bind(student_id)
        .bind(session_id)
        .fetch_one(pool)
        .await
    }

    /// Inserts the row and returns its id.
    pub async fn insert(pool: &SqlitePool, new: &NewAttendance<'_>) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO attendance (student_id, session_id, ip_address, user_agent, timestamp)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(new.student_id)
        .bind(new.session_id)
        .bind(new.ip_address)
        .bind(new.user_agent)
        .bind(Utc::now().naive_utc())
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance")
            .fetch_one(pool)
            .await
    }

    pub async fn count_for_session(pool: &SqlitePool, session_id: i64) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance WHERE session_id = ?")
            .bind(session_id)
            .fetch_one(pool)
            .await
    }
}
