use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Serialize, Serializer};
use sqlx::SqlitePool;
use utoipa::ToSchema;

/// Wire format for session start/end times.
pub const TIME_FORMAT: &str = "%H:%M";
/// Wire format for session dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Start of the daily class window.
pub fn default_start_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 25, 0).expect("08:25 is a valid time")
}

/// End of the daily class window.
pub fn default_end_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 5, 0).expect("09:05 is a valid time")
}

fn serialize_hh_mm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format(TIME_FORMAT))
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 3,
        "session_date": "2026-10-19",
        "start_time": "08:25",
        "end_time": "09:05",
        "is_active": true,
        "created_at": "2026-10-19T05:25:00.000132"
    })
)]
pub struct AttendanceSession {
    #[schema(example = 3)]
    pub id: i64,

    #[schema(value_type = String, format = "date", example = "2026-10-19")]
    pub session_date: NaiveDate,

    #[schema(value_type = String, example = "08:25")]
    #[serde(serialize_with = "serialize_hh_mm")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, example = "09:05")]
    #[serde(serialize_with = "serialize_hh_mm")]
    pub end_time: NaiveTime,

    pub is_active: bool,

    #[schema(value_type = String, format = "date-time")]
    pub created_at: NaiveDateTime,
}

/// Fields for a session about to be inserted.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_active: bool,
}

impl NewSession {
    /// The 08:25-09:05 window on `date`, already active.
    pub fn default_for(date: NaiveDate) -> Self {
        Self {
            session_date: date,
            start_time: default_start_time(),
            end_time: default_end_time(),
            is_active: true,
        }
    }
}

const COLUMNS: &str = "id, session_date, start_time, end_time, is_active, created_at";

impl AttendanceSession {
    /// Newest session date first.
    pub async fn list(pool: &SqlitePool) -> Result<Vec<AttendanceSession>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceSession>(&format!(
            "SELECT {COLUMNS} FROM attendance_session ORDER BY session_date DESC, id DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> Result<Option<AttendanceSession>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceSession>(&format!(
            "SELECT {COLUMNS} FROM attendance_session WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// First active session by id. Nothing prevents several from being
    /// active at once; the lowest id wins.
    pub async fn find_active(pool: &SqlitePool) -> Result<Option<AttendanceSession>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceSession>(&format!(
            "SELECT {COLUMNS} FROM attendance_session WHERE is_active = 1 ORDER BY id LIMIT 1"
        ))
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_date(
        pool: &SqlitePool,
        date: NaiveDate,
    ) -> Result<Option<AttendanceSession>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceSession>(&format!(
            "SELECT {COLUMNS} FROM attendance_session WHERE session_date = ? ORDER BY id LIMIT 1"
        ))
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    pub async fn insert(
        pool: &SqlitePool,
        new: &NewSession,
    ) -> Result<AttendanceSession, sqlx::Error> {
        sqlx::query_as::<_, AttendanceSession>(&format!(
            r#"
            INSERT INTO attendance_session (session_date, start_time, end_time, is_active, created_at)
            VALUES (?, ?, ?, ?, ?)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new.session_date)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.is_active)
        .bind(Utc::now().naive_utc())
        .fetch_one(pool)
        .await
    }

    /// Clears the flag on every session, then sets it on `id`.
    /// Returns `None` (and changes nothing) if `id` does not exist.
    pub async fn activate(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<AttendanceSession>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("UPDATE attendance_session SET is_active = 0")
            .execute(&mut *tx)
            .await?;

        let session = sqlx::query_as::<_, AttendanceSession>(&format!(
            "UPDATE attendance_session SET is_active = 1 WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        match session {
            Some(session) => {
                tx.commit().await?;
                Ok(Some(session))
            }
            None => {
                tx.rollback().await?;
                Ok(None)
            }
        }
    }

    pub async fn deactivate(
        pool: &SqlitePool,
        id: i64,
    ) -> Result<Option<AttendanceSession>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceSession>(&format!(
            "UPDATE attendance_session SET is_active = 0 WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM attendance_session")
            .fetch_one(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_0825_to_0905() {
        let session = NewSession::default_for(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap());
        assert_eq!(session.start_time.format(TIME_FORMAT).to_string(), "08:25");
        assert_eq!(session.end_time.format(TIME_FORMAT).to_string(), "09:05");
        assert!(session.is_active);
    }

    #[test]
    fn times_serialize_without_seconds() {
        let session = AttendanceSession {
            id: 1,
            session_date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 25, 30).unwrap(),
            end_time: default_end_time(),
            is_active: false,
            created_at: NaiveDate::from_ymd_opt(2026, 10, 19)
                .unwrap()
                .and_hms_opt(5, 0, 0)
                .unwrap(),
        };

        let value = serde_json::to_value(&session).unwrap();
        assert_eq!(value["session_date"], "2026-10-19");
        assert_eq!(value["start_time"], "08:25");
        assert_eq!(value["end_time"], "09:05");
    }
}
