use crate::api::admin::{AdminLogin, AdminLoginResponse};
use crate::api::attendance::{MarkAttendance, MarkAttendanceResponse};
use crate::api::session::CreateSession;
use crate::api::stats::{OverallStats, SessionStats};
use crate::api::student::CreateStudent;
use crate::model::attendance::AttendanceRecord;
use crate::model::session::AttendanceSession;
use crate::model::student::Student;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Classroom Attendance API",
        version = "0.1.0",
        description = r#"
## Classroom Attendance Tracker

Students check in by name during the daily session; teachers review
presence per session, per student and for today.

### Key Features
- **Students**: register, list and view students
- **Sessions**: timed attendance windows, one of which is active at a time
- **Attendance**: one check-in per student per session, with caller IP and user agent
- **Stats**: presence per session and across all sessions

### Scheduling
The `attendance-scheduler` command opens today's 08:25-09:05 session and
closes it again, Monday to Thursday.

### Response Format
JSON bodies; errors are `{"error": "<message>"}`.
"#,
    ),
    paths(
        crate::api::student::list_students,
        crate::api::student::create_student,
        crate::api::student::get_student,

        crate::api::session::list_sessions,
        crate::api::session::create_session,
        crate::api::session::activate_session,
        crate::api::session::deactivate_session,
        crate::api::session::get_active_session,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::session_attendance,
        crate::api::attendance::student_attendance,

        crate::api::stats::session_stats,
        crate::api::stats::overall_stats,

        crate::api::admin::admin_login,
        crate::api::admin::daily_list
    ),
    components(
        schemas(
            Student,
            CreateStudent,
            AttendanceSession,
            CreateSession,
            AttendanceRecord,
            MarkAttendance,
            MarkAttendanceResponse,
            SessionStats,
            OverallStats,
            AdminLogin,
            AdminLoginResponse
        )
    ),
    tags(
        (name = "Student", description = "Student registry"),
        (name = "Session", description = "Attendance session management"),
        (name = "Attendance", description = "Check-in and attendance queries"),
        (name = "Stats", description = "Attendance statistics"),
        (name = "Admin", description = "Admin login and daily list"),
    )
)]
pub struct ApiDoc;
