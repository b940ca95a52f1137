use crate::{
    api::{admin, attendance, session, stats, student},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, Responder, web};
use serde_json::json;
use std::sync::Arc;

type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP quota allowing `requests_per_min` requests, all of which may
/// arrive in a single burst.
fn limiter_config(requests_per_min: u32) -> LimiterConfig {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / u64::from(requests_per_min);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("non-zero period and burst size")
}

/// Rate limiter state for the login and attendance endpoints.
///
/// `HttpServer` builds one `App` per worker; every worker must be handed a
/// clone of the same `RateLimits` so that a client's quota is counted once
/// across all of them.
#[derive(Clone)]
pub struct RateLimits {
    login: Arc<LimiterConfig>,
    attendance: Arc<LimiterConfig>,
}

impl RateLimits {
    pub fn new(config: &Config) -> Self {
        Self {
            login: Arc::new(limiter_config(config.rate_login_per_min)),
            attendance: Arc::new(limiter_config(config.rate_attendance_per_min)),
        }
    }
}

impl Default for RateLimits {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limits: &RateLimits) {
    let login_limiter = Governor::new(&*limits.login);
    let attendance_limiter = Governor::new(&*limits.attendance);

    cfg.route("/health", web::get().to(health));

    cfg.service(
        web::scope(&config.api_prefix)
            .service(
                web::scope("/students")
                    // /students
                    .service(
                        web::resource("")
                            .route(web::get().to(student::list_students))
                            .route(web::post().to(student::create_student)),
                    )
                    // /students/{id}
                    .service(web::resource("/{id}").route(web::get().to(student::get_student))),
            )
            .service(
                web::scope("/sessions")
                    // /sessions
                    .service(
                        web::resource("")
                            .route(web::get().to(session::list_sessions))
                            .route(web::post().to(session::create_session)),
                    )
                    // /sessions/active, registered before the {id} resources
                    .service(
                        web::resource("/active").route(web::get().to(session::get_active_session)),
                    )
                    .service(
                        web::resource("/{id}/activate")
                            .route(web::post().to(session::activate_session)),
                    )
                    .service(
                        web::resource("/{id}/deactivate")
                            .route(web::post().to(session::deactivate_session)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .wrap(attendance_limiter)
                            .route(web::post().to(attendance::mark_attendance)),
                    )
                    .service(
                        web::resource("/session/{id}")
                            .route(web::get().to(attendance::session_attendance)),
                    )
                    .service(
                        web::resource("/student/{id}")
                            .route(web::get().to(attendance::student_attendance)),
                    ),
            )
            .service(
                web::scope("/stats")
                    .service(
                        web::resource("/session/{id}").route(web::get().to(stats::session_stats)),
                    )
                    .service(web::resource("/overall").route(web::get().to(stats::overall_stats))),
            )
            .service(
                web::scope("/admin")
                    .service(
                        web::resource("/login")
                            .wrap(login_limiter)
                            .route(web::post().to(admin::admin_login)),
                    )
                    .service(web::resource("/daily-list").route(web::get().to(admin::daily_list))),
            ),
    );
}
