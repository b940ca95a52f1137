mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use attendance_tracker::{
    build_app,
    config::Config,
    model::session::{AttendanceSession, NewSession},
    routes::RateLimits,
};
use chrono::{NaiveDate, NaiveTime};
use common::{status_and_json, test_pool};
use serde_json::json;
use sqlx::SqlitePool;

async fn seed_session(pool: &SqlitePool, day: u32, is_active: bool) -> AttendanceSession {
    AttendanceSession::insert(
        pool,
        &NewSession {
            session_date: NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
            start_time: NaiveTime::from_hms_opt(8, 25, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 5, 0).unwrap(),
            is_active,
        },
    )
    .await
    .unwrap()
}

#[actix_web::test]
async fn create_session_echoes_wire_formats() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({
            "session_date": "2026-10-19",
            "start_time": "08:25",
            "end_time": "09:05"
        }))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["session_date"], "2026-10-19");
    assert_eq!(body["start_time"], "08:25");
    assert_eq!(body["end_time"], "09:05");
    assert_eq!(body["is_active"], false);
}

#[actix_web::test]
async fn malformed_time_is_a_server_error() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({
            "session_date": "2026-10-19",
            "start_time": "8.25am",
            "end_time": "09:05"
        }))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().contains("start_time"));
}

#[actix_web::test]
async fn session_without_times_is_a_server_error() {
    let pool = test_pool().await;
    let app = test::init_service(build_app(
        pool.clone(),
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sessions")
        .set_json(json!({ "session_date": "2026-10-19" }))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
    assert_eq!(AttendanceSession::count(&pool).await.unwrap(), 0);
}

#[actix_web::test]
async fn activating_b_deactivates_a() {
    let pool = test_pool().await;
    let a = seed_session(&pool, 19, false).await;
    let b = seed_session(&pool, 20, false).await;
    let app = test::init_service(build_app(
        pool.clone(),
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/activate", a.id))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/activate", b.id))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], true);

    let a = AttendanceSession::find(&pool, a.id).await.unwrap().unwrap();
    let b = AttendanceSession::find(&pool, b.id).await.unwrap().unwrap();
    assert!(!a.is_active);
    assert!(b.is_active);

    let req = test::TestRequest::get().uri("/api/sessions").to_request();
    let (_, list) = status_and_json(test::call_service(&app, req).await).await;
    let active: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .filter(|s| s["is_active"] == true)
        .collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"].as_i64(), Some(b.id));
}

#[actix_web::test]
async fn activating_unknown_session_keeps_current_one() {
    let pool = test_pool().await;
    let current = seed_session(&pool, 19, true).await;
    let app = test::init_service(build_app(
        pool.clone(),
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sessions/999/activate")
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Session not found");

    let current = AttendanceSession::find(&pool, current.id).await.unwrap().unwrap();
    assert!(current.is_active);
}

#[actix_web::test]
async fn deactivate_then_no_active_session() {
    let pool = test_pool().await;
    let session = seed_session(&pool, 19, true).await;
    let app = test::init_service(build_app(pool, Config::default(), RateLimits::default())).await;

    let req = test::TestRequest::get().uri("/api/sessions/active").to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_i64(), Some(session.id));

    let req = test::TestRequest::post()
        .uri(&format!("/api/sessions/{}/deactivate", session.id))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let req = test::TestRequest::get().uri("/api/sessions/active").to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No active session");
}

#[actix_web::test]
async fn deactivating_unknown_session_is_404() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/sessions/7/deactivate")
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[actix_web::test]
async fn sessions_are_listed_newest_first() {
    let pool = test_pool().await;
    seed_session(&pool, 19, false).await;
    seed_session(&pool, 21, false).await;
    seed_session(&pool, 20, false).await;
    let app = test::init_service(build_app(pool, Config::default(), RateLimits::default())).await;

    let req = test::TestRequest::get().uri("/api/sessions").to_request();
    let (_, list) = status_and_json(test::call_service(&app, req).await).await;
    let dates: Vec<_> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["session_date"].as_str().unwrap().to_string())
        .collect();

    assert_eq!(dates, ["2026-10-21", "2026-10-20", "2026-10-19"]);
}
