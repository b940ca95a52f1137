mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use attendance_tracker::{build_app, config::Config, model::student::Student, routes::RateLimits};
use common::{status_and_json, test_pool};
use serde_json::json;

#[actix_web::test]
async fn create_get_and_list_students() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({
            "name": "Ada Yilmaz",
            "student_number": "2024-017",
            "email": "ada@school.example"
        }))
        .to_request();
    let (status, created) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Ada Yilmaz");
    assert_eq!(created["student_number"], "2024-017");
    assert!(created["created_at"].is_string());

    let id = created["id"].as_i64().unwrap();
    let req = test::TestRequest::get()
        .uri(&format!("/api/students/{id}"))
        .to_request();
    let (status, fetched) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let req = test::TestRequest::get().uri("/api/students").to_request();
    let (status, list) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn duplicate_name_is_rejected() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let first = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({ "name": "Can Demir" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, first).await.status(),
        StatusCode::CREATED
    );

    let second = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({ "name": "Can Demir", "student_number": "99" }))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, second).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("already registered"));
}

#[actix_web::test]
async fn missing_number_and_email_default_to_empty() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    for name in ["Ece", "Efe"] {
        let req = test::TestRequest::post()
            .uri("/api/students")
            .set_json(json!({ "name": name }))
            .to_request();
        let (status, body) = status_and_json(test::call_service(&app, req).await).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["student_number"], "");
        assert_eq!(body["email"], "");
    }
}

#[actix_web::test]
async fn reused_email_is_rejected() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({ "name": "Deniz", "email": "d@school.example" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({ "name": "Deniz K", "email": "d@school.example" }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::BAD_REQUEST
    );
}

#[actix_web::test]
async fn unknown_student_is_404() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::get().uri("/api/students/42").to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Student not found");
}

#[actix_web::test]
async fn body_without_name_is_a_server_error() {
    let app = test::init_service(build_app(
        test_pool().await,
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({ "email": "nobody@school.example" }))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn blank_name_is_rejected() {
    let pool = test_pool().await;
    let app = test::init_service(build_app(
        pool.clone(),
        Config::default(),
        RateLimits::default(),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri("/api/students")
        .set_json(json!({ "name": "  ", "student_number": "7" }))
        .to_request();
    let (status, body) = status_and_json(test::call_service(&app, req).await).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Name is required");
    assert_eq!(Student::count(&pool).await.unwrap(), 0);
}
