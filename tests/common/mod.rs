#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use attendance_tracker::db;
use serde_json::Value;
use sqlx::SqlitePool;

pub const CLIENT_ADDR: &str = "203.0.113.7:40000";

/// Fresh, migrated in-memory database.
pub async fn test_pool() -> SqlitePool {
    let pool = db::init_db("sqlite::memory:", 1)
        .await
        .expect("in-memory pool");
    db::run_migrations(&pool).await.expect("migrations");
    pool
}

/// Rate-limited routes key on the peer address, which test requests lack
/// unless set explicitly.
pub fn from_client(req: TestRequest) -> TestRequest {
    req.peer_addr(CLIENT_ADDR.parse().expect("socket address"))
}

pub async fn status_and_json<B: MessageBody>(resp: ServiceResponse<B>) -> (StatusCode, Value) {
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

pub fn today() -> String {
    chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()
}
