pub mod api;
pub mod config;
pub mod db;
pub mod docs;
pub mod error;
pub mod model;
pub mod routes;
pub mod scheduler;

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::web::{self, Data};
use actix_web::App;
use sqlx::SqlitePool;
use utoipa::OpenApi; // needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::docs::ApiDoc;
use crate::error::json_error_handler;
use crate::routes::RateLimits;

/// The full application: API routes, health check and Swagger UI.
/// Shared by the server binary and the integration tests. `limits` carries
/// the rate limiter state and must be the same for every worker.
pub fn build_app(
    pool: SqlitePool,
    config: Config,
    limits: RateLimits,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(Logger::default())
        .wrap(NormalizePath::trim())
        .service(
            // wildcard {_:.*} so the UI's JS/CSS assets resolve
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", ApiDoc::openapi()),
        )
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(Data::new(pool))
        .configure(|cfg| routes::configure(cfg, &config, &limits))
}
