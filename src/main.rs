use actix_web::HttpServer;
use anyhow::Context;
use tracing::info;
use tracing_appender::rolling;
use tracing_subscriber::EnvFilter;

use attendance_tracker::{
    build_app,
    config::Config,
    db::{init_db, run_migrations},
    routes::RateLimits,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .init();

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let server_addr = config.server_addr.clone();
    let limits = RateLimits::new(&config);

    HttpServer::new(move || build_app(pool.clone(), config.clone(), limits.clone()))
        .bind(&server_addr)
        .with_context(|| format!("Failed to bind {server_addr}"))?
        .run()
        .await?;

    Ok(())
}
