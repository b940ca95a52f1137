use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use attendance_tracker::scheduler::{Action, DEFAULT_API_URL, SchedulerClient};

/// Opens and closes the daily attendance session (Monday to Thursday).
/// Meant to be run from cron: `start` at 08:25, `stop` at 09:05.
#[derive(Parser, Debug)]
#[clap(name = "attendance-scheduler", version)]
struct Cli {
    /// `start` or `stop`
    action: Action,

    /// Base URL of the attendance API
    #[clap(long, env = "ATTENDANCE_API_URL", default_value = DEFAULT_API_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let today = Local::now().date_naive();

    info!(action = %cli.action, base_url = %cli.base_url, "Running scheduled action");

    match SchedulerClient::new(cli.base_url).run(cli.action, today).await {
        Ok(outcome) => {
            info!(action = %cli.action, ?outcome, "Scheduled action finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(action = %cli.action, error = %e, "Scheduled action failed");
            ExitCode::FAILURE
        }
    }
}
