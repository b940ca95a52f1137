//! HTTP client driving the daily session from the outside: open today's
//! session in the morning, close whatever is active afterwards.

use chrono::{Datelike, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::info;

use crate::model::session::{DATE_FORMAT, TIME_FORMAT, default_end_time, default_start_time};

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Start,
    Stop,
}

#[derive(Error, Debug)]
pub enum SchedulerError {
    /// Connection failures, timeouts and undecodable bodies
    #[error("API connection error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{step} failed with status {status}: {body}")]
    UnexpectedStatus {
        step: &'static str,
        status: StatusCode,
        body: String,
    },
}

/// Sessions run Monday to Thursday.
pub fn is_school_day(date: NaiveDate) -> bool {
    date.weekday().num_days_from_monday() < 4
}

#[derive(Serialize)]
struct SessionRequest {
    session_date: String,
    start_time: String,
    end_time: String,
    is_active: bool,
}

/// The part of the API's session representation the scheduler needs.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSummary {
    pub id: i64,
    pub session_date: String,
    pub start_time: String,
    pub end_time: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    Deactivated(i64),
    NothingActive,
}

/// What a scheduled run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Friday to Sunday: the API was not contacted.
    NotASchoolDay,
    Started(i64),
    Stopped(StopOutcome),
}

pub struct SchedulerClient {
    client: Client,
    base_url: String,
}

impl SchedulerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn expect_status(
        step: &'static str,
        response: reqwest::Response,
        expected: StatusCode,
    ) -> Result<reqwest::Response, SchedulerError> {
        if response.status() == expected {
            return Ok(response);
        }
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(SchedulerError::UnexpectedStatus { step, status, body })
    }

    /// Creates the 08:25-09:05 session for `date` and activates it.
    pub async fn start_session(&self, date: NaiveDate) -> Result<SessionSummary, SchedulerError> {
        let request = SessionRequest {
            session_date: date.format(DATE_FORMAT).to_string(),
            start_time: default_start_time().format(TIME_FORMAT).to_string(),
            end_time: default_end_time().format(TIME_FORMAT).to_string(),
            is_active: true,
        };

        let response = self
            .client
            .post(self.url("/sessions"))
            .json(&request)
            .send()
            .await?;
        let session: SessionSummary = Self::expect_status("create session", response, StatusCode::CREATED)
            .await?
            .json()
            .await?;
        info!(session_id = session.id, "Attendance session created");

        let response = self
            .client
            .post(self.url(&format!("/sessions/{}/activate", session.id)))
            .send()
            .await?;
        let session: SessionSummary = Self::expect_status("activate session", response, StatusCode::OK)
            .await?
            .json()
            .await?;
        info!(
            session_id = session.id,
            "Session activated: {} {}-{}",
            session.session_date,
            session.start_time,
            session.end_time
        );

        Ok(session)
    }

    /// Deactivates the active session, if any.
    pub async fn stop_session(&self) -> Result<StopOutcome, SchedulerError> {
        let response = self.client.get(self.url("/sessions/active")).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            info!("No active session to close");
            return Ok(StopOutcome::NothingActive);
        }

        let active: SessionSummary = Self::expect_status("find active session", response, StatusCode::OK)
            .await?
            .json()
            .await?;

        let response = self
            .client
            .post(self.url(&format!("/sessions/{}/deactivate", active.id)))
            .send()
            .await?;
        Self::expect_status("deactivate session", response, StatusCode::OK).await?;

        info!(session_id = active.id, "Active session closed");
        Ok(StopOutcome::Deactivated(active.id))
    }

    /// Runs `action` for `today`, doing nothing outside Monday to Thursday.
    pub async fn run(
        &self,
        action: Action,
        today: NaiveDate,
    ) -> Result<RunOutcome, SchedulerError> {
        if !is_school_day(today) {
            info!(weekday = %today.weekday(), "No attendance session planned today");
            return Ok(RunOutcome::NotASchoolDay);
        }

        match action {
            Action::Start => Ok(RunOutcome::Started(self.start_session(today).await?.id)),
            Action::Stop => Ok(RunOutcome::Stopped(self.stop_session().await?)),
        }
    }
}
