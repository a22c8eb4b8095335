pub mod aggregate;
pub mod entity;
pub mod extract;
pub mod prompt;
pub mod service;
pub mod week;

use crate::report::entity::NewWeeklyReport;
use crate::report::week::WeekWindow;
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NO_RECORDS_MESSAGE: &str =
    "No mood records this week yet. Try recording how you feel today!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodRecord {
    pub record_date: NaiveDate,
    pub mood_emoji: String,
    pub intensity: i64,
    pub mood_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodCount {
    pub emoji: String,
    pub count: u32,
}

/// A persisted weekly report. Rows are written once and never updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyReport {
    pub id: i64,
    pub user_id: i64,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub summary_text: Option<String>,
    pub record_count: i64,
    pub avg_intensity: Option<f64>,
    pub mood_distribution: Vec<MoodCount>,
    pub created_at: i64,
}

/// Response body of `GET /weekly-report/latest`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub record_count: i64,
    pub avg_intensity: Option<f64>,
    pub mood_distribution: Vec<MoodCount>,
    pub summary_text: Option<String>,
}

impl ReportView {
    /// Transient view for a week without records. Never persisted.
    pub fn empty(window: WeekWindow) -> Self {
        Self {
            id: None,
            week_start: window.start,
            week_end: window.end,
            record_count: 0,
            avg_intensity: None,
            mood_distribution: Vec::new(),
            summary_text: Some(NO_RECORDS_MESSAGE.to_string()),
        }
    }
}

impl From<&WeeklyReport> for ReportView {
    fn from(report: &WeeklyReport) -> Self {
        Self {
            id: Some(report.id),
            week_start: report.week_start,
            week_end: report.week_end,
            record_count: report.record_count,
            avg_intensity: report.avg_intensity,
            mood_distribution: report.mood_distribution.clone(),
            summary_text: report.summary_text.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("weekly report already exists for this user and week")]
    Duplicate,

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub trait WeeklyReportStore: Send + Sync {
    fn find_by_user_and_week(
        &self,
        user_id: i64,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyReport>>;

    /// Inserts inside a single transaction. A row that already exists for
    /// `(user_id, week_start)` is reported as [`SaveError::Duplicate`].
    fn save(&self, report: &NewWeeklyReport) -> std::result::Result<WeeklyReport, SaveError>;
}

pub trait MoodRecordSource: Send + Sync {
    /// Records dated `today - 6 days ..= today`, oldest first.
    fn find_7days_by_user(&self, user_id: i64, today: NaiveDate) -> Result<Vec<MoodRecord>>;
}

#[async_trait]
pub trait SummaryGenerator: Send + Sync {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}
