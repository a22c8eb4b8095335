use crate::auth::SessionValidator;
use crate::db::Database;
use crate::report::entity::NewWeeklyReport;
use crate::report::{MoodRecord, MoodRecordSource, SaveError, WeeklyReport, WeeklyReportStore};
use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use std::path::PathBuf;

/// SQLite-backed collaborators. Each call opens its own connection, so no
/// connection outlives a single unit of storage work.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    fn open(&self) -> Result<Database> {
        Database::open(&self.db_path)
    }
}

impl WeeklyReportStore for SqliteStore {
    fn find_by_user_and_week(
        &self,
        user_id: i64,
        week_start: NaiveDate,
    ) -> Result<Option<WeeklyReport>> {
        self.open()?.weekly_report(user_id, week_start)
    }

    fn save(&self, report: &NewWeeklyReport) -> std::result::Result<WeeklyReport, SaveError> {
        self.open()?
            .insert_weekly_report(report, Utc::now().timestamp())
    }
}

impl MoodRecordSource for SqliteStore {
    fn find_7days_by_user(&self, user_id: i64, today: NaiveDate) -> Result<Vec<MoodRecord>> {
        self.open()?
            .mood_records_between(user_id, today - Duration::days(6), today)
    }
}

impl SessionValidator for SqliteStore {
    fn validate_session(&self, token: &str) -> Result<Option<i64>> {
        self.open()?.session_user(token, Utc::now().timestamp())
    }
}
