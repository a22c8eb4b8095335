use crate::report::aggregate::WeeklyAggregate;
use crate::report::entity::{NewWeeklyReport, ValidationError};
use crate::report::extract::extract_summary;
use crate::report::prompt::{SYSTEM_PROMPT, build_user_prompt};
use crate::report::week::WeekWindow;
use crate::report::{
    MoodRecord, MoodRecordSource, ReportView, SaveError, SummaryGenerator, WeeklyReportStore,
};
use anyhow::anyhow;
use chrono::{Local, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Clone)]
pub struct WeeklyReportService {
    reports: Arc<dyn WeeklyReportStore>,
    moods: Arc<dyn MoodRecordSource>,
    generator: Arc<dyn SummaryGenerator>,
    generation_timeout: Duration,
}

impl WeeklyReportService {
    pub fn new(
        reports: Arc<dyn WeeklyReportStore>,
        moods: Arc<dyn MoodRecordSource>,
        generator: Arc<dyn SummaryGenerator>,
        generation_timeout: Duration,
    ) -> Self {
        Self {
            reports,
            moods,
            generator,
            generation_timeout,
        }
    }

    pub async fn get_or_create_latest_report(&self, user_id: i64) -> Result<ReportView, ReportError> {
        self.get_or_create_report_for(user_id, Local::now().date_naive())
            .await
    }

    pub async fn get_or_create_report_for(
        &self,
        user_id: i64,
        today: NaiveDate,
    ) -> Result<ReportView, ReportError> {
        let window = WeekWindow::containing(today);

        if let Some(existing) = self.reports.find_by_user_and_week(user_id, window.start)? {
            debug!(user_id, week_start = %window.start, "weekly report already exists");
            return Ok(ReportView::from(&existing));
        }

        let records = self.moods.find_7days_by_user(user_id, today)?;
        if records.is_empty() {
            info!(user_id, week_start = %window.start, "no mood records this week, report not stored");
            return Ok(ReportView::empty(window));
        }

        let aggregate = WeeklyAggregate::from_records(&records);
        let summary_text = match self.generate_summary(&records, &aggregate).await {
            Some(summary) => summary,
            None => {
                info!(user_id, week_start = %window.start, "using fallback weekly summary");
                fallback_summary(&aggregate)
            }
        };

        let report = NewWeeklyReport::new(
            user_id,
            window.start,
            window.end,
            Some(summary_text),
            aggregate.record_count as i64,
            aggregate.avg_intensity,
            aggregate.mood_distribution,
        )?;

        match self.reports.save(&report) {
            Ok(saved) => {
                info!(user_id, report_id = saved.id, week_start = %saved.week_start, "weekly report stored");
                Ok(ReportView::from(&saved))
            }
            Err(SaveError::Duplicate) => {
                info!(user_id, week_start = %window.start, "weekly report created concurrently, reusing stored row");
                let existing = self
                    .reports
                    .find_by_user_and_week(user_id, window.start)?
                    .ok_or_else(|| anyhow!("weekly report missing after duplicate insert"))?;
                Ok(ReportView::from(&existing))
            }
            Err(SaveError::Storage(error)) => Err(ReportError::Storage(error)),
        }
    }

    async fn generate_summary(
        &self,
        records: &[MoodRecord],
        aggregate: &WeeklyAggregate,
    ) -> Option<String> {
        let user_prompt = build_user_prompt(records, aggregate);
        let completion = timeout(
            self.generation_timeout,
            self.generator.complete(SYSTEM_PROMPT, &user_prompt),
        )
        .await;

        let raw = match completion {
            Ok(Ok(raw)) => raw,
            Ok(Err(error)) => {
                warn!(error = %error, "weekly summary generation failed");
                return None;
            }
            Err(_) => {
                warn!(
                    timeout_seconds = self.generation_timeout.as_secs(),
                    "weekly summary generation timed out"
                );
                return None;
            }
        };

        extract_summary(&raw)
    }
}

pub fn fallback_summary(aggregate: &WeeklyAggregate) -> String {
    format!(
        "You recorded {} moods this week. Your average intensity was {:.1}/10. Keeping a steady record goes a long way for your mental health.",
        aggregate.record_count,
        aggregate.avg_intensity.unwrap_or_default()
    )
}
